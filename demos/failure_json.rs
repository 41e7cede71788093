//! Show a captured failure as JSON
//!
//! Run with: cargo run --example failure_json --features serde

use attempt_flow::{attempt_recover, Failure, FailureExt};

fn parse_port(raw: &str) -> Result<u16, Failure> {
    raw.trim()
        .parse::<u16>()
        .context("parsing listen port")
        .map_err(|f| f.attach("raw", raw).attach("max", u16::MAX))
}

fn main() {
    for raw in ["8080", "80a", "70000"] {
        let port = attempt_recover(
            || parse_port(raw),
            |failure| match serde_json::to_string_pretty(&failure) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("could not serialize failure: {}", e),
            },
        );
        println!("{:?} -> {:?}", raw, port);
    }
}
