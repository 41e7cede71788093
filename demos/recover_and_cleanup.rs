//! Recovery and cleanup ordering, including panics.
//!
//! Run with: cargo run --example recover_and_cleanup

use attempt_flow::{attempt, attempt_run_full, attempt_with_cleanup, Failure, Panicked};
use std::cell::RefCell;

struct Connection {
    log: RefCell<Vec<String>>,
}

impl Connection {
    fn send(&self, payload: &str) -> Result<usize, Failure> {
        self.log.borrow_mut().push(format!("send {}", payload));
        if payload.is_empty() {
            return Err(Failure::msg("empty payload"));
        }
        Ok(payload.len())
    }

    fn close(&self) {
        self.log.borrow_mut().push("close".into());
    }
}

fn main() {
    // Silence the default hook so the captured panic below does not print.
    std::panic::set_hook(Box::new(|_| {}));

    let conn = Connection { log: RefCell::new(Vec::new()) };

    for payload in ["hello", "", "!"] {
        attempt_run_full(
            || conn.send(payload).map(drop),
            |failure| conn.log.borrow_mut().push(format!("recovered: {}", failure.message())),
            || conn.close(),
        );
    }

    let panicked: Option<()> = attempt(|| -> Result<(), Failure> { panic!("lost connection") });
    println!("panicking operation gave {:?}", panicked);

    attempt_run_full(
        || -> Result<(), Failure> { panic!("lost connection") },
        |failure| {
            if let Some(p) = failure.downcast_ref::<Panicked>() {
                conn.log.borrow_mut().push(format!("panic: {}", p.message()));
            }
        },
        || conn.close(),
    );

    // Cleanup without capture: the error still reaches the caller.
    let sent = attempt_with_cleanup(|| conn.send(""), || conn.close());
    println!("with_cleanup returned error: {}", sent.is_err());

    for line in conn.log.borrow().iter() {
        println!("{}", line);
    }
}
