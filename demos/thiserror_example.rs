//! Example: Using attempt-flow with thiserror
//!
//! Domain errors defined with thiserror flow into `Failure` through `?`, and
//! recovery handlers can downcast back to them.
//!
//! Run with: cargo run --example thiserror_example

use attempt_flow::{attempt, attempt_full, attempt_recover, Attempt, Failure, FailureExt};
use thiserror::Error;

// Define your domain errors with thiserror
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: String },

    #[error("Invalid config format: {0}")]
    ParseError(String),
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),
}

fn read_config(path: &str) -> Result<String, ConfigError> {
    if path == "missing.toml" {
        Err(ConfigError::NotFound { path: path.into() })
    } else if path == "invalid.toml" {
        Err(ConfigError::ParseError("unexpected token".into()))
    } else {
        Ok("config_data".into())
    }
}

fn connect_db(url: &str) -> Result<(), DbError> {
    if url.contains("bad") {
        Err(DbError::Connection("refused".into()))
    } else {
        Ok(())
    }
}

fn query_user(id: u32) -> Result<String, DbError> {
    if id == 0 {
        Err(DbError::Query("user not found".into()))
    } else {
        Ok(format!("user_{}", id))
    }
}

// Example 1: fall back to a default when the config is missing
fn load_config_with_default(path: &str) -> String {
    attempt(|| read_config(path)).unwrap_or_else(|| "default_config".into())
}

// Example 2: different reactions per error type
fn get_user(config_path: &str, db_url: &str, user_id: u32) -> Option<String> {
    attempt_recover(
        || {
            read_config(config_path)?;
            connect_db(db_url)?;
            Ok::<_, Failure>(query_user(user_id)?)
        },
        |failure| {
            if let Some(e) = failure.downcast_ref::<ConfigError>() {
                eprintln!("  config problem: {}", e);
            } else if let Some(DbError::Connection(reason)) = failure.downcast_ref::<DbError>() {
                eprintln!("  database unavailable ({})", reason);
            } else {
                eprintln!("  giving up: {}", failure.message());
            }
        },
    )
}

// Example 3: context and cleanup around a unit of work
fn sync_user(db_url: &str, user_id: u32) {
    let mut connections = 0;
    let name = attempt_full(
        || {
            connect_db(db_url).context("opening connection")?;
            query_user(user_id).attach("user_id", user_id)
        },
        |failure| eprintln!("  sync failed:\n{}", failure),
        || connections += 1,
    );
    println!("  synced: {:?} (connections closed: {})", name, connections);
}

fn main() {
    println!("Example 1: defaults");
    println!("  {}", load_config_with_default("app.toml"));
    println!("  {}", load_config_with_default("missing.toml"));

    println!("\nExample 2: per-type recovery");
    println!("  {:?}", get_user("app.toml", "db://ok", 7));
    println!("  {:?}", get_user("invalid.toml", "db://ok", 7));
    println!("  {:?}", get_user("app.toml", "db://bad", 7));
    println!("  {:?}", get_user("app.toml", "db://ok", 0));

    println!("\nExample 3: context and cleanup");
    sync_user("db://ok", 3);
    sync_user("db://bad", 3);

    println!("\nExample 4: builder");
    let user = Attempt::new(|| query_user(0))
        .recover(|failure: Failure| eprintln!("  lookup failed: {}", failure.message()))
        .build()
        .unwrap_or_else(|| "guest".into());
    println!("  {}", user);
}
