//! attempt-flow - try/recover/cleanup combinators for fallible closures
//!
//! # Overview
//!
//! `attempt-flow` runs a fallible operation, captures its failure (an `Err`
//! or a panic), and routes the outcome through `Option<T>`: `Some(value)` on
//! success, `None` on failure. Recovery handlers and cleanups can be
//! attached independently, either through free functions or a builder.
//!
//! # Quick Start
//!
//! ```
//! use attempt_flow::{attempt, attempt_full, Failure};
//!
//! assert_eq!(attempt(|| "42".parse::<i32>()), Some(42));
//! assert_eq!(attempt(|| "x".parse::<i32>()), None);
//!
//! let mut log = Vec::new();
//! let out: Option<i32> = attempt_full(
//!     || Err(Failure::msg("boom")),
//!     |failure| eprintln!("recovering from {}", failure.message()),
//!     || log.push("done"),
//! );
//! assert_eq!(out, None);
//! assert_eq!(log, ["done"]);
//! ```
//!
//! # Patterns
//!
//! ## Functions
//!
//! | Function | Failure | Returns |
//! |----------|---------|---------|
//! | `attempt(op)` | swallowed | `Option<T>` |
//! | `attempt_run(op)` | swallowed | `()` |
//! | `attempt_recover(op, h)` | passed to `h` | `Option<T>` |
//! | `attempt_run_recover(op, h)` | passed to `h` | `()` |
//! | `attempt_with_cleanup(op, c)` | propagated after `c` | whatever `op` returns |
//! | `attempt_full(op, h, c)` | passed to `h`, then `c` | `Option<T>` |
//! | `attempt_run_full(op, h, c)` | passed to `h`, then `c` | `()` |
//!
//! ## Builders
//!
//! | Pattern | Description |
//! |---------|-------------|
//! | `Attempt::new(op).build()` | Same as `attempt(op)` |
//! | `.recover(h)` | Set recovery handler (replaces previous) |
//! | `.cleanup(c)` | Set cleanup (replaces previous) |
//! | `.build_mut()` | Replay with `FnMut` closures |
//! | `RunAttempt::new(op)` | Action variant, builds into `()` |
//! | `Attempt::from_option(op)` | `Err(MissingArgument)` when `op` is `None` |
//!
//! ## Macro
//!
//! | Pattern | Description |
//! |---------|-------------|
//! | `attempt! { try { } }` | `?` inside converts to `Failure` |
//! | `attempt! { try { } catch e { } }` | Recover with binding |
//! | `attempt! { try { } catch { } finally { } }` | Recover, then cleanup |
//!
//! ## Extensions
//!
//! | Pattern | Description |
//! |---------|-------------|
//! | `res.context("msg")` | Convert error to `Failure` with context |
//! | `res.attach("key", val)` | Convert error to `Failure` with data |
//! | `res.recover(h)` | Route a computed `Result` through recovery |
//! | `catching(f)` | `FnMut(A) -> Result<B, E>` into `FnMut(A) -> Option<B>` |
//!
//! # Failure semantics
//!
//! - The recovery handler runs exactly once per failure and never supplies
//!   a substitute value: the result after recovery is always `None`.
//! - The cleanup runs on every exit path: success, failure, a panicking
//!   operation, a panicking recovery handler.
//! - A panic inside the cleanup is what the caller sees.
//! - Panics of the operation are captured like errors (as [`Panicked`]); the
//!   default panic hook still prints them.
//!
//! # Missing arguments
//!
//! Callables are taken by value, so leaving one out does not compile:
//!
//! ```compile_fail
//! use attempt_flow::attempt_full;
//!
//! let _: Option<i32> = attempt_full(|| Ok::<_, attempt_flow::Failure>(1), |_| {});
//! ```
//!
//! When the operation itself is only known at runtime, use
//! [`Attempt::from_option`], which fails with [`MissingArgument`] before
//! anything runs.

// ============================================================
// Modules
// ============================================================

mod attempt;
mod builder;
mod ext;
mod failure;
mod macros;

pub mod conditions;
pub mod locks;
pub mod loops;

// ============================================================
// Re-exports
// ============================================================

pub use attempt::{
    attempt, attempt_full, attempt_recover, attempt_run, attempt_run_full, attempt_run_recover,
    attempt_with_cleanup,
};
pub use builder::{Attempt, RunAttempt};
pub use ext::{catching, catching_consumer, catching_predicate, FailureExt};
pub use failure::{Failure, IntoValue, Location, MissingArgument, Panicked, Value, DEFAULT_CONTEXT_LIMIT};

// ============================================================
// Type aliases
// ============================================================

/// Result type alias for operations.
///
/// - `Result<T>` = `core::result::Result<T, Failure>`
/// - `Result<T, io::Error>` = keeps a concrete error type
pub type Result<T, E = Failure> = core::result::Result<T, E>;
