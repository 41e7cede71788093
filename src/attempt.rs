//! Execution combinators: run an operation, capture its failure, route the
//! outcome through `Option<T>`.
//!
//! Every function here is a fixed point in the cross product
//! {recovery, no recovery} x {cleanup, no cleanup} x {action, producer}.
//! The builders in [`crate::builder`] cover the same ground fluently.

use std::panic::{self, AssertUnwindSafe};
use std::thread;

use crate::failure::Failure;

/// Runs `op`, turning an `Err` or a panic into a [`Failure`] located at
/// `site`.
#[inline]
pub(crate) fn capture<T, E, F>(
    op: F,
    site: &'static panic::Location<'static>,
) -> core::result::Result<T, Failure>
where
    F: FnOnce() -> core::result::Result<T, E>,
    E: Into<Failure>,
{
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(error.into().located(site)),
        Err(payload) => Err(Failure::from_panic(payload).located(site)),
    }
}

/// Shared body of every capturing combinator and of the builders.
///
/// Order on failure: `op`, `recovery`, `cleanup`. `cleanup` also runs when
/// `recovery` panics; that panic resumes afterwards.
pub(crate) fn execute<T, E, F, R, C>(
    op: F,
    recovery: Option<R>,
    cleanup: Option<C>,
    site: &'static panic::Location<'static>,
) -> Option<T>
where
    F: FnOnce() -> core::result::Result<T, E>,
    E: Into<Failure>,
    R: FnOnce(Failure),
    C: FnOnce(),
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(move || match capture(op, site) {
        Ok(value) => Some(value),
        Err(failure) => {
            tracing::debug!(failure = %failure.message(), location = %site, "operation failed");
            if let Some(recover) = recovery {
                tracing::trace!(location = %site, "running recovery handler");
                recover(failure);
            }
            None
        }
    }));
    finish(outcome, cleanup, site)
}

/// Runs `cleanup` (if any), then hands back the outcome or resumes its
/// panic. A panic inside `cleanup` replaces whatever was in flight.
fn finish<T, C>(
    outcome: thread::Result<T>,
    cleanup: Option<C>,
    site: &'static panic::Location<'static>,
) -> T
where
    C: FnOnce(),
{
    if let Some(cleanup) = cleanup {
        tracing::trace!(location = %site, "running cleanup");
        cleanup();
    }
    match outcome {
        Ok(value) => value,
        Err(payload) => panic::resume_unwind(payload),
    }
}

// ============================================================
// No cleanup, no recovery
// ============================================================

/// Run a value-producing operation; `Some(value)` on success, `None` if it
/// returned `Err` or panicked. Never re-raises.
///
/// ```
/// use attempt_flow::{attempt, Failure};
///
/// assert_eq!(attempt(|| Ok::<_, Failure>(42)), Some(42));
/// assert_eq!(attempt(|| "nope".parse::<i32>()), None);
/// ```
#[track_caller]
pub fn attempt<T, E, F>(op: F) -> Option<T>
where
    F: FnOnce() -> core::result::Result<T, E>,
    E: Into<Failure>,
{
    execute(op, None::<fn(Failure)>, None::<fn()>, panic::Location::caller())
}

/// Run an action and discard any failure.
#[track_caller]
pub fn attempt_run<E, F>(op: F)
where
    F: FnOnce() -> core::result::Result<(), E>,
    E: Into<Failure>,
{
    let _ = execute(op, None::<fn(Failure)>, None::<fn()>, panic::Location::caller());
}

// ============================================================
// Recovery
// ============================================================

/// Like [`attempt`], but hands the failure to `on_failure` before returning
/// `None`.
///
/// The handler is for side effects only; it cannot supply a substitute
/// value. Use `unwrap_or` on the result for a fallback.
#[track_caller]
pub fn attempt_recover<T, E, F, R>(op: F, on_failure: R) -> Option<T>
where
    F: FnOnce() -> core::result::Result<T, E>,
    E: Into<Failure>,
    R: FnOnce(Failure),
{
    execute(op, Some(on_failure), None::<fn()>, panic::Location::caller())
}

/// Run an action; on failure hand the failure to `on_failure`.
#[track_caller]
pub fn attempt_run_recover<E, F, R>(op: F, on_failure: R)
where
    F: FnOnce() -> core::result::Result<(), E>,
    E: Into<Failure>,
    R: FnOnce(Failure),
{
    let _ = execute(op, Some(on_failure), None::<fn()>, panic::Location::caller());
}

// ============================================================
// Cleanup
// ============================================================

/// Run `op`, then `cleanup`, then return whatever `op` returned.
///
/// Nothing is captured: an `Err` from `op` reaches the caller unchanged, and
/// a panic in `op` resumes once `cleanup` has run. Works for actions (`()`),
/// plain values and `Result`s alike.
///
/// ```
/// use attempt_flow::attempt_with_cleanup;
///
/// let mut closed = false;
/// let read: Result<u8, &str> = attempt_with_cleanup(|| Err("eof"), || closed = true);
/// assert_eq!(read, Err("eof"));
/// assert!(closed);
/// ```
#[track_caller]
pub fn attempt_with_cleanup<T, F, C>(op: F, cleanup: C) -> T
where
    F: FnOnce() -> T,
    C: FnOnce(),
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(op));
    finish(outcome, Some(cleanup), panic::Location::caller())
}

// ============================================================
// Recovery + cleanup
// ============================================================

/// Run `op`; on failure call `on_failure` and yield `None`; always run
/// `cleanup` last.
///
/// ```
/// use attempt_flow::{attempt_full, Failure};
///
/// let log = std::cell::RefCell::new(Vec::new());
/// let out: Option<i32> = attempt_full(
///     || Err(Failure::msg("boom")),
///     |_| log.borrow_mut().push("handled"),
///     || log.borrow_mut().push("done"),
/// );
/// assert_eq!(out, None);
/// assert_eq!(*log.borrow(), ["handled", "done"]);
/// ```
#[track_caller]
pub fn attempt_full<T, E, F, R, C>(op: F, on_failure: R, cleanup: C) -> Option<T>
where
    F: FnOnce() -> core::result::Result<T, E>,
    E: Into<Failure>,
    R: FnOnce(Failure),
    C: FnOnce(),
{
    execute(op, Some(on_failure), Some(cleanup), panic::Location::caller())
}

/// Action form of [`attempt_full`].
#[track_caller]
pub fn attempt_run_full<E, F, R, C>(op: F, on_failure: R, cleanup: C)
where
    F: FnOnce() -> core::result::Result<(), E>,
    E: Into<Failure>,
    R: FnOnce(Failure),
    C: FnOnce(),
{
    let _ = execute(op, Some(on_failure), Some(cleanup), panic::Location::caller());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn capture_locates_errors_at_site() {
        let site = panic::Location::caller();
        let failure = capture(|| Err::<(), _>(Failure::msg("x")), site).unwrap_err();
        assert_eq!(failure.location().unwrap().line, site.line());
    }

    #[test]
    fn capture_turns_panics_into_failures() {
        let failure = capture(|| -> core::result::Result<(), Failure> { panic!("kaboom") }, panic::Location::caller())
            .unwrap_err();
        assert_eq!(failure.message(), "operation panicked: kaboom");
    }

    #[test]
    fn execute_without_handlers_is_plain_capture() {
        let ok: Option<u8> = execute(|| Ok::<_, Failure>(1), None::<fn(Failure)>, None::<fn()>, panic::Location::caller());
        assert_eq!(ok, Some(1));
    }

    #[test]
    fn cleanup_runs_when_recovery_panics() {
        let cleaned = Cell::new(false);
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            execute(
                || Err::<(), _>(Failure::msg("first")),
                Some(|_: Failure| panic!("handler broke")),
                Some(|| cleaned.set(true)),
                panic::Location::caller(),
            )
        }));
        assert!(result.is_err());
        assert!(cleaned.get());
    }

    #[test]
    fn cleanup_panic_replaces_in_flight_panic() {
        let payload = panic::catch_unwind(AssertUnwindSafe(|| {
            attempt_with_cleanup(|| -> () { panic!("from op") }, || panic!("from cleanup"))
        }))
        .unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"from cleanup"));
    }

    #[test]
    fn recovery_sees_caller_location() {
        let seen = RefCell::new(None);
        let line = line!() + 1;
        attempt_run_recover(|| Err(Failure::msg("no")), |f| *seen.borrow_mut() = f.location());
        assert_eq!(seen.borrow().unwrap().line, line);
    }
}
