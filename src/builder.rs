//! Fluent builders for the attempt combinators.
//!
//! [`Attempt`] wraps a value-producing operation and builds into
//! `Option<T>`; [`RunAttempt`] wraps an action and builds into `()`. Both
//! take one mandatory operation and optionally a recovery handler and a
//! cleanup. Configuring either twice keeps only the last one.

use core::fmt;
use std::panic;

use crate::attempt::execute;
use crate::failure::{Failure, MissingArgument};

// ============================================================
// Attempt - value-producing operations
// ============================================================

/// Builder for a value-producing operation.
///
/// `Attempt::new(op).recover(h).cleanup(c).build()` behaves exactly like
/// [`attempt_full(op, h, c)`](crate::attempt_full). Leaving out
/// `recover` or `cleanup` makes that step a no-op.
///
/// # Examples
///
/// ```
/// use attempt_flow::{Attempt, Failure};
///
/// let port: Option<u16> = Attempt::new(|| "80a".parse::<u16>())
///     .recover(|failure: Failure| eprintln!("bad port: {}", failure.message()))
///     .build();
/// assert_eq!(port.unwrap_or(8080), 8080);
/// ```
#[must_use = "an attempt does nothing until `build` is called"]
pub struct Attempt<F, R = fn(Failure), C = fn()> {
    op: F,
    recovery: Option<R>,
    cleanup: Option<C>,
    site: &'static panic::Location<'static>,
}

impl<F> Attempt<F> {
    /// Start a builder around `op`.
    #[track_caller]
    pub fn new(op: F) -> Self {
        Self {
            op,
            recovery: None,
            cleanup: None,
            site: panic::Location::caller(),
        }
    }

    /// Start a builder from an operation that may be absent.
    ///
    /// Fails fast with [`MissingArgument`] when `op` is `None`; nothing runs.
    #[track_caller]
    pub fn from_option(op: Option<F>) -> Result<Self, MissingArgument> {
        match op {
            Some(op) => Ok(Self::new(op)),
            None => {
                tracing::warn!(argument = "operation", "attempt builder created without an operation");
                Err(MissingArgument::new("operation"))
            }
        }
    }
}

impl<F, R, C> Attempt<F, R, C> {
    /// Set the recovery handler, replacing any previous one.
    ///
    /// Closure bounds are checked by [`build`](Self::build) (`FnOnce`) and
    /// [`build_mut`](Self::build_mut) (`FnMut`), not here.
    pub fn recover<R2>(self, handler: R2) -> Attempt<F, R2, C> {
        Attempt {
            op: self.op,
            recovery: Some(handler),
            cleanup: self.cleanup,
            site: self.site,
        }
    }

    /// Set the cleanup, replacing any previous one.
    pub fn cleanup<C2>(self, cleanup: C2) -> Attempt<F, R, C2> {
        Attempt {
            op: self.op,
            recovery: self.recovery,
            cleanup: Some(cleanup),
            site: self.site,
        }
    }

    /// Whether a recovery handler is configured.
    pub fn has_recovery(&self) -> bool {
        self.recovery.is_some()
    }

    /// Whether a cleanup is configured.
    pub fn has_cleanup(&self) -> bool {
        self.cleanup.is_some()
    }

    /// Run the operation with the configured recovery and cleanup.
    pub fn build<T, E>(self) -> Option<T>
    where
        F: FnOnce() -> core::result::Result<T, E>,
        E: Into<Failure>,
        R: FnOnce(Failure),
        C: FnOnce(),
    {
        execute(self.op, self.recovery, self.cleanup, self.site)
    }

    /// Run again without consuming the builder.
    ///
    /// Each call uses the configuration current at that call.
    pub fn build_mut<T, E>(&mut self) -> Option<T>
    where
        F: FnMut() -> core::result::Result<T, E>,
        E: Into<Failure>,
        R: FnMut(Failure),
        C: FnMut(),
    {
        execute(&mut self.op, self.recovery.as_mut(), self.cleanup.as_mut(), self.site)
    }
}

impl<F, R, C> fmt::Debug for Attempt<F, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attempt")
            .field("recovery", &self.has_recovery())
            .field("cleanup", &self.has_cleanup())
            .field("site", &self.site)
            .finish()
    }
}

// ============================================================
// RunAttempt - actions
// ============================================================

/// Builder for an action (an operation producing nothing).
///
/// ```
/// use attempt_flow::{Failure, RunAttempt};
///
/// let mut log = Vec::new();
/// RunAttempt::new(|| Err(Failure::msg("disk full")))
///     .recover(|f: Failure| log.push(f.message().to_string()))
///     .build();
/// assert_eq!(log, ["disk full"]);
/// ```
#[must_use = "an attempt does nothing until `build` is called"]
pub struct RunAttempt<F, R = fn(Failure), C = fn()> {
    inner: Attempt<F, R, C>,
}

impl<F> RunAttempt<F> {
    /// Start a builder around the action `op`.
    #[track_caller]
    pub fn new(op: F) -> Self {
        Self {
            inner: Attempt::new(op),
        }
    }

    /// Start a builder from an action that may be absent.
    #[track_caller]
    pub fn from_option(op: Option<F>) -> Result<Self, MissingArgument> {
        Attempt::from_option(op).map(|inner| Self { inner })
    }
}

impl<F, R, C> RunAttempt<F, R, C> {
    /// Set the recovery handler, replacing any previous one.
    pub fn recover<R2>(self, handler: R2) -> RunAttempt<F, R2, C> {
        RunAttempt {
            inner: self.inner.recover(handler),
        }
    }

    /// Set the cleanup, replacing any previous one.
    pub fn cleanup<C2>(self, cleanup: C2) -> RunAttempt<F, R, C2> {
        RunAttempt {
            inner: self.inner.cleanup(cleanup),
        }
    }

    /// Whether a recovery handler is configured.
    pub fn has_recovery(&self) -> bool {
        self.inner.has_recovery()
    }

    /// Whether a cleanup is configured.
    pub fn has_cleanup(&self) -> bool {
        self.inner.has_cleanup()
    }

    /// Run the action with the configured recovery and cleanup.
    pub fn build<E>(self)
    where
        F: FnOnce() -> core::result::Result<(), E>,
        E: Into<Failure>,
        R: FnOnce(Failure),
        C: FnOnce(),
    {
        let _ = self.inner.build();
    }

    /// Run again without consuming the builder.
    pub fn build_mut<E>(&mut self)
    where
        F: FnMut() -> core::result::Result<(), E>,
        E: Into<Failure>,
        R: FnMut(Failure),
        C: FnMut(),
    {
        let _ = self.inner.build_mut();
    }
}

impl<F, R, C> fmt::Debug for RunAttempt<F, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunAttempt")
            .field("recovery", &self.has_recovery())
            .field("cleanup", &self.has_cleanup())
            .finish()
    }
}
