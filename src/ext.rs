//! Extension trait for Result types, and adapters for fallible closures.

use std::panic;

use crate::attempt::execute;
use crate::failure::{Failure, IntoValue};

/// Extension trait for results whose error converts into [`Failure`].
pub trait FailureExt<T> {
    /// Convert the error into a [`Failure`] with a context message.
    fn context(self, ctx: impl Into<String>) -> core::result::Result<T, Failure>;

    /// Convert the error into a [`Failure`] with a key-value attachment.
    fn attach(self, key: &'static str, val: impl IntoValue) -> core::result::Result<T, Failure>;

    /// Route an already computed result through the recovery contract:
    /// `Some(value)` on success, otherwise `on_failure` runs and `None` is
    /// returned.
    fn recover<R>(self, on_failure: R) -> Option<T>
    where
        R: FnOnce(Failure);

    /// `None` on failure, logging the failure at debug level.
    fn ok_or_log(self) -> Option<T>;
}

impl<T, E> FailureExt<T> for core::result::Result<T, E>
where
    E: Into<Failure>,
{
    #[track_caller]
    fn context(self, ctx: impl Into<String>) -> core::result::Result<T, Failure> {
        let loc = panic::Location::caller();
        self.map_err(|e| e.into().located(loc).context(ctx))
    }

    #[track_caller]
    fn attach(self, key: &'static str, val: impl IntoValue) -> core::result::Result<T, Failure> {
        let loc = panic::Location::caller();
        self.map_err(|e| e.into().located(loc).attach(key, val))
    }

    #[track_caller]
    fn recover<R>(self, on_failure: R) -> Option<T>
    where
        R: FnOnce(Failure),
    {
        execute(move || self, Some(on_failure), None::<fn()>, panic::Location::caller())
    }

    #[track_caller]
    fn ok_or_log(self) -> Option<T> {
        execute(move || self, None::<fn(Failure)>, None::<fn()>, panic::Location::caller())
    }
}

// ============================================================
// Fallible closure adapters
// ============================================================

/// Turn a fallible function into one returning `Option`.
///
/// Handy with iterator adapters:
///
/// ```
/// use attempt_flow::catching;
///
/// let ports: Vec<u16> = ["80", "x", "443"].into_iter().filter_map(catching(str::parse::<u16>)).collect();
/// assert_eq!(ports, [80, 443]);
/// ```
#[track_caller]
pub fn catching<A, B, E, F>(mut f: F) -> impl FnMut(A) -> Option<B>
where
    F: FnMut(A) -> core::result::Result<B, E>,
    E: Into<Failure>,
{
    let site = panic::Location::caller();
    move |arg| execute(|| f(arg), None::<fn(Failure)>, None::<fn()>, site)
}

/// Turn a fallible predicate into one that treats failure as `false`.
#[track_caller]
pub fn catching_predicate<A, E, P>(mut predicate: P) -> impl FnMut(&A) -> bool
where
    A: ?Sized,
    P: FnMut(&A) -> core::result::Result<bool, E>,
    E: Into<Failure>,
{
    let site = panic::Location::caller();
    move |arg: &A| execute(|| predicate(arg), None::<fn(Failure)>, None::<fn()>, site).unwrap_or(false)
}

/// Turn a fallible consumer into one that swallows its failures.
#[track_caller]
pub fn catching_consumer<A, E, C>(mut consumer: C) -> impl FnMut(A)
where
    C: FnMut(A) -> core::result::Result<(), E>,
    E: Into<Failure>,
{
    let site = panic::Location::caller();
    move |arg| {
        let _ = execute(|| consumer(arg), None::<fn(Failure)>, None::<fn()>, site);
    }
}
