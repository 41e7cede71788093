//! Re-entrant lock wrapper.
//!
//! The lock is released when the guard drops, so it is released on every
//! exit path, panics included.

use parking_lot::ReentrantMutex;

/// Run `action` while holding a freshly created re-entrant lock.
///
/// Only useful for symmetry with [`reentrant_with`]; nobody else can see the
/// lock.
pub fn reentrant<T>(action: impl FnOnce() -> T) -> T {
    let lock = ReentrantMutex::new(());
    reentrant_with(&lock, |_| action())
}

/// Run `action` while holding `lock`, giving it shared access to the guarded
/// data.
///
/// The same thread may nest calls on the same lock.
///
/// ```
/// use attempt_flow::locks::reentrant_with;
/// use parking_lot::ReentrantMutex;
///
/// let lock = ReentrantMutex::new(String::from("config"));
/// let len = reentrant_with(&lock, |outer| {
///     reentrant_with(&lock, |inner| outer.len() + inner.len())
/// });
/// assert_eq!(len, 12);
/// ```
pub fn reentrant_with<D, T>(lock: &ReentrantMutex<D>, action: impl FnOnce(&D) -> T) -> T {
    let guard = lock.lock();
    action(&guard)
}
