//! The `attempt!` macro - try/catch/finally syntax over the [`Attempt`]
//! builder.
//!
//! [`Attempt`]: crate::Attempt

/// Try/catch/finally syntax for the attempt combinators.
///
/// Expands to an [`Attempt`](crate::Attempt) builder and evaluates to
/// `Option<T>`, where `T` is the type of the `try` block. Inside the `try`
/// block `?` converts any error into [`Failure`](crate::Failure). Clauses
/// must appear in the order `try`, `catch`, `finally`, each at most once.
///
/// `catch` and `finally` blocks must evaluate to `()`.
///
/// The `try`, `catch` and `finally` blocks become separate closures, so they
/// borrow independently: use `Cell`/`RefCell` when more than one of them
/// needs to mutate the same local.
///
/// # Patterns
///
/// ## Try alone
/// ```
/// use attempt_flow::attempt;
///
/// let n: Option<i32> = attempt! { try { "42".parse::<i32>()? } };
/// assert_eq!(n, Some(42));
/// ```
///
/// ## Catch (the block's value is discarded; the result is `None`)
/// ```
/// use attempt_flow::attempt;
///
/// let mut seen = String::new();
/// let n: Option<i32> = attempt! {
///     try { "forty-two".parse::<i32>()? }
///     catch e { seen = e.message().to_string() }
/// };
/// assert_eq!(n, None);
/// assert_eq!(seen, "invalid digit found in string");
/// ```
///
/// ## Catch and finally
/// ```
/// use attempt_flow::{attempt, Failure};
/// use std::cell::RefCell;
///
/// let log = RefCell::new(Vec::new());
/// let n: Option<i32> = attempt! {
///     try { Err(Failure::msg("boom"))? }
///     catch { log.borrow_mut().push("handled") }
///     finally { log.borrow_mut().push("done") }
/// };
/// assert_eq!(n, None);
/// assert_eq!(*log.borrow(), ["handled", "done"]);
/// ```
///
/// ## Clauses out of order are rejected
/// ```compile_fail
/// use attempt_flow::attempt;
///
/// let _ = attempt! { try { 1 } finally { } catch { } };
/// ```
///
/// ## So are repeated clauses
/// ```compile_fail
/// use attempt_flow::attempt;
///
/// let _ = attempt! { try { 1 } finally { } finally { } };
/// ```
///
/// ## `catch` and `finally` blocks evaluate to `()`
///
/// A value left at the end of either block is a type error rather than
/// silently dropped:
///
/// ```compile_fail
/// use attempt_flow::attempt;
///
/// let _: Option<i32> = attempt! {
///     try { "1".parse::<i32>()? }
///     catch { "2".parse::<i32>() }
/// };
/// ```
///
/// ```compile_fail
/// use attempt_flow::attempt;
///
/// let _: Option<i32> = attempt! {
///     try { 1 }
///     finally { std::fs::remove_file("lock") }
/// };
/// ```
#[macro_export]
macro_rules! attempt {
    // try { } catch e { } finally { }
    (try { $($body:tt)* } catch $e:ident { $($handler:tt)* } finally { $($cleanup:tt)* }) => {
        $crate::__attempt_body!($($body)*)
            .recover(|$e: $crate::Failure| -> () { $($handler)* })
            .cleanup(|| -> () { $($cleanup)* })
            .build()
    };

    // try { } catch { } finally { }
    (try { $($body:tt)* } catch { $($handler:tt)* } finally { $($cleanup:tt)* }) => {
        $crate::__attempt_body!($($body)*)
            .recover(|_: $crate::Failure| -> () { $($handler)* })
            .cleanup(|| -> () { $($cleanup)* })
            .build()
    };

    // try { } catch e { }
    (try { $($body:tt)* } catch $e:ident { $($handler:tt)* }) => {
        $crate::__attempt_body!($($body)*)
            .recover(|$e: $crate::Failure| -> () { $($handler)* })
            .build()
    };

    // try { } catch { }
    (try { $($body:tt)* } catch { $($handler:tt)* }) => {
        $crate::__attempt_body!($($body)*)
            .recover(|_: $crate::Failure| -> () { $($handler)* })
            .build()
    };

    // try { } finally { }
    (try { $($body:tt)* } finally { $($cleanup:tt)* }) => {
        $crate::__attempt_body!($($body)*)
            .cleanup(|| -> () { $($cleanup)* })
            .build()
    };

    // try { } alone
    (try { $($body:tt)* }) => {
        $crate::__attempt_body!($($body)*).build()
    };

    // try { } followed by anything else
    (try { $($body:tt)* } $($rest:tt)+) => {
        ::core::compile_error!("expected `catch` and/or `finally` (in that order, once each) after the `try` block")
    };

    () => {
        ::core::compile_error!("expected `try { ... }`")
    };

    ($($other:tt)+) => {
        ::core::compile_error!("`attempt!` must start with `try { ... }`")
    };
}

/// Wraps a try body in an `Attempt` whose operation returns
/// `Result<_, Failure>`.
#[doc(hidden)]
#[macro_export]
macro_rules! __attempt_body {
    ($($body:tt)*) => {
        $crate::Attempt::new(|| -> ::core::result::Result<_, $crate::Failure> {
            #[allow(unreachable_code)]
            let __value = { $($body)* };
            #[allow(unreachable_code)]
            let __ok = ::core::result::Result::Ok(__value);
            __ok
        })
    };
}
