//! Loop combinators.
//!
//! Only loops without a direct iterator counterpart live here. Filtering,
//! searching, collecting and mapping use `Iterator::{filter, for_each, any,
//! find, collect, map}`.

use std::fmt::Write as _;

/// Run `action` `count` times, passing the iteration index.
#[inline]
pub fn times(count: usize, mut action: impl FnMut(usize)) {
    for index in 0..count {
        action(index);
    }
}

/// Run `action` for as long as `condition` returns `true`.
/// The condition is checked before every iteration.
pub fn repeat_while(mut condition: impl FnMut() -> bool, mut action: impl FnMut()) {
    while condition() {
        action();
    }
}

/// Run `action` until the thread panics or the process exits.
pub fn forever(mut action: impl FnMut()) -> ! {
    loop {
        action();
    }
}

/// Concatenate `render(item)` for every item, separated by `delimiter`.
///
/// ```
/// use attempt_flow::loops::join;
///
/// assert_eq!(join([1, 2, 3], |n| n * 2, ", "), "2, 4, 6");
/// ```
pub fn join<I, F, D>(items: I, render: F, delimiter: &str) -> String
where
    I: IntoIterator,
    F: FnMut(I::Item) -> D,
    D: std::fmt::Display,
{
    join_wrapped(items, render, delimiter, "", "")
}

/// Concatenate `render(item)` for every item, with nothing in between.
///
/// ```
/// use attempt_flow::loops::concat;
///
/// assert_eq!(concat(['a', 'b', 'c'], |c| c.to_ascii_uppercase()), "ABC");
/// ```
pub fn concat<I, F, D>(items: I, render: F) -> String
where
    I: IntoIterator,
    F: FnMut(I::Item) -> D,
    D: std::fmt::Display,
{
    join_wrapped(items, render, "", "", "")
}

/// Like [`join`], with `prefix` and `suffix` around the whole result.
pub fn join_wrapped<I, F, D>(items: I, mut render: F, delimiter: &str, prefix: &str, suffix: &str) -> String
where
    I: IntoIterator,
    F: FnMut(I::Item) -> D,
    D: std::fmt::Display,
{
    let mut out = String::from(prefix);
    for (index, item) in items.into_iter().enumerate() {
        if index > 0 {
            out.push_str(delimiter);
        }
        // Writing into a String cannot fail.
        let _ = write!(out, "{}", render(item));
    }
    out.push_str(suffix);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn times_passes_indices() {
        let mut seen = Vec::new();
        times(4, |i| seen.push(i));
        assert_eq!(seen, [0, 1, 2, 3]);
    }

    #[test]
    fn times_zero_never_runs() {
        let mut runs = 0;
        times(0, |_| runs += 1);
        assert_eq!(runs, 0);
    }

    #[test]
    fn repeat_while_checks_first() {
        let mut runs = 0;
        repeat_while(|| false, || runs += 1);
        assert_eq!(runs, 0);

        let counter = std::cell::Cell::new(0);
        repeat_while(|| counter.get() < 5, || counter.set(counter.get() + 1));
        assert_eq!(counter.get(), 5);
    }

    #[test]
    fn concat_has_no_delimiter() {
        assert_eq!(concat(1..=3, |n| n * n), "149");
        assert_eq!(concat(Vec::<u8>::new(), |n| n), "");
    }

    #[test]
    fn join_wrapped_handles_empty_input() {
        let empty: Vec<u8> = Vec::new();
        assert_eq!(join_wrapped(empty, |b| b, ",", "[", "]"), "[]");
        assert_eq!(join_wrapped(["a", "b"], |s| s, "|", "<", ">"), "<a|b>");
    }
}
