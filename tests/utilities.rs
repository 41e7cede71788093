//! Condition, loop and lock helpers, used together with the combinators.

use attempt_flow::conditions::{fail_if, Branch};
use attempt_flow::locks::{reentrant, reentrant_with};
use attempt_flow::loops::{join, join_wrapped, repeat_while, times};
use attempt_flow::{attempt_recover, attempt_with_cleanup, Failure};
use parking_lot::ReentrantMutex;
use std::cell::{Cell, RefCell};

#[test]
fn fail_if_inside_an_operation() {
    let mut reason = String::new();
    let out = attempt_recover(
        || {
            let budget = 3;
            fail_if(budget < 5, || Failure::msg("budget too small"))?;
            Ok::<_, Failure>(budget)
        },
        |failure| reason = failure.message().to_string(),
    );
    assert_eq!(out, None);
    assert_eq!(reason, "budget too small");
}

#[test]
fn branch_picks_first_true_arm() {
    let pick = |n: i32| {
        Branch::new(n < 0, || "negative")
            .else_if(n == 0, || "zero")
            .otherwise(|| "positive")
            .build()
    };
    assert_eq!(pick(-1), Some("negative"));
    assert_eq!(pick(0), Some("zero"));
    assert_eq!(pick(5), Some("positive"));
}

#[test]
fn branch_repeated_else_if_keeps_last() {
    let out = Branch::new(false, || 1).else_if(true, || 2).else_if(false, || 3).build();
    assert_eq!(out, None);
}

#[test]
fn loops_collect_results_of_attempts() {
    let mut parsed = Vec::new();
    let inputs = ["1", "two", "3"];
    times(inputs.len(), |i| {
        if let Some(n) = attempt_flow::attempt(|| inputs[i].parse::<u8>()) {
            parsed.push(n);
        }
    });
    assert_eq!(join(&parsed, |n| n, "+"), "1+3");
    assert_eq!(join_wrapped(&parsed, |n| n * 10, ", ", "[", "]"), "[10, 30]");
}

#[test]
fn repeat_while_retries_until_success() {
    let tries = Cell::new(0);
    let done = Cell::new(false);
    repeat_while(
        || !done.get(),
        || {
            tries.set(tries.get() + 1);
            let ok = attempt_flow::attempt(|| {
                fail_if(tries.get() < 3, || Failure::msg("not yet"))?;
                Ok::<_, Failure>(())
            });
            done.set(ok.is_some());
        },
    );
    assert_eq!(tries.get(), 3);
}

#[test]
fn lock_with_cleanup() {
    let lock = ReentrantMutex::new(RefCell::new(Vec::new()));
    let out = reentrant_with(&lock, |log| {
        attempt_with_cleanup(
            || {
                reentrant_with(&lock, |inner| inner.borrow_mut().push("work"));
                log.borrow().len()
            },
            || log.borrow_mut().push("cleanup"),
        )
    });
    assert_eq!(out, 1);
    assert_eq!(*lock.lock().borrow(), ["work", "cleanup"]);
    assert_eq!(reentrant(|| "ok"), "ok");
}
