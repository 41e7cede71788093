//! The `attempt!` macro across its clause combinations.

use attempt_flow::{attempt, Failure};
use std::cell::{Cell, RefCell};
use std::io;

fn read_config(ok: bool) -> Result<String, io::Error> {
    if ok {
        Ok("port=80".into())
    } else {
        Err(io::Error::new(io::ErrorKind::NotFound, "config missing"))
    }
}

#[test]
fn try_alone() {
    let value: Option<String> = attempt! { try { read_config(true)? } };
    assert_eq!(value.as_deref(), Some("port=80"));

    let value: Option<String> = attempt! { try { read_config(false)? } };
    assert_eq!(value, None);
}

#[test]
fn try_body_with_statements() {
    let value: Option<usize> = attempt! {
        try {
            let text = read_config(true)?;
            let (_, port) = text.split_once('=').ok_or_else(|| Failure::msg("no ="))?;
            port.parse::<usize>()?
        }
    };
    assert_eq!(value, Some(80));
}

#[test]
fn catch_with_binding_sees_original_error() {
    let kind = Cell::new(None);
    let value: Option<String> = attempt! {
        try { read_config(false)? }
        catch e { kind.set(e.downcast_ref::<io::Error>().map(io::Error::kind)) }
    };
    assert_eq!(value, None);
    assert_eq!(kind.get(), Some(io::ErrorKind::NotFound));
}

#[test]
fn catch_without_binding() {
    let hits = Cell::new(0);
    let _: Option<()> = attempt! {
        try { Err(Failure::msg("x"))? }
        catch { hits.set(hits.get() + 1) }
    };
    assert_eq!(hits.get(), 1);
}

#[test]
fn catch_skipped_on_success() {
    let hits = Cell::new(0);
    let value = attempt! {
        try { 5 }
        catch { hits.set(hits.get() + 1) }
    };
    assert_eq!(value, Some(5));
    assert_eq!(hits.get(), 0);
}

#[test]
fn finally_runs_on_both_paths() {
    let runs = Cell::new(0);
    let ok = attempt! { try { 1 } finally { runs.set(runs.get() + 1) } };
    let err: Option<i32> = attempt! {
        try { Err(Failure::msg("x"))? }
        finally { runs.set(runs.get() + 1) }
    };
    assert_eq!(ok, Some(1));
    assert_eq!(err, None);
    assert_eq!(runs.get(), 2);
}

#[test]
fn catch_then_finally_order() {
    let log = RefCell::new(Vec::new());
    let value: Option<i32> = attempt! {
        try {
            log.borrow_mut().push("try".to_string());
            Err(Failure::msg("raise"))?
        }
        catch e { log.borrow_mut().push(format!("catch {}", e.message())) }
        finally { log.borrow_mut().push("finally".to_string()) }
    };
    assert_eq!(value, None);
    assert_eq!(*log.borrow(), ["try", "catch raise", "finally"]);
}

#[test]
fn panics_in_try_are_caught() {
    let caught = Cell::new(false);
    let value: Option<i32> = attempt! {
        try { panic!("bad") }
        catch { caught.set(true) }
    };
    assert_eq!(value, None);
    assert!(caught.get());
}

#[test]
fn failure_location_points_at_macro_call() {
    let line = Cell::new(0);
    let expected = line!() + 1;
    let _: Option<()> = attempt! {
        try { Err(Failure::msg("x"))? }
        catch e { line.set(e.location().map_or(0, |l| l.line)) }
    };
    assert_eq!(line.get(), expected);
}

#[test]
fn catch_and_finally_blocks_run_statements() {
    let log = RefCell::new(Vec::new());
    let value: Option<u8> = attempt! {
        try { "300".parse::<u8>()? }
        catch e {
            let text = e.message().to_string();
            log.borrow_mut().push(text);
        }
        finally {
            log.borrow_mut().push("closed".to_string());
        }
    };
    assert_eq!(value, None);
    assert_eq!(*log.borrow(), ["number too large to fit in target type", "closed"]);
}
