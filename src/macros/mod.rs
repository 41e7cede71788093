//! Declarative macros for attempt-flow.

// attempt! is #[macro_export], so it lives at the crate root
#[macro_use]
mod attempt;
