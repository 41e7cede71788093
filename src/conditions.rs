//! Conditional combinators.
//!
//! Small wrappers over `if`/`else if`/`else` for call sites that want the
//! branch as a single expression, plus the [`Branch`] builder.

/// Run `action` when `condition` holds.
#[inline]
pub fn if_then<T>(condition: bool, action: impl FnOnce() -> T) -> Option<T> {
    condition.then(action)
}

/// Run `action` on `value` when `condition(&value)` holds.
#[inline]
pub fn if_then_with<T, R>(
    value: T,
    condition: impl FnOnce(&T) -> bool,
    action: impl FnOnce(T) -> R,
) -> Option<R> {
    if condition(&value) {
        Some(action(value))
    } else {
        None
    }
}

/// `Err(error())` when `condition` holds, `Ok(())` otherwise.
///
/// ```
/// use attempt_flow::conditions::fail_if;
///
/// fn check(len: usize) -> Result<(), String> {
///     fail_if(len > 8, || format!("length {} exceeds 8", len))
/// }
/// assert!(check(4).is_ok());
/// assert_eq!(check(9).unwrap_err(), "length 9 exceeds 8");
/// ```
#[inline]
pub fn fail_if<E>(condition: bool, error: impl FnOnce() -> E) -> Result<(), E> {
    if condition {
        Err(error())
    } else {
        Ok(())
    }
}

/// `if` / `else` as one expression.
#[inline]
pub fn if_else<T>(condition: bool, if_action: impl FnOnce() -> T, else_action: impl FnOnce() -> T) -> T {
    if condition {
        if_action()
    } else {
        else_action()
    }
}

/// `if` / `else if` with no final `else`; `None` when neither holds.
#[inline]
pub fn if_else_if<T>(
    if_condition: bool,
    if_action: impl FnOnce() -> T,
    else_if_condition: bool,
    else_if_action: impl FnOnce() -> T,
) -> Option<T> {
    if if_condition {
        Some(if_action())
    } else if else_if_condition {
        Some(else_if_action())
    } else {
        None
    }
}

/// `if` / `else if` / `else`; exactly one action runs.
#[inline]
pub fn if_else_if_else<T>(
    if_condition: bool,
    if_action: impl FnOnce() -> T,
    else_if_condition: bool,
    else_if_action: impl FnOnce() -> T,
    else_action: impl FnOnce() -> T,
) -> T {
    if if_condition {
        if_action()
    } else if else_if_condition {
        else_if_action()
    } else {
        else_action()
    }
}

// ============================================================
// Branch builder
// ============================================================

/// Builder for an `if` / optional `else if` / optional `else` chain.
///
/// Holds a single `else if`: calling [`else_if`](Branch::else_if) again
/// replaces it, as does calling [`otherwise`](Branch::otherwise) twice.
///
/// ```
/// use attempt_flow::conditions::Branch;
///
/// let size = 70;
/// let label = Branch::new(size < 10, || "small")
///     .else_if(size < 50, || "medium")
///     .otherwise(|| "large")
///     .build();
/// assert_eq!(label, Some("large"));
/// ```
#[must_use = "a branch does nothing until `build` is called"]
pub struct Branch<F, G = F, H = F> {
    condition: bool,
    action: F,
    else_if: Option<(bool, G)>,
    otherwise: Option<H>,
}

impl<F> Branch<F> {
    /// Start a chain with its `if` arm.
    pub fn new(condition: bool, action: F) -> Self {
        Self {
            condition,
            action,
            else_if: None,
            otherwise: None,
        }
    }
}

impl<F, G, H> Branch<F, G, H> {
    /// Set the `else if` arm, replacing any previous one.
    pub fn else_if<G2>(self, condition: bool, action: G2) -> Branch<F, G2, H> {
        Branch {
            condition: self.condition,
            action: self.action,
            else_if: Some((condition, action)),
            otherwise: self.otherwise,
        }
    }

    /// Set the `else` arm, replacing any previous one.
    pub fn otherwise<H2>(self, action: H2) -> Branch<F, G, H2> {
        Branch {
            condition: self.condition,
            action: self.action,
            else_if: self.else_if,
            otherwise: Some(action),
        }
    }

    /// Evaluate the chain. `None` when no arm was taken.
    pub fn build<T>(self) -> Option<T>
    where
        F: FnOnce() -> T,
        G: FnOnce() -> T,
        H: FnOnce() -> T,
    {
        if self.condition {
            return Some((self.action)());
        }
        match (self.else_if, self.otherwise) {
            (Some((true, action)), _) => Some(action()),
            (_, Some(action)) => Some(action()),
            _ => None,
        }
    }
}
