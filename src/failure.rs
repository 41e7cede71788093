//! Opaque failure payload and related structures.

use std::any::Any;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::panic;
use std::sync::OnceLock;

use smallvec::SmallVec;

// ============================================================
// Core types
// ============================================================

/// Why an operation did not complete normally.
///
/// `Failure` is deliberately opaque: the combinators never look inside it,
/// they only hand it to the recovery handler. It wraps:
/// - any `std::error::Error + Send + Sync + 'static` (via `From`, so `?` works
///   inside an operation),
/// - a plain message ([`Failure::msg`]),
/// - a panic raised by the operation ([`Panicked`]).
///
/// On top of the source error it records where the failure was captured and
/// any context messages or key-value attachments added on the way.
///
/// `Failure` does not implement `std::error::Error` itself. That keeps the
/// blanket `From<E: Error>` impl coherent. Convert with `.into()` into
/// `Box<dyn Error + Send + Sync>` when you need a trait object.
///
/// # Examples
///
/// ```
/// use attempt_flow::{attempt_recover, Failure};
///
/// let mut seen = None;
/// let parsed: Option<u32> = attempt_recover(
///     || -> Result<u32, Failure> { Ok("x".parse::<u32>()?) },
///     |failure| seen = Some(failure.message().to_string()),
/// );
/// assert_eq!(parsed, None);
/// assert_eq!(seen.as_deref(), Some("invalid digit found in string"));
/// ```
#[derive(Debug)]
pub struct Failure {
    source: Box<dyn StdError + Send + Sync + 'static>,
    /// Lazy message - only computed when accessed via `message()`.
    message: OnceLock<String>,
    /// Where the failure was captured. First capture wins.
    location: Option<Location>,
    contexts: SmallVec<[String; 2]>,
    attachments: SmallVec<[(Cow<'static, str>, Value); 4]>,
}

/// Source location a [`Failure`] was captured at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Source file path
    pub file: &'static str,
    /// Line number
    pub line: u32,
    /// Column number
    pub col: u32,
}

impl From<&'static panic::Location<'static>> for Location {
    fn from(loc: &'static panic::Location<'static>) -> Self {
        Self {
            file: loc.file(),
            line: loc.line(),
            col: loc.column(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}

// ============================================================
// Panicked / StringError helpers
// ============================================================

/// A panic raised by an operation, captured as a failure.
///
/// Recovery handlers that care can tell panics apart with
/// `failure.downcast_ref::<Panicked>()`; the combinators themselves don't.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panicked {
    message: String,
}

impl Panicked {
    /// Extract a message from a panic payload.
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            String::from("Box<dyn Any>")
        };
        Self { message }
    }

    /// The panic message, or `Box<dyn Any>` for non-string payloads.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Panicked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation panicked: {}", self.message)
    }
}

impl StdError for Panicked {}

#[derive(Debug)]
pub(crate) struct StringError(pub(crate) String);

impl fmt::Display for StringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for StringError {}

/// A mandatory callable was not supplied.
///
/// Returned by the `from_option` builder constructors before any user code
/// runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingArgument {
    name: &'static str,
}

impl MissingArgument {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Name of the missing argument.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for MissingArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required argument `{}`", self.name)
    }
}

impl StdError for MissingArgument {}

// ============================================================
// Value - typed attachments
// ============================================================

/// Attachment value recorded on a [`Failure`] with [`Failure::attach`].
///
/// Integers are widened to `i64`/`u64` and floats to `f64`; `None` becomes
/// `Null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Value {
    /// Create a Value from any supported type.
    pub fn from<T: IntoValue>(v: T) -> Self {
        v.into_value()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Uint(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => f.write_str("null"),
        }
    }
}

// Allow comparing Value with plain values in tests
impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Value::String(s) if s == other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        matches!(self, Value::Int(n) if n == other)
    }
}

impl PartialEq<u64> for Value {
    fn eq(&self, other: &u64) -> bool {
        matches!(self, Value::Uint(n) if n == other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        matches!(self, Value::Bool(b) if b == other)
    }
}

/// Trait for converting types into Value.
pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl IntoValue for Cow<'_, str> {
    fn into_value(self) -> Value {
        Value::String(self.into_owned())
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

macro_rules! impl_into_value {
    ($variant:ident, $target:ty: $($t:ty),*) => {
        $(
            impl IntoValue for $t {
                fn into_value(self) -> Value {
                    Value::$variant(self as $target)
                }
            }
        )*
    };
}

impl_into_value!(Int, i64: i8, i16, i32, i64, isize);
impl_into_value!(Uint, u64: u8, u16, u32, u64, usize);
impl_into_value!(Float, f64: f32, f64);

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }
}

/// Context entries kept per failure; further ones are dropped.
pub const DEFAULT_CONTEXT_LIMIT: usize = 8;

// ============================================================
// Failure implementation
// ============================================================

impl Failure {
    /// Wrap any error.
    #[inline]
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::from_boxed(Box::new(error))
    }

    /// Wrap a boxed error.
    ///
    /// A box produced by converting a `Failure` into
    /// `Box<dyn Error + Send + Sync>` is unwrapped instead of wrapped twice.
    pub fn from_boxed(error: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        match error.downcast::<Propagated>() {
            Ok(propagated) => propagated.0,
            Err(source) => Self {
                source,
                message: OnceLock::new(),
                location: None,
                contexts: SmallVec::new(),
                attachments: SmallVec::new(),
            },
        }
    }

    /// Create from a message string.
    /// Message is pre-initialized since we already have it.
    pub fn msg(message: impl Into<String>) -> Self {
        let message = message.into();
        let failure = Self::new(StringError(message.clone()));
        let _ = failure.message.set(message);
        failure
    }

    /// Capture a panic payload (as returned by `std::panic::catch_unwind`).
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        Self::new(Panicked::from_payload(payload.as_ref()))
    }

    /// Record the capture site unless one is already set.
    #[inline]
    pub(crate) fn located(mut self, site: &'static panic::Location<'static>) -> Self {
        if self.location.is_none() {
            self.location = Some(Location::from(site));
        }
        self
    }

    /// Record the caller's location unless one is already set.
    #[track_caller]
    pub fn here(self) -> Self {
        self.located(panic::Location::caller())
    }

    /// Add a context message describing what was being done.
    pub fn context(mut self, msg: impl Into<String>) -> Self {
        if self.contexts.len() < DEFAULT_CONTEXT_LIMIT {
            self.contexts.push(msg.into());
        }
        self
    }

    /// Add a key-value attachment with a typed value.
    pub fn attach(mut self, key: &'static str, val: impl IntoValue) -> Self {
        self.attachments.push((Cow::Borrowed(key), val.into_value()));
        self
    }

    /// The source error's message, computed lazily on first access.
    pub fn message(&self) -> &str {
        self.message.get_or_init(|| self.source.to_string())
    }

    /// Where the failure was captured, if known.
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Context messages, oldest first.
    pub fn contexts(&self) -> impl Iterator<Item = &str> + '_ {
        self.contexts.iter().map(String::as_str)
    }

    /// Key-value attachments in insertion order.
    pub fn attachments(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.attachments.iter().map(|(k, v)| (k.as_ref(), v))
    }

    /// Look up an attachment by key. The latest value for a key wins.
    pub fn attachment(&self, key: &str) -> Option<&Value> {
        self.attachments
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// The wrapped error as a trait object.
    pub fn root(&self) -> &(dyn StdError + 'static) {
        self.source.as_ref()
    }

    /// Try to downcast to a specific error type.
    #[inline]
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.source.downcast_ref::<T>()
    }

    /// Try to downcast and consume the failure.
    pub fn downcast<T: StdError + 'static>(self) -> core::result::Result<T, Self> {
        let Self {
            source,
            message,
            location,
            contexts,
            attachments,
        } = self;
        match source.downcast::<T>() {
            Ok(e) => Ok(*e),
            Err(source) => Err(Self {
                source,
                message,
                location,
                contexts,
                attachments,
            }),
        }
    }

    /// Find the first error of type `T` in the cause chain, starting at the
    /// wrapped error itself.
    pub fn chain_any<T: StdError + 'static>(&self) -> Option<&T> {
        let mut current: Option<&(dyn StdError + 'static)> = Some(self.root());
        while let Some(err) = current {
            if let Some(e) = err.downcast_ref::<T>() {
                return Some(e);
            }
            current = err.source();
        }
        None
    }

    /// Consume and return the underlying boxed error.
    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync + 'static> {
        self.source
    }
}

// ============================================================
// Conversions
// ============================================================

// Blanket From so `?` works inside operations. Coherent because Failure
// does not implement Error.
impl<E> From<E> for Failure
where
    E: StdError + Send + Sync + 'static,
{
    #[inline]
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

/// Error-trait view of a [`Failure`], used when it leaves the crate as a
/// trait object.
struct Propagated(Failure);

impl fmt::Debug for Propagated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Propagated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for Propagated {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.root().source()
    }
}

impl From<Failure> for Box<dyn StdError + Send + Sync + 'static> {
    fn from(failure: Failure) -> Self {
        Box::new(Propagated(failure))
    }
}

impl From<Failure> for Box<dyn StdError + 'static> {
    fn from(failure: Failure) -> Self {
        Box::new(Propagated(failure))
    }
}

#[cfg(feature = "anyhow")]
impl From<Failure> for anyhow::Error {
    fn from(failure: Failure) -> Self {
        anyhow::Error::new(Propagated(failure))
    }
}

// ============================================================
// Display
// ============================================================

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())?;
        if let Some(loc) = &self.location {
            write!(f, "\n  at {}", loc)?;
        }
        for ctx in &self.contexts {
            write!(f, "\n    \u{2192} {}", ctx)?;
        }
        for (k, v) in &self.attachments {
            write!(f, "\n    {}: {}", k, v)?;
        }
        Ok(())
    }
}

// ============================================================
// Serde support
// ============================================================

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{Serialize, Serializer};
    use std::collections::BTreeMap;

    // Attachments keep their JSON type: numbers stay numbers
    impl Serialize for Value {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Value::String(s) => serializer.serialize_str(s),
                Value::Int(n) => serializer.serialize_i64(*n),
                Value::Uint(n) => serializer.serialize_u64(*n),
                Value::Float(n) => serializer.serialize_f64(*n),
                Value::Bool(b) => serializer.serialize_bool(*b),
                Value::Null => serializer.serialize_none(),
            }
        }
    }

    #[derive(Serialize)]
    struct SerializedLocation<'a> {
        file: &'a str,
        line: u32,
        col: u32,
    }

    #[derive(Serialize)]
    struct SerializedFailure<'a> {
        message: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        location: Option<SerializedLocation<'a>>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        context: Vec<&'a str>,
        #[serde(skip_serializing_if = "BTreeMap::is_empty")]
        attachments: BTreeMap<&'a str, &'a Value>,
    }

    impl Serialize for Failure {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            SerializedFailure {
                message: self.message(),
                location: self.location.as_ref().map(|loc| SerializedLocation {
                    file: loc.file,
                    line: loc.line,
                    col: loc.col,
                }),
                context: self.contexts().collect(),
                attachments: self.attachments().collect(),
            }
            .serialize(serializer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn message_comes_from_source() {
        let failure = Failure::from(io::Error::new(io::ErrorKind::NotFound, "no such file"));
        assert_eq!(failure.message(), "no such file");
        assert!(failure.location().is_none());
    }

    #[test]
    fn msg_is_preinitialized() {
        let failure = Failure::msg("boom");
        assert_eq!(failure.message(), "boom");
        assert!(failure.downcast_ref::<StringError>().is_some());
    }

    #[test]
    fn first_location_wins() {
        let first = Failure::msg("x").here();
        let loc = first.location().unwrap();
        let again = first.here();
        assert_eq!(again.location(), Some(loc));
        assert_eq!(loc.file, file!());
    }

    #[test]
    fn context_and_attachments() {
        let failure = Failure::msg("bad input")
            .context("parsing header")
            .attach("line", 7u32)
            .attach("strict", true)
            .attach("line", 8u32);

        assert_eq!(failure.contexts().collect::<Vec<_>>(), vec!["parsing header"]);
        assert_eq!(failure.attachments().count(), 3);
        assert_eq!(failure.attachment("line"), Some(&Value::Uint(8)));
        assert_eq!(*failure.attachment("strict").unwrap(), true);
        assert!(failure.attachment("missing").is_none());
    }

    #[test]
    fn context_limit_is_enforced() {
        let mut failure = Failure::msg("deep");
        for i in 0..(DEFAULT_CONTEXT_LIMIT + 4) {
            failure = failure.context(format!("step {}", i));
        }
        assert_eq!(failure.contexts().count(), DEFAULT_CONTEXT_LIMIT);
    }

    #[test]
    fn downcast_round_trips_on_mismatch() {
        let failure = Failure::msg("not io").context("kept");
        let failure = failure.downcast::<io::Error>().unwrap_err();
        assert_eq!(failure.message(), "not io");
        assert_eq!(failure.contexts().next(), Some("kept"));
    }

    #[test]
    fn panic_payloads() {
        let from_str = Failure::from_panic(Box::new("static message"));
        assert_eq!(from_str.downcast_ref::<Panicked>().unwrap().message(), "static message");

        let from_string = Failure::from_panic(Box::new(String::from("owned")));
        assert_eq!(from_string.message(), "operation panicked: owned");

        let opaque = Failure::from_panic(Box::new(17u8));
        assert_eq!(opaque.downcast_ref::<Panicked>().unwrap().message(), "Box<dyn Any>");
    }

    #[test]
    fn boxed_round_trip_does_not_double_wrap() {
        let original = Failure::msg("inner").context("ctx");
        let boxed: Box<dyn StdError + Send + Sync> = original.into();
        let back = Failure::from_boxed(boxed);
        assert_eq!(back.message(), "inner");
        assert_eq!(back.contexts().collect::<Vec<_>>(), vec!["ctx"]);
    }

    #[test]
    fn chain_any_walks_sources() {
        #[derive(Debug)]
        struct Outer(io::Error);

        impl fmt::Display for Outer {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("outer")
            }
        }

        impl StdError for Outer {
            fn source(&self) -> Option<&(dyn StdError + 'static)> {
                Some(&self.0)
            }
        }

        let failure = Failure::from(Outer(io::Error::new(io::ErrorKind::Other, "inner")));
        assert!(failure.downcast_ref::<io::Error>().is_none());
        assert_eq!(failure.chain_any::<io::Error>().unwrap().to_string(), "inner");
    }

    #[test]
    fn display_includes_trace() {
        let failure = Failure::msg("broken").here().context("loading").attach("id", 3i32);
        let text = failure.to_string();
        assert!(text.starts_with("broken\n  at "));
        assert!(text.contains("\u{2192} loading"));
        assert!(text.contains("id: 3"));
    }

    #[test]
    fn missing_argument_names_itself() {
        let err = MissingArgument::new("operation");
        assert_eq!(err.name(), "operation");
        assert_eq!(err.to_string(), "missing required argument `operation`");
    }
}
