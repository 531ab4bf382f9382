//! External describers.
//!
//! A [`Describer`] recognizes values from a domain the inspector knows nothing
//! about (database records, request objects, paginators) and returns the
//! description to show instead of the generic summary. A matched value is not
//! expanded further; its description is used verbatim.
//!
//! Describers are consulted in registration order and the first one whose
//! [`can_describe`](Describer::can_describe) returns `true` wins.
//!
//! ## Examples
//!
//! ```rust
//! use context_help::{Context, InspectOptions, Inspector, TypeNameDescriber, Value, Record};
//!
//! let inspector = Inspector::new(InspectOptions::new()).with_describer(
//!     TypeNameDescriber::new("HttpRequest", "request object (see request/response docs)"),
//! );
//!
//! let mut context = Context::new();
//! context.insert("request", Value::record(Record::new("HttpRequest")));
//!
//! let report = inspector.inspect(&context).unwrap();
//! let node = report.find("request").unwrap();
//! assert_eq!(node.value_summary, "request object (see request/response docs)");
//! ```

use crate::Value;

/// Error returned by a failing describer.
pub type DescribeError = Box<dyn std::error::Error + Send + Sync>;

/// A pluggable, domain-specific description source.
pub trait Describer {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    fn can_describe(&self, value: &Value) -> bool;

    /// Describes a value this describer accepted.
    ///
    /// # Errors
    ///
    /// Any error aborts the whole inspection.
    fn describe(&self, value: &Value) -> Result<String, DescribeError>;
}

/// The ordered describer registry of an [`Inspector`](crate::Inspector).
#[derive(Default)]
pub struct Describers {
    describers: Vec<Box<dyn Describer>>,
}

impl Describers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, describer: Box<dyn Describer>) {
        self.describers.push(describer);
    }

    /// The first describer that accepts `value`.
    #[must_use]
    pub fn find(&self, value: &Value) -> Option<&dyn Describer> {
        self.describers
            .iter()
            .map(|d| d.as_ref())
            .find(|d| d.can_describe(value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.describers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.describers.is_empty()
    }
}

impl std::fmt::Debug for Describers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.describers.iter().map(|d| d.name()))
            .finish()
    }
}

/// Describes every record or object whose type name matches with a fixed text.
///
/// # Examples
///
/// ```rust
/// use context_help::{Describer, Record, TypeNameDescriber, Value};
///
/// let docs = TypeNameDescriber::new("auth.User", "doc for auth.user");
/// let user = Value::record(Record::new("auth.User"));
/// assert!(docs.can_describe(&user));
/// assert!(!docs.can_describe(&Value::from("auth.User")));
/// ```
#[derive(Clone, Debug)]
pub struct TypeNameDescriber {
    type_name: String,
    description: String,
}

impl TypeNameDescriber {
    #[must_use]
    pub fn new(type_name: impl Into<String>, description: impl Into<String>) -> Self {
        TypeNameDescriber {
            type_name: type_name.into(),
            description: description.into(),
        }
    }
}

impl Describer for TypeNameDescriber {
    fn name(&self) -> &str {
        &self.type_name
    }

    fn can_describe(&self, value: &Value) -> bool {
        matches!(value, Value::Record(_) | Value::Object(_)) && value.type_name() == self.type_name
    }

    fn describe(&self, _value: &Value) -> Result<String, DescribeError> {
        Ok(self.description.clone())
    }
}

/// A describer built from a predicate and a describing closure.
///
/// # Examples
///
/// ```rust
/// use context_help::{Describer, FnDescriber, Value};
///
/// let dates = FnDescriber::new(
///     "dates",
///     |v: &Value| matches!(v, Value::Date(_)),
///     |v: &Value| Ok(format!("date {}", v)),
/// );
/// assert!(!dates.can_describe(&Value::from(1)));
/// ```
pub struct FnDescriber<P, D> {
    name: String,
    predicate: P,
    describe: D,
}

impl<P, D> FnDescriber<P, D>
where
    P: Fn(&Value) -> bool,
    D: Fn(&Value) -> Result<String, DescribeError>,
{
    pub fn new(name: impl Into<String>, predicate: P, describe: D) -> Self {
        FnDescriber {
            name: name.into(),
            predicate,
            describe,
        }
    }
}

impl<P, D> Describer for FnDescriber<P, D>
where
    P: Fn(&Value) -> bool,
    D: Fn(&Value) -> Result<String, DescribeError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn can_describe(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    fn describe(&self, value: &Value) -> Result<String, DescribeError> {
        (self.describe)(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Record;

    #[test]
    fn test_first_match_wins() {
        let mut describers = Describers::new();
        describers.push(Box::new(TypeNameDescriber::new("Form", "first")));
        describers.push(Box::new(TypeNameDescriber::new("Form", "second")));

        let form = Value::record(Record::new("Form"));
        let found = describers.find(&form).unwrap();
        assert_eq!(found.describe(&form).unwrap(), "first");
    }

    #[test]
    fn test_no_match() {
        let mut describers = Describers::new();
        describers.push(Box::new(TypeNameDescriber::new("Form", "form")));
        assert!(describers.find(&Value::from("Form")).is_none());
        assert_eq!(describers.len(), 1);
    }

    #[test]
    fn test_fn_describer_error_passes_through() {
        let failing = FnDescriber::new("failing", |_: &Value| true, |_: &Value| {
            Err("boom".into())
        });
        let err = failing.describe(&Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
