//! # context_help
//!
//! Describe a named context of dynamic values as a bounded, nested report.
//!
//! Template engines and view layers hand a bag of named values to a
//! renderer. When a page breaks, the first question is "what was in there?".
//! This crate answers it: it walks every context entry, classifies each value
//! (scalar, sequence, mapping, set, structured record, opaque), summarizes
//! it, and recurses into containers while staying safe on graphs that share
//! or contain themselves.
//!
//! ## Guarantees
//!
//! - **Terminates on cycles**: a value whose content was already reached is
//!   described once more and then skipped
//! - **Bounded output**: depth, sequence previews, mapping entries and
//!   summary length are all capped by [`InspectOptions`]
//! - **Deterministic**: inspecting the same context twice gives equal reports
//! - **Read only**: inspection never mutates a value
//!
//! ## Quick Start
//!
//! ```rust
//! use context_help::{context, inspect};
//!
//! let context = context!({
//!     "name": "Alice",
//!     "tags": ["a", "b", "c"]
//! });
//!
//! let report = inspect(&context).unwrap();
//! println!("{}", report);
//! // Context includes:
//! // name | type | value
//! // name | str | Alice
//! // tags | list (3 items) |
//! //   tags.0 | str | a
//! //   tags.1 | str | b
//! //   tags.2 | str | c
//! // Context finished.
//! ```
//!
//! ### Cyclic Values
//!
//! ```rust
//! use context_help::{inspect, Context, Status, Value};
//!
//! let node = Value::map(Vec::<(String, Value)>::new());
//! node.insert("self", node.clone());
//!
//! let mut context = Context::new();
//! context.insert("node", node);
//!
//! let report = inspect(&context).unwrap();
//! let repeat = report.find("node.self").unwrap();
//! assert_eq!(repeat.status, Status::CycleDetected);
//! assert!(repeat.children.is_empty());
//! ```
//!
//! ### Typed Data
//!
//! Anything implementing `Serialize` can be turned into a [`Value`] with
//! [`to_value`]; structs become records that keep their field order.
//!
//! ```rust
//! use context_help::{inspect, to_value, Context};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Invoice { number: u32, lines: Vec<f64> }
//!
//! let mut context = Context::new();
//! context.insert("invoice", to_value(&Invoice { number: 12, lines: vec![9.5, 3.0] }).unwrap());
//!
//! let report = inspect(&context).unwrap();
//! assert_eq!(report.find("invoice").unwrap().type_description, "Invoice (2 fields)");
//! ```
//!
//! ## Logging
//!
//! The traversal emits [`tracing`] events: `trace` per visited node, `debug`
//! for cycles, depth cutoffs and describer matches, `warn` when a describer
//! fails. Install any subscriber to see them.
//!
//! ## Examples
//!
//! See the `demos/` directory. Run with: `cargo run --example dynamic_values`

pub mod classify;
pub mod context;
pub mod describe;
pub mod engine;
pub mod error;
pub mod guard;
pub mod macros;
pub mod map;
pub mod options;
pub mod report;
pub mod ser;
pub mod value;

pub use classify::{classify, Category};
pub use context::Context;
pub use describe::{DescribeError, Describer, Describers, FnDescriber, TypeNameDescriber};
pub use engine::Inspector;
pub use error::{Error, Result};
pub use guard::{fingerprint, Fingerprint, Fingerprinter, Unhashable, VisitedSet};
pub use map::ValueMap;
pub use options::InspectOptions;
pub use report::{assemble, Report, ReportNode, Status};
pub use ser::{to_value, ValueSerializer};
pub use value::{Hashing, Number, Object, Record, Shape, Shared, Value};

/// Inspects a context with the default options and no describers.
///
/// # Examples
///
/// ```rust
/// use context_help::{context, inspect, Report};
///
/// assert_eq!(inspect(&context!({})).unwrap(), Report::NoEntries);
/// ```
///
/// # Errors
///
/// Never fails without describers; the `Result` matches
/// [`Inspector::inspect`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn inspect(context: &Context) -> Result<Report> {
    Inspector::default().inspect(context)
}

/// Inspects a context with custom options and no describers.
///
/// # Examples
///
/// ```rust
/// use context_help::{context, inspect_with_options, InspectOptions};
///
/// let report = inspect_with_options(
///     &context!({"ids": [1, 2, 3, 4]}),
///     InspectOptions::compact(),
/// )
/// .unwrap();
/// assert_eq!(report.find("ids").unwrap().children.len(), 3);
/// ```
///
/// # Errors
///
/// Never fails without describers; the `Result` matches
/// [`Inspector::inspect`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn inspect_with_options(context: &Context, options: InspectOptions) -> Result<Report> {
    Inspector::new(options).inspect(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct User {
        id: u32,
        name: String,
        active: bool,
        tags: Vec<String>,
    }

    fn user() -> User {
        User {
            id: 123,
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
        }
    }

    #[test]
    fn test_inspect_typed_user() {
        let mut context = Context::new();
        context.insert("user", to_value(&user()).unwrap());
        let report = inspect(&context).unwrap();

        let node = report.find("user").unwrap();
        assert_eq!(node.category, Some(Category::StructuredRecord));
        assert_eq!(node.type_description, "User (4 fields)");
        assert_eq!(report.find("user.tags.1").unwrap().value_summary, "user");
        assert_eq!(report.find("user.id").unwrap().type_description, "int");
    }

    #[test]
    fn test_compact_options() {
        let context = context!({"a": {"b": {"c": {"d": 1}}}});
        let report = inspect_with_options(&context, InspectOptions::compact()).unwrap();

        let marker = report.find("a.b.c.d").unwrap();
        assert_eq!(marker.status, Status::TooDeep);
        assert_eq!(marker.depth, 3);
    }

    #[test]
    fn test_report_text_round() {
        let report = inspect(&context!({"name": "Alice"})).unwrap();
        assert_eq!(
            report.to_string(),
            "Context includes:\nname | type | value\nname | str | Alice\nContext finished.\n"
        );
    }
}
