//! Value classification.
//!
//! [`classify`] maps a value to the [`Category`] that decides whether the
//! traversal recurses and how children are enumerated. It only looks at the
//! variant and, for host objects, at the declared [`Shape`](crate::Shape);
//! contents are never read.
//!
//! When an object declares several shapes the first match in this order wins:
//! mapping, set, sequence, record, scalar. A mapping that is also iterable is
//! therefore walked by entries, never by elements.

use crate::Value;
use serde::Serialize;
use std::fmt;

/// What kind of value the traversal is looking at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Scalar,
    Sequence,
    Mapping,
    Set,
    StructuredRecord,
    Opaque,
}

impl Category {
    /// Returns `true` if values of this category have children.
    #[must_use]
    pub const fn is_recursible(self) -> bool {
        matches!(
            self,
            Category::Sequence | Category::Mapping | Category::Set | Category::StructuredRecord
        )
    }

    /// Singular noun for one child of this category.
    #[must_use]
    pub const fn unit_noun(self) -> &'static str {
        match self {
            Category::StructuredRecord => "field",
            _ => "item",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Scalar => "scalar",
            Category::Sequence => "sequence",
            Category::Mapping => "mapping",
            Category::Set => "set",
            Category::StructuredRecord => "structured-record",
            Category::Opaque => "opaque",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides the category of a value.
///
/// # Examples
///
/// ```rust
/// use context_help::{classify, Category, Value};
///
/// assert_eq!(classify(&Value::from("Alice")), Category::Scalar);
/// assert_eq!(classify(&Value::list(vec![])), Category::Sequence);
/// assert_eq!(classify(&Value::tuple(vec![])), Category::Sequence);
/// assert_eq!(classify(&Value::map(Vec::<(String, Value)>::new())), Category::Mapping);
/// ```
#[must_use]
pub fn classify(value: &Value) -> Category {
    match value {
        Value::Map(_) => Category::Mapping,
        Value::Set(_) => Category::Set,
        Value::List(_) | Value::Tuple(_) => Category::Sequence,
        Value::Record(_) => Category::StructuredRecord,
        Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Date(_)
        | Value::BigInt(_) => Category::Scalar,
        Value::Object(object) => {
            let shape = object.shape();
            if shape.mapping {
                Category::Mapping
            } else if shape.set {
                Category::Set
            } else if shape.sequence {
                Category::Sequence
            } else if shape.record {
                Category::StructuredRecord
            } else if shape.scalar {
                Category::Scalar
            } else {
                Category::Opaque
            }
        }
    }
}
