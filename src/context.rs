//! The named values handed to an inspection.
//!
//! Rendering pipelines usually keep their context as a stack of layers
//! (globals, processor output, view data). [`Context::from_layers`] flattens
//! such a stack so that later layers shadow earlier ones.
//!
//! ## Examples
//!
//! ```rust
//! use context_help::{Context, Value, ValueMap};
//!
//! let mut globals = ValueMap::new();
//! globals.insert("title".to_string(), Value::from("Home"));
//! globals.insert("debug".to_string(), Value::from(false));
//!
//! let mut view = ValueMap::new();
//! view.insert("title".to_string(), Value::from("Orders"));
//!
//! let context = Context::from_layers(vec![globals, view]);
//! assert_eq!(context.get("title").and_then(|v| v.as_str()), Some("Orders"));
//! assert_eq!(context.len(), 2);
//! ```

use crate::{Value, ValueMap};

/// A mapping from labels to the values being inspected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Context {
    values: ValueMap,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens layered dictionaries; a key in a later layer overrides the
    /// same key in an earlier one.
    pub fn from_layers(layers: impl IntoIterator<Item = ValueMap>) -> Self {
        let mut context = Context::new();
        for layer in layers {
            context.push_layer(layer);
        }
        context
    }

    /// Applies one more layer on top of the current entries.
    pub fn push_layer(&mut self, layer: ValueMap) {
        self.values.extend(layer);
    }

    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(label.into(), value.into())
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.values.get(label)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.values.iter()
    }

    /// Entries in report order: case-insensitive by label, ties broken by the
    /// exact label.
    #[must_use]
    pub fn report_entries(&self) -> Vec<(String, Value)> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort_by(|a, b| {
            a.0.to_lowercase()
                .cmp(&b.0.to_lowercase())
                .then_with(|| a.0.cmp(&b.0))
        });
        entries
    }
}

impl From<ValueMap> for Context {
    fn from(values: ValueMap) -> Self {
        Context { values }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Context {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Context {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
