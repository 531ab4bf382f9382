//! The recursive traversal.
//!
//! [`Inspector::traverse`] turns one labeled value into a [`ReportNode`]:
//!
//! 1. Past the depth cap it returns a "too deep" marker and stops.
//! 2. It fingerprints the value. A fingerprint already in the
//!    [`VisitedSet`] marks the node as a repeat, which is still described but
//!    never expanded. A value without a fingerprint is expanded unprotected.
//! 3. It classifies the value and describes it. Only a node that is neither
//!    a repeat nor taken over by a describer has its children listed; the
//!    others just count them. Retained children are visited at `depth + 1`.
//!
//! A registered [`Describer`] that accepts the value replaces the generic
//! summary and suppresses recursion.

use crate::describe::Describers;
use crate::guard::{Fingerprint, VisitedSet};
use crate::report::{assemble, Report, ReportNode, Status};
use crate::{classify, Category, Context, Describer, Error, InspectOptions, Result, Value};
use tracing::{debug, trace, warn};

const ELLIPSIS: &str = "...";

/// Inspects contexts under one set of options and describers.
///
/// An inspector holds no per-call state and can be reused; every
/// [`inspect`](Inspector::inspect) call starts from a fresh [`VisitedSet`].
///
/// # Examples
///
/// ```rust
/// use context_help::{context, InspectOptions, Inspector, Status};
///
/// let inspector = Inspector::new(InspectOptions::new().with_max_sequence_preview(2));
/// let report = inspector.inspect(&context!({"ids": [1, 2, 3]})).unwrap();
///
/// let ids = report.find("ids").unwrap();
/// assert_eq!(ids.type_description, "list (3 items)");
/// assert_eq!(ids.children.len(), 2);
/// assert_eq!(ids.status, Status::Ok);
/// ```
#[derive(Debug, Default)]
pub struct Inspector {
    options: InspectOptions,
    describers: Describers,
}

impl Inspector {
    #[must_use]
    pub fn new(options: InspectOptions) -> Self {
        Inspector {
            options,
            describers: Describers::new(),
        }
    }

    /// Registers a describer after the ones already registered.
    #[must_use]
    pub fn with_describer<D: Describer + 'static>(mut self, describer: D) -> Self {
        self.describers.push(Box::new(describer));
        self
    }

    #[must_use]
    pub fn options(&self) -> &InspectOptions {
        &self.options
    }

    /// Inspects every entry of the context and assembles the report.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Describer`] if a registered describer fails.
    pub fn inspect(&self, context: &Context) -> Result<Report> {
        let mut visited = VisitedSet::new();
        let entries = context.report_entries();
        debug!(entries = entries.len(), "inspecting context");

        let nodes = entries
            .iter()
            .map(|(label, value)| self.traverse(label, value, 0, &mut visited))
            .collect::<Result<Vec<_>>>()?;
        Ok(assemble(nodes))
    }

    /// Describes `value` under `label` and recurses into its children.
    ///
    /// `visited` must belong to the current inspection only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Describer`] if a registered describer fails on this
    /// value or any descendant.
    pub fn traverse(
        &self,
        label: &str,
        value: &Value,
        depth: usize,
        visited: &mut VisitedSet,
    ) -> Result<ReportNode> {
        if depth > self.options.max_depth {
            debug!(label, depth, "depth cap reached");
            return Ok(ReportNode::too_deep(label, depth));
        }

        let status = match visited.fingerprint(value) {
            Ok(fp) if visited.seen(&fp) => {
                debug!(label, "value previously reached");
                Status::CycleDetected
            }
            Ok(fp) => {
                visited.mark(fp);
                Status::Ok
            }
            Err(err) => {
                debug!(label, error = %err, "expanding without cycle protection");
                Status::UnhashableFallback
            }
        };

        let category = classify(value);
        trace!(label, depth, %category, "visiting");

        let describer = self.describers.find(value);
        let children = if !category.is_recursible() {
            Children::default()
        } else if describer.is_none() && status != Status::CycleDetected {
            enumerate(value, category, &self.options, visited)
        } else {
            Children::counted(count(value, category, visited))
        };

        let mut node = ReportNode {
            label: label.to_string(),
            depth,
            category: Some(category),
            type_description: truncate(
                &describe_type(value, category, children.total),
                self.options.max_summary_len,
            ),
            value_summary: String::new(),
            children: Vec::new(),
            status,
        };

        if let Some(describer) = describer {
            debug!(label, describer = describer.name(), "describer matched");
            node.value_summary = describer.describe(value).map_err(|err| {
                warn!(label, describer = describer.name(), error = %err, "describer failed");
                Error::describer(label, describer.name(), &err.to_string())
            })?;
            return Ok(node);
        }

        if !category.is_recursible() {
            node.value_summary = truncate(&value.to_string(), self.options.max_summary_len);
            return Ok(node);
        }

        if children.total == 0 {
            node.value_summary = "(empty)".to_string();
        }
        for (segment, child) in children.retained {
            let child_label = format!("{}.{}", label, segment);
            node.children
                .push(self.traverse(&child_label, &child, depth + 1, visited)?);
        }
        Ok(node)
    }
}

/// The children of a container: how many exist, and which are expanded.
#[derive(Default)]
struct Children {
    total: usize,
    retained: Vec<(String, Value)>,
}

impl Children {
    fn indexed(total: usize, items: impl Iterator<Item = Value>) -> Self {
        Children {
            total,
            retained: items.enumerate().map(|(i, v)| (i.to_string(), v)).collect(),
        }
    }

    fn named(total: usize, items: impl Iterator<Item = (String, Value)>) -> Self {
        Children {
            total,
            retained: items.collect(),
        }
    }

    fn counted(total: usize) -> Self {
        Children {
            total,
            retained: Vec::new(),
        }
    }
}

fn enumerate(
    value: &Value,
    category: Category,
    options: &InspectOptions,
    visited: &mut VisitedSet,
) -> Children {
    match value {
        Value::Map(map) => sorted_entries(map.borrow().sorted_entries(), options),
        Value::List(items) => {
            let items = items.borrow();
            Children::indexed(
                items.len(),
                items.iter().take(options.max_sequence_preview).cloned(),
            )
        }
        Value::Tuple(items) => Children::indexed(
            items.len(),
            items.iter().take(options.tuple_cap(items.len())).cloned(),
        ),
        Value::Set(items) => {
            let items = items.borrow().clone();
            members(items, options, visited)
        }
        Value::Record(record) => {
            let record = record.borrow();
            Children::named(
                record.fields.len(),
                record
                    .fields
                    .iter()
                    .take(options.max_mapping_entries)
                    .map(|(k, v)| (k.clone(), v.clone())),
            )
        }
        Value::Object(object) => match category {
            Category::Mapping => {
                let mut entries = object.entries();
                entries.sort_by(|a, b| a.0.cmp(&b.0));
                sorted_entries(entries, options)
            }
            Category::Set => members(object.elements(), options, visited),
            Category::Sequence => {
                let elements = object.elements();
                let total = object.size().unwrap_or(elements.len());
                Children::indexed(
                    total,
                    elements.into_iter().take(options.max_sequence_preview),
                )
            }
            Category::StructuredRecord => {
                let fields = object.fields();
                Children::named(
                    fields.len(),
                    fields.into_iter().take(options.max_mapping_entries),
                )
            }
            Category::Scalar | Category::Opaque => Children::default(),
        },
        _ => Children::default(),
    }
}

fn sorted_entries(entries: Vec<(String, Value)>, options: &InspectOptions) -> Children {
    Children::named(
        entries.len(),
        entries.into_iter().take(options.max_mapping_entries),
    )
}

/// The number of children a node would have, without listing them.
fn count(value: &Value, category: Category, visited: &mut VisitedSet) -> usize {
    match value {
        Value::Set(items) => {
            let items = items.borrow().clone();
            distinct(items, visited).len()
        }
        Value::Object(object) => match category {
            Category::Mapping => object.entries().len(),
            Category::Set => distinct(object.elements(), visited).len(),
            Category::Sequence => object.size().unwrap_or_else(|| object.elements().len()),
            Category::StructuredRecord => object.fields().len(),
            Category::Scalar | Category::Opaque => 0,
        },
        other => other.len().unwrap_or(0),
    }
}

fn members(items: Vec<Value>, options: &InspectOptions, visited: &mut VisitedSet) -> Children {
    let keyed = distinct(items, visited);
    Children::indexed(
        keyed.len(),
        keyed
            .into_iter()
            .take(options.max_sequence_preview)
            .map(|(_, item)| item),
    )
}

/// Set members, deduplicated by fingerprint and ordered by it. Members
/// without a fingerprint keep their relative order at the end.
fn distinct(items: Vec<Value>, visited: &mut VisitedSet) -> Vec<(Option<Fingerprint>, Value)> {
    let mut keyed: Vec<(Option<Fingerprint>, Value)> = items
        .into_iter()
        .map(|item| (visited.fingerprint(&item).ok(), item))
        .collect();
    keyed.sort_by(|a, b| match (&a.0, &b.0) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    keyed.dedup_by(|a, b| a.0.is_some() && a.0 == b.0);
    keyed
}

fn describe_type(value: &Value, category: Category, total: usize) -> String {
    if !category.is_recursible() {
        return value.type_name();
    }
    let noun = category.unit_noun();
    format!(
        "{} ({} {}{})",
        value.type_name(),
        total,
        noun,
        if total == 1 { "" } else { "s" }
    )
}

/// Caps `text` at `cap` characters, marking cut text with a trailing ellipsis.
fn truncate(text: &str, cap: usize) -> String {
    if text.chars().count() <= cap {
        return text.to_string();
    }
    if cap <= ELLIPSIS.len() {
        return text.chars().take(cap).collect();
    }
    let mut cut: String = text.chars().take(cap - ELLIPSIS.len()).collect();
    cut.push_str(ELLIPSIS);
    cut
}
