//! The report tree and its assembly.
//!
//! A [`Report`] is the finished, immutable result of one inspection: either
//! [`Report::NoEntries`] or the ordered top-level [`ReportNode`]s, each
//! carrying its own subtree.
//!
//! Rendering is left to the caller. The report serializes with serde (JSON,
//! YAML, ...) and also implements `Display` as a plain-text nested table:
//!
//! ```text
//! Context includes:
//! name | type | value
//! name | str | Alice
//! tags | list (3 items) |
//!   tags.0 | str | a
//!   tags.1 | str | b
//!   tags.2 | str | c
//! Context finished.
//! ```

use crate::Category;
use serde::Serialize;
use std::fmt;

const INDENT: &str = "  ";

/// How the traversal ended at a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Ok,
    /// The depth cap was exceeded; nothing was inspected.
    TooDeep,
    /// An equal value was expanded earlier; children were skipped.
    CycleDetected,
    /// The value has no fingerprint and was expanded without cycle protection.
    UnhashableFallback,
}

/// One labeled value in the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportNode {
    /// Dotted path from the context key, e.g. `orders.3.total`.
    pub label: String,
    pub depth: usize,
    /// `None` only for [`Status::TooDeep`] nodes.
    pub category: Option<Category>,
    pub type_description: String,
    pub value_summary: String,
    pub children: Vec<ReportNode>,
    pub status: Status,
}

impl ReportNode {
    /// Terminal node standing in for a value beyond the depth cap.
    #[must_use]
    pub fn too_deep(label: &str, depth: usize) -> Self {
        ReportNode {
            label: label.to_string(),
            depth,
            category: None,
            type_description: "Too much nesting in context".to_string(),
            value_summary: "Giving up.".to_string(),
            children: Vec::new(),
            status: Status::TooDeep,
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first iterator over this node and all its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    fn write_rows(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = INDENT.repeat(self.depth);
        let value = match self.status {
            Status::CycleDetected if self.value_summary.is_empty() => {
                "Previously reached. Skipped".to_string()
            }
            Status::CycleDetected => {
                format!("{} (previously reached, skipped)", self.value_summary)
            }
            Status::UnhashableFallback if self.value_summary.is_empty() => {
                "(not fingerprintable)".to_string()
            }
            Status::UnhashableFallback => {
                format!("{} (not fingerprintable)", self.value_summary)
            }
            Status::Ok | Status::TooDeep => self.value_summary.clone(),
        };
        let row = format!(
            "{}{} | {} | {}",
            indent, self.label, self.type_description, value
        );
        writeln!(f, "{}", row.trim_end())?;
        for child in &self.children {
            child.write_rows(f)?;
        }
        Ok(())
    }
}

/// Iterator returned by [`ReportNode::walk`] and [`Report::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a ReportNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a ReportNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// The result of one inspection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "entries", rename_all = "kebab-case")]
pub enum Report {
    /// The context had no entries.
    NoEntries,
    Entries(Vec<ReportNode>),
}

impl Report {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Report::NoEntries)
    }

    /// Top-level nodes, one per context entry.
    #[must_use]
    pub fn nodes(&self) -> &[ReportNode] {
        match self {
            Report::NoEntries => &[],
            Report::Entries(nodes) => nodes,
        }
    }

    /// Every node of the report, depth first.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.nodes().iter().rev().collect(),
        }
    }

    /// Finds a node by its full label.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use context_help::{context, inspect};
    ///
    /// let context = context!({"user": {"name": "Alice"}});
    /// let report = inspect(&context).unwrap();
    /// assert_eq!(report.find("user.name").unwrap().value_summary, "Alice");
    /// ```
    #[must_use]
    pub fn find(&self, label: &str) -> Option<&ReportNode> {
        self.walk().find(|node| node.label == label)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::NoEntries => writeln!(f, "No context given."),
            Report::Entries(nodes) => {
                writeln!(f, "Context includes:")?;
                writeln!(f, "name | type | value")?;
                for node in nodes {
                    node.write_rows(f)?;
                }
                writeln!(f, "Context finished.")
            }
        }
    }
}

/// Builds the report from the top-level nodes, in the order given.
///
/// # Examples
///
/// ```rust
/// use context_help::{assemble, Report};
///
/// assert_eq!(assemble(Vec::new()), Report::NoEntries);
/// ```
#[must_use]
pub fn assemble(nodes: Vec<ReportNode>) -> Report {
    if nodes.is_empty() {
        Report::NoEntries
    } else {
        Report::Entries(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(label: &str, depth: usize, summary: &str) -> ReportNode {
        ReportNode {
            label: label.to_string(),
            depth,
            category: Some(Category::Scalar),
            type_description: "str".to_string(),
            value_summary: summary.to_string(),
            children: Vec::new(),
            status: Status::Ok,
        }
    }

    #[test]
    fn test_empty_report_text() {
        assert_eq!(assemble(Vec::new()).to_string(), "No context given.\n");
    }

    #[test]
    fn test_nested_rows_are_indented() {
        let mut parent = leaf("user", 0, "");
        parent.type_description = "map (1 item)".to_string();
        parent.category = Some(Category::Mapping);
        parent.children.push(leaf("user.name", 1, "Alice"));

        let text = assemble(vec![parent]).to_string();
        assert_eq!(
            text,
            "Context includes:\nname | type | value\nuser | map (1 item) |\n  user.name | str | Alice\nContext finished.\n"
        );
    }

    #[test]
    fn test_status_markers() {
        let mut cycle = leaf("a", 0, "");
        cycle.status = Status::CycleDetected;
        let too_deep = ReportNode::too_deep("b", 0);

        let text = assemble(vec![cycle, too_deep]).to_string();
        assert!(text.contains("a | str | Previously reached. Skipped"));
        assert!(text.contains("b | Too much nesting in context | Giving up."));
    }

    #[test]
    fn test_walk_is_depth_first_in_order() {
        let mut root = leaf("r", 0, "");
        let mut first = leaf("r.0", 1, "");
        first.children.push(leaf("r.0.0", 2, "x"));
        root.children.push(first);
        root.children.push(leaf("r.1", 1, "y"));

        let labels: Vec<_> = root.walk().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["r", "r.0", "r.0.0", "r.1"]);
    }

    #[test]
    fn test_serializes_with_kebab_case_tags() {
        let json = serde_json::to_value(assemble(vec![leaf("n", 0, "v")])).unwrap();
        assert_eq!(json["kind"], "entries");
        assert_eq!(json["entries"][0]["status"], "ok");
        assert_eq!(json["entries"][0]["category"], "scalar");

        let empty = serde_json::to_value(Report::NoEntries).unwrap();
        assert_eq!(empty["kind"], "no-entries");
    }
}
