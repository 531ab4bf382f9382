//! Configuration options for context inspection.
//!
//! [`InspectOptions`] holds every truncation policy the traversal applies.
//! None of the caps is an error: exceeding one silently stops recursion or
//! omits the excess elements.
//!
//! ## Examples
//!
//! ```rust
//! use context_help::InspectOptions;
//!
//! // Defaults: depth 5, 100-character summaries, 5-element list previews,
//! // 100 mapping entries, tuples listed in full.
//! let options = InspectOptions::new();
//! assert_eq!(options.max_depth, 5);
//!
//! // Summarize tuples of 10 or more elements like lists
//! let options = InspectOptions::new().with_long_tuple_threshold(10);
//! assert_eq!(options.long_tuple_threshold, Some(10));
//! ```

use serde::{Deserialize, Serialize};

/// Truncation policy for one inspection.
///
/// Deserializable with missing fields falling back to the defaults, so a host
/// can keep these settings in its own configuration file.
///
/// # Examples
///
/// ```rust
/// use context_help::InspectOptions;
///
/// let options = InspectOptions::new()
///     .with_max_depth(3)
///     .with_max_summary_len(40)
///     .with_max_sequence_preview(2);
/// assert_eq!(options.max_mapping_entries, 100);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectOptions {
    /// Nodes deeper than this are replaced by a "too deep" marker.
    pub max_depth: usize,
    /// Character cap for scalar and fallback summaries, ellipsis included.
    pub max_summary_len: usize,
    /// Element cap for lists, sets and previewed tuples.
    pub max_sequence_preview: usize,
    /// Entry cap for mappings and record fields.
    pub max_mapping_entries: usize,
    /// Tuples at least this long are previewed like lists; `None` lists them in full.
    pub long_tuple_threshold: Option<usize>,
}

impl Default for InspectOptions {
    fn default() -> Self {
        InspectOptions {
            max_depth: 5,
            max_summary_len: 100,
            max_sequence_preview: 5,
            max_mapping_entries: 100,
            long_tuple_threshold: None,
        }
    }
}

impl InspectOptions {
    /// Creates the default options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use context_help::InspectOptions;
    ///
    /// let options = InspectOptions::new();
    /// assert_eq!(options.max_summary_len, 100);
    /// assert_eq!(options.max_sequence_preview, 5);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for a short overview: shallow, with small previews.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use context_help::InspectOptions;
    ///
    /// let options = InspectOptions::compact();
    /// assert_eq!(options.max_depth, 2);
    /// ```
    #[must_use]
    pub fn compact() -> Self {
        InspectOptions {
            max_depth: 2,
            max_sequence_preview: 3,
            max_mapping_entries: 20,
            ..Default::default()
        }
    }

    /// Sets the recursion depth cap.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the summary length cap (in characters).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use context_help::InspectOptions;
    ///
    /// let options = InspectOptions::new().with_max_summary_len(20);
    /// assert_eq!(options.max_summary_len, 20);
    /// ```
    #[must_use]
    pub fn with_max_summary_len(mut self, max_summary_len: usize) -> Self {
        self.max_summary_len = max_summary_len;
        self
    }

    /// Sets how many elements of a list or set are expanded.
    #[must_use]
    pub fn with_max_sequence_preview(mut self, max_sequence_preview: usize) -> Self {
        self.max_sequence_preview = max_sequence_preview;
        self
    }

    /// Sets how many mapping entries (or record fields) are expanded.
    #[must_use]
    pub fn with_max_mapping_entries(mut self, max_mapping_entries: usize) -> Self {
        self.max_mapping_entries = max_mapping_entries;
        self
    }

    /// Tuples with at least `threshold` elements are previewed like lists.
    #[must_use]
    pub fn with_long_tuple_threshold(mut self, threshold: usize) -> Self {
        self.long_tuple_threshold = Some(threshold);
        self
    }

    /// Element cap for a tuple of `len` elements under this policy.
    pub(crate) fn tuple_cap(&self, len: usize) -> usize {
        match self.long_tuple_threshold {
            Some(threshold) if len >= threshold => self.max_sequence_preview,
            _ => len,
        }
    }
}
