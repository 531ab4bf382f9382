//! Error types for context inspection.
//!
//! Inspection itself almost never fails: depth overruns, repeated values and
//! values that cannot be fingerprinted are all recovered locally and show up
//! as node statuses in the report. What remains are:
//!
//! - **Describer failures**: a registered [`Describer`](crate::Describer)
//!   returned an error. Describers are expected to be total, so the whole
//!   inspection is aborted and the failing label is reported.
//! - **Unsupported types**: [`to_value`](crate::to_value) met a serde shape it
//!   cannot represent (for example non-string map keys that are containers).
//! - **Custom errors**: raised through serde's `ser::Error` trait or failed
//!   conversions out of a [`Value`](crate::Value).
//!
//! ## Examples
//!
//! ```rust
//! use context_help::Error;
//!
//! let err = Error::describer("request", "docs", "link table missing");
//! assert!(err.to_string().contains("request"));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while inspecting a context.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A describer failed while describing the value at `label`
    #[error("Describer `{describer}` failed on `{label}`: {message}")]
    Describer {
        label: String,
        describer: String,
        message: String,
    },

    /// Unsupported type while converting into a [`Value`](crate::Value)
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a describer failure for the value reported under `label`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use context_help::Error;
    ///
    /// let err = Error::describer("user", "admin-docs", "no such model");
    /// assert!(err.to_string().contains("admin-docs"));
    /// ```
    pub fn describer(label: &str, describer: &str, message: &str) -> Self {
        Error::Describer {
            label: label.to_string(),
            describer: describer.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates an unsupported type error for shapes that cannot become a `Value`.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use context_help::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
