//! Error taxonomy for the preparation core.
//!
//! Every binning, encoding, and cleaning operation reports failures through
//! [`PrepError`]. The command-line layer wraps these in `anyhow` with
//! additional context about the file or job being processed.

use thiserror::Error;

use crate::dataset::ColumnType;

pub type Result<T> = std::result::Result<T, PrepError>;

/// Errors raised by dataset preparation operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrepError {
    /// Column type is incompatible with the requested operation.
    #[error("column '{column}' is {found} but {expected} is required")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: ColumnType,
    },

    /// Explicit edges do not line up with the label sequence.
    #[error(
        "bin level count must be one higher than label count (got {edges} edge(s) for {labels} label(s))"
    )]
    ShapeMismatch { edges: usize, labels: usize },

    /// Binning was requested without any labels.
    #[error("at least one bin label is required")]
    EmptyLabels,

    /// Input is invalid for the chosen mathematical operation.
    #[error("{message}")]
    Domain { message: String },

    /// Requested label count exceeds the generator capacity.
    #[error("requested {requested} label(s) but only {capacity} are available")]
    Range { requested: usize, capacity: usize },

    #[error("column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    #[error("column '{column}' already exists in dataset")]
    DuplicateColumn { column: String },

    /// Column length disagrees with the dataset row count.
    #[error("column '{column}' has {found} row(s) but the dataset has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
}

impl PrepError {
    pub(crate) fn domain(message: impl Into<String>) -> Self {
        PrepError::Domain {
            message: message.into(),
        }
    }

    pub(crate) fn column_not_found(column: &str) -> Self {
        PrepError::ColumnNotFound {
            column: column.to_string(),
        }
    }
}
