//! Filter validation errors

use thiserror::Error;

use super::types::{Operation, ValueType};

/// Errors raised while validating or compiling a metadata query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Active filter not referenced by the filter logic
    #[error("Filter '{filter_key}' is not used in the filter logic '{filter_logic}'")]
    MissingReference {
        filter_key: String,
        filter_logic: String,
    },

    /// Filter logic references a filter without a tag
    #[error("Filter logic '{filter_logic}' references '{filter_key}', which has no tag")]
    DanglingReference {
        filter_key: String,
        filter_logic: String,
    },

    #[error("Operation '{operation}' of filter '{filter_key}' is not available for {value_type} values")]
    UnsupportedOperation {
        filter_key: String,
        value_type: ValueType,
        operation: Operation,
    },

    #[error("Invalid target '{target}' for filter '{filter_key}': {reason}")]
    InvalidTarget {
        filter_key: String,
        target: String,
        reason: String,
    },

    #[error("Invalid filter logic at position {position}: {message}")]
    InvalidSyntax {
        /// Character index into the filter logic
        position: usize,
        message: String,
    },

    #[error("Filter slot {index} is out of range (at most {max} filters)")]
    SlotOutOfRange { index: usize, max: usize },
}

impl QueryError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingReference { .. } => "MISSING_FILTER_REFERENCE",
            Self::DanglingReference { .. } => "DANGLING_FILTER_REFERENCE",
            Self::UnsupportedOperation { .. } => "UNSUPPORTED_OPERATION",
            Self::InvalidTarget { .. } => "INVALID_TARGET",
            Self::InvalidSyntax { .. } => "INVALID_FILTER_LOGIC",
            Self::SlotOutOfRange { .. } => "FILTER_SLOT_OUT_OF_RANGE",
        }
    }

    /// Filter key the error concerns, if any
    pub fn filter_key(&self) -> Option<&str> {
        match self {
            Self::MissingReference { filter_key, .. }
            | Self::DanglingReference { filter_key, .. }
            | Self::UnsupportedOperation { filter_key, .. }
            | Self::InvalidTarget { filter_key, .. } => Some(filter_key),
            Self::InvalidSyntax { .. } | Self::SlotOutOfRange { .. } => None,
        }
    }
}
