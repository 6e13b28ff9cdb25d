//! Execution parameters
//!
//! Translates a [`QueryDescriptor`] into the parameters the metadata-hub
//! client takes for a custom-filter query.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::constants::SOURCE_FILE_TAG;

use super::filters::{QueryDescriptor, ValueType};

/// Value type codes of the query service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceValueType {
    Str,
    Num,
    Ts,
}

impl From<ValueType> for ServiceValueType {
    fn from(value_type: ValueType) -> Self {
        match value_type {
            ValueType::String => Self::Str,
            ValueType::Number => Self::Num,
            ValueType::Date => Self::Ts,
        }
    }
}

impl fmt::Display for ServiceValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str => write!(f, "STR"),
            Self::Num => write!(f, "NUM"),
            Self::Ts => write!(f, "TS"),
        }
    }
}

/// One filter function of a custom-filter query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    pub tag: String,
    pub operation: String,
    pub target: String,
    pub value_type: ServiceValueType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParameters {
    pub filter_functions: Vec<QueryFilter>,
    pub filter_logic: String,
    pub selected_tags: Vec<String>,
    pub limit: Option<u64>,
    pub offset: u64,
    pub only_count: bool,
}

impl From<&QueryDescriptor> for QueryParameters {
    fn from(query: &QueryDescriptor) -> Self {
        Self {
            filter_functions: query
                .filters
                .iter()
                .map(|filter| QueryFilter {
                    tag: filter.tag.clone(),
                    operation: filter.operation.clone(),
                    target: filter.target.clone(),
                    value_type: filter.value_type.into(),
                })
                .collect(),
            filter_logic: query.filter_logic.clone(),
            selected_tags: query.selected_tags.clone(),
            limit: query.limit,
            offset: query.offset,
            only_count: query.only_count,
        }
    }
}

/// Make sure results can be grouped by file
///
/// An empty selection keeps the service defaults, which already include the
/// source file.
pub fn ensure_source_file(selected_tags: &mut Vec<String>) {
    if !selected_tags.is_empty() && !selected_tags.iter().any(|tag| tag == SOURCE_FILE_TAG) {
        selected_tags.push(SOURCE_FILE_TAG.to_string());
    }
}
