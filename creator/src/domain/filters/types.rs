//! Filter type definitions
//!
//! Defines filter slots, value types, operations and the compiled query
//! descriptor handed to query execution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::constants::FILTER_KEY_PREFIX;

/// Type a metadata value is compared as
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueType {
    #[default]
    #[serde(alias = "string")]
    String,
    #[serde(alias = "number")]
    Number,
    #[serde(alias = "date")]
    Date,
}

impl ValueType {
    pub const ALL: [ValueType; 3] = [Self::String, Self::Number, Self::Date];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Number => "NUMBER",
            Self::Date => "DATE",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            _ => Err(format!(
                "Invalid value type '{}'. Valid options: string, number, date",
                s
            )),
        }
    }
}

/// Filter operation applied to a metadata tag
///
/// Serialized in kebab-case. Deserialization goes through [`FromStr`], so
/// settings files accept the same spellings as the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum Operation {
    Exists,
    NotExists,
    Empty,
    NotEmpty,
    Contains,
    NotContains,
    Equal,
    NotEqual,
    Greater,
    Smaller,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Self::Exists,
        Self::NotExists,
        Self::Empty,
        Self::NotEmpty,
        Self::Contains,
        Self::NotContains,
        Self::Equal,
        Self::NotEqual,
        Self::Greater,
        Self::Smaller,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exists => "exists",
            Self::NotExists => "not-exists",
            Self::Empty => "empty",
            Self::NotEmpty => "not-empty",
            Self::Contains => "contains",
            Self::NotContains => "not-contains",
            Self::Equal => "equal",
            Self::NotEqual => "not-equal",
            Self::Greater => "greater",
            Self::Smaller => "smaller",
        }
    }

    /// Whether the operation compares against a target value
    pub fn requires_target(&self) -> bool {
        !matches!(
            self,
            Self::Exists | Self::NotExists | Self::Empty | Self::NotEmpty
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == normalized)
            .ok_or_else(|| format!("Invalid operation '{}'", s))
    }
}

impl TryFrom<String> for Operation {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One configurable filter of the query creator
///
/// A slot is active when its tag is non-empty. Inactive slots keep their
/// remaining fields so that re-entering a tag restores the previous setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSlot {
    pub id: usize,
    pub tag: String,
    pub value_type: ValueType,
    pub operation: Operation,
    pub target: String,
}

impl FilterSlot {
    /// Create an inactive slot with the defaults of the STRING value type
    pub fn new(id: usize) -> Self {
        let value_type = ValueType::default();
        Self {
            id,
            tag: String::new(),
            value_type,
            operation: super::operations::default_operation(value_type),
            target: String::new(),
        }
    }

    /// Key used to reference the slot in filter logic (`f0`, `f1`, ...)
    pub fn key(&self) -> String {
        filter_key(self.id)
    }

    pub fn is_active(&self) -> bool {
        !self.tag.is_empty()
    }
}

/// Render the filter key of a slot id
pub fn filter_key(id: usize) -> String {
    format!("{}{}", FILTER_KEY_PREFIX, id)
}

/// Scalar query controls set next to the filter slots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfiguration {
    pub filter_logic: String,
    /// Raw comma-space separated tag list
    pub selected_tags: String,
    /// `0` means no limit
    pub limit: u64,
    pub offset: u64,
    pub only_count: bool,
}

impl Default for FilterConfiguration {
    fn default() -> Self {
        use crate::core::constants::{
            DEFAULT_FILTER_LOGIC, DEFAULT_SELECTED_TAGS, SELECTED_TAGS_SEPARATOR,
        };

        Self {
            filter_logic: DEFAULT_FILTER_LOGIC.to_string(),
            selected_tags: DEFAULT_SELECTED_TAGS.join(SELECTED_TAGS_SEPARATOR),
            limit: 0,
            offset: 0,
            only_count: false,
        }
    }
}

/// Compiled form of one active filter slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub tag: String,
    pub value_type: ValueType,
    /// Protocol code of the operation, e.g. `CONTAINS`
    pub operation: String,
    pub target: String,
    /// Unix seconds of a DATE target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Query handed to the execution step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    pub filter_logic: String,
    pub selected_tags: Vec<String>,
    /// `None` means unbounded
    pub limit: Option<u64>,
    pub offset: u64,
    pub only_count: bool,
    pub filters: Vec<FilterDescriptor>,
}
