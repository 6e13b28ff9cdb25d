//! Query creator settings
//!
//! JSON form of the query creator's parameters. The position of an entry in
//! `filters` is its slot id; absent entries leave their slot inactive.

use serde::Deserialize;

use super::error::QueryError;
use super::operations::default_operation;
use super::registry::FilterRegistry;
use super::types::{FilterConfiguration, Operation, ValueType};

/// Parameters of one filter slot
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotSettings {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub value_type: ValueType,
    /// Defaults to the preselected operation of the value type
    pub operation: Option<Operation>,
    #[serde(default)]
    pub target: String,
}

/// Parameters of a whole query creator
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    pub filters: Vec<SlotSettings>,
    pub filter_logic: String,
    pub selected_tags: String,
    pub limit: u64,
    pub offset: u64,
    pub only_count: bool,
}

impl Default for QuerySettings {
    fn default() -> Self {
        let config = FilterConfiguration::default();
        Self {
            filters: Vec::new(),
            filter_logic: config.filter_logic,
            selected_tags: config.selected_tags,
            limit: config.limit,
            offset: config.offset,
            only_count: config.only_count,
        }
    }
}

impl QuerySettings {
    /// Populate a registry of `max_filters` slots and the query controls
    pub fn into_parts(
        self,
        max_filters: usize,
    ) -> Result<(FilterRegistry, FilterConfiguration), QueryError> {
        if self.filters.len() > max_filters {
            return Err(QueryError::SlotOutOfRange {
                index: self.filters.len() - 1,
                max: max_filters,
            });
        }

        let mut registry = FilterRegistry::new(max_filters);
        for (id, settings) in self.filters.into_iter().enumerate() {
            let slot = registry.slot_mut(id)?;
            slot.tag = settings.tag;
            slot.value_type = settings.value_type;
            slot.operation = settings
                .operation
                .unwrap_or_else(|| default_operation(settings.value_type));
            slot.target = settings.target;
        }

        let config = FilterConfiguration {
            filter_logic: self.filter_logic,
            selected_tags: self.selected_tags,
            limit: self.limit,
            offset: self.offset,
            only_count: self.only_count,
        };

        Ok((registry, config))
    }
}
