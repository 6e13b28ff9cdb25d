//! Query filter system
//!
//! Holds the filter slots of a metadata query, validates the filter logic
//! that combines them and compiles both into a [`QueryDescriptor`].
//! Filters support string, number and date operations.
//!
//! ## Usage
//!
//! ```no_run
//! use mdh_query::domain::filters::{
//!     BuildOptions, FilterConfiguration, FilterRegistry, Operation, ValueType, compile,
//! };
//!
//! let mut registry = FilterRegistry::new(21);
//! let slot = registry.slot_mut(0).unwrap();
//! slot.tag = "FileSize".to_string();
//! slot.value_type = ValueType::Number;
//! slot.operation = Operation::Greater;
//! slot.target = "1000".to_string();
//!
//! let config = FilterConfiguration::default();
//! let descriptor = compile(&registry, &config, BuildOptions::default()).unwrap();
//! ```

mod builder;
mod error;
mod expression;
mod operations;
mod parser;
mod registry;
mod settings;
mod target;
mod types;

pub use builder::{BuildOptions, check, compile, split_selected_tags, validate};
pub use error::QueryError;
pub use expression::extract_referenced_ids;
pub use operations::{
    OperationInfo, allowed_operations, default_operation, describe, description, is_allowed,
    label, protocol_code,
};
pub use parser::{Expr, parse_expression};
pub use registry::{FilterRegistry, target_visible, visible};
pub use settings::{QuerySettings, SlotSettings};
pub use target::check_target;
pub use types::{
    FilterConfiguration, FilterDescriptor, FilterSlot, Operation, QueryDescriptor, ValueType,
    filter_key,
};
