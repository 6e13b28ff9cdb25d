//! Target validation
//!
//! Checks that a slot's target fits its value type. The target itself is
//! forwarded as a string; only DATE targets gain a timestamp.

use crate::utils::time::parse_datetime;

use super::error::QueryError;
use super::types::{FilterSlot, ValueType};

/// Validate the target of a slot, returning the Unix timestamp of DATE targets
pub fn check_target(slot: &FilterSlot) -> Result<Option<i64>, QueryError> {
    if !slot.operation.requires_target() {
        return Ok(None);
    }

    let invalid = |reason: String| QueryError::InvalidTarget {
        filter_key: slot.key(),
        target: slot.target.clone(),
        reason,
    };

    let target = slot.target.trim();
    if target.is_empty() {
        return Err(invalid(format!(
            "operation '{}' requires a target",
            slot.operation
        )));
    }

    match slot.value_type {
        ValueType::String => Ok(None),
        ValueType::Number => match target.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(None),
            _ => Err(invalid("expected a number".to_string())),
        },
        ValueType::Date => parse_datetime(target)
            .map(|dt| Some(dt.timestamp()))
            .ok_or_else(|| invalid("expected a date such as 2024-01-31 12:00:00".to_string())),
    }
}
