//! Operation tables
//!
//! Which operations each value type allows, the protocol code each operation
//! is sent as, and the label/description shown to users. The code table and
//! the description table are kept apart from the data model.

use serde::Serialize;

use super::types::{Operation, ValueType};

const STRING_OPERATIONS: &[Operation] = &[
    Operation::Exists,
    Operation::NotExists,
    Operation::Empty,
    Operation::NotEmpty,
    Operation::Contains,
    Operation::NotContains,
    Operation::Equal,
    Operation::NotEqual,
];

const NUMBER_OPERATIONS: &[Operation] = &[
    Operation::Exists,
    Operation::NotExists,
    Operation::Empty,
    Operation::NotEmpty,
    Operation::Equal,
    Operation::NotEqual,
    Operation::Greater,
    Operation::Smaller,
];

const DATE_OPERATIONS: &[Operation] = &[
    Operation::Empty,
    Operation::NotEmpty,
    Operation::Equal,
    Operation::NotEqual,
    Operation::Greater,
    Operation::Smaller,
];

/// Operations allowed for a value type, in display order
pub fn allowed_operations(value_type: ValueType) -> &'static [Operation] {
    match value_type {
        ValueType::String => STRING_OPERATIONS,
        ValueType::Number => NUMBER_OPERATIONS,
        ValueType::Date => DATE_OPERATIONS,
    }
}

pub fn is_allowed(value_type: ValueType, operation: Operation) -> bool {
    allowed_operations(value_type).contains(&operation)
}

/// Operation preselected when a value type is chosen
pub fn default_operation(value_type: ValueType) -> Operation {
    match value_type {
        ValueType::String => Operation::Contains,
        ValueType::Number | ValueType::Date => Operation::Equal,
    }
}

/// Code understood by the query service
pub fn protocol_code(operation: Operation) -> &'static str {
    match operation {
        Operation::Exists => "EXISTS",
        Operation::NotExists => "NOT_EXISTS",
        Operation::Empty => "EMPTY",
        Operation::NotEmpty => "NOT_EMPTY",
        Operation::Contains => "CONTAINS",
        Operation::NotContains => "NOT_CONTAINS",
        Operation::Equal => "EQUAL",
        Operation::NotEqual => "NOT_EQUAL",
        Operation::Greater => "GREATER",
        Operation::Smaller => "SMALLER",
    }
}

/// Short label shown in option lists
pub fn label(operation: Operation) -> &'static str {
    match operation {
        Operation::Exists => "exists",
        Operation::NotExists => "not exists",
        Operation::Empty => "value is empty",
        Operation::NotEmpty => "value is not empty",
        Operation::Contains => "value contains",
        Operation::NotContains => "value not contains",
        Operation::Equal => "value is equal",
        Operation::NotEqual => "value is not equal",
        Operation::Greater => "value is greater",
        Operation::Smaller => "value is smaller",
    }
}

pub fn description(operation: Operation) -> &'static str {
    match operation {
        Operation::Exists => "check if the metadata tag exists",
        Operation::NotExists => "check if the metadata tag does NOT exist",
        Operation::Empty => "check if the metadata value is empty",
        Operation::NotEmpty => "check if the metadata value is NOT empty",
        Operation::Contains => "check if the metadata value contains target",
        Operation::NotContains => "check if the metadata value does not contain target",
        Operation::Equal => "check if the metadata value is equal to target",
        Operation::NotEqual => "check if the metadata value is not equal to target",
        Operation::Greater => "check if the metadata value is greater than target",
        Operation::Smaller => "check if the metadata value is smaller than target",
    }
}

/// One row of the operation listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationInfo {
    pub value_type: ValueType,
    pub operation: Operation,
    pub code: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub requires_target: bool,
}

/// List the operations of one value type, or of all value types
pub fn describe(value_type: Option<ValueType>) -> Vec<OperationInfo> {
    let types: &[ValueType] = match value_type {
        Some(ref value_type) => std::slice::from_ref(value_type),
        None => &ValueType::ALL,
    };

    types
        .iter()
        .flat_map(|&value_type| {
            allowed_operations(value_type)
                .iter()
                .map(move |&operation| OperationInfo {
                    value_type,
                    operation,
                    code: protocol_code(operation),
                    label: label(operation),
                    description: description(operation),
                    requires_target: operation.requires_target(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_has_no_existence_checks() {
        assert!(!is_allowed(ValueType::Date, Operation::Exists));
        assert!(!is_allowed(ValueType::Date, Operation::NotExists));
        assert!(is_allowed(ValueType::Date, Operation::Greater));
    }

    #[test]
    fn contains_is_string_only() {
        assert!(is_allowed(ValueType::String, Operation::Contains));
        assert!(!is_allowed(ValueType::Number, Operation::Contains));
        assert!(!is_allowed(ValueType::Date, Operation::NotContains));
    }

    #[test]
    fn ordering_needs_number_or_date() {
        assert!(!is_allowed(ValueType::String, Operation::Greater));
        assert!(is_allowed(ValueType::Number, Operation::Smaller));
    }

    #[test]
    fn defaults_are_allowed() {
        for value_type in ValueType::ALL {
            assert!(is_allowed(value_type, default_operation(value_type)));
        }
    }

    #[test]
    fn protocol_codes() {
        assert_eq!(protocol_code(Operation::NotExists), "NOT_EXISTS");
        assert_eq!(protocol_code(Operation::Greater), "GREATER");
    }

    #[test]
    fn describe_counts() {
        assert_eq!(describe(Some(ValueType::String)).len(), 8);
        assert_eq!(describe(Some(ValueType::Date)).len(), 6);
        assert_eq!(describe(None).len(), 22);
    }

    #[test]
    fn describe_row_contents() {
        let rows = describe(Some(ValueType::Number));
        let greater = rows
            .iter()
            .find(|row| row.operation == Operation::Greater)
            .unwrap();
        assert_eq!(greater.code, "GREATER");
        assert_eq!(greater.label, "value is greater");
        assert!(greater.requires_target);
    }
}
