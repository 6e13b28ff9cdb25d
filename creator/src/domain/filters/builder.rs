//! Query builder
//!
//! Cross-validates filter slots against the filter logic and compiles them
//! into a [`QueryDescriptor`]. The same rules run twice: [`check`] reports
//! every violation without failing, [`compile`] stops at the first one.

use crate::core::constants::SELECTED_TAGS_SEPARATOR;

use super::error::QueryError;
use super::expression::extract_referenced_ids;
use super::operations::{is_allowed, protocol_code};
use super::parser::parse_expression;
use super::registry::FilterRegistry;
use super::target::check_target;
use super::types::{
    FilterConfiguration, FilterDescriptor, FilterSlot, QueryDescriptor, filter_key,
};

/// Build-time strictness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Reject dangling references and malformed filter logic
    pub strict: bool,
}

/// Every active slot must be referenced by the filter logic
///
/// Fails with the first active slot (in id order) that is not referenced.
pub fn validate(filter_logic: &str, active_slots: &[&FilterSlot]) -> Result<(), QueryError> {
    match missing_references(filter_logic, active_slots).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn missing_references(filter_logic: &str, active_slots: &[&FilterSlot]) -> Vec<QueryError> {
    let referenced = extract_referenced_ids(filter_logic);
    active_slots
        .iter()
        .map(|slot| slot.key())
        .filter(|key| !referenced.contains(key))
        .map(|filter_key| QueryError::MissingReference {
            filter_key,
            filter_logic: filter_logic.to_string(),
        })
        .collect()
}

fn dangling_references(filter_logic: &str, active_slots: &[&FilterSlot]) -> Vec<QueryError> {
    let referenced = extract_referenced_ids(filter_logic);
    let active: Vec<String> = active_slots.iter().map(|slot| slot.key()).collect();
    referenced
        .into_iter()
        .filter(|key| !active.contains(key))
        .map(|filter_key| QueryError::DanglingReference {
            filter_key,
            filter_logic: filter_logic.to_string(),
        })
        .collect()
}

/// Blank logic is only meaningful without active slots, which
/// `missing_references` already covers.
fn syntax_error(filter_logic: &str) -> Option<QueryError> {
    if filter_logic.trim().is_empty() {
        return None;
    }
    parse_expression(filter_logic).err()
}

fn check_operation(slot: &FilterSlot) -> Result<(), QueryError> {
    if is_allowed(slot.value_type, slot.operation) {
        Ok(())
    } else {
        Err(QueryError::UnsupportedOperation {
            filter_key: slot.key(),
            value_type: slot.value_type,
            operation: slot.operation,
        })
    }
}

/// Advisory validation run while the query is being edited
///
/// Returns every problem found and logs each as a warning. Never fails.
pub fn check(registry: &FilterRegistry, config: &FilterConfiguration) -> Vec<QueryError> {
    let active = registry.get_active_slots();
    let filter_logic = config.filter_logic.as_str();

    let mut problems = missing_references(filter_logic, &active);
    problems.extend(dangling_references(filter_logic, &active));
    problems.extend(syntax_error(filter_logic));

    for slot in &active {
        if let Err(err) = check_operation(slot) {
            problems.push(err);
        } else if let Err(err) = check_target(slot) {
            problems.push(err);
        }
    }

    for problem in &problems {
        tracing::warn!(
            code = problem.code(),
            filter_key = problem.filter_key().unwrap_or("-"),
            filter_logic,
            "{}",
            problem
        );
    }

    problems
}

/// Compile the current slots and controls into a query descriptor
///
/// Fails on the first violated rule. Compiling an unchanged snapshot twice
/// yields equal descriptors.
pub fn compile(
    registry: &FilterRegistry,
    config: &FilterConfiguration,
    options: BuildOptions,
) -> Result<QueryDescriptor, QueryError> {
    let active = registry.get_active_slots();
    let filter_logic = config.filter_logic.as_str();

    validate(filter_logic, &active)?;

    if options.strict {
        if let Some(err) = dangling_references(filter_logic, &active).into_iter().next() {
            return Err(err);
        }
        if let Some(err) = syntax_error(filter_logic) {
            return Err(err);
        }
    }

    let mut filters = Vec::with_capacity(active.len());
    for slot in &active {
        check_operation(slot)?;
        let timestamp = check_target(slot)?;
        tracing::trace!(
            filter_key = %filter_key(slot.id),
            tag = %slot.tag,
            operation = %slot.operation,
            "Compiled filter"
        );
        filters.push(FilterDescriptor {
            tag: slot.tag.clone(),
            value_type: slot.value_type,
            operation: protocol_code(slot.operation).to_string(),
            target: slot.target.clone(),
            timestamp,
        });
    }

    let descriptor = QueryDescriptor {
        filter_logic: config.filter_logic.clone(),
        selected_tags: split_selected_tags(&config.selected_tags),
        limit: (config.limit != 0).then_some(config.limit),
        offset: config.offset,
        only_count: config.only_count,
        filters,
    };

    tracing::debug!(
        filters = descriptor.filters.len(),
        limit = ?descriptor.limit,
        only_count = descriptor.only_count,
        "Compiled metadata query"
    );

    Ok(descriptor)
}

/// Split the raw selected tags on `", "`; empty input selects nothing
pub fn split_selected_tags(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(SELECTED_TAGS_SEPARATOR)
        .map(|tag| tag.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filters::types::{Operation, ValueType};

    fn set_slot(
        registry: &mut FilterRegistry,
        id: usize,
        tag: &str,
        value_type: ValueType,
        operation: Operation,
        target: &str,
    ) {
        let slot = registry.slot_mut(id).unwrap();
        slot.tag = tag.to_string();
        slot.value_type = value_type;
        slot.operation = operation;
        slot.target = target.to_string();
    }

    fn config(filter_logic: &str) -> FilterConfiguration {
        FilterConfiguration {
            filter_logic: filter_logic.to_string(),
            selected_tags: String::new(),
            limit: 0,
            offset: 0,
            only_count: false,
        }
    }

    fn registry_f0_f2() -> FilterRegistry {
        let mut registry = FilterRegistry::new(21);
        set_slot(&mut registry, 0, "FileName", ValueType::String, Operation::Contains, "report");
        set_slot(&mut registry, 2, "FileSize", ValueType::Number, Operation::Greater, "10");
        registry
    }

    #[test]
    fn validate_accepts_all_referenced() {
        let registry = registry_f0_f2();
        assert_eq!(validate("f0 or f2", &registry.get_active_slots()), Ok(()));
    }

    #[test]
    fn validate_names_missing_slot() {
        let registry = registry_f0_f2();
        let err = validate("f0", &registry.get_active_slots()).unwrap_err();
        assert_eq!(
            err,
            QueryError::MissingReference {
                filter_key: "f2".to_string(),
                filter_logic: "f0".to_string(),
            }
        );
    }

    #[test]
    fn validate_reports_first_missing_in_slot_order() {
        let registry = registry_f0_f2();
        let err = validate("", &registry.get_active_slots()).unwrap_err();
        assert_eq!(err.filter_key(), Some("f0"));
    }

    #[test]
    fn limit_zero_is_unbounded() {
        let registry = registry_f0_f2();
        let descriptor = compile(&registry, &config("f0 or f2"), BuildOptions::default()).unwrap();
        assert_eq!(descriptor.limit, None);

        let mut limited = config("f0 or f2");
        limited.limit = 5;
        let descriptor = compile(&registry, &limited, BuildOptions::default()).unwrap();
        assert_eq!(descriptor.limit, Some(5));
    }

    #[test]
    fn selected_tags_split() {
        assert_eq!(
            split_selected_tags("FileName, FileSize"),
            vec!["FileName".to_string(), "FileSize".to_string()]
        );
        assert!(split_selected_tags("").is_empty());
    }

    #[test]
    fn compile_is_repeatable() {
        let registry = registry_f0_f2();
        let config = config("f0 and not f2");
        let first = compile(&registry, &config, BuildOptions::default()).unwrap();
        let second = compile(&registry, &config, BuildOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn compile_end_to_end() {
        let mut registry = FilterRegistry::new(21);
        set_slot(&mut registry, 0, "FileType", ValueType::String, Operation::Contains, "pdf");
        set_slot(&mut registry, 1, "FileSize", ValueType::Number, Operation::Greater, "1000");
        let config = FilterConfiguration {
            filter_logic: "f0 and f1".to_string(),
            selected_tags: "FileType, FileSize".to_string(),
            limit: 10,
            offset: 0,
            only_count: false,
        };

        let descriptor = compile(&registry, &config, BuildOptions::default()).unwrap();

        assert_eq!(descriptor.filter_logic, "f0 and f1");
        assert_eq!(descriptor.selected_tags, vec!["FileType", "FileSize"]);
        assert_eq!(descriptor.limit, Some(10));
        assert_eq!(descriptor.offset, 0);
        assert!(!descriptor.only_count);
        assert_eq!(
            descriptor.filters,
            vec![
                FilterDescriptor {
                    tag: "FileType".to_string(),
                    value_type: ValueType::String,
                    operation: "CONTAINS".to_string(),
                    target: "pdf".to_string(),
                    timestamp: None,
                },
                FilterDescriptor {
                    tag: "FileSize".to_string(),
                    value_type: ValueType::Number,
                    operation: "GREATER".to_string(),
                    target: "1000".to_string(),
                    timestamp: None,
                },
            ]
        );
    }

    #[test]
    fn compile_fails_on_missing_reference() {
        let registry = registry_f0_f2();
        let err = compile(&registry, &config("f2"), BuildOptions::default()).unwrap_err();
        assert!(matches!(err, QueryError::MissingReference { .. }));
        assert_eq!(err.filter_key(), Some("f0"));
    }

    #[test]
    fn dangling_reference_allowed_unless_strict() {
        let registry = registry_f0_f2();
        let logic = config("f0 or f2 or f5");
        assert!(compile(&registry, &logic, BuildOptions::default()).is_ok());

        let err = compile(&registry, &logic, BuildOptions { strict: true }).unwrap_err();
        assert_eq!(
            err,
            QueryError::DanglingReference {
                filter_key: "f5".to_string(),
                filter_logic: "f0 or f2 or f5".to_string(),
            }
        );
    }

    #[test]
    fn malformed_logic_rejected_when_strict() {
        let registry = registry_f0_f2();
        let logic = config("f0 or (f2");
        assert!(compile(&registry, &logic, BuildOptions::default()).is_ok());
        let err = compile(&registry, &logic, BuildOptions { strict: true }).unwrap_err();
        assert!(matches!(err, QueryError::InvalidSyntax { .. }));
    }

    #[test]
    fn compile_rejects_unsupported_operation() {
        let mut registry = FilterRegistry::new(3);
        set_slot(&mut registry, 0, "FileAccessDate", ValueType::Date, Operation::Contains, "2024");
        let err = compile(&registry, &config("f0"), BuildOptions::default()).unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_OPERATION");
    }

    #[test]
    fn compile_rejects_invalid_target() {
        let mut registry = FilterRegistry::new(3);
        set_slot(&mut registry, 0, "FileSize", ValueType::Number, Operation::Smaller, "big");
        let err = compile(&registry, &config("f0"), BuildOptions::default()).unwrap_err();
        assert_eq!(err.code(), "INVALID_TARGET");
    }

    #[test]
    fn compile_date_filter_carries_timestamp() {
        let mut registry = FilterRegistry::new(3);
        set_slot(
            &mut registry,
            0,
            "FileModifyDate",
            ValueType::Date,
            Operation::Greater,
            "2024-01-01 00:00:00",
        );
        let descriptor = compile(&registry, &config("f0"), BuildOptions::default()).unwrap();
        assert_eq!(descriptor.filters[0].timestamp, Some(1704067200));
        assert_eq!(descriptor.filters[0].target, "2024-01-01 00:00:00");
    }

    #[test]
    fn compile_without_filters() {
        let registry = FilterRegistry::new(3);
        let mut config = config("");
        config.only_count = true;
        let descriptor = compile(&registry, &config, BuildOptions { strict: true }).unwrap();
        assert!(descriptor.filters.is_empty());
        assert!(descriptor.only_count);
    }

    #[test]
    fn check_reports_every_problem() {
        let mut registry = registry_f0_f2();
        set_slot(&mut registry, 3, "FileType", ValueType::String, Operation::Equal, "");
        let problems = check(&registry, &config("f0 or f7"));

        let codes: Vec<&str> = problems.iter().map(|p| p.code()).collect();
        assert_eq!(
            codes,
            vec![
                "MISSING_FILTER_REFERENCE",
                "MISSING_FILTER_REFERENCE",
                "DANGLING_FILTER_REFERENCE",
                "INVALID_TARGET",
            ]
        );
        assert_eq!(problems[0].filter_key(), Some("f2"));
        assert_eq!(problems[1].filter_key(), Some("f3"));
    }

    #[test]
    fn check_is_empty_for_valid_query() {
        let registry = registry_f0_f2();
        assert!(check(&registry, &config("f0 and f2")).is_empty());
    }

    #[test]
    fn check_reports_syntax() {
        let registry = registry_f0_f2();
        let problems = check(&registry, &config("f0 and and f2"));
        assert_eq!(problems.len(), 1);
        assert!(matches!(problems[0], QueryError::InvalidSyntax { .. }));
    }

    #[test]
    fn check_survives_deep_nesting() {
        let registry = registry_f0_f2();
        let nots = format!("{}f0 or f2", "not ".repeat(200_000));
        let parens = format!("{}f0{} or f2", "(".repeat(200_000), ")".repeat(200_000));

        for logic in [nots, parens] {
            let problems = check(&registry, &config(&logic));
            assert_eq!(problems.len(), 1);
            assert!(matches!(problems[0], QueryError::InvalidSyntax { .. }));
        }
    }

    #[test]
    fn deep_nesting_fails_build_only_when_strict() {
        let registry = registry_f0_f2();
        let logic = config(&format!("{}f0 or f2", "not ".repeat(200_000)));

        assert!(compile(&registry, &logic, BuildOptions::default()).is_ok());
        let err = compile(&registry, &logic, BuildOptions { strict: true }).unwrap_err();
        assert_eq!(err.code(), "INVALID_FILTER_LOGIC");
    }
}
