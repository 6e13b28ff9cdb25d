//! Filter registry
//!
//! Holds the pre-allocated filter slots of one query creator and answers
//! which of them are active or visible. Slot fields are edited from outside;
//! consistency with the filter logic is checked later by the builder.

use super::error::QueryError;
use super::types::FilterSlot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRegistry {
    slots: Vec<FilterSlot>,
}

impl FilterRegistry {
    /// Allocate `capacity` inactive slots with ids `0..capacity`
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(FilterSlot::new).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, id: usize) -> Option<&FilterSlot> {
        self.slots.get(id)
    }

    pub fn slot_mut(&mut self, id: usize) -> Result<&mut FilterSlot, QueryError> {
        let max = self.slots.len();
        self.slots
            .get_mut(id)
            .ok_or(QueryError::SlotOutOfRange { index: id, max })
    }

    /// Slots with a non-empty tag, in ascending id order
    pub fn get_active_slots(&self) -> Vec<&FilterSlot> {
        self.slots.iter().filter(|slot| slot.is_active()).collect()
    }
}

/// Whether slot `index` is shown to the user
///
/// The first slot is always shown. Every further slot appears once its
/// predecessor has a tag.
pub fn visible(index: usize, registry: &FilterRegistry) -> bool {
    if index >= registry.capacity() {
        return false;
    }
    match index.checked_sub(1) {
        None => true,
        Some(previous) => registry.slot(previous).is_some_and(FilterSlot::is_active),
    }
}

/// Whether the target field of a slot is shown
pub fn target_visible(slot: &FilterSlot) -> bool {
    slot.operation.requires_target()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filters::types::Operation;

    fn registry_with_tags(tags: &[&str]) -> FilterRegistry {
        let mut registry = FilterRegistry::new(tags.len());
        for (id, tag) in tags.iter().enumerate() {
            registry.slot_mut(id).unwrap().tag = tag.to_string();
        }
        registry
    }

    #[test]
    fn new_registry_is_inactive() {
        let registry = FilterRegistry::new(21);
        assert_eq!(registry.capacity(), 21);
        assert!(registry.get_active_slots().is_empty());
        assert_eq!(registry.slot(20).unwrap().key(), "f20");
        assert!(registry.slot(21).is_none());
    }

    #[test]
    fn active_slots_in_id_order() {
        let registry = registry_with_tags(&["FileType", "", "FileSize", "", "FileName"]);
        let ids: Vec<usize> = registry.get_active_slots().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 2, 4]);
    }

    #[test]
    fn slot_mut_out_of_range() {
        let mut registry = FilterRegistry::new(2);
        let err = registry.slot_mut(2).unwrap_err();
        assert_eq!(err, QueryError::SlotOutOfRange { index: 2, max: 2 });
    }

    #[test]
    fn visibility_follows_previous_slot() {
        let registry = registry_with_tags(&["FileType", "", "FileSize", ""]);
        assert!(visible(0, &registry));
        assert!(visible(1, &registry));
        assert!(!visible(2, &registry));
        assert!(visible(3, &registry));
        assert!(!visible(4, &registry));
    }

    #[test]
    fn target_hidden_for_existence_checks() {
        let mut slot = FilterSlot::new(0);
        slot.operation = Operation::NotExists;
        assert!(!target_visible(&slot));
        slot.operation = Operation::Equal;
        assert!(target_visible(&slot));
    }
}
