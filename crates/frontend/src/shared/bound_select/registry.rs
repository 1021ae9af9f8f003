//! Реестр виджетов выбора одной страницы (по id нативного `<select>`).

use super::config::BoundSelectConfig;
use super::widget::BoundSelectHandle;
use contracts::shared::filters::ListFilters;
use std::collections::HashMap;

#[derive(Clone, Default)]
pub struct BoundSelectRegistry {
    selects: HashMap<String, BoundSelectHandle>,
}

impl BoundSelectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a widget and stores it. An id that is already registered
    /// returns the existing handle.
    pub fn attach(&mut self, select_id: &str, config: BoundSelectConfig) -> Option<BoundSelectHandle> {
        if let Some(existing) = self.get(select_id) {
            return Some(existing);
        }
        let handle = BoundSelectHandle::attach(select_id, config)?;
        self.selects.insert(select_id.to_string(), handle.clone());
        Some(handle)
    }

    pub fn get(&self, select_id: &str) -> Option<BoundSelectHandle> {
        self.selects
            .get(select_id)
            .filter(|h| !h.is_destroyed())
            .cloned()
    }

    pub fn contains(&self, select_id: &str) -> bool {
        self.get(select_id).is_some()
    }

    /// Live widgets only; handles destroyed from outside are not counted.
    pub fn len(&self) -> usize {
        self.selects.values().filter(|h| !h.is_destroyed()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selected ids, empty when the widget is missing.
    pub fn values(&self, select_id: &str) -> Vec<String> {
        self.get(select_id).map(|h| h.get_value()).unwrap_or_default()
    }

    pub fn reset_all(&self) {
        for handle in self.selects.values() {
            handle.reset();
        }
    }

    /// Builds the filter payload from `(field, select_id)` pairs.
    pub fn collect_filters(&self, fields: &[(&str, &str)]) -> ListFilters {
        let mut filters = ListFilters::new();
        for (field, select_id) in fields {
            filters.set(*field, self.values(select_id));
        }
        filters
    }

    /// Restores saved selections; fields without a widget are skipped.
    pub fn apply_filters(&self, filters: &ListFilters, fields: &[(&str, &str)]) {
        for (field, select_id) in fields {
            if let Some(handle) = self.get(select_id) {
                handle.set_value(filters.get(field));
            }
        }
    }

    pub fn remove(&mut self, select_id: &str) -> Option<BoundSelectHandle> {
        let handle = self.selects.remove(select_id)?;
        handle.destroy();
        Some(handle)
    }

    pub fn destroy_all(&mut self) {
        for (_, handle) in self.selects.drain() {
            handle.destroy();
        }
    }
}
