//! Фильтры списков: значения виджетов выбора, собранные в один JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Набор фильтров списка: поле -> выбранные id.
///
/// Пустой выбор означает "без фильтра", такие поля не хранятся.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListFilters(BTreeMap<String, Vec<String>>);

impl ListFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, values: Vec<String>) {
        let field = field.into();
        if values.is_empty() {
            self.0.remove(&field);
        } else {
            self.0.insert(field, values);
        }
    }

    pub fn with(mut self, field: impl Into<String>, values: Vec<String>) -> Self {
        self.set(field, values);
        self
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of fields with a non-empty selection (badge on the filter panel).
    pub fn active_count(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON text for the `filters` query parameter.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Параметры запроса списка (`?filters=...&page=0&page_size=50`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub filters: String,
    pub page: usize,
    pub page_size: usize,
}

impl ListQuery {
    pub fn new(filters: &ListFilters, page: usize, page_size: usize) -> Result<Self, serde_json::Error> {
        Ok(Self {
            filters: filters.to_json()?,
            page,
            page_size,
        })
    }
}
