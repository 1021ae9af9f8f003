//! Поля фильтров страниц: разметка нативного `<select>` и загрузка справочников.

use contracts::shared::reference::ReferenceItem;
use leptos::prelude::*;

use crate::shared::bound_select::{BoundSelectConfig, BoundSelectRegistry};
use crate::shared::reference_api;

/// Одно поле фильтра: нативный select и справочник, которым он заполняется.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    /// Ключ в `ListFilters`
    pub field: &'static str,
    pub select_id: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    /// API path of the reference list
    pub source: &'static str,
    pub multiple: bool,
}

pub fn field_pairs(fields: &[FilterField]) -> Vec<(&'static str, &'static str)> {
    fields.iter().map(|f| (f.field, f.select_id)).collect()
}

/// Attaches a widget to every field's select. Returns how many attached.
pub fn attach_fields(registry: &mut BoundSelectRegistry, fields: &[FilterField]) -> usize {
    fields
        .iter()
        .filter(|f| {
            let config = BoundSelectConfig::default().with_placeholder(f.placeholder);
            registry.attach(f.select_id, config).is_some()
        })
        .count()
}

/// Fetches every field's reference list and hands it to `populate`.
/// Stops at the first failed request.
pub async fn load_references(
    fields: &[FilterField],
    populate: impl Fn(&'static str, Vec<ReferenceItem>),
) -> Result<(), String> {
    for field in fields {
        let items = reference_api::fetch_reference(field.source).await?;
        populate(field.select_id, items);
    }
    Ok(())
}

#[component]
pub fn FilterSelectField(field: FilterField) -> impl IntoView {
    view! {
        <div class="form__group">
            <label class="form__label" for=field.select_id>
                {field.label}
            </label>
            <select id=field.select_id name=field.field multiple=field.multiple></select>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_pairs() {
        let fields = [
            FilterField {
                field: "user_ids",
                select_id: "f-users",
                label: "Пользователи",
                placeholder: "Все",
                source: "/api/v1/user",
                multiple: true,
            },
            FilterField {
                field: "warehouse_id",
                select_id: "f-warehouse",
                label: "Склад",
                placeholder: "Все",
                source: "/api/v1/warehouse",
                multiple: false,
            },
        ];
        assert_eq!(
            field_pairs(&fields),
            vec![("user_ids", "f-users"), ("warehouse_id", "f-warehouse")]
        );
    }
}
