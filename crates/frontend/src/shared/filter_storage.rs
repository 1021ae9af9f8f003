//! Сохранение выбранных фильтров списка в localStorage.

use contracts::shared::filters::ListFilters;

fn get_local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

pub fn save_filters(storage_key: &str, filters: &ListFilters) {
    let Some(storage) = get_local_storage() else {
        return;
    };
    match filters.to_json() {
        Ok(json) => {
            let _ = storage.set_item(storage_key, &json);
        }
        Err(e) => log::warn!("failed to save filters '{}': {}", storage_key, e),
    }
}

pub fn load_filters(storage_key: &str) -> Option<ListFilters> {
    let json = get_local_storage()?.get_item(storage_key).ok()??;
    match serde_json::from_str(&json) {
        Ok(filters) => Some(filters),
        Err(e) => {
            log::warn!("ignoring saved filters '{}': {}", storage_key, e);
            None
        }
    }
}

pub fn clear_filters(storage_key: &str) {
    if let Some(storage) = get_local_storage() {
        let _ = storage.remove_item(storage_key);
    }
}
