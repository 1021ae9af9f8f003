//! HTTP-запросы страниц: справочники для виджетов выбора и списки с фильтрами.

use contracts::shared::filters::ListQuery;
use contracts::shared::reference::ReferenceItem;
use gloo_net::http::Request;
use serde::de::DeserializeOwned;

use crate::shared::api_utils::api_url;

pub const USERS_PATH: &str = "/api/v1/user";
pub const PRODUCTS_PATH: &str = "/api/v1/product";
pub const WAREHOUSES_PATH: &str = "/api/v1/warehouse";

/// Fetch a reference list (`[{id, name}, ...]`)
pub async fn fetch_reference(path: &str) -> Result<Vec<ReferenceItem>, String> {
    let response = Request::get(&api_url(path))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("Failed to fetch {}: {}", path, response.status()));
    }

    response
        .json::<Vec<ReferenceItem>>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Fetch a filtered list page
pub async fn fetch_list<T: DeserializeOwned>(path: &str, query: &ListQuery) -> Result<Vec<T>, String> {
    let query_string =
        serde_qs::to_string(query).map_err(|e| format!("Failed to encode query: {}", e))?;

    let response = Request::get(&format!("{}?{}", api_url(path), query_string))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("Failed to fetch {}: {}", path, response.status()));
    }

    response
        .json::<Vec<T>>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

/// Delete one item
pub async fn delete_item(path: &str, id: &str) -> Result<(), String> {
    let response = Request::delete(&format!("{}/{}", api_url(path), id))
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("Failed to delete: {}", response.status()));
    }

    Ok(())
}
