use serde::{Deserialize, Serialize};

/// Остаток товара на складе
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockListItem {
    pub id: String,
    pub product_name: String,
    pub warehouse_name: String,
    pub quantity: f64,
}
