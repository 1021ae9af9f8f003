use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Строка списка закупок
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseListItem {
    pub id: String,
    pub date: NaiveDate,
    pub user_name: String,
    pub product_name: String,
    pub warehouse_name: String,
    pub quantity: f64,
    pub amount: f64,
}
