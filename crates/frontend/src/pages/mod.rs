pub mod filter_fields;
pub mod purchases;
pub mod warehouse;
