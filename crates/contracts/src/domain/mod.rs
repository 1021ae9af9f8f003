pub mod purchase;
pub mod warehouse;
