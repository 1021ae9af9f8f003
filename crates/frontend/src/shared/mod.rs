pub mod api_utils;
pub mod bound_select;
pub mod components;
pub mod filter_storage;
pub mod icons;
pub mod reference_api;
