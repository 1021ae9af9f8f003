pub mod filters;
pub mod reference;
