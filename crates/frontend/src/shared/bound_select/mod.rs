//! Поисковый выпадающий список с метками, привязанный к нативному `<select>`.
//!
//! - [`state`]: состояние и переходы без DOM (тестируется на хосте)
//! - [`widget`]: DOM-адаптер и [`BoundSelectHandle`]
//! - [`registry`]: виджеты страницы по id элемента

pub mod config;
pub mod debounce;
pub mod option_index;
pub mod registry;
pub mod selection;
pub mod state;
pub mod widget;

pub use config::BoundSelectConfig;
pub use debounce::{Debouncer, DEFAULT_SEARCH_DEBOUNCE_MS};
pub use option_index::{OptionIndex, SelectOption};
pub use registry::BoundSelectRegistry;
pub use selection::SelectionSet;
pub use state::{BoundSelectState, NativeOption, Tag, ValueInput};
pub use widget::{AttachError, BoundSelectHandle};
