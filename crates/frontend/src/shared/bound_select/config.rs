use super::debounce::DEFAULT_SEARCH_DEBOUNCE_MS;

/// Настройки одного виджета выбора.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundSelectConfig {
    /// Текст в триггере, когда ничего не выбрано
    pub placeholder: String,
    pub search_placeholder: String,
    /// Текст пустого выпадающего списка
    pub empty_text: String,
    pub debounce_ms: u32,
}

impl Default for BoundSelectConfig {
    fn default() -> Self {
        Self {
            placeholder: "Выберите...".to_string(),
            search_placeholder: "Поиск...".to_string(),
            empty_text: "Нет вариантов".to_string(),
            debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
        }
    }
}

impl BoundSelectConfig {
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_search_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.search_placeholder = placeholder.into();
        self
    }

    pub fn with_empty_text(mut self, text: impl Into<String>) -> Self {
        self.empty_text = text.into();
        self
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u32) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }
}
