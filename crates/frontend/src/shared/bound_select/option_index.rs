//! Кэш вариантов выбора с предвычисленным lowercase-именем для поиска.

use contracts::shared::reference::ReferenceItem;
use std::cmp::Ordering;

/// Вариант выбора.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    id: String,
    name: String,
    name_lower: String,
}

impl SelectOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            name_lower: name.to_lowercase(),
            name,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_lower(&self) -> &str {
        &self.name_lower
    }
}

impl From<ReferenceItem> for SelectOption {
    fn from(item: ReferenceItem) -> Self {
        Self::new(item.id, item.name)
    }
}

impl From<&ReferenceItem> for SelectOption {
    fn from(item: &ReferenceItem) -> Self {
        Self::new(item.id.clone(), item.name.clone())
    }
}

/// Полный (нефильтрованный) список вариантов одного виджета.
///
/// Строится один раз на каждый `populate` и дальше только читается:
/// поиск по каждому нажатию клавиши не пересчитывает `to_lowercase`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionIndex {
    options: Vec<SelectOption>,
}

impl OptionIndex {
    pub fn new<I, O>(options: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<SelectOption>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectOption> {
        self.options.iter()
    }

    pub fn get(&self, id: &str) -> Option<&SelectOption> {
        self.options.iter().find(|o| o.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Substring match on the lowercased name; prefix matches first, then
    /// alphabetical inside each group. An empty query returns everything in
    /// alphabetical order.
    pub fn ranked(&self, query: &str) -> Vec<&SelectOption> {
        let q = query.to_lowercase();
        let mut matches: Vec<&SelectOption> = self
            .options
            .iter()
            .filter(|o| o.name_lower.contains(q.as_str()))
            .collect();

        matches.sort_by(|a, b| {
            let a_starts = a.name_lower.starts_with(q.as_str());
            let b_starts = b.name_lower.starts_with(q.as_str());
            match (a_starts, b_starts) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => compare_names(&a.name_lower, &b.name_lower),
            }
        });
        matches
    }
}

#[cfg(target_arch = "wasm32")]
fn compare_names(a: &str, b: &str) -> Ordering {
    let result = js_sys::JsString::from(a).locale_compare(b, &js_sys::Array::new(), &js_sys::Object::new());
    result.cmp(&0)
}

#[cfg(not(target_arch = "wasm32"))]
fn compare_names(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}
