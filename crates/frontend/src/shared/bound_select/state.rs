//! Состояние виджета выбора без привязки к DOM.
//!
//! Хранит три согласованных представления выбора: флаги `selected` нативного
//! `<select>`, упорядоченный набор id и значение скрытого input. DOM-адаптер
//! (`widget.rs`) только отрисовывает то, что вычислено здесь.

use super::option_index::{OptionIndex, SelectOption};
use super::selection::SelectionSet;

/// Зеркало одного нативного `<option>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl NativeOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected: false,
        }
    }

    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}

/// Index of the option a single `<select>` has actually chosen.
///
/// A collapsed select (`size <= 1`) without any `selected` attribute reports
/// its first option on its own, so index 0 there is not a choice. Every other
/// non-negative index comes from markup, page code or restored form state.
pub fn single_select_choice(selected_index: i32, collapsed: bool, has_default: bool) -> Option<usize> {
    let index = usize::try_from(selected_index).ok()?;
    if collapsed && index == 0 && !has_default {
        return None;
    }
    Some(index)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropdownState {
    Closed,
    Open,
}

/// Результат `populate`: были ли созданы нативные `<option>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulateOutcome {
    Kept,
    Synthesized,
}

/// Значение для `set_value`: один id или список.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueInput {
    One(String),
    Many(Vec<String>),
}

impl ValueInput {
    fn into_vec(self) -> Vec<String> {
        match self {
            ValueInput::One(v) => vec![v],
            ValueInput::Many(v) => v,
        }
    }
}

impl From<String> for ValueInput {
    fn from(v: String) -> Self {
        ValueInput::One(v)
    }
}

impl From<&str> for ValueInput {
    fn from(v: &str) -> Self {
        ValueInput::One(v.to_string())
    }
}

impl From<Vec<String>> for ValueInput {
    fn from(v: Vec<String>) -> Self {
        ValueInput::Many(v)
    }
}

impl From<&[String]> for ValueInput {
    fn from(v: &[String]) -> Self {
        ValueInput::Many(v.to_vec())
    }
}

impl From<Vec<&str>> for ValueInput {
    fn from(v: Vec<&str>) -> Self {
        ValueInput::Many(v.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for ValueInput {
    fn from(v: &[&str]) -> Self {
        ValueInput::Many(v.iter().map(|s| s.to_string()).collect())
    }
}

/// Метка выбранного значения в триггере.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct BoundSelectState {
    name: String,
    multiple: bool,
    native: Vec<NativeOption>,
    selection: SelectionSet,
    index: OptionIndex,
    search: String,
    dropdown: DropdownState,
}

impl BoundSelectState {
    /// Reads the initial selection from the native options. A single select
    /// keeps only the last selected option, the same way a browser does.
    pub fn from_native(name: impl Into<String>, multiple: bool, native: Vec<NativeOption>) -> Self {
        let index = OptionIndex::new(
            native
                .iter()
                .map(|o| SelectOption::new(o.value.clone(), o.label.clone())),
        );
        let mut state = Self {
            name: name.into(),
            multiple,
            native,
            selection: SelectionSet::new(),
            index,
            search: String::new(),
            dropdown: DropdownState::Closed,
        };

        let initially_selected: Vec<String> = state
            .native
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value.clone())
            .collect();
        state.set_value(initially_selected);
        state
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn native_options(&self) -> &[NativeOption] {
        &self.native
    }

    pub fn index(&self) -> &OptionIndex {
        &self.index
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn dropdown(&self) -> DropdownState {
        self.dropdown
    }

    pub fn is_open(&self) -> bool {
        self.dropdown == DropdownState::Open
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    fn has_native(&self, id: &str) -> bool {
        self.native.iter().any(|o| o.value == id)
    }

    /// Rewrites every native `selected` flag from the selection set.
    fn sync_native(&mut self) {
        let selection = &self.selection;
        for option in &mut self.native {
            option.selected = selection.contains(&option.value);
        }
    }

    /// Replaces the option index. An empty native select gets its options
    /// synthesized from `options`.
    pub fn populate<I, O>(&mut self, options: I) -> PopulateOutcome
    where
        I: IntoIterator<Item = O>,
        O: Into<SelectOption>,
    {
        self.index = OptionIndex::new(options);

        if !self.native.is_empty() {
            return PopulateOutcome::Kept;
        }
        self.native = self
            .index
            .iter()
            .map(|o| NativeOption::new(o.id(), o.name()))
            .collect();
        self.sync_native();
        PopulateOutcome::Synthesized
    }

    /// Values without a matching native option are dropped.
    pub fn set_value(&mut self, values: impl Into<ValueInput>) {
        self.selection.clear();
        for value in values.into().into_vec() {
            if !self.has_native(&value) {
                continue;
            }
            if self.multiple {
                self.selection.insert(value);
            } else {
                self.selection.replace_with(value);
            }
        }
        self.sync_native();
    }

    pub fn get_value(&self) -> Vec<String> {
        self.selection.to_vec()
    }

    pub fn reset(&mut self) {
        self.selection.clear();
        self.sync_native();
    }

    pub fn toggle_open(&mut self) -> DropdownState {
        self.dropdown = match self.dropdown {
            DropdownState::Closed => DropdownState::Open,
            DropdownState::Open => DropdownState::Closed,
        };
        self.dropdown
    }

    /// Returns `true` when the dropdown was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        self.dropdown = DropdownState::Closed;
        was_open
    }

    /// Multi select toggles membership, single select replaces the selection.
    /// Ids that are not legal native options are ignored.
    pub fn click_option(&mut self, id: &str) -> bool {
        if !self.has_native(id) {
            log::warn!("bound select '{}': no native option for '{}'", self.name, id);
            return false;
        }
        if self.multiple {
            if !self.selection.remove(id) {
                self.selection.insert(id);
            }
        } else {
            self.selection.replace_with(id);
        }
        self.sync_native();
        true
    }

    pub fn remove_tag(&mut self, id: &str) -> bool {
        let removed = self.selection.remove(id);
        if removed {
            self.sync_native();
        }
        removed
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Dropdown rows for the current search text. Selected ids only appear
    /// as tags.
    pub fn visible_rows(&self) -> Vec<&SelectOption> {
        self.index
            .ranked(&self.search)
            .into_iter()
            .filter(|o| !self.selection.contains(o.id()))
            .collect()
    }

    pub fn tags(&self) -> Vec<Tag> {
        self.selection
            .iter()
            .map(|id| {
                let label = self
                    .index
                    .get(id)
                    .map(|o| o.name().to_string())
                    .or_else(|| {
                        self.native
                            .iter()
                            .find(|o| o.value == id)
                            .map(|o| o.label.clone())
                    })
                    .unwrap_or_else(|| id.to_string());
                Tag {
                    id: id.to_string(),
                    label,
                }
            })
            .collect()
    }

    pub fn hidden_value(&self) -> String {
        self.selection.iter().collect::<Vec<_>>().join(",")
    }

    pub fn placeholder_visible(&self) -> bool {
        self.selection.is_empty()
    }
}
