//! DOM-адаптер виджета выбора поверх нативного `<select>`.
//!
//! # Использование
//!
//! ```no_run
//! use contracts::shared::reference::ReferenceItem;
//! use frontend::shared::bound_select::{BoundSelectConfig, BoundSelectHandle};
//!
//! let items = vec![ReferenceItem::new("1", "Иванов"), ReferenceItem::new("2", "Петров")];
//!
//! // после монтирования разметки с <select id="filter-users" name="user_ids" multiple>
//! if let Some(users) = BoundSelectHandle::attach("filter-users", BoundSelectConfig::default()) {
//!     users.populate(&items);
//!     let ids: Vec<String> = users.get_value();
//!     log::debug!("selected users: {:?}", ids);
//! }
//! ```
//!
//! Нативный `<select>` скрывается, рядом строится контейнер:
//! триггер (метки + placeholder), выпадающий список (поиск + варианты)
//! и скрытый input с именем исходного `<select>`.
//!
//! Флаги нативных `<option>` и скрытый input обновляются сразу после каждого
//! изменения, метки в триггере перерисовываются в ближайшем animation frame.
//! Обработчики событий живут, пока жив хотя бы один handle (или до `destroy`).

use super::config::BoundSelectConfig;
use super::debounce::Debouncer;
use super::option_index::SelectOption;
use super::state::{single_select_choice, BoundSelectState, NativeOption, PopulateOutcome, ValueInput};
use contracts::shared::reference::ReferenceItem;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use thiserror::Error;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, HtmlOptionElement,
    HtmlSelectElement, Node,
};

const ATTACHED_ATTR: &str = "data-bound-select";
const OPEN_CLASS: &str = "bound-select--open";

#[derive(Debug, Error)]
pub enum AttachError {
    #[error("document is not available")]
    NoDocument,
    #[error("element #{0} not found")]
    NotFound(String),
    #[error("element #{0} is not a <select>")]
    NotSelect(String),
    #[error("element #{0} is already bound")]
    AlreadyAttached(String),
    #[error("DOM error: {0}")]
    Dom(String),
}

fn dom_err(e: JsValue) -> AttachError {
    AttachError::Dom(format!("{:?}", e))
}

fn create<T: JsCast>(document: &Document, tag: &str, class: &str) -> Result<T, AttachError> {
    let element = document.create_element(tag).map_err(dom_err)?;
    element.set_class_name(class);
    element
        .dyn_into::<T>()
        .map_err(|_| AttachError::Dom(format!("<{}> has unexpected type", tag)))
}

/// Multiple selects report their `selected` flags as is. For a single select
/// the chosen option comes from `selectedIndex`, see [`single_select_choice`].
fn read_native_options(native: &HtmlSelectElement) -> Vec<NativeOption> {
    let elements: Vec<HtmlOptionElement> = (0..native.length())
        .filter_map(|i| native.item(i))
        .filter_map(|e| e.dyn_into::<HtmlOptionElement>().ok())
        .collect();

    let chosen = if native.multiple() {
        None
    } else {
        let has_default = elements.iter().any(|o| o.default_selected());
        single_select_choice(native.selected_index(), native.size() <= 1, has_default)
    };

    elements
        .iter()
        .enumerate()
        .map(|(i, option)| NativeOption {
            value: option.value(),
            label: option.text(),
            selected: if native.multiple() {
                option.selected()
            } else {
                chosen == Some(i)
            },
        })
        .collect()
}

/// Event listener that unregisters itself on drop.
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn add(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, AttachError> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(dom_err)?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

struct Elements {
    document: Document,
    native: HtmlSelectElement,
    container: HtmlElement,
    trigger: HtmlElement,
    tags: HtmlElement,
    placeholder: HtmlElement,
    dropdown: HtmlElement,
    search: HtmlInputElement,
    list: HtmlElement,
    hidden: HtmlInputElement,
}

impl Elements {
    fn build(
        document: Document,
        native: HtmlSelectElement,
        select_id: &str,
        name: &str,
        config: &BoundSelectConfig,
    ) -> Result<Self, AttachError> {
        let parent = native
            .parent_node()
            .ok_or_else(|| AttachError::Dom(format!("#{} has no parent", select_id)))?;

        let container: HtmlElement = create(&document, "div", "bound-select")?;
        container.set_id(&format!("{}__bound", select_id));
        if native.multiple() {
            let _ = container.class_list().add_1("bound-select--multiple");
        }

        let trigger: HtmlElement = create(&document, "div", "bound-select__trigger")?;
        let tags: HtmlElement = create(&document, "div", "bound-select__tags")?;
        let placeholder: HtmlElement = create(&document, "span", "bound-select__placeholder")?;
        placeholder.set_text_content(Some(&config.placeholder));

        let dropdown: HtmlElement = create(&document, "div", "bound-select__dropdown")?;
        dropdown.style().set_property("display", "none").map_err(dom_err)?;
        let search: HtmlInputElement = create(&document, "input", "bound-select__search")?;
        search.set_type("text");
        search.set_placeholder(&config.search_placeholder);
        search.set_autocomplete("off");
        let list: HtmlElement = create(&document, "div", "bound-select__options")?;

        let hidden: HtmlInputElement = create(&document, "input", "bound-select__value")?;
        hidden.set_type("hidden");
        hidden.set_name(name);
        hidden.set_id(&format!("{}__value", select_id));

        trigger.append_child(&tags).map_err(dom_err)?;
        trigger.append_child(&placeholder).map_err(dom_err)?;
        dropdown.append_child(&search).map_err(dom_err)?;
        dropdown.append_child(&list).map_err(dom_err)?;
        container.append_child(&trigger).map_err(dom_err)?;
        container.append_child(&dropdown).map_err(dom_err)?;
        container.append_child(&hidden).map_err(dom_err)?;

        parent
            .insert_before(&container, native.next_sibling().as_ref())
            .map_err(dom_err)?;

        Ok(Self {
            document,
            native,
            container,
            trigger,
            tags,
            placeholder,
            dropdown,
            search,
            list,
            hidden,
        })
    }
}

struct Inner {
    select_id: String,
    original_name: String,
    config: BoundSelectConfig,
    state: RefCell<BoundSelectState>,
    elements: Elements,
    debouncer: Debouncer<String>,
    listeners: RefCell<Vec<Listener>>,
    tags_frame_pending: Cell<bool>,
    destroyed: Cell<bool>,
}

/// Handle одного виджета. Клонирование дешёвое (общий `Rc`).
#[derive(Clone)]
pub struct BoundSelectHandle {
    inner: Rc<Inner>,
}

impl BoundSelectHandle {
    /// Binds the widget to `<select id=select_id>`. A missing or wrong element
    /// is logged and yields `None`.
    pub fn attach(select_id: &str, config: BoundSelectConfig) -> Option<Self> {
        match Self::try_attach(select_id, config) {
            Ok(handle) => {
                log::debug!(
                    "bound select '{}' attached ({} options)",
                    select_id,
                    handle.inner.state.borrow().native_options().len()
                );
                Some(handle)
            }
            Err(e) => {
                log::error!("bound select '{}': {}", select_id, e);
                None
            }
        }
    }

    pub fn try_attach(select_id: &str, config: BoundSelectConfig) -> Result<Self, AttachError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(AttachError::NoDocument)?;
        let element = document
            .get_element_by_id(select_id)
            .ok_or_else(|| AttachError::NotFound(select_id.to_string()))?;
        let native = element
            .dyn_into::<HtmlSelectElement>()
            .map_err(|_| AttachError::NotSelect(select_id.to_string()))?;
        if native.has_attribute(ATTACHED_ATTR) {
            return Err(AttachError::AlreadyAttached(select_id.to_string()));
        }

        let name = native.name();
        let state = BoundSelectState::from_native(name.clone(), native.multiple(), read_native_options(&native));
        let elements = Elements::build(document, native, select_id, &name, &config)?;

        let inner = Rc::new_cyclic(|weak: &Weak<Inner>| {
            let weak = weak.clone();
            Inner {
                select_id: select_id.to_string(),
                original_name: name,
                debouncer: Debouncer::new(config.debounce_ms, move |text: String| {
                    if let Some(inner) = weak.upgrade() {
                        inner.apply_search(text);
                    }
                }),
                config,
                state: RefCell::new(state),
                elements,
                listeners: RefCell::new(Vec::new()),
                tags_frame_pending: Cell::new(false),
                destroyed: Cell::new(false),
            }
        });

        if let Err(e) = inner.bind_events() {
            inner.teardown();
            return Err(e);
        }

        let els = &inner.elements;
        // нативный select остаётся источником допустимых значений, но не отправляется с формой
        let _ = els.native.style().set_property("display", "none");
        let _ = els.native.set_attribute(ATTACHED_ATTR, "1");
        els.native.set_name("");

        inner.render();
        Ok(Self { inner })
    }

    pub fn select_id(&self) -> &str {
        &self.inner.select_id
    }

    pub fn populate(&self, items: &[ReferenceItem]) {
        self.populate_options(items.iter().map(SelectOption::from));
    }

    pub fn populate_options<I, O>(&self, options: I)
    where
        I: IntoIterator<Item = O>,
        O: Into<SelectOption>,
    {
        if self.inner.destroyed.get() {
            return;
        }
        let outcome = self.inner.state.borrow_mut().populate(options);
        if outcome == PopulateOutcome::Synthesized {
            self.inner.synthesize_native_options();
        }
        log::debug!(
            "bound select '{}' populated with {} options",
            self.inner.select_id,
            self.inner.state.borrow().index().len()
        );
        self.inner.render();
    }

    pub fn set_value(&self, values: impl Into<ValueInput>) {
        if self.inner.destroyed.get() {
            return;
        }
        self.inner.state.borrow_mut().set_value(values);
        self.inner.render();
    }

    pub fn get_value(&self) -> Vec<String> {
        self.inner.state.borrow().get_value()
    }

    pub fn reset(&self) {
        if self.inner.destroyed.get() {
            return;
        }
        self.inner.state.borrow_mut().reset();
        self.inner.render();
    }

    pub fn is_open(&self) -> bool {
        self.inner.state.borrow().is_open()
    }

    pub fn close(&self) {
        self.inner.close();
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    /// Removes every listener (including the document-level one), the
    /// companion DOM, and gives the native select back its name and
    /// visibility.
    pub fn destroy(&self) {
        if self.inner.destroyed.replace(true) {
            return;
        }
        self.inner.teardown();
        log::debug!("bound select '{}' destroyed", self.inner.select_id);
    }
}

impl Inner {
    fn bind_events(self: &Rc<Self>) -> Result<(), AttachError> {
        let els = &self.elements;
        let mut listeners = Vec::with_capacity(6);

        let weak = Rc::downgrade(self);
        listeners.push(Listener::add(&els.trigger, "click", move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.toggle();
            }
        })?);

        let weak = Rc::downgrade(self);
        listeners.push(Listener::add(&els.document, "click", move |ev: Event| {
            let Some(inner) = weak.upgrade() else { return };
            let target = ev.target().and_then(|t| t.dyn_into::<Node>().ok());
            if !inner.elements.container.contains(target.as_ref()) {
                inner.close();
            }
        })?);

        listeners.push(Listener::add(&els.dropdown, "click", |ev: Event| {
            ev.stop_propagation();
        })?);

        let weak = Rc::downgrade(self);
        listeners.push(Listener::add(&els.list, "click", move |ev: Event| {
            let Some(inner) = weak.upgrade() else { return };
            if let Some(id) = delegated_value(&ev, ".bound-select__option") {
                inner.click_option(&id);
            }
        })?);

        let weak = Rc::downgrade(self);
        listeners.push(Listener::add(&els.tags, "click", move |ev: Event| {
            let Some(inner) = weak.upgrade() else { return };
            if let Some(id) = delegated_value(&ev, ".bound-select__tag-remove") {
                ev.stop_propagation();
                inner.remove_tag(&id);
            }
        })?);

        let weak = Rc::downgrade(self);
        listeners.push(Listener::add(&els.search, "input", move |_| {
            let Some(inner) = weak.upgrade() else { return };
            let text = inner.elements.search.value();
            inner.debouncer.call(text);
        })?);

        self.listeners.borrow_mut().extend(listeners);
        Ok(())
    }

    fn teardown(&self) {
        self.listeners.borrow_mut().clear();
        self.debouncer.cancel();
        let els = &self.elements;
        els.container.remove();
        let _ = els.native.style().remove_property("display");
        let _ = els.native.remove_attribute(ATTACHED_ATTR);
        els.native.set_name(&self.original_name);
    }

    fn toggle(&self) {
        if self.destroyed.get() {
            return;
        }
        let open = {
            let mut state = self.state.borrow_mut();
            state.toggle_open();
            state.is_open()
        };
        self.apply_open_state(open);
        if open {
            let _ = self.elements.search.focus();
        }
    }

    fn close(&self) {
        if self.destroyed.get() {
            return;
        }
        let was_open = self.state.borrow_mut().close();
        if was_open {
            self.apply_open_state(false);
        }
    }

    fn click_option(self: &Rc<Self>, id: &str) {
        if self.destroyed.get() {
            return;
        }
        let changed = self.state.borrow_mut().click_option(id);
        if changed {
            self.render();
        }
    }

    fn remove_tag(self: &Rc<Self>, id: &str) {
        if self.destroyed.get() {
            return;
        }
        let changed = self.state.borrow_mut().remove_tag(id);
        if changed {
            self.render();
        }
    }

    fn apply_search(&self, text: String) {
        if self.destroyed.get() {
            return;
        }
        self.state.borrow_mut().set_search(text);
        self.render_options();
    }

    fn apply_open_state(&self, open: bool) {
        let els = &self.elements;
        let _ = els.container.class_list().toggle_with_force(OPEN_CLASS, open);
        let _ = els
            .dropdown
            .style()
            .set_property("display", if open { "block" } else { "none" });
    }

    /// Appends `<option>` elements for an initially empty native select.
    fn synthesize_native_options(&self) {
        let state = self.state.borrow();
        for option in state.native_options() {
            let Ok(element) = HtmlOptionElement::new_with_text_and_value(&option.label, &option.value) else {
                continue;
            };
            let _ = self.elements.native.append_child(&element);
        }
    }

    /// Synchronous part: native flags, hidden input, dropdown rows.
    /// Tags follow in the next animation frame.
    fn render(self: &Rc<Self>) {
        if self.destroyed.get() {
            return;
        }
        self.sync_native();
        self.elements
            .hidden
            .set_value(&self.state.borrow().hidden_value());
        self.render_options();
        self.schedule_tags();
    }

    fn sync_native(&self) {
        let state = self.state.borrow();
        let native = &self.elements.native;
        if !state.is_multiple() {
            // selectedIndex = -1 не вызывает сброс на первый option
            match state.get_value().first() {
                Some(id) => native.set_value(id),
                None => native.set_selected_index(-1),
            }
            return;
        }
        for i in 0..native.length() {
            let Some(option) = native
                .item(i)
                .and_then(|e| e.dyn_into::<HtmlOptionElement>().ok())
            else {
                continue;
            };
            option.set_selected(state.is_selected(&option.value()));
        }
    }

    fn render_options(&self) {
        let state = self.state.borrow();
        let els = &self.elements;
        els.list.set_inner_html("");

        let rows = state.visible_rows();
        if rows.is_empty() {
            if let Ok(empty) = create::<HtmlElement>(&els.document, "div", "bound-select__empty") {
                empty.set_text_content(Some(&self.config.empty_text));
                let _ = els.list.append_child(&empty);
            }
            return;
        }

        for option in rows {
            let Ok(row) = create::<HtmlElement>(&els.document, "div", "bound-select__option") else {
                continue;
            };
            let _ = row.set_attribute("data-value", option.id());
            row.set_text_content(Some(option.name()));
            let _ = els.list.append_child(&row);
        }
    }

    fn schedule_tags(self: &Rc<Self>) {
        if self.tags_frame_pending.replace(true) {
            return;
        }
        let weak = Rc::downgrade(self);
        let callback = Closure::once_into_js(move || {
            if let Some(inner) = weak.upgrade() {
                inner.tags_frame_pending.set(false);
                inner.render_tags();
            }
        });
        let scheduled = web_sys::window()
            .map(|w| w.request_animation_frame(callback.unchecked_ref()).is_ok())
            .unwrap_or(false);
        if !scheduled {
            self.tags_frame_pending.set(false);
            self.render_tags();
        }
    }

    fn render_tags(&self) {
        if self.destroyed.get() {
            return;
        }
        let state = self.state.borrow();
        let els = &self.elements;
        els.tags.set_inner_html("");

        for tag in state.tags() {
            let Ok(chip) = create::<HtmlElement>(&els.document, "span", "bound-select__tag") else {
                continue;
            };
            let _ = chip.set_attribute("data-value", &tag.id);
            if let Ok(label) = create::<HtmlElement>(&els.document, "span", "bound-select__tag-label") {
                label.set_text_content(Some(&tag.label));
                let _ = chip.append_child(&label);
            }
            if let Ok(remove) = create::<HtmlElement>(&els.document, "button", "bound-select__tag-remove") {
                let _ = remove.set_attribute("type", "button");
                let _ = remove.set_attribute("data-value", &tag.id);
                let _ = remove.set_attribute("title", "Убрать");
                remove.set_text_content(Some("×"));
                let _ = chip.append_child(&remove);
            }
            let _ = els.tags.append_child(&chip);
        }

        let display = if state.placeholder_visible() { "" } else { "none" };
        let _ = els.placeholder.style().set_property("display", display);
    }
}

/// `data-value` of the closest ancestor of the event target matching `selector`.
fn delegated_value(ev: &Event, selector: &str) -> Option<String> {
    let target = ev.target()?.dyn_into::<Element>().ok()?;
    let matched = target.closest(selector).ok()??;
    matched.get_attribute("data-value")
}
