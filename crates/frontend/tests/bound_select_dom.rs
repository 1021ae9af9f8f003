//! Browser tests for the bound select DOM adapter.
//!
//! Run with `wasm-pack test --headless --chrome crates/frontend`.

#![cfg(target_arch = "wasm32")]

use contracts::shared::filters::ListFilters;
use contracts::shared::reference::ReferenceItem;
use frontend::shared::bound_select::{BoundSelectConfig, BoundSelectHandle, BoundSelectRegistry};
use frontend::shared::filter_storage;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, Event, HtmlElement, HtmlInputElement, HtmlOptionElement, HtmlSelectElement};

wasm_bindgen_test_configure!(run_in_browser);

/// Long enough for one animation frame.
const FRAME_MS: u32 = 100;

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn by_id<T: JsCast>(id: &str) -> T {
    document()
        .get_element_by_id(id)
        .unwrap_or_else(|| panic!("#{} not found", id))
        .dyn_into::<T>()
        .unwrap()
}

fn mount_select(id: &str, name: &str, multiple: bool, options: &[(&str, &str, bool)]) -> HtmlSelectElement {
    let doc = document();
    let select: HtmlSelectElement = doc.create_element("select").unwrap().dyn_into().unwrap();
    select.set_id(id);
    select.set_name(name);
    select.set_multiple(multiple);
    for (value, label, selected) in options {
        let option = HtmlOptionElement::new_with_text_and_value(label, value).unwrap();
        if *selected {
            option.set_default_selected(true);
            option.set_selected(true);
        }
        select.append_child(&option).unwrap();
    }
    doc.body().unwrap().append_child(&select).unwrap();
    select
}

fn fruits() -> Vec<ReferenceItem> {
    vec![
        ReferenceItem::new("1", "Banana"),
        ReferenceItem::new("2", "Band"),
        ReferenceItem::new("3", "Apple"),
    ]
}

fn texts(selector: &str) -> Vec<String> {
    let nodes = document().query_selector_all(selector).unwrap();
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .map(|n| n.text_content().unwrap_or_default())
        .collect()
}

fn rows(id: &str) -> Vec<String> {
    texts(&format!("#{}__bound .bound-select__option", id))
}

fn tag_labels(id: &str) -> Vec<String> {
    texts(&format!("#{}__bound .bound-select__tag-label", id))
}

fn hidden_value(id: &str) -> String {
    by_id::<HtmlInputElement>(&format!("{}__value", id)).value()
}

fn click_selector(selector: &str) {
    document()
        .query_selector(selector)
        .unwrap()
        .unwrap_or_else(|| panic!("{} not found", selector))
        .dyn_into::<HtmlElement>()
        .unwrap()
        .click();
}

fn click_trigger(id: &str) {
    click_selector(&format!("#{}__bound .bound-select__trigger", id));
}

fn click_row(id: &str, value: &str) {
    click_selector(&format!("#{}__bound .bound-select__option[data-value=\"{}\"]", id, value));
}

fn native_selected(select: &HtmlSelectElement) -> Vec<String> {
    (0..select.length())
        .filter_map(|i| select.item(i))
        .filter_map(|e| e.dyn_into::<HtmlOptionElement>().ok())
        .filter(|o| o.selected())
        .map(|o| o.value())
        .collect()
}

#[wasm_bindgen_test]
fn attach_missing_element_returns_none() {
    assert!(BoundSelectHandle::attach("no-such-select", BoundSelectConfig::default()).is_none());
}

#[wasm_bindgen_test]
fn attach_non_select_returns_none() {
    let div = document().create_element("div").unwrap();
    div.set_id("not-a-select");
    document().body().unwrap().append_child(&div).unwrap();
    assert!(BoundSelectHandle::attach("not-a-select", BoundSelectConfig::default()).is_none());
}

#[wasm_bindgen_test]
fn attach_hides_native_and_moves_name_to_hidden_input() {
    let native = mount_select("t-attach", "user_ids", true, &[("1", "Иванов", true), ("2", "Петров", false)]);
    let handle = BoundSelectHandle::attach("t-attach", BoundSelectConfig::default()).unwrap();

    assert_eq!(native.style().get_property_value("display").unwrap(), "none");
    assert_eq!(native.name(), "");
    assert_eq!(by_id::<HtmlInputElement>("t-attach__value").name(), "user_ids");
    assert_eq!(handle.get_value(), vec!["1"]);
    assert_eq!(hidden_value("t-attach"), "1");
    assert!(BoundSelectHandle::attach("t-attach", BoundSelectConfig::default()).is_none());
}

#[wasm_bindgen_test]
fn populate_synthesizes_options_for_empty_select() {
    let native = mount_select("t-populate", "product_ids", true, &[]);
    let handle = BoundSelectHandle::attach("t-populate", BoundSelectConfig::default()).unwrap();

    handle.populate(&fruits());
    assert_eq!(native.length(), 3);
    assert_eq!(rows("t-populate"), vec!["Apple", "Banana", "Band"]);

    handle.populate(&fruits());
    assert_eq!(native.length(), 3);
    assert_eq!(rows("t-populate"), vec!["Apple", "Banana", "Band"]);
}

#[wasm_bindgen_test]
async fn set_value_writes_hidden_input_now_and_tags_next_frame() {
    let native = mount_select("t-set", "product_ids", true, &[]);
    let handle = BoundSelectHandle::attach("t-set", BoundSelectConfig::default()).unwrap();
    handle.populate(&fruits());
    TimeoutFuture::new(FRAME_MS).await;

    handle.set_value(vec!["3", "404", "1"]);
    assert_eq!(handle.get_value(), vec!["3", "1"]);
    assert_eq!(hidden_value("t-set"), "3,1");
    assert_eq!(native_selected(&native), vec!["1", "3"]);
    assert_eq!(rows("t-set"), vec!["Band"]);
    assert!(tag_labels("t-set").is_empty());

    TimeoutFuture::new(FRAME_MS).await;
    assert_eq!(tag_labels("t-set"), vec!["Apple", "Banana"]);
}

#[wasm_bindgen_test]
async fn option_click_then_tag_remove_restores_state() {
    let native = mount_select("t-click", "product_ids", true, &[]);
    let handle = BoundSelectHandle::attach("t-click", BoundSelectConfig::default()).unwrap();
    handle.populate(&fruits());

    click_trigger("t-click");
    assert!(handle.is_open());

    click_row("t-click", "2");
    assert_eq!(handle.get_value(), vec!["2"]);
    assert_eq!(native_selected(&native), vec!["2"]);
    assert!(!rows("t-click").contains(&"Band".to_string()));
    assert!(handle.is_open());

    TimeoutFuture::new(FRAME_MS).await;
    click_selector("#t-click__bound .bound-select__tag-remove[data-value=\"2\"]");

    assert!(handle.get_value().is_empty());
    assert!(native_selected(&native).is_empty());
    assert_eq!(rows("t-click"), vec!["Apple", "Banana", "Band"]);
    // remove button must not toggle the dropdown
    assert!(handle.is_open());
}

#[wasm_bindgen_test]
fn outside_click_closes_dropdown() {
    mount_select("t-outside", "x", true, &[("1", "One", false)]);
    let handle = BoundSelectHandle::attach("t-outside", BoundSelectConfig::default()).unwrap();

    click_trigger("t-outside");
    assert!(handle.is_open());

    click_selector("#t-outside__bound .bound-select__search");
    assert!(handle.is_open());

    document().body().unwrap().click();
    assert!(!handle.is_open());

    click_trigger("t-outside");
    click_trigger("t-outside");
    assert!(!handle.is_open());
}

#[wasm_bindgen_test]
fn single_select_adopts_value_set_before_attach() {
    let native = mount_select("t-single-prop", "warehouse_id", false, &[("1", "Main", false), ("2", "Spare", false)]);
    native.set_value("2");

    let handle = BoundSelectHandle::attach("t-single-prop", BoundSelectConfig::default()).unwrap();
    assert_eq!(handle.get_value(), vec!["2"]);
    assert_eq!(hidden_value("t-single-prop"), "2");
    assert_eq!(native_selected(&native), vec!["2"]);
    assert_eq!(rows("t-single-prop"), vec!["Main"]);
}

#[wasm_bindgen_test]
fn single_select_ignores_implicit_first_option() {
    let native = mount_select("t-single-auto", "warehouse_id", false, &[("1", "Main", false), ("2", "Spare", false)]);
    assert_eq!(native.selected_index(), 0);

    let handle = BoundSelectHandle::attach("t-single-auto", BoundSelectConfig::default()).unwrap();
    assert!(handle.get_value().is_empty());
    assert!(native_selected(&native).is_empty());
}

#[wasm_bindgen_test]
fn single_select_stays_exclusive() {
    let native = mount_select("t-single", "warehouse_id", false, &[]);
    let handle = BoundSelectHandle::attach("t-single", BoundSelectConfig::default()).unwrap();
    handle.populate(&fruits());
    assert!(native_selected(&native).is_empty());

    click_trigger("t-single");
    for value in ["1", "3", "2"] {
        click_row("t-single", value);
        assert!(handle.get_value().len() <= 1);
    }
    assert_eq!(handle.get_value(), vec!["2"]);
    assert_eq!(native_selected(&native), vec!["2"]);

    handle.reset();
    assert!(native_selected(&native).is_empty());
}

#[wasm_bindgen_test]
fn reset_clears_value_hidden_input_and_native_flags() {
    let native = mount_select("t-reset", "x", true, &[("1", "One", true), ("2", "Two", true)]);
    let handle = BoundSelectHandle::attach("t-reset", BoundSelectConfig::default()).unwrap();
    assert_eq!(handle.get_value(), vec!["1", "2"]);

    handle.reset();
    assert!(handle.get_value().is_empty());
    assert_eq!(hidden_value("t-reset"), "");
    assert!(native_selected(&native).is_empty());
    assert_eq!(rows("t-reset"), vec!["One", "Two"]);
}

#[wasm_bindgen_test]
async fn search_input_is_debounced() {
    mount_select("t-search", "x", true, &[]);
    let handle = BoundSelectHandle::attach(
        "t-search",
        BoundSelectConfig::default().with_debounce_ms(200),
    )
    .unwrap();
    handle.populate(&fruits());

    let search: HtmlInputElement = document()
        .query_selector("#t-search__bound .bound-select__search")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    for text in ["a", "ba", "ban"] {
        search.set_value(text);
        search.dispatch_event(&Event::new("input").unwrap()).unwrap();
    }
    assert_eq!(rows("t-search"), vec!["Apple", "Banana", "Band"]);

    TimeoutFuture::new(300).await;
    assert_eq!(rows("t-search"), vec!["Banana", "Band"]);
    assert!(handle.get_value().is_empty());
}

#[wasm_bindgen_test]
fn destroy_restores_native_select() {
    let native = mount_select("t-destroy", "user_ids", true, &[("1", "One", false)]);
    let handle = BoundSelectHandle::attach("t-destroy", BoundSelectConfig::default()).unwrap();

    handle.destroy();
    assert!(handle.is_destroyed());
    assert!(document().get_element_by_id("t-destroy__bound").is_none());
    assert_eq!(native.name(), "user_ids");
    assert_eq!(native.style().get_property_value("display").unwrap(), "");

    // document listener is gone; calls after destroy are no-ops
    document().body().unwrap().click();
    handle.set_value("1");
    assert!(handle.get_value().is_empty());

    assert!(BoundSelectHandle::attach("t-destroy", BoundSelectConfig::default()).is_some());
}

#[wasm_bindgen_test]
fn registry_collects_filters_by_field() {
    mount_select("t-reg-users", "user_ids", true, &[("1", "A", false), ("2", "B", false)]);
    mount_select("t-reg-wh", "warehouse_id", false, &[("7", "Main", false)]);

    let mut registry = BoundSelectRegistry::new();
    assert!(registry.attach("t-reg-users", BoundSelectConfig::default()).is_some());
    assert!(registry.attach("t-reg-wh", BoundSelectConfig::default()).is_some());
    assert!(registry.attach("t-reg-missing", BoundSelectConfig::default()).is_none());
    assert_eq!(registry.len(), 2);

    registry.get("t-reg-users").unwrap().set_value(vec!["2", "1"]);
    let fields = [("user_ids", "t-reg-users"), ("warehouse_id", "t-reg-wh"), ("product_ids", "t-reg-missing")];
    let filters = registry.collect_filters(&fields);
    assert_eq!(filters.get("user_ids").to_vec(), vec!["2".to_string(), "1".to_string()]);
    assert!(filters.get("warehouse_id").is_empty());
    assert_eq!(filters.active_count(), 1);

    registry.reset_all();
    assert!(registry.values("t-reg-users").is_empty());

    registry.destroy_all();
    assert!(registry.is_empty());
    assert!(document().get_element_by_id("t-reg-users__bound").is_none());
}

#[wasm_bindgen_test]
fn saved_filters_are_restored_into_widgets() {
    const KEY: &str = "t-restore-filters";
    mount_select("t-restore-users", "user_ids", true, &[]);
    mount_select("t-restore-wh", "warehouse_id", false, &[]);
    let fields = [("user_ids", "t-restore-users"), ("warehouse_id", "t-restore-wh")];

    let saved = ListFilters::new()
        .with("user_ids", vec!["2".to_string(), "404".to_string(), "1".to_string()])
        .with("warehouse_id", vec!["3".to_string()]);
    filter_storage::save_filters(KEY, &saved);

    let mut registry = BoundSelectRegistry::new();
    registry.attach("t-restore-users", BoundSelectConfig::default()).unwrap();
    registry.attach("t-restore-wh", BoundSelectConfig::default()).unwrap();
    for (_, select_id) in fields {
        registry.get(select_id).unwrap().populate(&fruits());
    }

    let loaded = filter_storage::load_filters(KEY).unwrap();
    registry.apply_filters(&loaded, &fields);

    // id 404 нет среди вариантов, он отбрасывается
    assert_eq!(registry.values("t-restore-users"), vec!["2", "1"]);
    assert_eq!(registry.values("t-restore-wh"), vec!["3"]);
    assert_eq!(hidden_value("t-restore-users"), "2,1");
    assert_eq!(registry.collect_filters(&fields).active_count(), 2);

    filter_storage::clear_filters(KEY);
    assert!(filter_storage::load_filters(KEY).is_none());
    registry.destroy_all();
}

#[wasm_bindgen_test]
fn registry_does_not_count_destroyed_widgets() {
    mount_select("t-reg-live", "a", true, &[("1", "One", false)]);
    mount_select("t-reg-dead", "b", true, &[("1", "One", false)]);

    let mut registry = BoundSelectRegistry::new();
    registry.attach("t-reg-live", BoundSelectConfig::default()).unwrap();
    let dead = registry.attach("t-reg-dead", BoundSelectConfig::default()).unwrap();
    assert_eq!(registry.len(), 2);

    dead.destroy();
    assert_eq!(registry.len(), 1);
    assert!(!registry.contains("t-reg-dead"));
    assert!(!registry.is_empty());

    // повторная привязка заменяет уничтоженный handle
    assert!(registry.attach("t-reg-dead", BoundSelectConfig::default()).is_some());
    assert_eq!(registry.len(), 2);
    registry.destroy_all();
    assert!(registry.is_empty());
}
