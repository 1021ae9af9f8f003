use contracts::domain::warehouse::StockListItem;
use contracts::shared::filters::ListQuery;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use super::filter_fields::{attach_fields, field_pairs, load_references, FilterField, FilterSelectField};
use crate::shared::bound_select::BoundSelectRegistry;
use crate::shared::components::filter_panel::FilterPanel;
use crate::shared::filter_storage;
use crate::shared::icons::icon;
use crate::shared::reference_api::{self, PRODUCTS_PATH, WAREHOUSES_PATH};

const STOCK_PATH: &str = "/api/v1/stock";
const FILTERS_STORAGE_KEY: &str = "warehouse_stock_filters";
const PAGE_SIZE: usize = 200;

const FIELDS: &[FilterField] = &[
    FilterField {
        field: "product_ids",
        select_id: "stock-filter-products",
        label: "Товары",
        placeholder: "Все товары",
        source: PRODUCTS_PATH,
        multiple: true,
    },
    FilterField {
        field: "warehouse_ids",
        select_id: "stock-filter-warehouses",
        label: "Склады",
        placeholder: "Все склады",
        source: WAREHOUSES_PATH,
        multiple: true,
    },
];

#[component]
pub fn WarehousePage() -> impl IntoView {
    let registry = StoredValue::new_local(BoundSelectRegistry::new());
    let items: RwSignal<Vec<StockListItem>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let is_expanded = RwSignal::new(true);
    let active_filters = RwSignal::new(0usize);

    let load_list = move || {
        let filters = registry.with_value(|r| r.collect_filters(&field_pairs(FIELDS)));
        active_filters.set(filters.active_count());
        filter_storage::save_filters(FILTERS_STORAGE_KEY, &filters);

        let Ok(query) = ListQuery::new(&filters, 0, PAGE_SIZE) else {
            set_error.set(Some("Некорректные фильтры".to_string()));
            return;
        };

        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match reference_api::fetch_list::<StockListItem>(STOCK_PATH, &query).await {
                Ok(data) => items.set(data),
                Err(e) => set_error.set(Some(format!("Не удалось загрузить остатки: {}", e))),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        spawn_local(async move {
            TimeoutFuture::new(0).await;
            registry.try_update_value(|r| attach_fields(r, FIELDS));

            let populated = load_references(FIELDS, move |select_id, data| {
                registry.with_value(|r| {
                    if let Some(select) = r.get(select_id) {
                        select.populate(&data);
                    }
                });
            })
            .await;
            if let Err(e) = populated {
                set_error.set(Some(format!("Не удалось загрузить справочники: {}", e)));
            }

            if let Some(saved) = filter_storage::load_filters(FILTERS_STORAGE_KEY) {
                registry.with_value(|r| r.apply_filters(&saved, &field_pairs(FIELDS)));
            }
            load_list();
        });
    });

    on_cleanup(move || {
        registry.try_update_value(|r| r.destroy_all());
    });

    let reset_filters = move || {
        registry.with_value(|r| r.reset_all());
        filter_storage::clear_filters(FILTERS_STORAGE_KEY);
        load_list();
    };

    view! {
        <div class="page">
            <div class="page__header">
                {icon("inventory")}
                <h2 class="page__title">"Остатки на складах"</h2>
            </div>

            <FilterPanel
                is_expanded=is_expanded
                active_filters_count=Signal::derive(move || active_filters.get())
                actions=move || view! {
                    <Flex gap=FlexGap::Small>
                        <Button
                            size=ButtonSize::Small
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| load_list()
                        >
                            "Применить"
                        </Button>
                        <Button
                            size=ButtonSize::Small
                            appearance=ButtonAppearance::Secondary
                            on_click=move |_| reset_filters()
                        >
                            "Сбросить"
                        </Button>
                    </Flex>
                }
                filter_content=move || view! {
                    <div class="filter-grid">
                        {FIELDS
                            .iter()
                            .map(|field| view! { <FilterSelectField field=*field /> })
                            .collect_view()}
                    </div>
                }
            />

            {move || error.get().map(|e| view! { <div class="alert alert--error">{e}</div> })}

            <Show
                when=move || !loading.get()
                fallback=|| view! { <div class="page__loading">"Загрузка..."</div> }
            >
                <table class="table">
                    <thead>
                        <tr>
                            <th>"Товар"</th>
                            <th>"Склад"</th>
                            <th class="table__cell--number">"Остаток"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || items.get()
                            key=|row| row.id.clone()
                            children=move |row| {
                                view! {
                                    <tr>
                                        <td>{row.product_name}</td>
                                        <td>{row.warehouse_name}</td>
                                        <td class="table__cell--number">{format!("{:.0}", row.quantity)}</td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </Show>
        </div>
    }
}
