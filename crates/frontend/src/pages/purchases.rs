use contracts::domain::purchase::PurchaseListItem;
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
use crate::shared::reference_api::{self, PRODUCTS_PATH, USERS_PATH, WAREHOUSES_PATH};

const PURCHASES_PATH: &str = "/api/v1/purchase";
const FILTERS_STORAGE_KEY: &str = "purchases_filters";
const PAGE_SIZE: usize = 100;

const FIELDS: &[FilterField] = &[
    FilterField {
        field: "user_ids",
        select_id: "purchase-filter-users",
        label: "Ответственные",
        placeholder: "Все пользователи",
        source: USERS_PATH,
        multiple: true,
    },
    FilterField {
        field: "product_ids",
        select_id: "purchase-filter-products",
        label: "Товары",
        placeholder: "Все товары",
        source: PRODUCTS_PATH,
        multiple: true,
    },
    FilterField {
        field: "warehouse_id",
        select_id: "purchase-filter-warehouse",
        label: "Склад",
        placeholder: "Все склады",
        source: WAREHOUSES_PATH,
        multiple: false,
    },
];

#[component]
pub fn PurchasesPage() -> impl IntoView {
    let registry = StoredValue::new_local(BoundSelectRegistry::new());
    let items: RwSignal<Vec<PurchaseListItem>> = RwSignal::new(Vec::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (loading, set_loading) = signal(false);
    let is_expanded = RwSignal::new(true);
    let active_filters = RwSignal::new(0usize);

    let refresh_references = move || async move {
        load_references(FIELDS, move |select_id, data| {
            registry.with_value(|r| {
                if let Some(select) = r.get(select_id) {
                    select.populate(&data);
                }
            });
        })
        .await
    };

    let load_list = move || {
        let filters = registry.with_value(|r| r.collect_filters(&field_pairs(FIELDS)));
        active_filters.set(filters.active_count());
        filter_storage::save_filters(FILTERS_STORAGE_KEY, &filters);

        let query = match ListQuery::new(&filters, 0, PAGE_SIZE) {
            Ok(q) => q,
            Err(e) => {
                set_error.set(Some(format!("Некорректные фильтры: {}", e)));
                return;
            }
        };

        set_loading.set(true);
        set_error.set(None);
        spawn_local(async move {
            match reference_api::fetch_list::<PurchaseListItem>(PURCHASES_PATH, &query).await {
                Ok(data) => items.set(data),
                Err(e) => set_error.set(Some(format!("Не удалось загрузить закупки: {}", e))),
            }
            set_loading.set(false);
        });
    };

    // Виджеты привязываются к <select> после монтирования разметки
    Effect::new(move |_| {
        spawn_local(async move {
            TimeoutFuture::new(0).await;
            let attached = registry
                .try_update_value(|r| attach_fields(r, FIELDS))
                .unwrap_or(0);
            log::debug!("purchases: {} of {} filter selects attached", attached, FIELDS.len());

            if let Err(e) = refresh_references().await {
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

    let delete_purchase = move |id: String| {
        spawn_local(async move {
            match reference_api::delete_item(PURCHASES_PATH, &id).await {
                Ok(()) => {
                    // после записи: сброс выбора и свежие справочники
                    registry.with_value(|r| r.reset_all());
                    if let Err(e) = refresh_references().await {
                        set_error.set(Some(format!("Не удалось загрузить справочники: {}", e)));
                    }
                    load_list();
                }
                Err(e) => set_error.set(Some(format!("Не удалось удалить закупку: {}", e))),
            }
        });
    };

    view! {
        <div class="page">
            <div class="page__header">
                {icon("purchases")}
                <h2 class="page__title">"Закупки"</h2>
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

            {move || {
                if loading.get() {
                    view! { <div class="page__loading">"Загрузка..."</div> }.into_any()
                } else {
                    let rows = items.get();
                    if rows.is_empty() {
                        view! { <div class="page__empty">"Нет закупок"</div> }.into_any()
                    } else {
                        view! {
                            <table class="table">
                                <thead>
                                    <tr>
                                        <th>"Дата"</th>
                                        <th>"Ответственный"</th>
                                        <th>"Товар"</th>
                                        <th>"Склад"</th>
                                        <th class="table__cell--number">"Кол-во"</th>
                                        <th class="table__cell--number">"Сумма"</th>
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {rows.into_iter().map(|row| {
                                        let id = row.id.clone();
                                        view! {
                                            <tr>
                                                <td>{row.date.format("%d.%m.%Y").to_string()}</td>
                                                <td>{row.user_name}</td>
                                                <td>{row.product_name}</td>
                                                <td>{row.warehouse_name}</td>
                                                <td class="table__cell--number">{format!("{:.0}", row.quantity)}</td>
                                                <td class="table__cell--number">{format!("{:.2}", row.amount)}</td>
                                                <td>
                                                    <button
                                                        class="button button--icon"
                                                        title="Удалить"
                                                        on:click=move |_| delete_purchase(id.clone())
                                                    >
                                                        {icon("trash")}
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    }).collect_view()}
                                </tbody>
                            </table>
                        }.into_any()
                    }
                }
            }}
        </div>
    }
}
