use crate::pages::purchases::PurchasesPage;
use crate::pages::warehouse::WarehousePage;
use crate::shared::icons::icon;
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;
use thaw::ConfigProvider;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <ConfigProvider>
            <Router>
                <div class="app">
                    <nav class="navbar">
                        <A href="/purchases" attr:class="navbar__item">
                            {icon("purchases")}
                            <span>"Закупки"</span>
                        </A>
                        <A href="/warehouse" attr:class="navbar__item">
                            {icon("inventory")}
                            <span>"Склад"</span>
                        </A>
                    </nav>
                    <main class="app__content">
                        <Routes fallback=|| view! { <div class="page__empty">"Страница не найдена"</div> }>
                            <Route path=path!("/") view=PurchasesPage />
                            <Route path=path!("/purchases") view=PurchasesPage />
                            <Route path=path!("/warehouse") view=WarehousePage />
                        </Routes>
                    </main>
                </div>
            </Router>
        </ConfigProvider>
    }
}
