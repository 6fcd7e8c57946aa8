//! Tab key to view. Every tab key of the application is listed here.

use crate::dashboards::d400_role_dashboard::RoleDashboard;
use crate::domain::a001_product::ui::list::ProductList;
use crate::domain::a002_provider::ui::list::ProviderList;
use crate::domain::a003_farm::ui::list::FarmList;
use crate::domain::a004_movement::ui::list::MovementList;
use crate::domain::a005_request::ui::list::SolicitudList;
use crate::layout::global_context::AppGlobalContext;
use crate::system::users::ui::list::UsersListPage;
use leptos::prelude::*;

pub fn render_tab_content(key: &str, tabs_store: AppGlobalContext) -> AnyView {
    match key {
        "d400_dashboard" => view! { <RoleDashboard /> }.into_any(),
        "a001_product" => view! { <ProductList /> }.into_any(),
        "a002_provider" => view! { <ProviderList /> }.into_any(),
        "a003_farm" => view! { <FarmList /> }.into_any(),
        "a004_movement" => view! { <MovementList /> }.into_any(),
        "a005_request" => view! { <SolicitudList /> }.into_any(),
        "sys_users" => view! { <UsersListPage /> }.into_any(),
        unknown => {
            log::warn!("unknown tab key '{}'", unknown);
            let key_for_close = unknown.to_string();
            view! {
                <div class="page">
                    <p>{format!("Sección desconocida: {}", unknown)}</p>
                    <button class="button button--secondary" on:click=move |_| tabs_store.close_tab(&key_for_close)>
                        "Cerrar"
                    </button>
                </div>
            }
            .into_any()
        }
    }
}
