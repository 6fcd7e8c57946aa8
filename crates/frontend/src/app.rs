use crate::layout::global_context::AppGlobalContext;
use crate::routes::routes::AppRoutes;
use crate::shared::config::config;
use crate::shared::modal_stack::{ModalHost, ModalStackService};
use crate::shared::refresh::RefreshTrigger;
use crate::system::auth::context::AuthProvider;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppGlobalContext::new());
    provide_context(ModalStackService::new());
    provide_context(RefreshTrigger::new());
    provide_context(config().clone());

    view! {
        <AuthProvider>
            <AppRoutes />
            <ModalHost />
        </AuthProvider>
    }
}
