//! Top bar: sidebar toggle, application title, current user and logout.

use crate::layout::global_context::AppGlobalContext;
use crate::system::auth::context::{do_logout, use_auth};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let (auth_state, set_auth_state) = use_auth();

    let logout = move |_| {
        ctx.close_all();
        spawn_local(do_logout(set_auth_state));
    };

    let user_label = move || {
        auth_state.with(|s| {
            s.user_info
                .as_ref()
                .map(|u| format!("{} · {}", u.display_name(), u.rol.label()))
                .unwrap_or_default()
        })
    };

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <button
                    class="top-header__icon-btn"
                    on:click=move |_| ctx.toggle_left()
                    title=move || if ctx.left_open.get() { "Ocultar menú" } else { "Mostrar menú" }
                >
                    "☰"
                </button>
                <span class="top-header__title">"Inventario Agro"</span>
            </div>

            <div class="top-header__actions">
                <div class="top-header__user">{user_label}</div>
                <button class="top-header__icon-btn" on:click=logout title="Cerrar sesión">
                    "Salir"
                </button>
            </div>
        </div>
    }
}
