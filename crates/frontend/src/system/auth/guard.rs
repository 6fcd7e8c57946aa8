use contracts::system::users::Permission;
use leptos::prelude::*;

use super::context::use_auth;

/// Renders children only when the current role has `permission`
#[component]
pub fn RequirePermission(permission: Permission, children: ChildrenFn) -> impl IntoView {
    let (auth_state, _) = use_auth();

    view! {
        <Show
            when=move || auth_state.with(|s| s.can(permission))
            fallback=|| view! { <div class="access-denied">"Su rol no tiene acceso a esta sección."</div> }
        >
            {children()}
        </Show>
    }
}
