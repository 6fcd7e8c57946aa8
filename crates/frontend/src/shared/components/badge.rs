use leptos::prelude::*;

/// Badge variant: "primary", "success", "warning", "error", "neutral" (default)
#[component]
pub fn Badge(
    #[prop(optional, into)] variant: MaybeProp<String>,
    children: Children,
) -> impl IntoView {
    let variant_class = move || match variant.get().as_deref().unwrap_or("neutral") {
        "primary" => "badge--primary",
        "success" => "badge--success",
        "warning" => "badge--warning",
        "error" => "badge--error",
        _ => "badge--neutral",
    };

    view! {
        <span class=move || format!("badge {}", variant_class())>
            {children()}
        </span>
    }
}

/// Green "Activo" / grey "Inactivo"
#[component]
pub fn ActiveBadge(#[prop(into)] active: Signal<bool>) -> impl IntoView {
    view! {
        <span class=move || {
            if active.get() { "badge badge--success" } else { "badge badge--neutral" }
        }>
            {move || if active.get() { "Activo" } else { "Inactivo" }}
        </span>
    }
}
