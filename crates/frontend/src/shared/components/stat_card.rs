use leptos::prelude::*;

/// Dashboard tile; clickable when `on_click` is set
#[component]
pub fn StatCard(
    #[prop(into)] title: String,
    #[prop(into)] value: Signal<String>,
    #[prop(optional, into)] hint: Option<String>,
    #[prop(optional, into)] variant: Option<String>,
    #[prop(optional)] on_click: Option<Callback<()>>,
) -> impl IntoView {
    let class = format!(
        "stat-card stat-card--{}{}",
        variant.unwrap_or_else(|| "neutral".to_string()),
        if on_click.is_some() { " stat-card--link" } else { "" }
    );

    view! {
        <div
            class=class
            on:click=move |_| {
                if let Some(cb) = on_click {
                    cb.run(());
                }
            }
        >
            <div class="stat-card__title">{title}</div>
            <div class="stat-card__value">{move || value.get()}</div>
            {hint.map(|h| view! { <div class="stat-card__hint">{h}</div> })}
        </div>
    }
}
