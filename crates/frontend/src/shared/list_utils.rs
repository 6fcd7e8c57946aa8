/// Search box and sort helpers shared by the list screens
use crate::shared::config::config;
use contracts::shared::list_filter::is_filter_active;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// Text input that reports its value after the configured debounce delay.
#[component]
pub fn SearchInput(
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
    #[prop(optional, into)] placeholder: String,
) -> impl IntoView {
    let search = &config().search;
    let debounce_ms = search.debounce_ms;
    let min_chars = search.min_chars;

    let placeholder = if placeholder.is_empty() {
        format!("Buscar (mín. {} caracteres)...", min_chars)
    } else {
        placeholder
    };

    let (input_value, set_input_value) = signal(value.get_untracked());
    // Only the latest keystroke's timer is allowed to fire.
    let generation = StoredValue::new(0u64);

    // Presets and resets from the owning list replace the typed text.
    Effect::new(move |_| set_input_value.set(value.get()));

    let handle_input_change = move |new_value: String| {
        set_input_value.set(new_value.clone());
        let current = generation.get_value() + 1;
        generation.set_value(current);

        spawn_local(async move {
            TimeoutFuture::new(debounce_ms).await;
            if generation.try_get_value() == Some(current) {
                on_change.run(new_value);
            }
        });
    };

    let clear_filter = move |_| {
        generation.update_value(|g| *g += 1);
        set_input_value.set(String::new());
        on_change.run(String::new());
    };

    view! {
        <div class="search-input">
            <input
                type="text"
                placeholder=placeholder
                class=move || {
                    if is_filter_active(&value.get(), min_chars) {
                        "search-input__field search-input__field--active"
                    } else {
                        "search-input__field"
                    }
                }
                prop:value=move || input_value.get()
                on:input=move |ev| handle_input_change(event_target_value(&ev))
            />
            <Show when=move || !input_value.get().is_empty()>
                <button class="search-input__clear" title="Limpiar" on:click=clear_filter>
                    "×"
                </button>
            </Show>
        </div>
    }
}

pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field == field {
        if ascending {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        " ⇅"
    }
}

/// Clicking the active column flips direction, another column sorts ascending
pub fn toggle_sort(sort_field: &mut String, sort_ascending: &mut bool, field: &str) {
    if sort_field == field {
        *sort_ascending = !*sort_ascending;
    } else {
        *sort_field = field.to_string();
        *sort_ascending = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_indicator() {
        assert_eq!(get_sort_indicator("nombre", "nombre", true), " ▲");
        assert_eq!(get_sort_indicator("nombre", "nombre", false), " ▼");
        assert_eq!(get_sort_indicator("stock", "nombre", true), " ⇅");
    }

    #[test]
    fn test_toggle_sort() {
        let mut field = "nombre".to_string();
        let mut ascending = true;
        toggle_sort(&mut field, &mut ascending, "nombre");
        assert!(!ascending);
        toggle_sort(&mut field, &mut ascending, "stock");
        assert_eq!(field, "stock");
        assert!(ascending);
    }
}
