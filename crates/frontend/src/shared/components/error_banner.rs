use leptos::prelude::*;

/// Dismissable error line; hidden while the signal is `None`
#[component]
pub fn ErrorBanner(error: RwSignal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || error.with(Option::is_some)>
            <div class="error-banner" role="alert">
                <span class="error-banner__text">{move || error.get().unwrap_or_default()}</span>
                <button class="error-banner__close" title="Cerrar" on:click=move |_| error.set(None)>
                    "×"
                </button>
            </div>
        </Show>
    }
}

/// Messages written by a failed list fetch
pub fn is_load_failure(message: &str) -> bool {
    message.starts_with("No se pudo cargar") || message.starts_with("No se pudieron cargar")
}

/// Called after a successful fetch. Save failures stay until dismissed.
pub fn clear_load_failure(error: RwSignal<Option<String>>) {
    let stale = error.with_untracked(|e| e.as_deref().is_some_and(is_load_failure));
    if stale {
        error.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_fetch_failures_are_cleared_by_reload() {
        assert!(is_load_failure("No se pudo cargar el inventario: HTTP 502"));
        assert!(is_load_failure("No se pudieron cargar las solicitudes: timeout"));
        assert!(!is_load_failure("No se guardó el cambio: HTTP 409"));
        assert!(!is_load_failure("No se pudo aprobar la solicitud SOL-7: HTTP 403"));
    }
}
