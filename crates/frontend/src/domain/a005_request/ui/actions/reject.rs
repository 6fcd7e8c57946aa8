use contracts::domain::a005_request::aggregate::{validate_reject_reason, RejectRequest, Solicitud};
use contracts::domain::a005_request::workflow::RequestAction;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a005_request::api;

#[component]
pub fn RejectForm(solicitud: Solicitud, on_done: Callback<()>, on_cancel: Callback<()>) -> impl IntoView {
    let motivo = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let sending = RwSignal::new(false);
    let id = StoredValue::new(solicitud.id.clone());

    let submit = move |_| {
        let text = motivo.get_untracked().trim().to_string();
        if let Err(e) = validate_reject_reason(&text) {
            error.set(Some(e.to_string()));
            return;
        }
        sending.set(true);
        spawn_local(async move {
            let body = RejectRequest { motivo: text };
            match api::perform_action(&id.get_value(), RequestAction::Rechazar, &body).await {
                Ok(()) => on_done.run(()),
                Err(e) => {
                    error.set(Some(e));
                    sending.set(false);
                }
            }
        });
    };

    view! {
        <div class="details-container">
            <p>{format!("Solicitud {} de {}", solicitud.numero, solicitud.solicitante)}</p>
            {move || error.get().map(|e| view! { <div class="error">{e}</div> })}
            <div class="form-group">
                <label for="motivo_rechazo">"Motivo del rechazo"</label>
                <textarea
                    id="motivo_rechazo"
                    rows="3"
                    prop:value=move || motivo.get()
                    on:input=move |ev| motivo.set(event_target_value(&ev))
                />
            </div>
            <div class="details-actions">
                <button
                    class="button button--danger"
                    on:click=submit
                    disabled=move || sending.get() || motivo.with(|m| m.trim().is_empty())
                >
                    "Rechazar"
                </button>
                <button class="button button--secondary" on:click=move |_| on_cancel.run(())>
                    "Volver"
                </button>
            </div>
        </div>
    }
}
