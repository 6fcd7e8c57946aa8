use contracts::domain::a005_request::aggregate::Solicitud;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a005_request::api;
use crate::shared::components::badge::Badge;
use crate::shared::date_utils::format_date;
use crate::shared::number_format::format_quantity;

/// Read-only view of one solicitud; refetched on open so delivered and
/// returned quantities are current.
#[component]
pub fn SolicitudDetails(
    solicitud: Solicitud,
    /// Farm and lot names for the destination line
    destino: String,
    on_close: Callback<()>,
) -> impl IntoView {
    let current = RwSignal::new(solicitud);
    let id = current.with_untracked(|s| s.id.clone());
    spawn_local(async move {
        match api::fetch_solicitud(&id).await {
            Ok(fresh) => current.set(fresh),
            Err(e) => log::warn!("solicitud {} no se pudo refrescar: {}", id, e),
        }
    });

    view! {
        <div class="details-container solicitud-details">
            {move || {
                let s = current.get();
                view! {
                    <dl class="summary-list">
                        <dt>"Número"</dt>
                        <dd>{s.numero.clone()}</dd>
                        <dt>"Estado"</dt>
                        <dd><Badge variant=s.estado.badge_variant()>{s.estado.label()}</Badge></dd>
                        <dt>"Solicitante"</dt>
                        <dd>{s.solicitante.clone()}</dd>
                        <dt>"Destino"</dt>
                        <dd>{destino.clone()}</dd>
                        <dt>"Creada"</dt>
                        <dd>{format_date(s.creada)}</dd>
                    </dl>
                    {s.motivo_rechazo.clone().map(|m| view! { <div class="warning-box">{format!("Motivo de rechazo: {}", m)}</div> })}
                    {(!s.nota.is_empty()).then(|| view! { <p class="details-note">{s.nota.clone()}</p> })}
                    <table class="table__data">
                        <thead class="table__head">
                            <tr>
                                <th class="table__header-cell">"Producto"</th>
                                <th class="table__header-cell table__header-cell--right">"Solicitado"</th>
                                <th class="table__header-cell table__header-cell--right">"Entregado"</th>
                                <th class="table__header-cell table__header-cell--right">"Devuelto"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {s.lineas
                                .iter()
                                .map(|l| {
                                    view! {
                                        <tr class="table__row">
                                            <td class="table__cell">{l.producto_nombre.clone()}</td>
                                            <td class="table__cell table__cell--right">{format_quantity(l.cantidad)}</td>
                                            <td class="table__cell table__cell--right">{format_quantity(l.cantidad_entregada)}</td>
                                            <td class="table__cell table__cell--right">{format_quantity(l.cantidad_devuelta)}</td>
                                        </tr>
                                    }
                                })
                                .collect_view()}
                        </tbody>
                    </table>
                }
            }}
            <div class="details-actions">
                <button class="button button--secondary" on:click=move |_| on_close.run(())>
                    "Cerrar"
                </button>
            </div>
        </div>
    }
}
