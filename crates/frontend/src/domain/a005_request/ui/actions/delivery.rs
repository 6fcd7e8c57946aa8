use contracts::domain::a005_request::aggregate::{DeliveredLine, Solicitud};
use contracts::domain::a005_request::workflow::{default_delivery, validate_delivery, RequestAction};
use contracts::shared::stock::StockBook;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a001_product::api::fetch_inventory;
use crate::domain::a005_request::api;
use crate::shared::number_format::{format_for_input, format_quantity, parse_number};

/// Delivery quantities per line, prefilled from the request and current stock
#[component]
pub fn DeliveryForm(solicitud: Solicitud, on_done: Callback<()>, on_cancel: Callback<()>) -> impl IntoView {
    let solicitud = StoredValue::new(solicitud);
    let book = RwSignal::new(StockBook::default());
    let delivered: RwSignal<Vec<DeliveredLine>> = RwSignal::new(Vec::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let sending = RwSignal::new(false);
    let loaded = RwSignal::new(false);

    spawn_local(async move {
        match fetch_inventory().await {
            Ok(products) => {
                let snapshot = StockBook::from_products(&products);
                delivered.set(solicitud.with_value(|s| default_delivery(s, &snapshot)));
                book.set(snapshot);
                loaded.set(true);
            }
            Err(e) => error.set(Some(format!("No se pudo cargar el inventario: {}", e))),
        }
    });

    let set_quantity = move |producto_id: String, cantidad: f64| {
        delivered.update(|lines| {
            if let Some(l) = lines.iter_mut().find(|l| l.producto_id == producto_id) {
                l.cantidad = cantidad;
            }
        });
    };

    let submit = move |_| {
        let checked = solicitud.with_value(|s| {
            book.with_untracked(|b| delivered.with_untracked(|d| validate_delivery(s, d, b)))
        });
        let body = match checked {
            Ok(body) => body,
            Err(e) => {
                error.set(Some(e.to_string()));
                return;
            }
        };
        error.set(None);
        sending.set(true);
        let id = solicitud.with_value(|s| s.id.clone());
        spawn_local(async move {
            match api::perform_action(&id, RequestAction::Entregar, &body).await {
                Ok(()) => on_done.run(()),
                Err(e) => {
                    error.set(Some(e));
                    sending.set(false);
                }
            }
        });
    };

    let rows = solicitud.with_value(|s| s.lineas.clone());

    view! {
        <div class="details-container delivery-form">
            {move || error.get().map(|e| view! { <div class="error">{e}</div> })}
            <table class="table__data">
                <thead class="table__head">
                    <tr>
                        <th class="table__header-cell">"Producto"</th>
                        <th class="table__header-cell table__header-cell--right">"Solicitado"</th>
                        <th class="table__header-cell table__header-cell--right">"Disponible"</th>
                        <th class="table__header-cell table__header-cell--right">"Entregar"</th>
                    </tr>
                </thead>
                <tbody>
                    {rows
                        .into_iter()
                        .map(|line| {
                            let id_value = line.producto_id.clone();
                            let id_stock = line.producto_id.clone();
                            let id_set = line.producto_id.clone();
                            view! {
                                <tr class="table__row">
                                    <td class="table__cell">{line.producto_nombre.clone()}</td>
                                    <td class="table__cell table__cell--right">{format_quantity(line.cantidad)}</td>
                                    <td class="table__cell table__cell--right">
                                        {move || format_quantity(book.with(|b| b.available(&id_stock)))}
                                    </td>
                                    <td class="table__cell table__cell--right">
                                        <input
                                            type="text"
                                            inputmode="decimal"
                                            prop:value=move || {
                                                delivered.with(|d| {
                                                    d.iter()
                                                        .find(|l| l.producto_id == id_value)
                                                        .map(|l| format_for_input(l.cantidad, 6))
                                                        .unwrap_or_default()
                                                })
                                            }
                                            on:change=move |ev| {
                                                let v = parse_number(&event_target_value(&ev)).unwrap_or(-1.0);
                                                set_quantity(id_set.clone(), v);
                                            }
                                        />
                                    </td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
            <div class="details-actions">
                <button
                    class="button button--primary"
                    on:click=submit
                    disabled=move || !loaded.get() || sending.get()
                >
                    "Confirmar entrega"
                </button>
                <button class="button button--secondary" on:click=move |_| on_cancel.run(())>
                    "Volver"
                </button>
            </div>
        </div>
    }
}
