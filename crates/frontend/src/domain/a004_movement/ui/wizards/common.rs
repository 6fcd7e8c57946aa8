//! Pieces shared by the movement and solicitud wizards.

use contracts::domain::a001_product::aggregate::Product;
use contracts::domain::a003_farm::aggregate::{Farm, Lot};
use contracts::domain::a004_movement::aggregate::{Location, MovementKind};
use contracts::shared::stock::StockBook;
use contracts::shared::wizard::{Wizard, WizardStep};
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::a001_product::api::fetch_inventory;
use crate::domain::a004_movement::api;
use crate::shared::number_format::format_quantity;

pub fn alert(message: &str) {
    if let Some(w) = web_sys::window() {
        let _ = w.alert_with_message(message);
    }
}

pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(true)
}

/// Asked before a wizard with a touched draft is closed
pub fn confirm_discard() -> bool {
    confirm("¿Descartar el borrador?")
}

/// Inventory snapshot for a wizard: product list plus the stock book built from it
pub fn load_inventory<S>(products: RwSignal<Vec<Product>>, book: RwSignal<StockBook>, wizard: RwSignal<Wizard<S>>)
where
    S: WizardStep + Send + Sync + 'static,
{
    spawn_local(async move {
        match fetch_inventory().await {
            Ok(list) => {
                book.set(StockBook::from_products(&list));
                products.set(list.into_iter().filter(|p| p.activo).collect());
            }
            Err(e) => wizard.update(|w| w.set_error(format!("No se pudo cargar el inventario: {}", e))),
        }
    });
}

/// Posts the movement; failures keep the modal open and raise an alert
pub fn submit_movement<B>(kind: MovementKind, body: B, submitting: RwSignal<bool>, on_done: Callback<()>)
where
    B: Serialize + 'static,
{
    submitting.set(true);
    spawn_local(async move {
        match api::register(kind, &body).await {
            Ok(()) => {
                log::info!("{} registrado", kind.label());
                on_done.run(());
            }
            Err(e) => {
                log::error!("registro de {} falló: {}", kind.as_str(), e);
                alert(&format!("No se pudo registrar el movimiento de {}: {}", kind.label().to_lowercase(), e));
                submitting.set(false);
            }
        }
    });
}

pub fn product_option_label(p: &Product) -> String {
    format!("{} · {} ({} {})", p.codigo, p.nombre, format_quantity(p.stock), p.unidad)
}

#[component]
pub fn ProductSelect(
    #[prop(into)] products: Signal<Vec<Product>>,
    #[prop(into)] value: Signal<String>,
    on_change: Callback<String>,
) -> impl IntoView {
    view! {
        <select
            class="form-select"
            prop:value=move || value.get()
            on:change=move |ev| on_change.run(event_target_value(&ev))
        >
            <option value="">"Seleccione un producto"</option>
            {move || {
                products
                    .get()
                    .into_iter()
                    .map(|p| {
                        let label = product_option_label(&p);
                        view! { <option value=p.id.clone()>{label}</option> }
                    })
                    .collect_view()
            }}
        </select>
    }
}

/// Farm select plus an optional lot of that farm. Changing the farm clears the lot.
#[component]
pub fn LocationPicker(
    label: &'static str,
    #[prop(into)] farms: Signal<Vec<Farm>>,
    #[prop(into)] lots: Signal<BTreeMap<String, Vec<Lot>>>,
    #[prop(into)] value: Signal<Location>,
    on_change: Callback<Location>,
) -> impl IntoView {
    let farm_lots = move || {
        let finca = value.with(|v| v.finca_id.clone());
        lots.with(|m| m.get(&finca).cloned().unwrap_or_default())
    };

    view! {
        <fieldset class="form-fieldset">
            <legend>{label}</legend>
            <div class="form-group">
                <label>"Finca"</label>
                <select
                    class="form-select"
                    prop:value=move || value.with(|v| v.finca_id.clone())
                    on:change=move |ev| {
                        on_change.run(Location {
                            finca_id: event_target_value(&ev),
                            lote_id: None,
                        })
                    }
                >
                    <option value="">"Seleccione una finca"</option>
                    {move || {
                        farms
                            .get()
                            .into_iter()
                            .filter(|f| f.activo)
                            .map(|f| view! { <option value=f.id.clone()>{f.nombre.clone()}</option> })
                            .collect_view()
                    }}
                </select>
            </div>
            <div class="form-group">
                <label>"Lote"</label>
                <select
                    class="form-select"
                    prop:value=move || value.with(|v| v.lote_id.clone().unwrap_or_default())
                    disabled=move || value.with(|v| v.finca_id.is_empty())
                    on:change=move |ev| {
                        let lote = event_target_value(&ev);
                        let finca_id = value.with_untracked(|v| v.finca_id.clone());
                        on_change.run(Location {
                            finca_id,
                            lote_id: if lote.is_empty() { None } else { Some(lote) },
                        })
                    }
                >
                    <option value="">"Toda la finca"</option>
                    {move || {
                        farm_lots()
                            .into_iter()
                            .map(|l| {
                                let label = if l.cultivo.is_empty() {
                                    l.nombre.clone()
                                } else {
                                    format!("{} ({})", l.nombre, l.cultivo)
                                };
                                view! { <option value=l.id.clone()>{label}</option> }
                            })
                            .collect_view()
                    }}
                </select>
            </div>
        </fieldset>
    }
}

/// Back / next / submit row. `on_next` runs the step validation itself.
#[component]
pub fn WizardNav<S>(
    wizard: RwSignal<Wizard<S>>,
    submitting: RwSignal<bool>,
    on_next: Callback<()>,
    on_submit: Callback<()>,
    on_cancel: Callback<()>,
    #[prop(optional, into)] submit_label: Option<String>,
) -> impl IntoView
where
    S: WizardStep + Send + Sync + 'static,
{
    let submit_label = submit_label.unwrap_or_else(|| "Registrar".to_string());

    view! {
        <div class="details-actions wizard-actions">
            <button class="button button--secondary" on:click=move |_| on_cancel.run(())>
                "Cancelar"
            </button>
            <button
                class="button button--secondary"
                disabled=move || wizard.with(|w| w.is_first()) || submitting.get()
                on:click=move |_| wizard.update(|w| w.back())
            >
                "Atrás"
            </button>
            <Show
                when=move || wizard.with(|w| w.is_last())
                fallback=move || {
                    view! {
                        <button class="button button--primary" on:click=move |_| on_next.run(())>
                            "Siguiente"
                        </button>
                    }
                }
            >
                <button
                    class="button button--primary"
                    disabled=move || submitting.get()
                    on:click=move |_| on_submit.run(())
                >
                    {
                        let label = submit_label.clone();
                        move || if submitting.get() { "Registrando...".to_string() } else { label.clone() }
                    }
                </button>
            </Show>
        </div>
    }
}
