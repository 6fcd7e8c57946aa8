use contracts::domain::a001_product::aggregate::Product;
use contracts::domain::a003_farm::aggregate::{lots_by_farm, Farm, Lot};
use contracts::domain::a004_movement::aggregate::Location;
use contracts::domain::a005_request::aggregate::{SolicitudDraft, SolicitudStep};
use contracts::shared::stock::StockBook;
use contracts::shared::wizard::Wizard;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::a003_farm::api::{fetch_farms, fetch_lots};
use crate::domain::a004_movement::ui::wizards::common::{alert, load_inventory, LocationPicker, ProductSelect, WizardNav};
use crate::domain::a005_request::api;
use crate::shared::components::wizard_steps::WizardSteps;
use crate::shared::number_format::{format_for_input, format_quantity, parse_number};

#[component]
pub fn SolicitudWizard(dirty: RwSignal<bool>, on_done: Callback<()>, on_cancel: Callback<()>) -> impl IntoView {
    let wizard = RwSignal::new(Wizard::<SolicitudStep>::new());
    let draft = RwSignal::new(SolicitudDraft::default());
    let products: RwSignal<Vec<Product>> = RwSignal::new(Vec::new());
    let book = RwSignal::new(StockBook::default());
    let farms: RwSignal<Vec<Farm>> = RwSignal::new(Vec::new());
    let lots: RwSignal<BTreeMap<String, Vec<Lot>>> = RwSignal::new(BTreeMap::new());
    let submitting = RwSignal::new(false);
    let pick_product = RwSignal::new(String::new());
    let pick_qty = RwSignal::new(String::new());

    load_inventory(products, book, wizard);
    spawn_local(async move {
        let loaded = match fetch_farms().await {
            Ok(f) => fetch_lots().await.map(|l| (f, l)),
            Err(e) => Err(e),
        };
        match loaded {
            Ok((f, l)) => {
                farms.set(f);
                lots.set(lots_by_farm(&l));
            }
            Err(e) => wizard.update(|w| w.set_error(format!("No se pudieron cargar las fincas: {}", e))),
        }
    });

    let add_line = move |_| {
        let id = pick_product.get_untracked();
        let Some(product) = products.with_untracked(|list| list.iter().find(|p| p.id == id).cloned()) else {
            wizard.update(|w| w.set_error("Seleccione un producto"));
            return;
        };
        let qty = parse_number(&pick_qty.get_untracked()).unwrap_or(0.0);
        draft.update(|d| {
            d.lines.add(&product, qty, 0.0);
        });
        dirty.set(true);
        // Stock is checked as lines are added so the shortage shows right away.
        let shortages = book.with_untracked(|b| draft.with_untracked(|d| d.lines.check_stock(b)));
        wizard.update(|w| match shortages.first() {
            Some(s) => w.set_error(format!("Stock insuficiente: {}", s)),
            None => w.clear_error(),
        });
        pick_product.set(String::new());
        pick_qty.set(String::new());
    };

    let on_next = Callback::new(move |_: ()| {
        wizard.update(|w| {
            let check = book.with_untracked(|b| draft.with_untracked(|d| d.validate_step(w.current(), b)));
            w.next(check);
        });
    });
    let on_submit = Callback::new(move |_: ()| {
        let body = match book.with_untracked(|b| draft.with_untracked(|d| d.build(b))) {
            Ok(body) => body,
            Err(e) => {
                wizard.update(|w| w.set_error(e));
                return;
            }
        };
        submitting.set(true);
        spawn_local(async move {
            match api::create_solicitud(&body).await {
                Ok(()) => on_done.run(()),
                Err(e) => {
                    log::error!("crear solicitud falló: {}", e);
                    alert(&format!("No se pudo crear la solicitud: {}", e));
                    submitting.set(false);
                }
            }
        });
    });

    let destination_name = move || {
        let loc = draft.with(|d| d.destino.clone());
        let farm = farms.with(|f| f.iter().find(|f| f.id == loc.finca_id).map(|f| f.nombre.clone()));
        let lot = loc.lote_id.as_ref().and_then(|lid| {
            lots.with(|m| {
                m.get(&loc.finca_id)
                    .and_then(|ls| ls.iter().find(|l| &l.id == lid).map(|l| l.nombre.clone()))
            })
        });
        match (farm, lot) {
            (Some(f), Some(l)) => format!("{} / {}", f, l),
            (Some(f), None) => f,
            _ => String::new(),
        }
    };

    let step = Memo::new(move |_| wizard.with(|w| w.current()));

    let destination_step = move || {
        view! {
            <div class="details-form">
                <LocationPicker
                    label="Destino"
                    farms=farms
                    lots=lots
                    value=Signal::derive(move || draft.with(|d| d.destino.clone()))
                    on_change=Callback::new(move |loc: Location| {
                        draft.update(|d| d.destino = loc);
                        dirty.set(true);
                    })
                />
                <div class="form-group">
                    <label>"Nota"</label>
                    <textarea
                        rows="2"
                        prop:value=move || draft.with(|d| d.nota.clone())
                        on:input=move |ev| draft.update(|d| d.nota = event_target_value(&ev))
                    />
                </div>
            </div>
        }
        .into_any()
    };

    let products_step = move || {
        view! {
            <div class="wizard-lines">
                <div class="wizard-lines__add">
                    <ProductSelect
                        products=products
                        value=pick_product
                        on_change=Callback::new(move |id: String| pick_product.set(id))
                    />
                    <input
                        type="text"
                        inputmode="decimal"
                        placeholder="Cantidad"
                        prop:value=move || pick_qty.get()
                        on:input=move |ev| pick_qty.set(event_target_value(&ev))
                    />
                    <button class="button button--secondary" on:click=add_line>"Agregar"</button>
                </div>
                <table class="table__data">
                    <thead class="table__head">
                        <tr>
                            <th class="table__header-cell">"Producto"</th>
                            <th class="table__header-cell table__header-cell--right">"Cantidad"</th>
                            <th class="table__header-cell table__header-cell--right">"Disponible"</th>
                            <th class="table__header-cell"></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || draft.with(|d| d.lines.lines().to_vec())
                            key=|l| l.key
                            children=move |line| {
                                let key: Uuid = line.key;
                                let available = book.with_untracked(|b| b.available(&line.producto_id));
                                view! {
                                    <tr class="table__row">
                                        <td class="table__cell">{line.producto_nombre.clone()}</td>
                                        <td class="table__cell table__cell--right">
                                            <input
                                                type="text"
                                                inputmode="decimal"
                                                value=format_for_input(line.cantidad, 6)
                                                on:change=move |ev| {
                                                    let v = parse_number(&event_target_value(&ev)).unwrap_or(0.0);
                                                    draft.update(|d| d.lines.set_quantity(key, v));
                                                    dirty.set(true);
                                                }
                                            />
                                        </td>
                                        <td class="table__cell table__cell--right">{format_quantity(available)}</td>
                                        <td class="table__cell">
                                            <button
                                                class="button button--ghost button--small"
                                                on:click=move |_| draft.update(|d| d.lines.remove(key))
                                            >
                                                "Quitar"
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </div>
        }
        .into_any()
    };

    let confirm_step = move || {
        let merged = draft.with(|d| d.lines.merged());
        view! {
            <div class="wizard-summary">
                <dl class="summary-list">
                    <dt>"Destino"</dt>
                    <dd>{destination_name}</dd>
                </dl>
                <table class="table__data">
                    <tbody>
                        {merged
                            .into_iter()
                            .map(|l| {
                                view! {
                                    <tr class="table__row">
                                        <td class="table__cell">{l.producto_nombre.clone()}</td>
                                        <td class="table__cell table__cell--right">{format_quantity(l.cantidad)}</td>
                                    </tr>
                                }
                            })
                            .collect_view()}
                    </tbody>
                </table>
            </div>
        }
        .into_any()
    };

    view! {
        <div class="wizard">
            <WizardSteps wizard=wizard />
            <div class="wizard__body">
                {move || match step.get() {
                    SolicitudStep::Destination => destination_step(),
                    SolicitudStep::Products => products_step(),
                    SolicitudStep::Confirm => confirm_step(),
                }}
            </div>
            <WizardNav
                wizard=wizard
                submitting=submitting
                on_next=on_next
                on_submit=on_submit
                on_cancel=on_cancel
                submit_label="Enviar solicitud"
            />
        </div>
    }
}
