use contracts::domain::a001_product::aggregate::Product;
use contracts::domain::a003_farm::aggregate::{lots_by_farm, Farm, Lot};
use contracts::domain::a004_movement::aggregate::{Location, MovementKind};
use contracts::domain::a004_movement::draft::{TransferDraft, TransferStep};
use contracts::shared::stock::StockBook;
use contracts::shared::wizard::Wizard;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::BTreeMap;

use super::common::{load_inventory, submit_movement, LocationPicker, ProductSelect, WizardNav};
use crate::domain::a003_farm::api::{fetch_farms, fetch_lots};
use crate::shared::components::wizard_steps::WizardSteps;
use crate::shared::number_format::{format_for_input, format_quantity, parse_number};

#[component]
pub fn TransferWizard(dirty: RwSignal<bool>, on_done: Callback<()>, on_cancel: Callback<()>) -> impl IntoView {
    let wizard = RwSignal::new(Wizard::<TransferStep>::new());
    let draft = RwSignal::new(TransferDraft::default());
    let products: RwSignal<Vec<Product>> = RwSignal::new(Vec::new());
    let book = RwSignal::new(StockBook::default());
    let farms: RwSignal<Vec<Farm>> = RwSignal::new(Vec::new());
    let lots: RwSignal<BTreeMap<String, Vec<Lot>>> = RwSignal::new(BTreeMap::new());
    let submitting = RwSignal::new(false);

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

    let available = move || {
        let id = draft.with(|d| d.producto_id.clone());
        book.with(|b| b.available(&id))
    };

    let on_next = Callback::new(move |_: ()| {
        wizard.update(|w| {
            let check = book.with_untracked(|b| draft.with_untracked(|d| d.validate_step(w.current(), b)));
            w.next(check);
        });
    });
    let on_submit = Callback::new(move |_: ()| {
        match book.with_untracked(|b| draft.with_untracked(|d| d.build(b))) {
            Ok(request) => submit_movement(MovementKind::Transferencia, request, submitting, on_done),
            Err(e) => wizard.update(|w| w.set_error(e)),
        }
    });

    let step = Memo::new(move |_| wizard.with(|w| w.current()));

    view! {
        <div class="wizard">
            <WizardSteps wizard=wizard />
            <div class="wizard__body">
                {move || match step.get() {
                    TransferStep::Product => {
                        view! {
                            <div class="details-form">
                                <div class="form-group">
                                    <label>"Producto"</label>
                                    <ProductSelect
                                        products=products
                                        value=Signal::derive(move || draft.with(|d| d.producto_id.clone()))
                                        on_change=Callback::new(move |id: String| {
                                            draft.update(|d| d.producto_id = id);
                                            dirty.set(true);
                                        })
                                    />
                                </div>
                                <div class="form-group">
                                    <label>"Cantidad"</label>
                                    <input
                                        type="text"
                                        inputmode="decimal"
                                        prop:value=move || draft.with(|d| if d.cantidad > 0.0 { format_for_input(d.cantidad, 6) } else { String::new() })
                                        on:change=move |ev| {
                                            let v = parse_number(&event_target_value(&ev)).unwrap_or(0.0);
                                            draft.update(|d| d.cantidad = v);
                                            dirty.set(true);
                                        }
                                    />
                                    <small class="form-hint">
                                        {move || format!("Disponible: {}", format_quantity(available()))}
                                    </small>
                                </div>
                            </div>
                        }
                        .into_any()
                    }
                    TransferStep::Locations => {
                        view! {
                            <div class="details-form details-form--columns">
                                <LocationPicker
                                    label="Origen"
                                    farms=farms
                                    lots=lots
                                    value=Signal::derive(move || draft.with(|d| d.origen.clone()))
                                    on_change=Callback::new(move |loc: Location| {
                                        draft.update(|d| d.origen = loc);
                                        dirty.set(true);
                                    })
                                />
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
                    }
                }}
            </div>
            <WizardNav wizard=wizard submitting=submitting on_next=on_next on_submit=on_submit on_cancel=on_cancel />
        </div>
    }
}
