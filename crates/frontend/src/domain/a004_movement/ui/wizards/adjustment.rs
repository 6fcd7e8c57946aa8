use contracts::domain::a001_product::aggregate::Product;
use contracts::domain::a004_movement::aggregate::MovementKind;
use contracts::domain::a004_movement::draft::{AdjustmentDraft, AdjustmentStep};
use contracts::shared::stock::StockBook;
use contracts::shared::wizard::Wizard;
use leptos::prelude::*;

use super::common::{load_inventory, submit_movement, ProductSelect, WizardNav};
use crate::shared::components::wizard_steps::WizardSteps;
use crate::shared::number_format::{format_for_input, format_quantity, parse_number};

/// Physical count: the ledger records the difference against the book stock
#[component]
pub fn AdjustmentWizard(dirty: RwSignal<bool>, on_done: Callback<()>, on_cancel: Callback<()>) -> impl IntoView {
    let wizard = RwSignal::new(Wizard::<AdjustmentStep>::new());
    let draft = RwSignal::new(AdjustmentDraft::default());
    let products: RwSignal<Vec<Product>> = RwSignal::new(Vec::new());
    let book = RwSignal::new(StockBook::default());
    let submitting = RwSignal::new(false);

    load_inventory(products, book, wizard);

    let selected = move || {
        let id = draft.with(|d| d.producto_id.clone());
        products.with(|list| list.iter().find(|p| p.id == id).cloned())
    };
    let delta = move || book.with(|b| draft.with(|d| d.delta(b)));

    let on_next = Callback::new(move |_: ()| {
        wizard.update(|w| {
            let check = book.with_untracked(|b| draft.with_untracked(|d| d.validate_step(w.current(), b)));
            w.next(check);
        });
    });
    let on_submit = Callback::new(move |_: ()| {
        match book.with_untracked(|b| draft.with_untracked(|d| d.build(b))) {
            Ok(request) => submit_movement(MovementKind::Ajuste, request, submitting, on_done),
            Err(e) => wizard.update(|w| w.set_error(e)),
        }
    });

    let step = Memo::new(move |_| wizard.with(|w| w.current()));

    view! {
        <div class="wizard">
            <WizardSteps wizard=wizard />
            <div class="wizard__body">
                {move || match step.get() {
                    AdjustmentStep::Product => {
                        view! {
                            <div class="details-form">
                                <div class="form-group">
                                    <label>"Producto"</label>
                                    <ProductSelect
                                        products=products
                                        value=Signal::derive(move || draft.with(|d| d.producto_id.clone()))
                                        on_change=Callback::new(move |id: String| {
                                            let stock = book.with_untracked(|b| b.available(&id));
                                            draft.update(|d| {
                                                d.producto_id = id;
                                                d.cantidad_contada = stock;
                                            });
                                            dirty.set(true);
                                        })
                                    />
                                </div>
                            </div>
                        }
                        .into_any()
                    }
                    AdjustmentStep::Count => {
                        view! {
                            <div class="details-form">
                                <p class="form-hint">
                                    {move || {
                                        selected()
                                            .map(|p| format!("Existencia en libros: {} {}", format_quantity(p.stock), p.unidad))
                                            .unwrap_or_default()
                                    }}
                                </p>
                                <div class="form-group">
                                    <label>"Cantidad contada"</label>
                                    <input
                                        type="text"
                                        inputmode="decimal"
                                        prop:value=move || draft.with(|d| format_for_input(d.cantidad_contada, 6))
                                        on:change=move |ev| {
                                            let v = parse_number(&event_target_value(&ev)).unwrap_or(-1.0);
                                            draft.update(|d| d.cantidad_contada = v);
                                            dirty.set(true);
                                        }
                                    />
                                </div>
                                <p
                                    class="wizard-delta"
                                    class:wizard-delta--negative=move || delta() < 0.0
                                >
                                    {move || {
                                        let d = delta();
                                        let sign = if d > 0.0 { "+" } else { "" };
                                        format!("Diferencia: {}{}", sign, format_quantity(d))
                                    }}
                                </p>
                                <div class="form-group">
                                    <label>"Motivo"</label>
                                    <textarea
                                        rows="2"
                                        prop:value=move || draft.with(|d| d.motivo.clone())
                                        on:input=move |ev| {
                                            draft.update(|d| d.motivo = event_target_value(&ev));
                                            dirty.set(true);
                                        }
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
