use contracts::domain::a001_product::aggregate::Product;
use contracts::domain::a002_provider::aggregate::Provider;
use contracts::domain::a004_movement::aggregate::MovementKind;
use contracts::domain::a004_movement::draft::{IngressDraft, IngressStep};
use contracts::shared::stock::StockBook;
use contracts::shared::wizard::Wizard;
use leptos::prelude::*;
use leptos::task::spawn_local;
use uuid::Uuid;

use super::common::{load_inventory, submit_movement, ProductSelect, WizardNav};
use crate::domain::a002_provider::api::fetch_providers;
use crate::shared::components::wizard_steps::WizardSteps;
use crate::shared::date_utils::{format_date, parse_input_value, to_input_value, today};
use crate::shared::number_format::{format_for_input, format_money, format_quantity, parse_number};

#[component]
pub fn IngressWizard(dirty: RwSignal<bool>, on_done: Callback<()>, on_cancel: Callback<()>) -> impl IntoView {
    let wizard = RwSignal::new(Wizard::<IngressStep>::new());
    let draft = RwSignal::new(IngressDraft::new(today()));
    let products: RwSignal<Vec<Product>> = RwSignal::new(Vec::new());
    let book = RwSignal::new(StockBook::default());
    let providers: RwSignal<Vec<Provider>> = RwSignal::new(Vec::new());
    let submitting = RwSignal::new(false);

    let pick_product = RwSignal::new(String::new());
    let pick_qty = RwSignal::new(String::new());
    let pick_cost = RwSignal::new(String::new());

    load_inventory(products, book, wizard);
    spawn_local(async move {
        match fetch_providers().await {
            Ok(list) => providers.set(list.into_iter().filter(|p| p.activo).collect()),
            Err(e) => wizard.update(|w| w.set_error(format!("No se pudieron cargar los proveedores: {}", e))),
        }
    });

    let edit = move |f: &dyn Fn(&mut IngressDraft)| {
        draft.update(|d| f(d));
        dirty.set(true);
    };

    // Picking a product proposes its catalog price as unit cost.
    let on_pick = Callback::new(move |id: String| {
        let price = products.with_untracked(|list| list.iter().find(|p| p.id == id).map(|p| p.precio));
        if let Some(price) = price {
            pick_cost.set(format_for_input(price, 6));
        }
        pick_product.set(id);
    });

    let add_line = move |_| {
        let id = pick_product.get_untracked();
        let Some(product) = products.with_untracked(|list| list.iter().find(|p| p.id == id).cloned()) else {
            wizard.update(|w| w.set_error("Seleccione un producto"));
            return;
        };
        let qty = parse_number(&pick_qty.get_untracked()).unwrap_or(0.0);
        let cost = parse_number(&pick_cost.get_untracked()).unwrap_or(product.precio);
        edit(&|d| {
            d.lines.add(&product, qty, cost);
        });
        wizard.update(|w| w.clear_error());
        pick_product.set(String::new());
        pick_qty.set(String::new());
        pick_cost.set(String::new());
    };

    let provider_name = move || {
        let id = draft.with(|d| d.proveedor_id.clone());
        providers.with(|list| list.iter().find(|p| p.id == id).map(|p| p.nombre.clone()).unwrap_or_default())
    };

    let on_next = Callback::new(move |_: ()| {
        wizard.update(|w| {
            let check = draft.with_untracked(|d| d.validate_step(w.current()));
            w.next(check);
        });
    });
    let on_submit = Callback::new(move |_: ()| match draft.with_untracked(|d| d.build()) {
        Ok(request) => submit_movement(MovementKind::Ingreso, request, submitting, on_done),
        Err(e) => wizard.update(|w| w.set_error(e)),
    });

    let header_step = move || {
        view! {
            <div class="details-form">
                <div class="form-group">
                    <label>"Proveedor"</label>
                    <select
                        class="form-select"
                        prop:value=move || draft.with(|d| d.proveedor_id.clone())
                        on:change=move |ev| {
                            let v = event_target_value(&ev);
                            edit(&|d| d.proveedor_id = v.clone());
                        }
                    >
                        <option value="">"Seleccione un proveedor"</option>
                        {move || {
                            providers
                                .get()
                                .into_iter()
                                .map(|p| view! { <option value=p.id.clone()>{format!("{} · {}", p.nombre, p.nit)}</option> })
                                .collect_view()
                        }}
                    </select>
                </div>
                <div class="form-group">
                    <label>"Factura"</label>
                    <input
                        type="text"
                        prop:value=move || draft.with(|d| d.factura.clone())
                        on:input=move |ev| {
                            let v = event_target_value(&ev);
                            edit(&|d| d.factura = v.clone());
                        }
                    />
                </div>
                <div class="form-group">
                    <label>"Fecha"</label>
                    <input
                        type="date"
                        prop:value=move || draft.with(|d| to_input_value(d.fecha))
                        on:change=move |ev| {
                            if let Some(fecha) = parse_input_value(&event_target_value(&ev)) {
                                edit(&|d| d.fecha = fecha);
                            }
                        }
                    />
                </div>
                <div class="form-group">
                    <label>"Nota"</label>
                    <textarea
                        rows="2"
                        prop:value=move || draft.with(|d| d.nota.clone())
                        on:input=move |ev| {
                            let v = event_target_value(&ev);
                            edit(&|d| d.nota = v.clone());
                        }
                    />
                </div>
            </div>
        }
        .into_any()
    };

    let lines_step = move || {
        view! {
            <div class="wizard-lines">
                <div class="wizard-lines__add">
                    <ProductSelect products=products value=pick_product on_change=on_pick />
                    <input
                        type="text"
                        inputmode="decimal"
                        placeholder="Cantidad"
                        prop:value=move || pick_qty.get()
                        on:input=move |ev| pick_qty.set(event_target_value(&ev))
                    />
                    <input
                        type="text"
                        inputmode="decimal"
                        placeholder="Costo unitario"
                        prop:value=move || pick_cost.get()
                        on:input=move |ev| pick_cost.set(event_target_value(&ev))
                    />
                    <button class="button button--secondary" on:click=add_line>"Agregar"</button>
                </div>
                <table class="table__data">
                    <thead class="table__head">
                        <tr>
                            <th class="table__header-cell">"Producto"</th>
                            <th class="table__header-cell table__header-cell--right">"Cantidad"</th>
                            <th class="table__header-cell table__header-cell--right">"Costo unitario"</th>
                            <th class="table__header-cell"></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || draft.with(|d| d.lines.lines().to_vec())
                            key=|l| l.key
                            children=move |line| {
                                let key: Uuid = line.key;
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
                                                    edit(&|d| d.lines.set_quantity(key, v));
                                                }
                                            />
                                        </td>
                                        <td class="table__cell table__cell--right">
                                            <input
                                                type="text"
                                                inputmode="decimal"
                                                value=format_for_input(line.costo_unitario, 6)
                                                on:change=move |ev| {
                                                    let v = parse_number(&event_target_value(&ev)).unwrap_or(-1.0);
                                                    edit(&|d| d.lines.set_cost(key, v));
                                                }
                                            />
                                        </td>
                                        <td class="table__cell">
                                            <button
                                                class="button button--ghost button--small"
                                                on:click=move |_| edit(&|d| d.lines.remove(key))
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
                <div class="wizard-lines__total">
                    {move || format!("Total: {}", format_money(draft.with(|d| d.lines.total_cost())))}
                </div>
            </div>
        }
        .into_any()
    };

    let confirm_step = move || {
        let d = draft.get();
        let merged = d.lines.merged();
        view! {
            <div class="wizard-summary">
                <dl class="summary-list">
                    <dt>"Proveedor"</dt>
                    <dd>{provider_name}</dd>
                    <dt>"Factura"</dt>
                    <dd>{d.factura.clone()}</dd>
                    <dt>"Fecha"</dt>
                    <dd>{format_date(d.fecha)}</dd>
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
                                        <td class="table__cell table__cell--right">{format_money(l.costo_unitario)}</td>
                                        <td class="table__cell table__cell--right">{format_money(l.cantidad * l.costo_unitario)}</td>
                                    </tr>
                                }
                            })
                            .collect_view()}
                    </tbody>
                </table>
                <div class="wizard-lines__total">{format!("Total: {}", format_money(d.lines.total_cost()))}</div>
            </div>
        }
        .into_any()
    };

    let step = Memo::new(move |_| wizard.with(|w| w.current()));

    view! {
        <div class="wizard">
            <WizardSteps wizard=wizard />
            <div class="wizard__body">
                {move || match step.get() {
                    IngressStep::Header => header_step(),
                    IngressStep::Lines => lines_step(),
                    IngressStep::Confirm => confirm_step(),
                }}
            </div>
            <WizardNav wizard=wizard submitting=submitting on_next=on_next on_submit=on_submit on_cancel=on_cancel />
        </div>
    }
}
