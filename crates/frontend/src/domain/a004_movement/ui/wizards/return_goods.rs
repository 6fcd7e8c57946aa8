use contracts::domain::a001_product::aggregate::Product;
use contracts::domain::a002_provider::aggregate::Provider;
use contracts::domain::a004_movement::aggregate::MovementKind;
use contracts::domain::a004_movement::draft::{ReturnDraft, ReturnMode, ReturnStep};
use contracts::domain::a005_request::aggregate::{filter_by_status, RequestStatus, Solicitud};
use contracts::shared::stock::StockBook;
use contracts::shared::wizard::Wizard;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::common::{load_inventory, submit_movement, ProductSelect, WizardNav};
use crate::domain::a002_provider::api::fetch_providers;
use crate::domain::a005_request::api::fetch_solicitudes;
use crate::shared::components::wizard_steps::WizardSteps;
use crate::shared::number_format::{format_for_input, format_quantity, parse_number};

/// Lines of a delivered solicitud that still have something to give back
fn returnable_lines(solicitud: &Solicitud) -> Vec<(String, String, f64)> {
    solicitud
        .lineas
        .iter()
        .filter_map(|l| {
            let (nombre, left) = solicitud.returnable(&l.producto_id)?;
            (left > 0.0).then(|| (l.producto_id.clone(), nombre, left))
        })
        .collect()
}

#[component]
pub fn ReturnWizard(dirty: RwSignal<bool>, on_done: Callback<()>, on_cancel: Callback<()>) -> impl IntoView {
    let wizard = RwSignal::new(Wizard::<ReturnStep>::new());
    let draft = RwSignal::new(ReturnDraft::default());
    let products: RwSignal<Vec<Product>> = RwSignal::new(Vec::new());
    let book = RwSignal::new(StockBook::default());
    let providers: RwSignal<Vec<Provider>> = RwSignal::new(Vec::new());
    let delivered: RwSignal<Vec<Solicitud>> = RwSignal::new(Vec::new());
    let submitting = RwSignal::new(false);

    load_inventory(products, book, wizard);
    spawn_local(async move {
        match fetch_solicitudes().await {
            Ok(list) => delivered.set(filter_by_status(&list, Some(RequestStatus::Entregada))),
            Err(e) => wizard.update(|w| w.set_error(format!("No se pudieron cargar las solicitudes: {}", e))),
        }
        if let Ok(list) = fetch_providers().await {
            providers.set(list.into_iter().filter(|p| p.activo).collect());
        }
    });

    let solicitud = move || {
        let id = draft.with(|d| d.solicitud_id.clone());
        delivered.with(|list| list.iter().find(|s| s.id == id).cloned())
    };

    let on_next = Callback::new(move |_: ()| {
        let sol = solicitud();
        wizard.update(|w| {
            let check = book.with_untracked(|b| draft.with_untracked(|d| d.validate_step(w.current(), b, sol.as_ref())));
            w.next(check);
        });
    });
    let on_submit = Callback::new(move |_: ()| {
        let sol = solicitud();
        match book.with_untracked(|b| draft.with_untracked(|d| d.build(b, sol.as_ref()))) {
            Ok(request) => submit_movement(MovementKind::Devolucion, request, submitting, on_done),
            Err(e) => wizard.update(|w| w.set_error(e)),
        }
    });

    let set_mode = move |modo: ReturnMode| {
        draft.update(|d| {
            if d.modo != modo {
                d.modo = modo;
                d.producto_id.clear();
            }
        });
        dirty.set(true);
    };

    let step = Memo::new(move |_| wizard.with(|w| w.current()));
    let mode = Memo::new(move |_| draft.with(|d| d.modo));

    let origin_step = move || {
        view! {
            <div class="details-form">
                <div class="form-group form-group--inline">
                    <label>
                        <input
                            type="radio"
                            name="return-mode"
                            prop:checked=move || mode.get() == ReturnMode::Solicitud
                            on:change=move |_| set_mode(ReturnMode::Solicitud)
                        />
                        " Sobrante de solicitud (a bodega)"
                    </label>
                    <label>
                        <input
                            type="radio"
                            name="return-mode"
                            prop:checked=move || mode.get() == ReturnMode::Proveedor
                            on:change=move |_| set_mode(ReturnMode::Proveedor)
                        />
                        " Al proveedor"
                    </label>
                </div>
                <Show
                    when=move || mode.get() == ReturnMode::Solicitud
                    fallback=move || {
                        view! {
                            <div class="form-group">
                                <label>"Proveedor"</label>
                                <select
                                    class="form-select"
                                    prop:value=move || draft.with(|d| d.proveedor_id.clone())
                                    on:change=move |ev| {
                                        draft.update(|d| d.proveedor_id = event_target_value(&ev));
                                        dirty.set(true);
                                    }
                                >
                                    <option value="">"Seleccione un proveedor"</option>
                                    {move || {
                                        providers
                                            .get()
                                            .into_iter()
                                            .map(|p| view! { <option value=p.id.clone()>{p.nombre.clone()}</option> })
                                            .collect_view()
                                    }}
                                </select>
                            </div>
                        }
                    }
                >
                    <div class="form-group">
                        <label>"Solicitud entregada"</label>
                        <select
                            class="form-select"
                            prop:value=move || draft.with(|d| d.solicitud_id.clone())
                            on:change=move |ev| {
                                draft.update(|d| {
                                    d.solicitud_id = event_target_value(&ev);
                                    d.producto_id.clear();
                                });
                                dirty.set(true);
                            }
                        >
                            <option value="">"Seleccione una solicitud"</option>
                            {move || {
                                delivered
                                    .get()
                                    .into_iter()
                                    .map(|s| {
                                        let label = format!("{} · {}", s.numero, s.solicitante);
                                        view! { <option value=s.id.clone()>{label}</option> }
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </div>
                </Show>
            </div>
        }
        .into_any()
    };

    let product_step = move || {
        view! {
            <div class="details-form">
                <div class="form-group">
                    <label>"Producto"</label>
                    <Show
                        when=move || mode.get() == ReturnMode::Solicitud
                        fallback=move || {
                            view! {
                                <ProductSelect
                                    products=products
                                    value=Signal::derive(move || draft.with(|d| d.producto_id.clone()))
                                    on_change=Callback::new(move |id: String| {
                                        draft.update(|d| d.producto_id = id);
                                        dirty.set(true);
                                    })
                                />
                            }
                        }
                    >
                        <select
                            class="form-select"
                            prop:value=move || draft.with(|d| d.producto_id.clone())
                            on:change=move |ev| {
                                draft.update(|d| d.producto_id = event_target_value(&ev));
                                dirty.set(true);
                            }
                        >
                            <option value="">"Seleccione un producto"</option>
                            {move || {
                                solicitud()
                                    .map(|s| returnable_lines(&s))
                                    .unwrap_or_default()
                                    .into_iter()
                                    .map(|(id, nombre, left)| {
                                        let label = format!("{} (hasta {})", nombre, format_quantity(left));
                                        view! { <option value=id>{label}</option> }
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </Show>
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
                </div>
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
    };

    view! {
        <div class="wizard">
            <WizardSteps wizard=wizard />
            <div class="wizard__body">
                {move || match step.get() {
                    ReturnStep::Origin => origin_step(),
                    ReturnStep::Product => product_step(),
                }}
            </div>
            <WizardNav wizard=wizard submitting=submitting on_next=on_next on_submit=on_submit on_cancel=on_cancel />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::domain::a005_request::aggregate::SolicitudLine;

    fn line(id: &str, entregada: f64, devuelta: f64) -> SolicitudLine {
        SolicitudLine {
            producto_id: id.into(),
            producto_nombre: id.to_uppercase(),
            cantidad: 10.0,
            cantidad_entregada: entregada,
            cantidad_devuelta: devuelta,
        }
    }

    #[test]
    fn test_returnable_lines_skip_fully_returned() {
        let s = Solicitud {
            id: "s1".into(),
            numero: "SOL-0001".into(),
            solicitante_id: "u1".into(),
            solicitante: "Ana".into(),
            finca_id: "f1".into(),
            lote_id: None,
            estado: RequestStatus::Entregada,
            lineas: vec![line("urea", 8.0, 2.0), line("cal", 5.0, 5.0)],
            motivo_rechazo: None,
            creada: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            nota: String::new(),
        };
        let lines = returnable_lines(&s);
        assert_eq!(lines, vec![("urea".to_string(), "UREA".to_string(), 6.0)]);
    }
}
