use contracts::domain::a003_farm::aggregate::{lots_by_farm, Farm, Lot};
use contracts::domain::a005_request::aggregate::{
    count_by_status, filter_by_status, RequestStatus, Solicitud,
};
use contracts::domain::a005_request::workflow::{allowed_actions, RequestAction};
use contracts::domain::common::Resource;
use contracts::shared::list_filter::filter_by_text;
use contracts::system::auth::UserInfo;
use contracts::system::users::Permission;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::{Flex, FlexAlign, FlexGap, Spinner};
use std::collections::BTreeMap;

use crate::domain::a003_farm::api::{fetch_farms, fetch_lots};
use crate::domain::a004_movement::ui::wizards::common::{confirm, confirm_discard};
use crate::domain::a005_request::api;
use crate::domain::a005_request::ui::actions::{DeliveryForm, RejectForm};
use crate::domain::a005_request::ui::details::SolicitudDetails;
use crate::domain::a005_request::ui::wizard::SolicitudWizard;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::badge::Badge;
use crate::shared::components::error_banner::{clear_load_failure, ErrorBanner};
use crate::shared::config::config;
use crate::shared::date_utils::format_date;
use crate::shared::list_utils::SearchInput;
use crate::shared::modal_stack::{ModalOptions, ModalStackService};
use crate::shared::number_format::format_quantity;
use crate::shared::page_frame::{PageFrame, PageHeader, PAGE_CAT_LIST};
use crate::shared::polling::use_polling;
use crate::shared::refresh::use_refresh_trigger;
use crate::system::auth::context::use_current_user;

/// Users without `ViewAllRequests` only see their own solicitudes
fn scope_for_user(items: &[Solicitud], user: Option<&UserInfo>) -> Vec<Solicitud> {
    match user {
        Some(u) if u.rol.can(Permission::ViewAllRequests) => items.to_vec(),
        Some(u) => items.iter().filter(|s| s.solicitante_id == u.id).cloned().collect(),
        None => Vec::new(),
    }
}

fn destination_label(s: &Solicitud, farms: &[Farm], lots: &BTreeMap<String, Vec<Lot>>) -> String {
    let farm = farms
        .iter()
        .find(|f| f.id == s.finca_id)
        .map(|f| f.nombre.clone())
        .unwrap_or_else(|| s.finca_id.clone());
    let lot = s.lote_id.as_ref().and_then(|lid| {
        lots.get(&s.finca_id)
            .and_then(|ls| ls.iter().find(|l| &l.id == lid))
            .map(|l| l.nombre.clone())
    });
    match lot {
        Some(l) => format!("{} / {}", farm, l),
        None => farm,
    }
}

#[component]
pub fn SolicitudList() -> impl IntoView {
    let all_items: RwSignal<Vec<Solicitud>> = RwSignal::new(Vec::new());
    let farms: RwSignal<Vec<Farm>> = RwSignal::new(Vec::new());
    let lots: RwSignal<BTreeMap<String, Vec<Lot>>> = RwSignal::new(BTreeMap::new());
    let status_filter: RwSignal<Option<RequestStatus>> = RwSignal::new(None);
    let search_query = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let is_loaded = RwSignal::new(false);
    let refresh = use_refresh_trigger();
    let user = use_current_user();
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let modal_stack = use_context::<ModalStackService>().expect("ModalStackService not found in context");

    let load_data = move || {
        spawn_local(async move {
            match api::fetch_solicitudes().await {
                Ok(mut list) => {
                    list.sort_by(|a, b| b.creada.cmp(&a.creada).then_with(|| b.numero.cmp(&a.numero)));
                    all_items.set(list);
                    is_loaded.set(true);
                    clear_load_failure(error);
                }
                Err(e) => error.set(Some(format!("No se pudieron cargar las solicitudes: {}", e))),
            }
        });
    };

    Effect::new(move |_| {
        refresh.track();
        load_data();
    });
    use_polling(config().poll_interval_ms(), load_data);

    // Farm names only label the destination column; a failure leaves the ids.
    spawn_local(async move {
        if let (Ok(f), Ok(l)) = (fetch_farms().await, fetch_lots().await) {
            farms.set(f);
            lots.set(lots_by_farm(&l));
        }
    });

    Effect::new(move |_| {
        if let Some(preset) = ctx.take_preset(&Solicitud::full_name()) {
            status_filter.set(RequestStatus::from_str_opt(&preset));
        }
    });

    let scoped = Memo::new(move |_| {
        let u = user.get();
        let query = search_query.get();
        let items = all_items.with(|items| scope_for_user(items, u.as_ref()));
        filter_by_text(&items, &query, config().search.min_chars)
    });
    let counts = Memo::new(move |_| scoped.with(|s| count_by_status(s)));
    let visible = Memo::new(move |_| scoped.with(|s| filter_by_status(s, status_filter.get())));

    let destination_of = move |s: &Solicitud| farms.with(|f| lots.with(|l| destination_label(s, f, l)));

    let open_details = move |s: Solicitud| {
        let destino = destination_of(&s);
        modal_stack.push(ModalOptions::titled(format!("Solicitud {}", s.numero)).width("640px"), move |handle| {
            view! {
                <SolicitudDetails
                    solicitud=s.clone()
                    destino=destino.clone()
                    on_close=Callback::new(move |_: ()| handle.close())
                />
            }
            .into_any()
        });
    };

    let run_action = move |s: Solicitud, action: RequestAction| {
        if action.needs_form() {
            let title = format!("{} solicitud {}", action.label(), s.numero);
            modal_stack.push(ModalOptions::titled(title).width("600px"), move |handle| {
                let on_done = Callback::new(move |_: ()| {
                    handle.close();
                    refresh.bump();
                });
                let on_cancel = Callback::new(move |_: ()| handle.close());
                match action {
                    RequestAction::Entregar => {
                        view! { <DeliveryForm solicitud=s.clone() on_done=on_done on_cancel=on_cancel /> }.into_any()
                    }
                    _ => view! { <RejectForm solicitud=s.clone() on_done=on_done on_cancel=on_cancel /> }.into_any(),
                }
            });
            return;
        }

        if !confirm(&format!("¿{} la solicitud {}?", action.label(), s.numero)) {
            return;
        }
        spawn_local(async move {
            match api::perform_simple_action(&s.id, action).await {
                Ok(()) => refresh.bump(),
                Err(e) => error.set(Some(format!("No se pudo {} la solicitud {}: {}", action.as_str(), s.numero, e))),
            }
        });
    };

    let open_wizard = move |_| {
        let dirty = RwSignal::new(false);
        let options = ModalOptions::titled("Nueva solicitud")
            .width("760px")
            .guard(move || !dirty.get_untracked() || confirm_discard());
        modal_stack.push(options, move |handle| {
            view! {
                <SolicitudWizard
                    dirty=dirty
                    on_done=Callback::new(move |_: ()| {
                        handle.close();
                        refresh.bump();
                    })
                    on_cancel=Callback::new(move |_: ()| {
                        if !dirty.get_untracked() || confirm_discard() {
                            handle.close();
                        }
                    })
                />
            }
            .into_any()
        });
    };

    let can_create = Signal::derive(move || user.with(|u| u.as_ref().is_some_and(|u| u.rol.can(Permission::CreateRequests))));

    view! {
        <PageFrame page_id="a005_request--list" category=PAGE_CAT_LIST>
            <PageHeader title=Solicitud::list_name()>
                <SearchInput
                    value=search_query
                    on_change=Callback::new(move |q: String| search_query.set(q))
                    placeholder="Número, solicitante o producto"
                />
                <Show when=move || can_create.get()>
                    <button class="button button--primary" on:click=open_wizard>"Nueva solicitud"</button>
                </Show>
            </PageHeader>

            <div class="status-filter">
                <button
                    class="status-filter__chip"
                    class:status-filter__chip--active=move || status_filter.get().is_none()
                    on:click=move |_| status_filter.set(None)
                >
                    {move || format!("Todas ({})", scoped.with(|s| s.len()))}
                </button>
                {RequestStatus::ALL
                    .into_iter()
                    .map(|st| {
                        view! {
                            <button
                                class="status-filter__chip"
                                class:status-filter__chip--active=move || status_filter.get() == Some(st)
                                on:click=move |_| status_filter.set(Some(st))
                            >
                                {move || format!("{} ({})", st.label(), counts.with(|c| c.get(&st).copied().unwrap_or(0)))}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>

            <ErrorBanner error=error />

            <div class="page__content">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            <th class="table__header-cell">"Número"</th>
                            <th class="table__header-cell">"Fecha"</th>
                            <th class="table__header-cell">"Solicitante"</th>
                            <th class="table__header-cell">"Destino"</th>
                            <th class="table__header-cell table__header-cell--right">"Cantidad total"</th>
                            <th class="table__header-cell">"Estado"</th>
                            <th class="table__header-cell">"Acciones"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || visible.get()
                            key=|s| (s.id.clone(), s.estado)
                            children=move |s| {
                                let actions = user.with_untracked(|u| {
                                    u.as_ref().map(|u| allowed_actions(&s, u)).unwrap_or_default()
                                });
                                let for_details = s.clone();
                                let numero = s.numero.clone();
                                let destino = move || {
                                    let s = for_details.clone();
                                    destination_of(&s)
                                };
                                let for_open = s.clone();
                                view! {
                                    <tr class="table__row">
                                        <td class="table__cell">
                                            <a
                                                href="#"
                                                class="table__link"
                                                on:click=move |ev| {
                                                    ev.prevent_default();
                                                    open_details(for_open.clone());
                                                }
                                            >
                                                {numero}
                                            </a>
                                        </td>
                                        <td class="table__cell">{format_date(s.creada)}</td>
                                        <td class="table__cell">{s.solicitante.clone()}</td>
                                        <td class="table__cell">{destino}</td>
                                        <td class="table__cell table__cell--right">{format_quantity(s.total_requested())}</td>
                                        <td class="table__cell">
                                            <Badge variant=s.estado.badge_variant()>{s.estado.label()}</Badge>
                                        </td>
                                        <td class="table__cell table__cell--actions">
                                            {actions
                                                .into_iter()
                                                .map(|action| {
                                                    let target = s.clone();
                                                    let class = match action {
                                                        RequestAction::Rechazar | RequestAction::Cancelar => "button button--secondary button--small",
                                                        _ => "button button--primary button--small",
                                                    };
                                                    view! {
                                                        <button class=class on:click=move |_| run_action(target.clone(), action)>
                                                            {action.label()}
                                                        </button>
                                                    }
                                                })
                                                .collect_view()}
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
                <Show when=move || !is_loaded.get()>
                    <Flex align=FlexAlign::Center gap=FlexGap::Small class="table__empty">
                        <Spinner />
                        <span>"Cargando solicitudes..."</span>
                    </Flex>
                </Show>
                <Show when=move || is_loaded.get() && visible.with(|v| v.is_empty())>
                    <div class="table__empty">"No hay solicitudes para este filtro."</div>
                </Show>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::system::users::Role;

    fn solicitud(id: &str, solicitante_id: &str, lote: Option<&str>) -> Solicitud {
        Solicitud {
            id: id.into(),
            numero: format!("SOL-{}", id),
            solicitante_id: solicitante_id.into(),
            solicitante: solicitante_id.to_uppercase(),
            finca_id: "f1".into(),
            lote_id: lote.map(str::to_string),
            estado: RequestStatus::Pendiente,
            lineas: Vec::new(),
            motivo_rechazo: None,
            creada: NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            nota: String::new(),
        }
    }

    fn user(id: &str, rol: Role) -> UserInfo {
        UserInfo {
            id: id.into(),
            username: id.into(),
            nombre: id.into(),
            rol,
        }
    }

    #[test]
    fn test_requester_sees_only_own() {
        let items = vec![solicitud("1", "ana", None), solicitud("2", "luis", None)];
        let mine = scope_for_user(&items, Some(&user("ana", Role::Solicitante)));
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "1");

        assert_eq!(scope_for_user(&items, Some(&user("sup", Role::Supervisor))).len(), 2);
        assert!(scope_for_user(&items, None).is_empty());
    }

    #[test]
    fn test_destination_label_uses_names() {
        let farms = vec![Farm {
            id: "f1".into(),
            nombre: "La Esperanza".into(),
            ubicacion: String::new(),
            area_ha: 10.0,
            activo: true,
        }];
        let lots = lots_by_farm(&[Lot {
            id: "l1".into(),
            finca_id: "f1".into(),
            nombre: "Lote 3".into(),
            cultivo: "Café".into(),
            area_ha: 2.0,
        }]);
        assert_eq!(destination_label(&solicitud("1", "ana", Some("l1")), &farms, &lots), "La Esperanza / Lote 3");
        assert_eq!(destination_label(&solicitud("1", "ana", None), &farms, &lots), "La Esperanza");
        assert_eq!(destination_label(&solicitud("1", "ana", None), &[], &lots), "f1");
    }
}
