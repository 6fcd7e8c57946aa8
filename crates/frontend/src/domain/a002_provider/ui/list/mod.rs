use contracts::domain::a002_provider::aggregate::{Provider, ProviderDto, ProviderPatch};
use contracts::domain::common::Resource;
use contracts::shared::list_filter::filter_by_text;
use contracts::system::users::Permission;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a002_provider::api;
use crate::domain::a002_provider::ui::details::ProviderDetails;
use crate::shared::components::badge::ActiveBadge;
use crate::shared::components::editable_cell::ToggleCell;
use crate::shared::components::error_banner::{clear_load_failure, ErrorBanner};
use crate::shared::config::config;
use crate::shared::list_utils::SearchInput;
use crate::shared::modal_stack::{ModalOptions, ModalStackService};
use crate::shared::page_frame::{PageFrame, PageHeader, PAGE_CAT_LIST};
use crate::shared::refresh::use_refresh_trigger;
use crate::system::auth::context::use_permission;

#[component]
pub fn ProviderList() -> impl IntoView {
    let all_items: RwSignal<Vec<Provider>> = RwSignal::new(Vec::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let search_query = RwSignal::new(String::new());
    let show_inactive = RwSignal::new(true);
    let refresh = use_refresh_trigger();
    let can_edit = use_permission(Permission::ManageProviders);
    let modal_stack = use_context::<ModalStackService>().expect("ModalStackService not found in context");

    Effect::new(move |_| {
        refresh.track();
        spawn_local(async move {
            match api::fetch_providers().await {
                Ok(mut v) => {
                    v.sort_by(|a, b| a.nombre.to_lowercase().cmp(&b.nombre.to_lowercase()));
                    all_items.set(v);
                    clear_load_failure(error);
                }
                Err(e) => error.set(Some(format!("No se pudieron cargar los proveedores: {}", e))),
            }
        });
    });

    let visible = Memo::new(move |_| {
        let rows = all_items.with(|items| filter_by_text(items, &search_query.get(), config().search.min_chars));
        if show_inactive.get() {
            rows
        } else {
            rows.into_iter().filter(|p| p.activo).collect()
        }
    });

    let toggle_active = move |id: String, activo: bool| {
        let patch = ProviderPatch::Activo(activo);
        all_items.update(|list| {
            if let Some(p) = list.iter_mut().find(|p| p.id == id) {
                p.apply(&patch);
            }
        });
        api::patch_provider(&id, patch, move |e| {
            error.set(Some(format!("No se guardó el cambio: {}", e)));
            refresh.bump();
        });
    };

    let open_details = move |initial: ProviderDto| {
        let title = if initial.id.is_some() { "Editar proveedor" } else { "Nuevo proveedor" };
        modal_stack.push(ModalOptions::titled(title), move |handle| {
            view! {
                <ProviderDetails
                    initial=initial.clone()
                    on_saved=Callback::new(move |_| {
                        handle.close();
                        refresh.bump();
                    })
                    on_cancel=Callback::new(move |_| handle.close())
                />
            }
            .into_any()
        });
    };

    view! {
        <PageFrame page_id="a002_provider--list" category=PAGE_CAT_LIST>
            <PageHeader title=Provider::list_name()>
                <SearchInput
                    value=search_query
                    on_change=Callback::new(move |q: String| search_query.set(q))
                    placeholder="Buscar por nombre, NIT o email"
                />
                <label class="filter-check">
                    <input
                        type="checkbox"
                        prop:checked=move || show_inactive.get()
                        on:change=move |ev| show_inactive.set(event_target_checked(&ev))
                    />
                    " Mostrar inactivos"
                </label>
                <Show when=move || can_edit.get()>
                    <button class="button button--primary" on:click=move |_| open_details(ProviderDto::default())>
                        "Nuevo proveedor"
                    </button>
                </Show>
            </PageHeader>

            <ErrorBanner error=error />

            <div class="page__content">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            <th class="table__header-cell">"Nombre"</th>
                            <th class="table__header-cell">"NIT"</th>
                            <th class="table__header-cell">"Teléfono"</th>
                            <th class="table__header-cell">"Email"</th>
                            <th class="table__header-cell">"Estado"</th>
                            <th class="table__header-cell"></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || visible.get()
                            key=|p| (p.id.clone(), p.activo, p.nombre.clone(), p.nit.clone(), p.telefono.clone(), p.email.clone())
                            children=move |provider| {
                                let id_toggle = provider.id.clone();
                                let dto = provider.to_dto();
                                view! {
                                    <tr class="table__row" class:table__row--muted=!provider.activo>
                                        <td class="table__cell">{provider.nombre.clone()}</td>
                                        <td class="table__cell">{provider.nit.clone()}</td>
                                        <td class="table__cell">{provider.telefono.clone()}</td>
                                        <td class="table__cell">{provider.email.clone()}</td>
                                        <td class="table__cell">
                                            <ToggleCell
                                                value=provider.activo
                                                editable=can_edit
                                                on_toggle=Callback::new(move |v| toggle_active(id_toggle.clone(), v))
                                            />
                                            " "
                                            <ActiveBadge active=provider.activo />
                                        </td>
                                        <td class="table__cell">
                                            <Show when=move || can_edit.get()>
                                                <button
                                                    class="button button--ghost button--small"
                                                    on:click={
                                                        let dto = dto.clone();
                                                        move |_| open_details(dto.clone())
                                                    }
                                                >
                                                    "Editar"
                                                </button>
                                            </Show>
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </div>
        </PageFrame>
    }
}
