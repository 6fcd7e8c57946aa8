mod state;

use contracts::shared::list_filter::filter_by_text;
use contracts::system::users::{Permission, Role, User, UserPatch};
use leptos::ev::MouseEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cmp::Ordering;

use crate::shared::components::badge::ActiveBadge;
use crate::shared::components::editable_cell::ToggleCell;
use crate::shared::components::error_banner::{clear_load_failure, ErrorBanner};
use crate::shared::config::config;
use crate::shared::list_utils::{self, get_sort_indicator, SearchInput};
use crate::shared::modal_stack::{ModalOptions, ModalStackService};
use crate::shared::page_frame::{PageFrame, PageHeader, PAGE_CAT_SYSTEM};
use crate::shared::refresh::use_refresh_trigger;
use crate::system::auth::guard::RequirePermission;
use crate::system::users::api;
use crate::system::users::ui::details::CreateUserForm;
use state::create_state;

fn compare_by_field(a: &User, b: &User, field: &str) -> Ordering {
    match field {
        "nombre" => a.nombre.to_lowercase().cmp(&b.nombre.to_lowercase()),
        "rol" => a.rol.label().cmp(b.rol.label()),
        "activo" => a.activo.cmp(&b.activo),
        _ => a.username.to_lowercase().cmp(&b.username.to_lowercase()),
    }
}

fn sort_users(items: &mut [User], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = compare_by_field(a, b, field);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

#[component]
pub fn UsersListPage() -> impl IntoView {
    view! {
        <RequirePermission permission=Permission::ManageUsers>
            <UsersList />
        </RequirePermission>
    }
}

#[component]
fn UsersList() -> impl IntoView {
    let state = create_state();
    let all_users: RwSignal<Vec<User>> = RwSignal::new(Vec::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let (loading, set_loading) = signal(false);
    let refresh = use_refresh_trigger();
    let modal_stack = use_context::<ModalStackService>().expect("ModalStackService not found in context");

    let load_data = move || {
        set_loading.set(true);
        spawn_local(async move {
            match api::fetch_users().await {
                Ok(data) => {
                    all_users.set(data);
                    state.update(|s| s.is_loaded = true);
                    clear_load_failure(error);
                }
                Err(e) => error.set(Some(format!("No se pudieron cargar los usuarios: {}", e))),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        refresh.track();
        load_data();
    });

    let visible = Memo::new(move |_| {
        let min_chars = config().search.min_chars;
        let (query, field, asc) =
            state.with(|s| (s.search_query.clone(), s.sort_field.clone(), s.sort_ascending));
        let mut rows = all_users.with(|u| filter_by_text(u, &query, min_chars));
        sort_users(&mut rows, &field, asc);
        rows
    });

    let apply_patch = move |id: String, patch: UserPatch| {
        all_users.update(|list| {
            if let Some(u) = list.iter_mut().find(|u| u.id == id) {
                u.apply(&patch);
            }
        });
        api::patch_user(&id, patch, move |e| {
            error.set(Some(format!("No se guardó el cambio: {}", e)));
            refresh.bump();
        });
    };

    let toggle_sort = move |field: &'static str| {
        move |_: MouseEvent| state.update(|s| list_utils::toggle_sort(&mut s.sort_field, &mut s.sort_ascending, field))
    };
    let indicator = move |field: &'static str| {
        move || state.with(|s| get_sort_indicator(&s.sort_field, field, s.sort_ascending))
    };

    let open_create = move |_| {
        modal_stack.push(ModalOptions::titled("Nuevo usuario").width("480px"), move |handle| {
            view! {
                <CreateUserForm
                    on_close=Callback::new(move |_| handle.close())
                    on_created=Callback::new(move |_| {
                        handle.close();
                        refresh.bump();
                    })
                />
            }
            .into_any()
        });
    };

    view! {
        <PageFrame page_id="sys_users--list" category=PAGE_CAT_SYSTEM>
            <PageHeader title="Usuarios">
                <SearchInput
                    value=Signal::derive(move || state.with(|s| s.search_query.clone()))
                    on_change=Callback::new(move |q: String| state.update(|s| s.search_query = q))
                />
                <button class="button button--primary" on:click=open_create>"Nuevo usuario"</button>
                <button class="button button--secondary" on:click=move |_| refresh.bump() disabled=move || loading.get()>
                    "Actualizar"
                </button>
            </PageHeader>

            <ErrorBanner error=error />

            <div class="page__content">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            <th class="table__header-cell table__header-cell--sortable" on:click=toggle_sort("username")>
                                "Usuario" {indicator("username")}
                            </th>
                            <th class="table__header-cell table__header-cell--sortable" on:click=toggle_sort("nombre")>
                                "Nombre" {indicator("nombre")}
                            </th>
                            <th class="table__header-cell">"Email"</th>
                            <th class="table__header-cell table__header-cell--sortable" on:click=toggle_sort("rol")>
                                "Rol" {indicator("rol")}
                            </th>
                            <th class="table__header-cell table__header-cell--sortable" on:click=toggle_sort("activo")>
                                "Activo" {indicator("activo")}
                            </th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || visible.get()
                            key=|u| (u.id.clone(), u.rol, u.activo)
                            children=move |user| {
                                let id_rol = user.id.clone();
                                let id_activo = user.id.clone();
                                let activo = user.activo;
                                view! {
                                    <tr class="table__row">
                                        <td class="table__cell">{user.username.clone()}</td>
                                        <td class="table__cell">{user.nombre.clone()}</td>
                                        <td class="table__cell">{user.email.clone().unwrap_or_default()}</td>
                                        <td class="table__cell">
                                            <select
                                                prop:value=user.rol.as_str()
                                                on:change=move |ev| {
                                                    if let Some(rol) = Role::from_str_opt(&event_target_value(&ev)) {
                                                        apply_patch(id_rol.clone(), UserPatch::Rol(rol));
                                                    }
                                                }
                                            >
                                                {Role::ALL
                                                    .into_iter()
                                                    .map(|r| view! { <option value=r.as_str() selected=r == user.rol>{r.label()}</option> })
                                                    .collect_view()}
                                            </select>
                                        </td>
                                        <td class="table__cell">
                                            <ToggleCell
                                                value=activo
                                                editable=true
                                                on_toggle=Callback::new(move |v| apply_patch(id_activo.clone(), UserPatch::Activo(v)))
                                            />
                                            <ActiveBadge active=activo />
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
                <Show when=move || state.with(|s| s.is_loaded) && visible.with(|v| v.is_empty())>
                    <div class="table__empty">"No hay usuarios que coincidan."</div>
                </Show>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, rol: Role) -> User {
        User {
            id: username.into(),
            username: username.into(),
            nombre: username.to_uppercase(),
            email: None,
            rol,
            activo: true,
        }
    }

    #[test]
    fn test_sort_users() {
        let mut list = vec![user("b", Role::Admin), user("A", Role::Solicitante), user("c", Role::Bodeguero)];
        sort_users(&mut list, "username", true);
        let names: Vec<&str> = list.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["A", "b", "c"]);

        sort_users(&mut list, "username", false);
        assert_eq!(list[0].username, "c");
    }
}
