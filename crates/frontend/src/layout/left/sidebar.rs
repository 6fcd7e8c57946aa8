//! Navigation menu; groups and items are filtered by the user's role

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_label_for_key;
use crate::system::auth::context::use_auth;
use contracts::system::users::{Permission, Role};
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct MenuItem {
    key: &'static str,
    /// `None`: visible to every role
    permission: Option<Permission>,
}

#[derive(Clone, Debug, PartialEq)]
struct MenuGroup {
    id: &'static str,
    label: &'static str,
    items: Vec<MenuItem>,
}

fn item(key: &'static str, permission: Option<Permission>) -> MenuItem {
    MenuItem { key, permission }
}

fn menu_groups() -> Vec<MenuGroup> {
    vec![
        MenuGroup {
            id: "inicio",
            label: "Inicio",
            items: vec![item("d400_dashboard", None)],
        },
        MenuGroup {
            id: "bodega",
            label: "Bodega",
            items: vec![
                item("a001_product", None),
                item("a004_movement", Some(Permission::RegisterMovements)),
                item("a005_request", None),
            ],
        },
        MenuGroup {
            id: "catalogos",
            label: "Catálogos",
            items: vec![
                item("a002_provider", Some(Permission::ManageProviders)),
                item("a003_farm", Some(Permission::ManageFarms)),
            ],
        },
        MenuGroup {
            id: "sistema",
            label: "Sistema",
            items: vec![item("sys_users", Some(Permission::ManageUsers))],
        },
    ]
}

/// Groups with at least one item visible to `role`
fn visible_groups(role: Role) -> Vec<MenuGroup> {
    menu_groups()
        .into_iter()
        .map(|mut g| {
            g.items
                .retain(|i| i.permission.map(|p| role.can(p)).unwrap_or(true));
            g
        })
        .filter(|g| !g.items.is_empty())
        .collect()
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let (auth_state, _) = use_auth();

    let groups = move || {
        auth_state
            .with(|s| s.user_info.as_ref().map(|u| u.rol))
            .map(visible_groups)
            .unwrap_or_default()
    };

    let is_active = move |key: &'static str| ctx.active.with(|a| a.as_deref() == Some(key));

    view! {
        <nav data-zone="left" class="sidebar" class:sidebar--hidden=move || !ctx.left_open.get()>
            {move || {
                groups()
                    .into_iter()
                    .map(|group| {
                        view! {
                            <div class="sidebar__group" data-group=group.id>
                                <div class="sidebar__group-label">{group.label}</div>
                                {group
                                    .items
                                    .into_iter()
                                    .map(|i| {
                                        let key = i.key;
                                        view! {
                                            <a
                                                href="#"
                                                class="sidebar__item"
                                                class:sidebar__item--active=move || is_active(key)
                                                on:click=move |ev| {
                                                    ev.prevent_default();
                                                    ctx.open_tab(key, tab_label_for_key(key));
                                                }
                                            >
                                                {tab_label_for_key(key)}
                                            </a>
                                        }
                                    })
                                    .collect_view()}
                            </div>
                        }
                    })
                    .collect_view()
            }}
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(role: Role) -> Vec<&'static str> {
        visible_groups(role)
            .into_iter()
            .flat_map(|g| g.items.into_iter().map(|i| i.key))
            .collect()
    }

    #[test]
    fn test_solicitante_sees_only_common_items() {
        assert_eq!(keys(Role::Solicitante), vec!["d400_dashboard", "a001_product", "a005_request"]);
    }

    #[test]
    fn test_admin_sees_everything() {
        let all: usize = menu_groups().iter().map(|g| g.items.len()).sum();
        assert_eq!(keys(Role::Admin).len(), all);
    }

    #[test]
    fn test_bodeguero_has_no_system_group() {
        let groups: Vec<&str> = visible_groups(Role::Bodeguero).iter().map(|g| g.id).collect();
        assert!(!groups.contains(&"sistema"));
        assert!(keys(Role::Bodeguero).contains(&"a002_provider"));
        assert!(!keys(Role::Bodeguero).contains(&"a003_farm"));
    }
}
