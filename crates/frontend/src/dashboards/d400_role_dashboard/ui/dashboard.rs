use contracts::domain::a001_product::aggregate::Product;
use contracts::domain::a004_movement::aggregate::{Movement, MovementKind};
use contracts::domain::a005_request::aggregate::Solicitud;
use contracts::shared::dashboard::{cards_for, needs_inventory, needs_movements, DashboardCard, DashboardSummary};
use contracts::system::users::Role;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::{Flex, FlexAlign, FlexGap, Spinner};

use crate::domain::a001_product::api::fetch_inventory;
use crate::domain::a004_movement::api::fetch_movements;
use crate::domain::a005_request::api::fetch_solicitudes;
use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_label_for_key;
use crate::shared::components::error_banner::{clear_load_failure, ErrorBanner};
use crate::shared::components::stat_card::StatCard;
use crate::shared::config::config;
use crate::shared::date_utils::today;
use crate::shared::number_format::format_quantity;
use crate::shared::page_frame::{PageFrame, PageHeader, PAGE_CAT_DASHBOARD};
use crate::shared::polling::use_polling;
use crate::shared::refresh::use_refresh_trigger;
use crate::system::auth::context::use_current_user;

fn card_variant(card: DashboardCard, value: usize) -> &'static str {
    match card {
        DashboardCard::LowStock if value > 0 => "error",
        DashboardCard::PendingApprovals | DashboardCard::AwaitingDelivery if value > 0 => "warning",
        DashboardCard::MovementsToday | DashboardCard::MovementsWeek => "primary",
        _ => "neutral",
    }
}

/// Breakdown line under the week and "my requests" cards
fn card_hint(card: DashboardCard, summary: &DashboardSummary) -> Option<String> {
    let parts: Vec<String> = match card {
        DashboardCard::MovementsWeek => MovementKind::ALL
            .iter()
            .filter_map(|k| summary.movements_week.get(k).map(|n| format!("{}: {}", k.label(), n)))
            .collect(),
        DashboardCard::MyRequests => summary
            .my_requests
            .iter()
            .map(|(st, n)| format!("{}: {}", st.label(), n))
            .collect(),
        _ => return None,
    };
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" · "))
    }
}

#[component]
pub fn RoleDashboard() -> impl IntoView {
    let products: RwSignal<Vec<Product>> = RwSignal::new(Vec::new());
    let solicitudes: RwSignal<Vec<Solicitud>> = RwSignal::new(Vec::new());
    let movements: RwSignal<Vec<Movement>> = RwSignal::new(Vec::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loaded = RwSignal::new(false);
    let refresh = use_refresh_trigger();
    let user = use_current_user();
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    let role = move || user.with_untracked(|u| u.as_ref().map(|u| u.rol).unwrap_or(Role::Solicitante));

    let load_data = move || {
        let role = role();
        spawn_local(async move {
            let mut failed = false;
            if needs_inventory(role) {
                match fetch_inventory().await {
                    Ok(list) => products.set(list),
                    Err(e) => {
                        log::error!("dashboard inventory: {}", e);
                        error.set(Some(format!("No se pudo cargar el inventario: {}", e)));
                        failed = true;
                    }
                }
            }
            match fetch_solicitudes().await {
                Ok(list) => solicitudes.set(list),
                Err(e) => {
                    log::error!("dashboard solicitudes: {}", e);
                    error.set(Some(format!("No se pudieron cargar las solicitudes: {}", e)));
                    failed = true;
                }
            }
            if needs_movements(role) {
                match fetch_movements(None, "").await {
                    Ok(list) => movements.set(list),
                    Err(e) => {
                        log::error!("dashboard movements: {}", e);
                        error.set(Some(format!("No se pudieron cargar los movimientos: {}", e)));
                        failed = true;
                    }
                }
            }
            if !failed {
                clear_load_failure(error);
            }
            loaded.set(true);
        });
    };

    Effect::new(move |_| {
        refresh.track();
        load_data();
    });
    use_polling(config().poll_interval_ms(), load_data);

    let summary = Memo::new(move |_| {
        let user_id = user.with(|u| u.as_ref().map(|u| u.id.clone()).unwrap_or_default());
        products.with(|p| {
            solicitudes.with(|s| movements.with(|m| DashboardSummary::compute(&user_id, p, s, m, today())))
        })
    });

    let greeting = move || {
        user.with(|u| match u {
            Some(u) => format!("Hola, {} ({})", u.display_name(), u.rol.label()),
            None => String::new(),
        })
    };

    let cards = move || {
        cards_for(role())
            .into_iter()
            .map(|card| {
                let value = Signal::derive(move || summary.with(|s| s.value(card)).to_string());
                let initial = summary.with_untracked(|s| s.value(card));
                let hint = summary.with_untracked(|s| card_hint(card, s));
                let on_click = Callback::new(move |_: ()| match card.target_filter() {
                    Some(filter) => ctx.open_tab_with_preset(card.target_tab(), filter),
                    None => ctx.open_tab(card.target_tab(), tab_label_for_key(card.target_tab())),
                });
                match hint {
                    Some(hint) => view! {
                        <StatCard
                            title=card.title()
                            value=value
                            hint=hint
                            variant=card_variant(card, initial)
                            on_click=on_click
                        />
                    }
                    .into_any(),
                    None => view! {
                        <StatCard title=card.title() value=value variant=card_variant(card, initial) on_click=on_click />
                    }
                    .into_any(),
                }
            })
            .collect_view()
    };

    let show_low_stock = move || needs_inventory(role());

    view! {
        <PageFrame page_id="d400_dashboard--dashboard" category=PAGE_CAT_DASHBOARD>
            <PageHeader title="Inicio">
                <span class="page__subtitle">{greeting}</span>
            </PageHeader>

            <ErrorBanner error=error />

            <Show
                when=move || loaded.get()
                fallback=|| view! {
                    <Flex align=FlexAlign::Center gap=FlexGap::Small>
                        <Spinner />
                        <span>"Cargando indicadores..."</span>
                    </Flex>
                }
            >
                // Re-rendered whenever the summary changes so hints and variants stay current.
                <Flex class="dashboard__cards" gap=FlexGap::Medium style="flex-wrap: wrap;">
                    {move || {
                        summary.track();
                        cards()
                    }}
                </Flex>
            </Show>

            <Show when=show_low_stock>
                <section class="dashboard__section">
                    <h3 class="dashboard__section-title">"Productos bajo mínimo"</h3>
                    <Show
                        when=move || summary.with(|s| !s.low_stock.is_empty())
                        fallback=|| view! { <div class="table__empty">"Todo el inventario está sobre el mínimo."</div> }
                    >
                        <table class="table__data table--striped">
                            <thead class="table__head">
                                <tr>
                                    <th class="table__header-cell">"Código"</th>
                                    <th class="table__header-cell">"Producto"</th>
                                    <th class="table__header-cell table__header-cell--right">"Stock"</th>
                                    <th class="table__header-cell table__header-cell--right">"Mínimo"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || summary.with(|s| s.low_stock.clone())
                                    key=|p| (p.id.clone(), p.stock.to_bits(), p.stock_minimo.to_bits())
                                    children=move |p| {
                                        view! {
                                            <tr class="table__row">
                                                <td class="table__cell">{p.codigo.clone()}</td>
                                                <td class="table__cell">{p.nombre.clone()}</td>
                                                <td class="table__cell table__cell--right">
                                                    {format!("{} {}", format_quantity(p.stock), p.unidad)}
                                                </td>
                                                <td class="table__cell table__cell--right">{format_quantity(p.stock_minimo)}</td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </Show>
                </section>
            </Show>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a005_request::aggregate::RequestStatus;

    #[test]
    fn test_week_hint_lists_kinds_in_order() {
        let mut summary = DashboardSummary::default();
        summary.movements_week.insert(MovementKind::Ajuste, 1);
        summary.movements_week.insert(MovementKind::Ingreso, 3);
        let hint = card_hint(DashboardCard::MovementsWeek, &summary).unwrap();
        assert!(hint.starts_with(MovementKind::Ingreso.label()));
        assert!(hint.contains(": 1"));

        summary.my_requests.insert(RequestStatus::Pendiente, 2);
        assert!(card_hint(DashboardCard::MyRequests, &summary).unwrap().contains("2"));
        assert_eq!(card_hint(DashboardCard::LowStock, &summary), None);
    }

    #[test]
    fn test_variants_flag_attention() {
        assert_eq!(card_variant(DashboardCard::LowStock, 3), "error");
        assert_eq!(card_variant(DashboardCard::LowStock, 0), "neutral");
        assert_eq!(card_variant(DashboardCard::PendingApprovals, 1), "warning");
        assert_eq!(card_variant(DashboardCard::MovementsToday, 0), "primary");
    }
}
