use contracts::domain::a003_farm::aggregate::{lots_by_farm, Farm, FarmDto, Lot, LotDto};
use contracts::domain::common::Resource;
use contracts::shared::list_filter::normalize;
use contracts::system::users::Permission;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::{BTreeMap, HashSet};

use crate::domain::a003_farm::api;
use crate::domain::a003_farm::ui::details::FarmDetails;
use crate::domain::a003_farm::ui::lot_form::LotForm;
use crate::shared::components::badge::ActiveBadge;
use crate::shared::components::error_banner::{clear_load_failure, ErrorBanner};
use crate::shared::config::config;
use crate::shared::list_utils::SearchInput;
use crate::shared::modal_stack::{ModalOptions, ModalStackService};
use crate::shared::number_format::format_number;
use crate::shared::page_frame::{PageFrame, PageHeader, PAGE_CAT_LIST};
use crate::shared::refresh::use_refresh_trigger;
use crate::system::auth::context::use_permission;

fn used_area(lots: &[Lot]) -> f64 {
    lots.iter().map(|l| l.area_ha).sum()
}

/// Name/location match; a farm also matches when one of its lots does
fn farm_matches(farm: &Farm, lots: &[Lot], query: &str, min_chars: usize) -> bool {
    let query = query.trim();
    if query.chars().count() < min_chars.max(1) {
        return true;
    }
    let needle = normalize(query);
    normalize(&format!("{} {}", farm.nombre, farm.ubicacion)).contains(&needle)
        || lots
            .iter()
            .any(|l| normalize(&format!("{} {}", l.nombre, l.cultivo)).contains(&needle))
}

#[component]
pub fn FarmList() -> impl IntoView {
    let farms: RwSignal<Vec<Farm>> = RwSignal::new(Vec::new());
    let lots: RwSignal<BTreeMap<String, Vec<Lot>>> = RwSignal::new(BTreeMap::new());
    let expanded: RwSignal<HashSet<String>> = RwSignal::new(HashSet::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let search_query = RwSignal::new(String::new());
    let refresh = use_refresh_trigger();
    let can_edit = use_permission(Permission::ManageFarms);
    let modal_stack = use_context::<ModalStackService>().expect("ModalStackService not found in context");

    Effect::new(move |_| {
        refresh.track();
        spawn_local(async move {
            let farm_res = api::fetch_farms().await;
            let lot_res = api::fetch_lots().await;
            match (farm_res, lot_res) {
                (Ok(mut f), Ok(l)) => {
                    f.sort_by(|a, b| a.nombre.cmp(&b.nombre));
                    farms.set(f);
                    lots.set(lots_by_farm(&l));
                    clear_load_failure(error);
                }
                (Err(e), _) | (_, Err(e)) => {
                    error.set(Some(format!("No se pudieron cargar las fincas: {}", e)))
                }
            }
        });
    });

    let visible = Memo::new(move |_| {
        let query = search_query.get();
        let min_chars = config().search.min_chars;
        farms.with(|list| {
            lots.with(|by_farm| {
                list.iter()
                    .filter(|f| {
                        let farm_lots = by_farm.get(&f.id).map(Vec::as_slice).unwrap_or(&[]);
                        farm_matches(f, farm_lots, &query, min_chars)
                    })
                    .cloned()
                    .collect::<Vec<_>>()
            })
        })
    });

    let toggle_expanded = move |id: String| {
        expanded.update(|set| {
            if !set.remove(&id) {
                set.insert(id);
            }
        });
    };

    let open_farm = move |initial: FarmDto| {
        let title = if initial.id.is_some() { "Editar finca" } else { "Nueva finca" };
        modal_stack.push(ModalOptions::titled(title).width("480px"), move |handle| {
            view! {
                <FarmDetails
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

    let open_lot = move |farm: Farm, initial: LotDto| {
        let siblings = lots.with_untracked(|m| m.get(&farm.id).cloned().unwrap_or_default());
        let title = if initial.id.is_some() {
            format!("Editar lote · {}", farm.nombre)
        } else {
            format!("Nuevo lote · {}", farm.nombre)
        };
        modal_stack.push(ModalOptions::titled(title).width("480px"), move |handle| {
            view! {
                <LotForm
                    farm=farm.clone()
                    siblings=siblings.clone()
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
        <PageFrame page_id="a003_farm--list" category=PAGE_CAT_LIST>
            <PageHeader title=Farm::list_name()>
                <SearchInput
                    value=search_query
                    on_change=Callback::new(move |q: String| search_query.set(q))
                    placeholder="Buscar finca, lote o cultivo"
                />
                <Show when=move || can_edit.get()>
                    <button class="button button--primary" on:click=move |_| open_farm(FarmDto::default())>
                        "Nueva finca"
                    </button>
                </Show>
            </PageHeader>

            <ErrorBanner error=error />

            <div class="page__content">
                <table class="table__data">
                    <thead class="table__head">
                        <tr>
                            <th class="table__header-cell"></th>
                            <th class="table__header-cell">"Finca"</th>
                            <th class="table__header-cell">"Ubicación"</th>
                            <th class="table__header-cell table__header-cell--right">"Área (ha)"</th>
                            <th class="table__header-cell table__header-cell--right">"En lotes (ha)"</th>
                            <th class="table__header-cell">"Lotes"</th>
                            <th class="table__header-cell">"Estado"</th>
                            <th class="table__header-cell"></th>
                        </tr>
                    </thead>
                    <For
                        each=move || visible.get()
                        key=|f| (f.id.clone(), f.nombre.clone(), f.ubicacion.clone(), f.area_ha.to_bits(), f.activo)
                        children=move |farm| {
                            let id = farm.id.clone();
                            let farm_lots = {
                                let id = id.clone();
                                Memo::new(move |_| lots.with(|m| m.get(&id).cloned().unwrap_or_default()))
                            };
                            let is_open = {
                                let id = id.clone();
                                move || expanded.with(|s| s.contains(&id))
                            };
                            let area = farm.area_ha;
                            let farm_for_edit = FarmDto::from(&farm);
                            let farm_for_lot = farm.clone();
                            let farm_for_rows = StoredValue::new(farm.clone());
                            view! {
                                <tbody class="farm-group">
                                    <tr class="table__row table__row--group">
                                        <td class="table__cell">
                                            <button
                                                class="button button--ghost button--small"
                                                on:click={
                                                    let id = id.clone();
                                                    move |_| toggle_expanded(id.clone())
                                                }
                                            >
                                                {
                                                    let is_open = is_open.clone();
                                                    move || if is_open() { "▾" } else { "▸" }
                                                }
                                            </button>
                                        </td>
                                        <td class="table__cell">{farm.nombre.clone()}</td>
                                        <td class="table__cell">{farm.ubicacion.clone()}</td>
                                        <td class="table__cell table__cell--right">{format_number(area, 2)}</td>
                                        <td class=move || {
                                            if used_area(&farm_lots.get()) > area {
                                                "table__cell table__cell--right text-warning"
                                            } else {
                                                "table__cell table__cell--right"
                                            }
                                        }>
                                            {move || format_number(used_area(&farm_lots.get()), 2)}
                                        </td>
                                        <td class="table__cell">{move || farm_lots.with(|l| l.len())}</td>
                                        <td class="table__cell"><ActiveBadge active=farm.activo /></td>
                                        <td class="table__cell">
                                            <Show when=move || can_edit.get()>
                                                <button
                                                    class="button button--ghost button--small"
                                                    on:click={
                                                        let dto = farm_for_edit.clone();
                                                        move |_| open_farm(dto.clone())
                                                    }
                                                >
                                                    "Editar"
                                                </button>
                                                <button
                                                    class="button button--ghost button--small"
                                                    on:click={
                                                        let farm = farm_for_lot.clone();
                                                        move |_| open_lot(farm.clone(), LotDto::default())
                                                    }
                                                >
                                                    "+ Lote"
                                                </button>
                                            </Show>
                                        </td>
                                    </tr>
                                    <Show when=is_open.clone()>
                                        <For
                                            each=move || farm_lots.get()
                                            key=|l| (l.id.clone(), l.nombre.clone(), l.cultivo.clone())
                                            children=move |lot| {
                                                let dto = LotDto::from(&lot);
                                                view! {
                                                    <tr class="table__row table__row--nested">
                                                        <td class="table__cell"></td>
                                                        <td class="table__cell">{lot.nombre.clone()}</td>
                                                        <td class="table__cell">{lot.cultivo.clone()}</td>
                                                        <td class="table__cell table__cell--right">{format_number(lot.area_ha, 2)}</td>
                                                        <td class="table__cell" colspan="3"></td>
                                                        <td class="table__cell">
                                                            <Show when=move || can_edit.get()>
                                                                <button
                                                                    class="button button--ghost button--small"
                                                                    on:click={
                                                                        let dto = dto.clone();
                                                                        move |_| open_lot(farm_for_rows.get_value(), dto.clone())
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
                                        <Show when=move || farm_lots.with(|l| l.is_empty())>
                                            <tr class="table__row table__row--nested">
                                                <td class="table__cell"></td>
                                                <td class="table__cell table__empty" colspan="7">"Sin lotes registrados"</td>
                                            </tr>
                                        </Show>
                                    </Show>
                                </tbody>
                            }
                        }
                    />
                </table>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farm() -> Farm {
        Farm {
            id: "f1".into(),
            nombre: "La Esperanza".into(),
            ubicacion: "Vereda El Roble, Fresno".into(),
            area_ha: 20.0,
            activo: true,
        }
    }

    fn lot(nombre: &str, cultivo: &str, area: f64) -> Lot {
        Lot {
            id: nombre.into(),
            finca_id: "f1".into(),
            nombre: nombre.into(),
            cultivo: cultivo.into(),
            area_ha: area,
        }
    }

    #[test]
    fn test_used_area() {
        assert_eq!(used_area(&[lot("L1", "Café", 4.5), lot("L2", "Plátano", 3.0)]), 7.5);
        assert_eq!(used_area(&[]), 0.0);
    }

    #[test]
    fn test_farm_matches_by_lot_crop() {
        let lots = vec![lot("L1", "Café", 4.5)];
        assert!(farm_matches(&farm(), &lots, "cafe", 2));
        assert!(farm_matches(&farm(), &lots, "roble", 2));
        assert!(!farm_matches(&farm(), &lots, "aguacate", 2));
        assert!(farm_matches(&farm(), &lots, "x", 2));
    }
}
