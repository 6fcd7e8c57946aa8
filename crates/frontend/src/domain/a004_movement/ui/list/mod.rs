use contracts::domain::a004_movement::aggregate::{
    filter_movements, group_by_kind, sort_newest_first, Movement, MovementKind,
};
use contracts::domain::common::Resource;
use contracts::system::users::Permission;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a004_movement::api;
use crate::domain::a004_movement::ui::wizards::{open_movement_wizard, wizard_title};
use crate::shared::components::badge::Badge;
use crate::shared::components::error_banner::{clear_load_failure, ErrorBanner};
use crate::shared::config::config;
use crate::shared::date_utils::format_date;
use crate::shared::list_utils::SearchInput;
use crate::shared::modal_stack::ModalStackService;
use crate::shared::number_format::format_quantity;
use crate::shared::page_frame::{PageFrame, PageHeader, PAGE_CAT_LIST};
use crate::shared::polling::use_polling;
use crate::shared::refresh::use_refresh_trigger;
use crate::system::auth::context::use_permission;

fn kind_badge(kind: MovementKind) -> &'static str {
    match kind {
        MovementKind::Ingreso => "success",
        MovementKind::Ajuste => "warning",
        MovementKind::Transferencia => "primary",
        MovementKind::Devolucion => "neutral",
    }
}

fn signed_quantity(cantidad: f64) -> String {
    if cantidad > 0.0 {
        format!("+{}", format_quantity(cantidad))
    } else {
        format_quantity(cantidad)
    }
}

#[component]
fn MovementRows(#[prop(into)] rows: Signal<Vec<Movement>>) -> impl IntoView {
    view! {
        <For
            each=move || rows.get()
            key=|m| m.id.clone()
            children=move |m| {
                view! {
                    <tr class="table__row">
                        <td class="table__cell">{format_date(m.fecha)}</td>
                        <td class="table__cell">
                            <Badge variant=kind_badge(m.tipo)>{m.tipo.label()}</Badge>
                        </td>
                        <td class="table__cell">{m.producto_nombre.clone()}</td>
                        <td
                            class="table__cell table__cell--right"
                            class:text-negative=m.cantidad < 0.0
                        >
                            {signed_quantity(m.cantidad)}
                        </td>
                        <td class="table__cell">{m.referencia.clone()}</td>
                        <td class="table__cell">{m.usuario.clone()}</td>
                        <td class="table__cell table__cell--muted">{m.nota.clone()}</td>
                    </tr>
                }
            }
        />
    }
}

#[component]
pub fn MovementList() -> impl IntoView {
    let all_items: RwSignal<Vec<Movement>> = RwSignal::new(Vec::new());
    let kind_filter: RwSignal<Option<MovementKind>> = RwSignal::new(None);
    let search_query = RwSignal::new(String::new());
    let grouped = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let is_loaded = RwSignal::new(false);
    let refresh = use_refresh_trigger();
    let can_register = use_permission(Permission::RegisterMovements);
    let modal_stack = use_context::<ModalStackService>().expect("ModalStackService not found in context");

    let load_data = move || {
        let kind = kind_filter.get_untracked();
        spawn_local(async move {
            match api::fetch_movements(kind, "").await {
                Ok(mut list) => {
                    sort_newest_first(&mut list);
                    all_items.set(list);
                    is_loaded.set(true);
                    clear_load_failure(error);
                }
                Err(e) => error.set(Some(format!("No se pudieron cargar los movimientos: {}", e))),
            }
        });
    };

    Effect::new(move |_| {
        refresh.track();
        kind_filter.track();
        load_data();
    });
    use_polling(config().poll_interval_ms(), load_data);

    let visible = Memo::new(move |_| {
        let query = search_query.get();
        let kind = kind_filter.get();
        all_items.with(|items| filter_movements(items, kind, &query, config().search.min_chars))
    });

    let launch = move |kind: MovementKind| {
        open_movement_wizard(modal_stack, kind, Callback::new(move |_: ()| refresh.bump()));
    };

    view! {
        <PageFrame page_id="a004_movement--list" category=PAGE_CAT_LIST>
            <PageHeader title=Movement::list_name()>
                <SearchInput
                    value=search_query
                    on_change=Callback::new(move |q: String| search_query.set(q))
                    placeholder="Producto, referencia o usuario"
                />
                <select
                    class="filter-select"
                    prop:value=move || kind_filter.get().map(|k| k.as_str()).unwrap_or("")
                    on:change=move |ev| kind_filter.set(MovementKind::from_str_opt(&event_target_value(&ev)))
                >
                    <option value="">"Todos los tipos"</option>
                    {MovementKind::ALL
                        .into_iter()
                        .map(|k| view! { <option value=k.as_str()>{k.label()}</option> })
                        .collect_view()}
                </select>
                <label class="filter-check">
                    <input
                        type="checkbox"
                        prop:checked=move || grouped.get()
                        on:change=move |ev| grouped.set(event_target_checked(&ev))
                    />
                    " Agrupar por tipo"
                </label>
            </PageHeader>

            <Show when=move || can_register.get()>
                <div class="page__toolbar">
                    {MovementKind::ALL
                        .into_iter()
                        .map(|k| {
                            view! {
                                <button class="button button--primary" on:click=move |_| launch(k)>
                                    {wizard_title(k)}
                                </button>
                            }
                        })
                        .collect_view()}
                </div>
            </Show>

            <ErrorBanner error=error />

            <div class="page__content">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            <th class="table__header-cell">"Fecha"</th>
                            <th class="table__header-cell">"Tipo"</th>
                            <th class="table__header-cell">"Producto"</th>
                            <th class="table__header-cell table__header-cell--right">"Cantidad"</th>
                            <th class="table__header-cell">"Referencia"</th>
                            <th class="table__header-cell">"Usuario"</th>
                            <th class="table__header-cell">"Nota"</th>
                        </tr>
                    </thead>
                    <Show
                        when=move || grouped.get()
                        fallback=move || view! { <tbody><MovementRows rows=visible /></tbody> }
                    >
                        {move || {
                            visible
                                .with(|v| group_by_kind(v))
                                .into_iter()
                                .map(|(kind, rows)| {
                                    let count = rows.len();
                                    view! {
                                        <tbody class="table__group">
                                            <tr class="table__row table__row--group">
                                                <td class="table__cell" colspan="7">
                                                    {format!("{} ({})", kind.label(), count)}
                                                </td>
                                            </tr>
                                            <MovementRows rows=Signal::stored(rows) />
                                        </tbody>
                                    }
                                })
                                .collect_view()
                        }}
                    </Show>
                </table>
                <Show when=move || is_loaded.get() && visible.with(|v| v.is_empty())>
                    <div class="table__empty">"No hay movimientos para este filtro."</div>
                </Show>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_quantity() {
        assert_eq!(signed_quantity(12.5), "+12,5");
        assert_eq!(signed_quantity(-3.0), "-3");
        assert_eq!(signed_quantity(0.0), "0");
    }
}
