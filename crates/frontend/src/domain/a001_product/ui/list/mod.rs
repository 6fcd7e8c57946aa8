mod state;

use contracts::domain::a001_product::aggregate::{categories, Product, ProductDto, ProductPatch};
use contracts::domain::common::Resource;
use contracts::shared::dashboard::LOW_STOCK_FILTER;
use contracts::shared::list_filter::filter_by_text;
use contracts::system::users::Permission;
use leptos::ev::MouseEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::{Flex, FlexAlign, FlexGap, Spinner};
use std::cmp::Ordering;

use crate::domain::a001_product::api;
use crate::domain::a001_product::ui::details::ProductDetails;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::badge::Badge;
use crate::shared::components::editable_cell::{EditableNumberCell, EditableTextCell, ToggleCell};
use crate::shared::components::error_banner::{clear_load_failure, ErrorBanner};
use crate::shared::config::config;
use crate::shared::list_utils::{self, get_sort_indicator, SearchInput};
use crate::shared::modal_stack::{ModalOptions, ModalStackService};
use crate::shared::number_format::{format_money, format_quantity};
use crate::shared::page_frame::{PageFrame, PageHeader, PAGE_CAT_LIST};
use crate::shared::polling::use_polling;
use crate::shared::refresh::use_refresh_trigger;
use crate::system::auth::context::use_permission;
pub use state::ProductListState;
use state::create_state;

fn compare_by_field(a: &Product, b: &Product, field: &str) -> Ordering {
    match field {
        "codigo" => a.codigo.cmp(&b.codigo),
        "categoria" => a.categoria.cmp(&b.categoria),
        "stock" => a.stock.partial_cmp(&b.stock).unwrap_or(Ordering::Equal),
        "precio" => a.precio.partial_cmp(&b.precio).unwrap_or(Ordering::Equal),
        _ => a.nombre.to_lowercase().cmp(&b.nombre.to_lowercase()),
    }
}

/// Category, low-stock and text filters, then sort
pub fn visible_products(items: &[Product], state: &ProductListState, min_chars: usize) -> Vec<Product> {
    let mut rows: Vec<Product> = filter_by_text(items, &state.search_query, min_chars)
        .into_iter()
        .filter(|p| state.categoria.is_empty() || p.categoria == state.categoria)
        .filter(|p| !state.only_low_stock || p.is_low_stock())
        .collect();
    rows.sort_by(|a, b| {
        let cmp = compare_by_field(a, b, &state.sort_field);
        if state.sort_ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
    rows
}

#[component]
pub fn ProductList() -> impl IntoView {
    let state = create_state();
    let all_products: RwSignal<Vec<Product>> = RwSignal::new(Vec::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let (loading, set_loading) = signal(false);
    let refresh = use_refresh_trigger();
    let can_edit = use_permission(Permission::ManageCatalog);
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let modal_stack = use_context::<ModalStackService>().expect("ModalStackService not found in context");

    let load_data = move || {
        set_loading.set(true);
        spawn_local(async move {
            match api::fetch_inventory().await {
                Ok(data) => {
                    all_products.set(data);
                    state.update(|s| s.is_loaded = true);
                    clear_load_failure(error);
                }
                Err(e) => error.set(Some(format!("No se pudo cargar el inventario: {}", e))),
            }
            set_loading.set(false);
        });
    };

    Effect::new(move |_| {
        refresh.track();
        load_data();
    });
    use_polling(config().poll_interval_ms(), load_data);

    Effect::new(move |_| {
        if let Some(preset) = ctx.take_preset(&Product::full_name()) {
            state.update(|s| {
                s.only_low_stock = preset == LOW_STOCK_FILTER;
                s.categoria.clear();
                s.search_query.clear();
            });
        }
    });

    let visible = Memo::new(move |_| {
        let min_chars = config().search.min_chars;
        state.with(|s| all_products.with(|items| visible_products(items, s, min_chars)))
    });
    let category_options = Memo::new(move |_| all_products.with(|items| categories(items)));
    let low_count = Memo::new(move |_| all_products.with(|items| items.iter().filter(|p| p.is_low_stock()).count()));

    let apply_patch = move |id: String, patch: ProductPatch| {
        if let Err(e) = patch.validate() {
            error.set(Some(e.to_string()));
            return;
        }
        all_products.update(|list| {
            if let Some(p) = list.iter_mut().find(|p| p.id == id) {
                p.apply(&patch);
            }
        });
        api::patch_product(&id, patch, move |e| {
            error.set(Some(format!("No se guardó el cambio: {}", e)));
            refresh.bump();
        });
    };

    let number_of = move |id: String, field: fn(&Product) -> f64| {
        Signal::derive(move || {
            all_products.with(|list| list.iter().find(|p| p.id == id).map(field).unwrap_or_default())
        })
    };

    let open_details = move |initial: ProductDto| {
        let title = if initial.id.is_some() { "Editar producto" } else { "Nuevo producto" };
        let cats = category_options.get_untracked();
        modal_stack.push(ModalOptions::titled(title).width("520px"), move |handle| {
            view! {
                <ProductDetails
                    initial=initial.clone()
                    categories=cats.clone()
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

    let toggle_sort = move |field: &'static str| {
        move |_: MouseEvent| state.update(|s| list_utils::toggle_sort(&mut s.sort_field, &mut s.sort_ascending, field))
    };
    let indicator = move |field: &'static str| {
        move || state.with(|s| get_sort_indicator(&s.sort_field, field, s.sort_ascending))
    };

    view! {
        <PageFrame page_id="a001_product--list" category=PAGE_CAT_LIST>
            <PageHeader title=Product::list_name()>
                <SearchInput
                    value=Signal::derive(move || state.with(|s| s.search_query.clone()))
                    on_change=Callback::new(move |q: String| state.update(|s| s.search_query = q))
                    placeholder="Buscar por código o nombre"
                />
                <select
                    class="filter-select"
                    prop:value=move || state.with(|s| s.categoria.clone())
                    on:change=move |ev| state.update(|s| s.categoria = event_target_value(&ev))
                >
                    <option value="">"Todas las categorías"</option>
                    {move || {
                        category_options
                            .get()
                            .into_iter()
                            .map(|c| {
                                let label = c.clone();
                                view! { <option value=c>{label}</option> }
                            })
                            .collect_view()
                    }}
                </select>
                <label class="filter-check">
                    <input
                        type="checkbox"
                        prop:checked=move || state.with(|s| s.only_low_stock)
                        on:change=move |ev| state.update(|s| s.only_low_stock = event_target_checked(&ev))
                    />
                    {move || format!(" Bajo mínimo ({})", low_count.get())}
                </label>
                <Show when=move || can_edit.get()>
                    <button class="button button--primary" on:click=move |_| open_details(ProductDto::default())>
                        "Nuevo producto"
                    </button>
                </Show>
                <button class="button button--secondary" on:click=move |_| refresh.bump() disabled=move || loading.get()>
                    "Actualizar"
                </button>
            </PageHeader>

            <ErrorBanner error=error />

            <div class="page__content">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            <th class="table__header-cell table__header-cell--sortable" on:click=toggle_sort("codigo")>
                                "Código" {indicator("codigo")}
                            </th>
                            <th class="table__header-cell table__header-cell--sortable" on:click=toggle_sort("nombre")>
                                "Nombre" {indicator("nombre")}
                            </th>
                            <th class="table__header-cell table__header-cell--sortable" on:click=toggle_sort("categoria")>
                                "Categoría" {indicator("categoria")}
                            </th>
                            <th class="table__header-cell">"Unidad"</th>
                            <th class="table__header-cell table__header-cell--sortable table__header-cell--right" on:click=toggle_sort("stock")>
                                "Stock" {indicator("stock")}
                            </th>
                            <th class="table__header-cell table__header-cell--right">"Stock mínimo"</th>
                            <th class="table__header-cell table__header-cell--sortable table__header-cell--right" on:click=toggle_sort("precio")>
                                "Precio" {indicator("precio")}
                            </th>
                            <th class="table__header-cell">"Activo"</th>
                            <th class="table__header-cell"></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || visible.get()
                            key=|p| (p.id.clone(), p.codigo.clone(), p.categoria.clone(), p.unidad.clone())
                            children=move |product| {
                                let id = product.id.clone();
                                let nombre = {
                                    let id = id.clone();
                                    Signal::derive(move || {
                                        all_products.with(|list| {
                                            list.iter().find(|p| p.id == id).map(|p| p.nombre.clone()).unwrap_or_default()
                                        })
                                    })
                                };
                                let activo = {
                                    let id = id.clone();
                                    Signal::derive(move || {
                                        all_products.with(|list| list.iter().find(|p| p.id == id).map(|p| p.activo).unwrap_or(false))
                                    })
                                };
                                let is_low = {
                                    let id = id.clone();
                                    move || all_products.with(|list| list.iter().any(|p| p.id == id && p.is_low_stock()))
                                };
                                let (id_nombre, id_min, id_precio, id_activo, id_edit) =
                                    (id.clone(), id.clone(), id.clone(), id.clone(), id.clone());
                                view! {
                                    <tr class="table__row" class:table__row--warning=is_low.clone()>
                                        <td class="table__cell">{product.codigo.clone()}</td>
                                        <td class="table__cell">
                                            <EditableTextCell
                                                value=nombre
                                                editable=can_edit
                                                on_commit=Callback::new(move |v| apply_patch(id_nombre.clone(), ProductPatch::Nombre(v)))
                                            />
                                        </td>
                                        <td class="table__cell">{product.categoria.clone()}</td>
                                        <td class="table__cell">{product.unidad.clone()}</td>
                                        <td class="table__cell table__cell--right">
                                            {
                                                let stock = number_of(id.clone(), |p| p.stock);
                                                move || format_quantity(stock.get())
                                            }
                                            <Show when=is_low.clone()>
                                                " " <Badge variant="warning">"Bajo mínimo"</Badge>
                                            </Show>
                                        </td>
                                        <td class="table__cell table__cell--right">
                                            <EditableNumberCell
                                                value=number_of(id.clone(), |p| p.stock_minimo)
                                                decimals=2
                                                editable=can_edit
                                                on_commit=Callback::new(move |v| apply_patch(id_min.clone(), ProductPatch::StockMinimo(v)))
                                            />
                                        </td>
                                        <td class="table__cell table__cell--right">
                                            <EditableNumberCell
                                                value=number_of(id.clone(), |p| p.precio)
                                                editable=can_edit
                                                on_commit=Callback::new(move |v| apply_patch(id_precio.clone(), ProductPatch::Precio(v)))
                                                display=Callback::new(format_money)
                                            />
                                        </td>
                                        <td class="table__cell">
                                            <ToggleCell
                                                value=activo
                                                editable=can_edit
                                                on_toggle=Callback::new(move |v| apply_patch(id_activo.clone(), ProductPatch::Activo(v)))
                                            />
                                        </td>
                                        <td class="table__cell">
                                            <Show when=move || can_edit.get()>
                                                <button
                                                    class="button button--ghost button--small"
                                                    on:click={
                                                        let id = id_edit.clone();
                                                        move |_| {
                                                            let dto = all_products.with_untracked(|list| {
                                                                list.iter().find(|p| p.id == id).map(Product::to_dto)
                                                            });
                                                            if let Some(dto) = dto {
                                                                open_details(dto);
                                                            }
                                                        }
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
                <Show when=move || !state.with(|s| s.is_loaded)>
                    <Flex align=FlexAlign::Center gap=FlexGap::Small class="table__empty">
                        <Spinner />
                        <span>"Cargando inventario..."</span>
                    </Flex>
                </Show>
                <Show when=move || state.with(|s| s.is_loaded) && visible.with(|v| v.is_empty())>
                    <div class="table__empty">"No hay productos que coincidan con el filtro."</div>
                </Show>
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, nombre: &str, categoria: &str, stock: f64, minimo: f64) -> Product {
        Product {
            id: id.into(),
            codigo: format!("P-{}", id),
            nombre: nombre.into(),
            categoria: categoria.into(),
            unidad: "kg".into(),
            stock,
            stock_minimo: minimo,
            precio: 1000.0,
            activo: true,
        }
    }

    fn items() -> Vec<Product> {
        vec![
            product("1", "Urea", "Fertilizantes", 10.0, 50.0),
            product("2", "Glifosato", "Agroquímicos", 200.0, 20.0),
            product("3", "Cal agrícola", "Fertilizantes", 500.0, 100.0),
        ]
    }

    #[test]
    fn test_default_view_sorted_by_name() {
        let rows = visible_products(&items(), &ProductListState::default(), 2);
        let names: Vec<&str> = rows.iter().map(|p| p.nombre.as_str()).collect();
        assert_eq!(names, vec!["Cal agrícola", "Glifosato", "Urea"]);
    }

    #[test]
    fn test_category_and_low_stock_filters() {
        let mut state = ProductListState {
            categoria: "Fertilizantes".into(),
            ..Default::default()
        };
        assert_eq!(visible_products(&items(), &state, 2).len(), 2);

        state.only_low_stock = true;
        let rows = visible_products(&items(), &state, 2);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "1");
    }

    #[test]
    fn test_sort_by_stock_descending() {
        let state = ProductListState {
            sort_field: "stock".into(),
            sort_ascending: false,
            ..Default::default()
        };
        let rows = visible_products(&items(), &state, 2);
        assert_eq!(rows[0].id, "3");
        assert_eq!(rows[2].id, "1");
    }
}
