use super::view_model::ProductDetailsViewModel;
use crate::shared::number_format::{format_for_input, parse_number};
use contracts::domain::a001_product::aggregate::ProductDto;
use leptos::prelude::*;

#[component]
pub fn ProductDetails(
    initial: ProductDto,
    /// Existing categories offered as suggestions
    #[prop(optional)]
    categories: Vec<String>,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = ProductDetailsViewModel::new(initial);

    view! {
        <div class="details-container product-details">
            {move || vm.error.get().map(|e| view! { <div class="error">{e}</div> })}

            <div class="details-form">
                <div class="form-group">
                    <label for="codigo">"Código"</label>
                    <input
                        type="text"
                        id="codigo"
                        prop:value=move || vm.form.get().codigo
                        on:input=move |ev| vm.form.update(|f| f.codigo = event_target_value(&ev))
                        disabled=move || vm.is_edit_mode()
                        placeholder="FER-001"
                    />
                </div>

                <div class="form-group">
                    <label for="nombre">"Nombre"</label>
                    <input
                        type="text"
                        id="nombre"
                        prop:value=move || vm.form.get().nombre
                        on:input=move |ev| vm.form.update(|f| f.nombre = event_target_value(&ev))
                    />
                </div>

                <div class="form-group">
                    <label for="categoria">"Categoría"</label>
                    <input
                        type="text"
                        id="categoria"
                        list="product-categories"
                        prop:value=move || vm.form.get().categoria
                        on:input=move |ev| vm.form.update(|f| f.categoria = event_target_value(&ev))
                    />
                    <datalist id="product-categories">
                        {categories.into_iter().map(|c| view! { <option value=c /> }).collect_view()}
                    </datalist>
                </div>

                <div class="form-group">
                    <label for="unidad">"Unidad"</label>
                    <input
                        type="text"
                        id="unidad"
                        prop:value=move || vm.form.get().unidad
                        on:input=move |ev| vm.form.update(|f| f.unidad = event_target_value(&ev))
                        placeholder="kg, l, bulto"
                    />
                </div>

                <div class="form-group">
                    <label for="stock_minimo">"Stock mínimo"</label>
                    <input
                        type="text"
                        inputmode="decimal"
                        id="stock_minimo"
                        prop:value=move || format_for_input(vm.form.get().stock_minimo, 6)
                        on:change=move |ev| {
                            let v = parse_number(&event_target_value(&ev)).unwrap_or(-1.0);
                            vm.form.update(|f| f.stock_minimo = v);
                        }
                    />
                </div>

                <div class="form-group">
                    <label for="precio">"Precio"</label>
                    <input
                        type="text"
                        inputmode="decimal"
                        id="precio"
                        prop:value=move || format_for_input(vm.form.get().precio, 6)
                        on:change=move |ev| {
                            let v = parse_number(&event_target_value(&ev)).unwrap_or(-1.0);
                            vm.form.update(|f| f.precio = v);
                        }
                    />
                </div>

                <div class="form-group form-group--inline">
                    <label>
                        <input
                            type="checkbox"
                            prop:checked=move || vm.form.get().activo
                            on:change=move |ev| vm.form.update(|f| f.activo = event_target_checked(&ev))
                        />
                        " Activo"
                    </label>
                </div>
            </div>

            <div class="details-actions">
                <button
                    class="button button--primary"
                    on:click=move |_| vm.save_command(on_saved)
                    disabled=move || !vm.is_form_valid() || vm.saving.get()
                >
                    {move || if vm.is_edit_mode() { "Guardar" } else { "Crear" }}
                </button>
                <button class="button button--secondary" on:click=move |_| on_cancel.run(())>
                    "Cancelar"
                </button>
            </div>
        </div>
    }
}
