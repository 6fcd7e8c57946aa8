use crate::domain::a003_farm::api;
use crate::shared::number_format::{format_for_input, parse_number};
use contracts::domain::a003_farm::aggregate::FarmDto;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn FarmDetails(initial: FarmDto, on_saved: Callback<()>, on_cancel: Callback<()>) -> impl IntoView {
    let form = RwSignal::new(initial);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let saving = RwSignal::new(false);
    let is_edit = form.with_untracked(|f| f.id.is_some());

    let save = move |_| {
        let current = form.get_untracked();
        if let Err(e) = current.validate() {
            error.set(Some(e.to_string()));
            return;
        }
        saving.set(true);
        spawn_local(async move {
            match api::save_farm(&current).await {
                Ok(()) => on_saved.run(()),
                Err(e) => error.set(Some(e)),
            }
            saving.set(false);
        });
    };

    view! {
        <div class="details-container farm-details">
            {move || error.get().map(|e| view! { <div class="error">{e}</div> })}

            <div class="details-form">
                <div class="form-group">
                    <label for="finca_nombre">"Nombre"</label>
                    <input
                        type="text"
                        id="finca_nombre"
                        prop:value=move || form.get().nombre
                        on:input=move |ev| form.update(|f| f.nombre = event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="finca_ubicacion">"Ubicación"</label>
                    <input
                        type="text"
                        id="finca_ubicacion"
                        prop:value=move || form.get().ubicacion
                        on:input=move |ev| form.update(|f| f.ubicacion = event_target_value(&ev))
                        placeholder="Vereda, municipio"
                    />
                </div>
                <div class="form-group">
                    <label for="finca_area">"Área (ha)"</label>
                    <input
                        type="text"
                        inputmode="decimal"
                        id="finca_area"
                        prop:value=move || format_for_input(form.get().area_ha, 6)
                        on:change=move |ev| {
                            let v = parse_number(&event_target_value(&ev)).unwrap_or(0.0);
                            form.update(|f| f.area_ha = v);
                        }
                    />
                </div>
                <div class="form-group form-group--inline">
                    <label>
                        <input
                            type="checkbox"
                            prop:checked=move || form.get().activo
                            on:change=move |ev| form.update(|f| f.activo = event_target_checked(&ev))
                        />
                        " Activa"
                    </label>
                </div>
            </div>

            <div class="details-actions">
                <button class="button button--primary" on:click=save disabled=move || saving.get()>
                    {if is_edit { "Guardar" } else { "Crear" }}
                </button>
                <button class="button button--secondary" on:click=move |_| on_cancel.run(())>
                    "Cancelar"
                </button>
            </div>
        </div>
    }
}
