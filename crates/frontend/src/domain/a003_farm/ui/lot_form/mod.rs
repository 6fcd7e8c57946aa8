use crate::domain::a003_farm::api;
use crate::shared::number_format::{format_for_input, format_number, parse_number};
use contracts::domain::a003_farm::aggregate::{Farm, Lot, LotDto};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Lot form for one farm. `siblings` are the farm's current lots, used for
/// the free-area check before anything is sent.
#[component]
pub fn LotForm(
    farm: Farm,
    siblings: Vec<Lot>,
    initial: LotDto,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let form = RwSignal::new(LotDto {
        finca_id: farm.id.clone(),
        ..initial
    });
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let saving = RwSignal::new(false);
    let is_edit = form.with_untracked(|f| f.id.is_some());

    let used: f64 = siblings
        .iter()
        .filter(|l| form.with_untracked(|f| f.id.as_ref() != Some(&l.id)))
        .map(|l| l.area_ha)
        .sum();
    let free_hint = format!(
        "Área de la finca: {} ha, libre: {} ha",
        format_number(farm.area_ha, 2),
        format_number((farm.area_ha - used).max(0.0), 2)
    );

    let farm = StoredValue::new(farm);
    let siblings = StoredValue::new(siblings);

    let save = move |_| {
        let current = form.get_untracked();
        let checked = farm.with_value(|f| siblings.with_value(|s| current.validate(f, s)));
        if let Err(e) = checked {
            error.set(Some(e.to_string()));
            return;
        }
        saving.set(true);
        spawn_local(async move {
            match api::save_lot(&current).await {
                Ok(()) => on_saved.run(()),
                Err(e) => error.set(Some(e)),
            }
            saving.set(false);
        });
    };

    view! {
        <div class="details-container lot-details">
            {move || error.get().map(|e| view! { <div class="error">{e}</div> })}

            <div class="details-form">
                <div class="form-group">
                    <label for="lote_nombre">"Nombre"</label>
                    <input
                        type="text"
                        id="lote_nombre"
                        prop:value=move || form.get().nombre
                        on:input=move |ev| form.update(|f| f.nombre = event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="lote_cultivo">"Cultivo"</label>
                    <input
                        type="text"
                        id="lote_cultivo"
                        prop:value=move || form.get().cultivo
                        on:input=move |ev| form.update(|f| f.cultivo = event_target_value(&ev))
                        placeholder="Café, plátano..."
                    />
                </div>
                <div class="form-group">
                    <label for="lote_area">"Área (ha)"</label>
                    <input
                        type="text"
                        inputmode="decimal"
                        id="lote_area"
                        prop:value=move || format_for_input(form.get().area_ha, 6)
                        on:change=move |ev| {
                            let v = parse_number(&event_target_value(&ev)).unwrap_or(0.0);
                            form.update(|f| f.area_ha = v);
                        }
                    />
                    <small class="form-hint">{free_hint}</small>
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
