use super::view_model::ProviderDetailsViewModel;
use contracts::domain::a002_provider::aggregate::ProviderDto;
use leptos::prelude::*;

#[component]
pub fn ProviderDetails(
    initial: ProviderDto,
    on_saved: Callback<()>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = ProviderDetailsViewModel::new(initial);

    view! {
        <div class="details-container provider-details">
            {move || vm.error.get().map(|e| view! { <div class="error">{e}</div> })}

            <div class="details-form">
                <div class="form-group">
                    <label for="nombre">"Razón social"</label>
                    <input
                        type="text"
                        id="nombre"
                        prop:value=move || vm.form.get().nombre
                        on:input=move |ev| vm.form.update(|f| f.nombre = event_target_value(&ev))
                    />
                </div>

                <div class="form-group">
                    <label for="nit">"NIT"</label>
                    <input
                        type="text"
                        id="nit"
                        prop:value=move || vm.form.get().nit
                        on:input=move |ev| vm.form.update(|f| f.nit = event_target_value(&ev))
                        placeholder="900123456-7"
                        maxlength="15"
                    />
                </div>

                <div class="form-group">
                    <label for="telefono">"Teléfono"</label>
                    <input
                        type="tel"
                        id="telefono"
                        prop:value=move || vm.form.get().telefono
                        on:input=move |ev| vm.form.update(|f| f.telefono = event_target_value(&ev))
                    />
                </div>

                <div class="form-group">
                    <label for="email">"Email"</label>
                    <input
                        type="email"
                        id="email"
                        prop:value=move || vm.form.get().email
                        on:input=move |ev| vm.form.update(|f| f.email = event_target_value(&ev))
                    />
                </div>

                <div class="form-group">
                    <label for="direccion">"Dirección"</label>
                    <textarea
                        id="direccion"
                        rows="2"
                        prop:value=move || vm.form.get().direccion
                        on:input=move |ev| vm.form.update(|f| f.direccion = event_target_value(&ev))
                    />
                </div>
            </div>

            <div class="details-actions">
                <button
                    class="button button--primary"
                    on:click=move |_| vm.save_command(on_saved)
                    disabled=move || !vm.has_required() || vm.saving.get()
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
