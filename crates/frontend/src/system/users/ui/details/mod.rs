use contracts::system::users::{CreateUserDto, Role};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::system::users::api;

#[component]
pub fn CreateUserForm(on_close: Callback<()>, on_created: Callback<()>) -> impl IntoView {
    let form = RwSignal::new(CreateUserDto {
        username: String::new(),
        password: String::new(),
        nombre: String::new(),
        email: None,
        rol: Role::Solicitante,
    });
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (is_saving, set_is_saving) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let mut dto = form.get_untracked();
        dto.username = dto.username.trim().to_string();
        dto.email = dto.email.filter(|e| !e.trim().is_empty());
        if let Err(e) = dto.validate() {
            set_error_message.set(Some(e.to_string()));
            return;
        }

        set_is_saving.set(true);
        set_error_message.set(None);

        spawn_local(async move {
            match api::create_user(&dto).await {
                Ok(()) => {
                    log::info!("user {} created", dto.username);
                    on_created.run(());
                }
                Err(e) => {
                    set_error_message.set(Some(format!("No se pudo crear el usuario: {}", e)));
                    set_is_saving.set(false);
                }
            }
        });
    };

    view! {
        <div class="details-container user-create">
            <Show when=move || error_message.get().is_some()>
                <div class="error-message">{move || error_message.get().unwrap_or_default()}</div>
            </Show>

            <form on:submit=on_submit>
                <div class="form-group">
                    <label for="new_username">"Usuario *"</label>
                    <input
                        type="text"
                        id="new_username"
                        prop:value=move || form.with(|f| f.username.clone())
                        on:input=move |ev| form.update(|f| f.username = event_target_value(&ev))
                        disabled=move || is_saving.get()
                    />
                </div>

                <div class="form-group">
                    <label for="new_nombre">"Nombre *"</label>
                    <input
                        type="text"
                        id="new_nombre"
                        prop:value=move || form.with(|f| f.nombre.clone())
                        on:input=move |ev| form.update(|f| f.nombre = event_target_value(&ev))
                        disabled=move || is_saving.get()
                    />
                </div>

                <div class="form-group">
                    <label for="new_email">"Email"</label>
                    <input
                        type="email"
                        id="new_email"
                        prop:value=move || form.with(|f| f.email.clone().unwrap_or_default())
                        on:input=move |ev| form.update(|f| f.email = Some(event_target_value(&ev)))
                        disabled=move || is_saving.get()
                    />
                </div>

                <div class="form-group">
                    <label for="new_password">"Contraseña * (mín. 8)"</label>
                    <input
                        type="password"
                        id="new_password"
                        autocomplete="new-password"
                        prop:value=move || form.with(|f| f.password.clone())
                        on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                        disabled=move || is_saving.get()
                    />
                </div>

                <div class="form-group">
                    <label for="new_rol">"Rol"</label>
                    <select
                        id="new_rol"
                        prop:value=move || form.with(|f| f.rol.as_str().to_string())
                        on:change=move |ev| {
                            if let Some(rol) = Role::from_str_opt(&event_target_value(&ev)) {
                                form.update(|f| f.rol = rol);
                            }
                        }
                    >
                        {Role::ALL
                            .into_iter()
                            .map(|r| view! { <option value=r.as_str()>{r.label()}</option> })
                            .collect_view()}
                    </select>
                </div>

                <div class="details-actions">
                    <button type="submit" class="button button--primary" disabled=move || is_saving.get()>
                        {move || if is_saving.get() { "Guardando..." } else { "Crear" }}
                    </button>
                    <button type="button" class="button button--secondary" on:click=move |_| on_close.run(())>
                        "Cancelar"
                    </button>
                </div>
            </form>
        </div>
    }
}
