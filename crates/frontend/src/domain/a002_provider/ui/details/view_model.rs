use crate::domain::a002_provider::api;
use contracts::domain::a002_provider::aggregate::ProviderDto;
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct ProviderDetailsViewModel {
    pub form: RwSignal<ProviderDto>,
    pub error: RwSignal<Option<String>>,
    pub saving: RwSignal<bool>,
}

impl ProviderDetailsViewModel {
    pub fn new(initial: ProviderDto) -> Self {
        Self {
            form: RwSignal::new(initial),
            error: RwSignal::new(None),
            saving: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.id.is_some())
    }

    /// Required fields only; NIT and email format are checked on save
    pub fn has_required(&self) -> bool {
        self.form
            .with(|f| !f.nombre.trim().is_empty() && !f.nit.trim().is_empty())
    }

    pub fn save_command(&self, on_saved: Callback<()>) {
        let current = self.form.get_untracked();
        if let Err(e) = current.validate() {
            self.error.set(Some(e.to_string()));
            return;
        }
        self.error.set(None);

        let error = self.error;
        let saving = self.saving;
        saving.set(true);
        wasm_bindgen_futures::spawn_local(async move {
            match api::save_provider(&current).await {
                Ok(()) => on_saved.run(()),
                Err(e) => error.set(Some(e)),
            }
            saving.set(false);
        });
    }
}
