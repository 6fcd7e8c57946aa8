use super::model;
use contracts::domain::a001_product::aggregate::ProductDto;
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct ProductDetailsViewModel {
    pub form: RwSignal<ProductDto>,
    pub error: RwSignal<Option<String>>,
    pub saving: RwSignal<bool>,
}

impl ProductDetailsViewModel {
    pub fn new(initial: ProductDto) -> Self {
        Self {
            form: RwSignal::new(initial),
            error: RwSignal::new(None),
            saving: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.with(|f| f.id.is_some())
    }

    pub fn is_form_valid(&self) -> bool {
        self.form.with(|f| f.validate().is_ok())
    }

    pub fn save_command(&self, on_saved: Callback<()>) {
        let current = self.form.get_untracked();
        if let Err(e) = current.validate() {
            self.error.set(Some(e.to_string()));
            return;
        }

        let error = self.error;
        let saving = self.saving;
        saving.set(true);
        wasm_bindgen_futures::spawn_local(async move {
            match model::save_form(&current).await {
                Ok(()) => on_saved.run(()),
                Err(e) => error.set(Some(e)),
            }
            saving.set(false);
        });
    }
}
