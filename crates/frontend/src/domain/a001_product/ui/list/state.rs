use leptos::prelude::*;

#[derive(Clone, Debug)]
pub struct ProductListState {
    pub search_query: String,
    /// Empty means every category
    pub categoria: String,
    pub only_low_stock: bool,
    pub sort_field: String,
    pub sort_ascending: bool,
    pub is_loaded: bool,
}

impl Default for ProductListState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            categoria: String::new(),
            only_low_stock: false,
            sort_field: "nombre".to_string(),
            sort_ascending: true,
            is_loaded: false,
        }
    }
}

pub fn create_state() -> RwSignal<ProductListState> {
    RwSignal::new(ProductListState::default())
}
