use leptos::prelude::*;

#[derive(Clone, Debug)]
pub struct UsersListState {
    pub search_query: String,
    pub sort_field: String,
    pub sort_ascending: bool,
    pub is_loaded: bool,
}

impl Default for UsersListState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            sort_field: "username".to_string(),
            sort_ascending: true,
            is_loaded: false,
        }
    }
}

pub fn create_state() -> RwSignal<UsersListState> {
    RwSignal::new(UsersListState::default())
}
