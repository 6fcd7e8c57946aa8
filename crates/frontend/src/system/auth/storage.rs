//! Token persistence in `localStorage`

use web_sys::window;

const ACCESS_TOKEN_KEY: &str = "inventario_access_token";
const REFRESH_TOKEN_KEY: &str = "inventario_refresh_token";

fn local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

fn set(key: &str, value: &str) {
    if let Some(storage) = local_storage() {
        if storage.set_item(key, value).is_err() {
            log::warn!("could not persist {}", key);
        }
    }
}

fn get(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

pub fn save_access_token(token: &str) {
    set(ACCESS_TOKEN_KEY, token);
}

pub fn get_access_token() -> Option<String> {
    get(ACCESS_TOKEN_KEY)
}

pub fn save_refresh_token(token: &str) {
    set(REFRESH_TOKEN_KEY, token);
}

pub fn get_refresh_token() -> Option<String> {
    get(REFRESH_TOKEN_KEY)
}

pub fn clear_tokens() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(ACCESS_TOKEN_KEY);
        let _ = storage.remove_item(REFRESH_TOKEN_KEY);
    }
}
