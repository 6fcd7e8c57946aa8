use contracts::system::users::{CreateUserDto, User, UserPatch, USERS_PATH};

use crate::shared::http;

pub async fn fetch_users() -> Result<Vec<User>, String> {
    http::get_json(USERS_PATH).await
}

pub async fn create_user(dto: &CreateUserDto) -> Result<(), String> {
    http::post(USERS_PATH, dto).await
}

/// Optimistic single-field update; `on_error` only runs on failure
pub fn patch_user(id: &str, patch: UserPatch, on_error: impl FnOnce(String) + 'static) {
    http::spawn_patch(format!("{}/{}", USERS_PATH, id), patch, on_error);
}
