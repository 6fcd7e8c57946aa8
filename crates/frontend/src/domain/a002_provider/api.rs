use contracts::domain::a002_provider::aggregate::{Provider, ProviderDto, ProviderPatch};
use contracts::domain::common::Resource;

use crate::shared::http;

pub async fn fetch_providers() -> Result<Vec<Provider>, String> {
    http::get_json(Provider::collection_path()).await
}

pub async fn save_provider(dto: &ProviderDto) -> Result<(), String> {
    http::save(Provider::collection_path(), dto.id.as_deref(), dto).await
}

pub fn patch_provider(id: &str, patch: ProviderPatch, on_error: impl FnOnce(String) + 'static) {
    http::spawn_patch(Provider::item_path(id), patch, on_error);
}
