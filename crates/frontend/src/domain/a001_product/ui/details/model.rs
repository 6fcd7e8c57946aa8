use contracts::domain::a001_product::aggregate::{Product, ProductDto};
use contracts::domain::common::Resource;

use crate::shared::http;

pub async fn save_form(dto: &ProductDto) -> Result<(), String> {
    http::save(Product::collection_path(), dto.id.as_deref(), dto).await
}
