use contracts::domain::a001_product::aggregate::{Product, ProductPatch, INVENTORY_PATH};
use contracts::domain::common::Resource;

use crate::shared::http;

/// Catalog with current stock, the same snapshot the wizards validate against
pub async fn fetch_inventory() -> Result<Vec<Product>, String> {
    http::get_json(INVENTORY_PATH).await
}

pub fn patch_product(id: &str, patch: ProductPatch, on_error: impl FnOnce(String) + 'static) {
    http::spawn_patch(Product::item_path(id), patch, on_error);
}
