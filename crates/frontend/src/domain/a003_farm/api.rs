use contracts::domain::a003_farm::aggregate::{Farm, FarmDto, Lot, LotDto, LOTS_PATH};
use contracts::domain::common::Resource;

use crate::shared::http;

pub async fn fetch_farms() -> Result<Vec<Farm>, String> {
    http::get_json(Farm::collection_path()).await
}

pub async fn fetch_lots() -> Result<Vec<Lot>, String> {
    http::get_json(LOTS_PATH).await
}

pub async fn save_farm(dto: &FarmDto) -> Result<(), String> {
    http::save(Farm::collection_path(), dto.id.as_deref(), dto).await
}

pub async fn save_lot(dto: &LotDto) -> Result<(), String> {
    http::save(LOTS_PATH, dto.id.as_deref(), dto).await
}
