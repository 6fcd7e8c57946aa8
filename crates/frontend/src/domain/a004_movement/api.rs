use contracts::domain::a004_movement::aggregate::{Movement, MovementKind};
use contracts::domain::common::Resource;
use serde::Serialize;

use crate::shared::api_utils::with_query;
use crate::shared::http;

/// `GET /api/movimientos?tipo=&q=`
pub async fn fetch_movements(kind: Option<MovementKind>, query: &str) -> Result<Vec<Movement>, String> {
    let tipo = kind.map(|k| k.as_str()).unwrap_or("");
    http::get_json(&with_query(Movement::collection_path(), &[("tipo", tipo), ("q", query.trim())])).await
}

pub async fn register<B: Serialize>(kind: MovementKind, body: &B) -> Result<(), String> {
    http::post(&kind.endpoint(), body).await
}
