use contracts::domain::a005_request::aggregate::{NewSolicitud, Solicitud};
use contracts::domain::a005_request::workflow::{action_endpoint, RequestAction};
use contracts::domain::common::Resource;
use serde::Serialize;

use crate::shared::http;

pub async fn fetch_solicitudes() -> Result<Vec<Solicitud>, String> {
    http::get_json(Solicitud::collection_path()).await
}

pub async fn fetch_solicitud(id: &str) -> Result<Solicitud, String> {
    http::get_json(&Solicitud::item_path(id)).await
}

pub async fn create_solicitud(body: &NewSolicitud) -> Result<(), String> {
    http::post(Solicitud::collection_path(), body).await
}

/// Aprobar and Cancelar carry no payload; the backend still expects a JSON object
pub async fn perform_action<B: Serialize>(id: &str, action: RequestAction, body: &B) -> Result<(), String> {
    log::info!("solicitud {}: {}", id, action.as_str());
    http::post(&action_endpoint(id, action), body).await
}

pub async fn perform_simple_action(id: &str, action: RequestAction) -> Result<(), String> {
    perform_action(id, action, &serde_json::json!({})).await
}
