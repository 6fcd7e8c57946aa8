//! Authenticated JSON requests against the backend.
//!
//! Every helper returns `Result<_, String>` with a message ready for the
//! error banner; the backend's `{"error": "..."}` body is preferred when
//! present. No retries.

use super::api_utils::api_url;
use crate::system::auth::storage;
use gloo_net::http::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<String>,
    message: Option<String>,
}

fn with_auth(builder: RequestBuilder) -> RequestBuilder {
    let builder = builder.header("Accept", "application/json");
    match storage::get_access_token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

async fn error_from(response: Response) -> String {
    let status = response.status();
    if status == 401 {
        log::warn!("401 from {}", response.url());
        return "Sesión expirada, vuelva a iniciar sesión".to_string();
    }

    let text = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorResponse>(&text)
        .ok()
        .and_then(|e| e.error.or(e.message));
    match detail {
        Some(msg) => msg,
        None if status == 404 => "No encontrado".to_string(),
        None => format!("Error del servidor: {}", status),
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    if !response.ok() {
        return Err(error_from(response).await);
    }
    response
        .json::<T>()
        .await
        .map_err(|e| format!("Respuesta inválida: {}", e))
}

async fn read_empty(response: Response) -> Result<(), String> {
    if !response.ok() {
        return Err(error_from(response).await);
    }
    Ok(())
}

pub async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, String> {
    let url = api_url(path);
    log::debug!("GET {}", url);
    let response = with_auth(gloo_net::http::Request::get(&url))
        .header("Cache-Control", "no-cache")
        .send()
        .await
        .map_err(|e| {
            log::error!("GET {} failed: {}", url, e);
            format!("Error de red: {}", e)
        })?;
    read_json(response).await
}

async fn send_body<B: Serialize>(
    builder: RequestBuilder,
    method: &str,
    url: &str,
    body: &B,
) -> Result<Response, String> {
    log::debug!("{} {}", method, url);
    with_auth(builder)
        .json(body)
        .map_err(|e| format!("No se pudo serializar la solicitud: {}", e))?
        .send()
        .await
        .map_err(|e| {
            log::error!("{} {} failed: {}", method, url, e);
            format!("Error de red: {}", e)
        })
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, String> {
    let url = api_url(path);
    let response = send_body(gloo_net::http::Request::post(&url), "POST", &url, body).await?;
    read_json(response).await
}

/// POST whose response body is ignored
pub async fn post<B: Serialize>(path: &str, body: &B) -> Result<(), String> {
    let url = api_url(path);
    let response = send_body(gloo_net::http::Request::post(&url), "POST", &url, body).await?;
    read_empty(response).await
}

pub async fn put<B: Serialize>(path: &str, body: &B) -> Result<(), String> {
    let url = api_url(path);
    let response = send_body(gloo_net::http::Request::put(&url), "PUT", &url, body).await?;
    read_empty(response).await
}

pub async fn patch<B: Serialize>(path: &str, body: &B) -> Result<(), String> {
    let url = api_url(path);
    let response = send_body(gloo_net::http::Request::patch(&url), "PATCH", &url, body).await?;
    read_empty(response).await
}

/// Create (`POST` collection) or update (`PUT` item) depending on whether the form has an id
pub async fn save<B: Serialize>(collection: &str, id: Option<&str>, body: &B) -> Result<(), String> {
    match id {
        Some(id) => put(&format!("{}/{}", collection, id), body).await,
        None => post(collection, body).await,
    }
}

/// Fire-and-forget patch used by optimistic cells: the caller has already
/// updated its local copy and only hears about failures.
pub fn spawn_patch<B, F>(path: String, body: B, on_error: F)
where
    B: Serialize + 'static,
    F: FnOnce(String) + 'static,
{
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = patch(&path, &body).await {
            log::warn!("optimistic PATCH {} failed: {}", path, e);
            on_error(e);
        }
    });
}
