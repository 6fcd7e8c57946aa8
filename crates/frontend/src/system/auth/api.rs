use contracts::system::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo,
};
use gloo_net::http::Request;

use crate::shared::api_utils::api_url;
use crate::shared::http;

const AUTH_PATH: &str = "/api/system/auth";

/// Login with username and password
pub async fn login(username: String, password: String) -> Result<LoginResponse, String> {
    let request = LoginRequest { username, password };
    http::post_json(&format!("{}/login", AUTH_PATH), &request)
        .await
        .map_err(|e| {
            if e.starts_with("Sesión expirada") {
                "Usuario o contraseña incorrectos".to_string()
            } else {
                e
            }
        })
}

pub async fn refresh_token(refresh_token: String) -> Result<RefreshResponse, String> {
    let request = RefreshRequest { refresh_token };
    http::post_json(&format!("{}/refresh", AUTH_PATH), &request).await
}

/// Revoke the refresh token
pub async fn logout(refresh_token: String) -> Result<(), String> {
    let request = RefreshRequest { refresh_token };
    http::post(&format!("{}/logout", AUTH_PATH), &request).await
}

/// Current user for an explicit token (used before the token is stored)
pub async fn get_current_user(access_token: &str) -> Result<UserInfo, String> {
    let response = Request::get(&api_url(&format!("{}/me", AUTH_PATH)))
        .header("Authorization", &format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|e| format!("Error de red: {}", e))?;

    if !response.ok() {
        return Err(format!("No se pudo validar la sesión: {}", response.status()));
    }

    response
        .json::<UserInfo>()
        .await
        .map_err(|e| format!("Respuesta inválida: {}", e))
}
