use axum::{
    Json,
    extract::{Extension, State},
    http::StatusCode,
};
use secrecy::ExposeSecret;

use crate::{
    error::{Error, Result},
    middleware::auth::UsuarioAutenticado,
    models::usuarios::{LoginRequest, RegistroRequest, Usuario},
    services::{jwt, usuarios},
    state::AppState,
    validation,
};

fn token_para(state: &AppState, usuario: &Usuario) -> Result<String> {
    jwt::generate_token(
        usuario.id,
        &usuario.email,
        usuario.es_admin,
        state.config.jwt.secret.expose_secret(),
        state.config.jwt.expires_in_hours,
    )
}

/// POST /api/auth/registrar
///
/// Registers a new user and answers with a fresh token so the client is
/// logged in immediately.
///
/// # HTTP Status Codes
/// - `201 CREATED`: User registered
/// - `400 BAD_REQUEST`: Field validation failed
/// - `409 CONFLICT`: Email already registered
pub async fn registrar(
    State(state): State<AppState>,
    Json(request): Json<RegistroRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    validation::validar_registro(&request)?;

    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let usuario = usuarios::registrar(&mut conn, request).await?;
    let token = token_para(&state, &usuario)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "token": token,
            "data": { "usuario": usuario },
        })),
    ))
}

/// POST /api/auth/login
///
/// Authenticates with email and password. Unknown email and wrong password
/// produce the identical 401 body.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>> {
    validation::validar_login(&request)?;

    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let usuario = usuarios::login(&mut conn, request).await?;
    let token = token_para(&state, &usuario)?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "token": token,
        "data": { "usuario": usuario },
    })))
}

/// GET /api/auth/me
///
/// Returns the current account, re-read from the database so a deleted user
/// with a live token gets a 404 instead of stale claims.
pub async fn me(
    State(state): State<AppState>,
    Extension(usuario): Extension<UsuarioAutenticado>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let actual = crate::queries::usuarios::get_usuario_by_id(&mut conn, usuario.id)
        .await?
        .ok_or_else(|| Error::NotFound("Usuario no encontrado".to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "usuario": actual },
    })))
}
