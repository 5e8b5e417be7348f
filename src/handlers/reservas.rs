use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};

use crate::{
    error::{Error, Result},
    middleware::auth::UsuarioAutenticado,
    models::reservas::CrearReservaRequest,
    services::reservas,
    state::AppState,
};

/// GET /api/reservas
///
/// Admins see every reservation; everyone else sees only their own.
pub async fn listar(
    State(state): State<AppState>,
    Extension(usuario): Extension<UsuarioAutenticado>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let lista = reservas::listar(&mut conn, usuario.id, usuario.es_admin).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": lista.len(),
        "data": { "reservas": lista },
    })))
}

/// GET /api/reservas/{id}
///
/// Owner or admin only; includes the contracted services.
pub async fn obtener(
    State(state): State<AppState>,
    Extension(usuario): Extension<UsuarioAutenticado>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let detalle = reservas::obtener(&mut conn, id, usuario.id, usuario.es_admin).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "reserva": detalle },
    })))
}

/// POST /api/reservas
///
/// # HTTP Status Codes
/// - `201 CREATED`: Reservation stored
/// - `400 BAD_REQUEST`: Field validation failed
/// - `404 NOT_FOUND`: Unknown cabin or service id
/// - `409 CONFLICT`: Dates overlap an existing non-cancelled reservation
pub async fn crear(
    State(state): State<AppState>,
    Extension(usuario): Extension<UsuarioAutenticado>,
    Json(request): Json<CrearReservaRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let detalle = reservas::crear(&state.pool, usuario.id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "data": { "reserva": detalle },
        })),
    ))
}

/// PATCH /api/reservas/{id}/cancelar
pub async fn cancelar(
    State(state): State<AppState>,
    Extension(usuario): Extension<UsuarioAutenticado>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let reserva = reservas::cancelar(&mut conn, id, usuario.id, usuario.es_admin).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "reserva": reserva },
    })))
}

/// PATCH /api/reservas/{id}/confirmar (admin)
pub async fn confirmar(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let reserva = reservas::confirmar(&mut conn, id).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "reserva": reserva },
    })))
}
