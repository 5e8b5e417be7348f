use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    error::{Error, Result},
    models::servicios::ServicioRequest,
    queries::servicios as queries,
    state::AppState,
    validation,
};

/// GET /api/servicios
pub async fn listar(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let servicios = queries::list_servicios(&mut conn).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": servicios.len(),
        "data": { "servicios": servicios },
    })))
}

/// GET /api/servicios/{id}
pub async fn obtener(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let servicio = queries::get_servicio_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| Error::NotFound("No se encontró el servicio con ese ID".to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "servicio": servicio },
    })))
}

/// POST /api/servicios (admin)
pub async fn crear(
    State(state): State<AppState>,
    Json(request): Json<ServicioRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    validation::validar_servicio(&request)?;

    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let servicio = queries::create_servicio(&mut conn, request).await?;
    tracing::info!(servicio_id = servicio.id, "servicio creado");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "data": { "servicio": servicio },
        })),
    ))
}

/// PATCH /api/servicios/{id} (admin)
pub async fn actualizar(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<ServicioRequest>,
) -> Result<Json<serde_json::Value>> {
    validation::validar_servicio(&request)?;

    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let servicio = queries::update_servicio(&mut conn, id, request)
        .await?
        .ok_or_else(|| Error::NotFound("No se encontró el servicio con ese ID".to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "servicio": servicio },
    })))
}

/// DELETE /api/servicios/{id} (admin)
pub async fn eliminar(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode> {
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    if !queries::delete_servicio(&mut conn, id).await? {
        return Err(Error::NotFound(
            "No se encontró el servicio con ese ID".to_string(),
        ));
    }

    tracing::info!(servicio_id = id, "servicio eliminado");
    Ok(StatusCode::NO_CONTENT)
}
