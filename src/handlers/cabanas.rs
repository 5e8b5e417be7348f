//! Cabin CRUD and search handlers.
//!
//! Handlers follow the thin-layer pattern: validate, delegate to the query
//! layer, shape the response envelope. Mutations sit behind the admin gate
//! at the route level.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::{
    error::{Error, Result},
    models::cabanas::{CabanaRequest, DisponibilidadQuery},
    queries::cabanas as queries,
    state::AppState,
    validation,
};

/// GET /api/cabanas
pub async fn listar(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let cabanas = queries::list_cabanas(&mut conn).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": cabanas.len(),
        "data": { "cabanas": cabanas },
    })))
}

/// GET /api/cabanas/destacadas
pub async fn destacadas(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let cabanas = queries::list_destacadas(&mut conn).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": cabanas.len(),
        "data": { "cabanas": cabanas },
    })))
}

/// GET /api/cabanas/disponibles?fechaInicio=..&fechaFin=..&adultos=..&ninos=..
///
/// The availability search: capacity covers the party, the cabin is marked
/// available, and no non-cancelled reservation overlaps the requested range.
pub async fn disponibles(
    State(state): State<AppState>,
    Query(query): Query<DisponibilidadQuery>,
) -> Result<Json<serde_json::Value>> {
    let busqueda = validation::validar_disponibilidad(&query, Utc::now().date_naive())?;

    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let cabanas = queries::list_disponibles(
        &mut conn,
        busqueda.fecha_inicio,
        busqueda.fecha_fin,
        busqueda.adultos + busqueda.ninos,
    )
    .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": cabanas.len(),
        "data": { "cabanas": cabanas },
    })))
}

/// GET /api/cabanas/{id}
pub async fn obtener(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let cabana = queries::get_cabana_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| Error::NotFound("No se encontró la cabaña con ese ID".to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "cabana": cabana },
    })))
}

/// POST /api/cabanas (admin)
pub async fn crear(
    State(state): State<AppState>,
    Json(request): Json<CabanaRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    validation::validar_cabana(&request)?;

    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let cabana = queries::create_cabana(&mut conn, request).await?;
    tracing::info!(cabana_id = cabana.id, "cabaña creada");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "data": { "cabana": cabana },
        })),
    ))
}

/// PATCH /api/cabanas/{id} (admin)
pub async fn actualizar(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<CabanaRequest>,
) -> Result<Json<serde_json::Value>> {
    validation::validar_cabana(&request)?;

    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    let cabana = queries::update_cabana(&mut conn, id, request)
        .await?
        .ok_or_else(|| Error::NotFound("No se encontró la cabaña con ese ID".to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "cabana": cabana },
    })))
}

/// DELETE /api/cabanas/{id} (admin)
pub async fn eliminar(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode> {
    let mut conn = state.pool.acquire().await.map_err(|e| {
        Error::Internal(format!("Failed to acquire database connection: {}", e))
    })?;

    if !queries::delete_cabana(&mut conn, id).await? {
        return Err(Error::NotFound(
            "No se encontró la cabaña con ese ID".to_string(),
        ));
    }

    tracing::info!(cabana_id = id, "cabaña eliminada");
    Ok(StatusCode::NO_CONTENT)
}
