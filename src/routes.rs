//! Route table: public listings, token-gated reservations, admin-gated
//! mutations, assembled under `/api`.

use axum::{
    Json, Router,
    http::{Method, StatusCode, header},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{auth, cabanas, health, reservas, servicios},
    middleware::auth::{requiere_admin, requiere_token},
    state::AppState,
};

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes(state.clone()))
        .nest("/cabanas", cabanas_routes(state.clone()))
        .nest("/servicios", servicios_routes(state.clone()))
        .nest("/reservas", reservas_routes(state.clone()))
        .route("/health", get(health::health_check));

    Router::new()
        .route("/", get(root))
        .nest("/api", api)
        .fallback(ruta_no_encontrada)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

fn auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/registrar", post(auth::registrar))
        .route("/login", post(auth::login))
        .route(
            "/me",
            get(auth::me).route_layer(from_fn_with_state(state, requiere_token)),
        )
}

fn cabanas_routes(state: AppState) -> Router<AppState> {
    // Reads are public; mutations require an admin token.
    Router::new()
        .route("/destacadas", get(cabanas::destacadas))
        .route("/disponibles", get(cabanas::disponibles))
        .route(
            "/",
            get(cabanas::listar).merge(
                post(cabanas::crear)
                    .route_layer(from_fn(requiere_admin))
                    .route_layer(from_fn_with_state(state.clone(), requiere_token)),
            ),
        )
        .route(
            "/{id}",
            get(cabanas::obtener).merge(
                patch(cabanas::actualizar)
                    .delete(cabanas::eliminar)
                    .route_layer(from_fn(requiere_admin))
                    .route_layer(from_fn_with_state(state, requiere_token)),
            ),
        )
}

fn servicios_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(servicios::listar).merge(
                post(servicios::crear)
                    .route_layer(from_fn(requiere_admin))
                    .route_layer(from_fn_with_state(state.clone(), requiere_token)),
            ),
        )
        .route(
            "/{id}",
            get(servicios::obtener).merge(
                patch(servicios::actualizar)
                    .delete(servicios::eliminar)
                    .route_layer(from_fn(requiere_admin))
                    .route_layer(from_fn_with_state(state, requiere_token)),
            ),
        )
}

fn reservas_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(reservas::listar).post(reservas::crear))
        .route("/{id}", get(reservas::obtener))
        .route("/{id}/cancelar", patch(reservas::cancelar))
        .route(
            "/{id}/confirmar",
            patch(reservas::confirmar).route_layer(from_fn(requiere_admin)),
        )
        .route_layer(from_fn_with_state(state, requiere_token))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// GET / - banner so the bare domain does not 404.
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "ROKADAN API funcionando correctamente",
        "status": "online",
        "documentation": "/api/docs",
    }))
}

async fn ruta_no_encontrada() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "status": "fail",
            "message": "Ruta no encontrada",
        })),
    )
}
