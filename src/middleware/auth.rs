//! Bearer-token authentication middleware.
//!
//! Verifies the JWT from the Authorization header and places the claims in
//! the request extensions. The claims carry everything the guards need
//! (id, email, admin flag), so no database query happens here.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::{
    error::{Error, Result},
    services::jwt,
    state::AppState,
};

/// Authenticated user extracted from a verified token.
#[derive(Debug, Clone, Serialize)]
pub struct UsuarioAutenticado {
    pub id: i32,
    pub email: String,
    pub es_admin: bool,
}

impl From<jwt::Claims> for UsuarioAutenticado {
    fn from(claims: jwt::Claims) -> Self {
        Self {
            id: claims.id,
            email: claims.email,
            es_admin: claims.es_admin,
        }
    }
}

/// Rejects requests without a valid bearer token (401) and inserts
/// [`UsuarioAutenticado`] into the request extensions for handlers.
///
/// Apply with `route_layer(middleware::from_fn_with_state(state, requiere_token))`.
pub async fn requiere_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());
    let token = jwt::extract_bearer(auth_header)?;

    let claims = jwt::verify_token(
        token,
        state.config.jwt.secret.expose_secret(),
        state.config.jwt.leeway_seconds,
    )?;

    request
        .extensions_mut()
        .insert(UsuarioAutenticado::from(claims));
    Ok(next.run(request).await)
}

/// Gate for admin-only routes; must run after [`requiere_token`].
pub async fn requiere_admin(request: Request, next: Next) -> Result<Response> {
    let usuario = request
        .extensions()
        .get::<UsuarioAutenticado>()
        .ok_or_else(|| Error::Authentication("Token no proporcionado".to_string()))?;

    if !usuario.es_admin {
        return Err(Error::Forbidden(
            "No tienes permiso para realizar esta acción".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
