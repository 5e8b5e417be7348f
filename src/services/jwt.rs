use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// JWT claims structure
///
/// Carries the user id, email and admin flag so route guards never need a
/// database round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub id: i32,
    /// User email
    pub email: String,
    /// Admin flag, checked by the admin gate
    pub es_admin: bool,
    /// Expiration time as Unix timestamp
    pub exp: i64,
    /// Issued at time as Unix timestamp
    pub iat: i64,
}

/// Generates a signed HS256 token for a user.
pub fn generate_token(
    id: i32,
    email: &str,
    es_admin: bool,
    secret: &str,
    expires_in_hours: i64,
) -> Result<String> {
    let now = Utc::now();
    let expiration = now + Duration::hours(expires_in_hours);

    let claims = Claims {
        id,
        email: email.to_string(),
        es_admin,
        exp: expiration.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| Error::Internal(format!("Failed to generate JWT: {}", e)))
}

/// Verifies a token and returns its claims.
///
/// Rejections are distinguishable: expired tokens, bad signatures and
/// malformed tokens each carry their own message. `leeway_seconds` is the
/// clock tolerance applied to `exp`.
pub fn verify_token(token: &str, secret: &str, leeway_seconds: u64) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = leeway_seconds;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
    .map_err(|e| {
        let error_msg = e.to_string().to_lowercase();
        if error_msg.contains("expired") {
            Error::Authentication(
                "Token expirado. Por favor inicia sesión nuevamente.".to_string(),
            )
        } else if error_msg.contains("signature") {
            Error::Authentication("Firma del token inválida".to_string())
        } else {
            Error::Authentication("Token inválido".to_string())
        }
    })?;

    Ok(token_data.claims)
}

/// Extracts the Bearer token from the Authorization header
pub fn extract_bearer(auth_header: Option<&str>) -> Result<&str> {
    match auth_header {
        Some(header) => {
            let token = header
                .strip_prefix("Bearer ")
                .ok_or_else(|| {
                    Error::Authentication(
                        "Formato de autorización inválido. Se espera 'Bearer <token>'".to_string(),
                    )
                })?
                .trim();
            if token.is_empty() {
                return Err(Error::Authentication("Token vacío".to_string()));
            }
            Ok(token)
        }
        None => Err(Error::Authentication("Token no proporcionado".to_string())),
    }
}
