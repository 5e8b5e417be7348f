use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Usuario {
    pub id: i32,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
    /// Never serialized back to clients.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub es_admin: bool,
    pub creado_en: DateTime<Utc>,
    pub actualizado_en: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NuevoUsuario {
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistroRequest {
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
    pub password: String,
    #[serde(alias = "confirmPassword")]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
