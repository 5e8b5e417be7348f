use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Servicio {
    pub id: i32,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: f64,
    pub creado_en: DateTime<Utc>,
    pub actualizado_en: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServicioRequest {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub precio: f64,
}
