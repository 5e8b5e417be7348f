use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder shown when a cabin was created without a picture.
pub const IMAGEN_POR_DEFECTO: &str =
    "https://via.placeholder.com/800x600?text=Imagen+no+disponible";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Cabana {
    pub id: i32,
    pub nombre: String,
    pub descripcion: String,
    pub precio: f64,
    pub capacidad: i32,
    pub imagen: String,
    pub disponible: bool,
    pub destacada: bool,
    pub creado_en: DateTime<Utc>,
    pub actualizado_en: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CabanaRequest {
    pub nombre: String,
    pub descripcion: String,
    pub precio: f64,
    pub capacidad: i32,
    pub imagen: Option<String>,
    pub disponible: Option<bool>,
    pub destacada: Option<bool>,
}

/// Query string for `GET /api/cabanas/disponibles`. Dates arrive as raw
/// strings so format errors map to the field-level validation envelope
/// instead of a generic deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct DisponibilidadQuery {
    #[serde(alias = "fechaInicio")]
    pub fecha_inicio: Option<String>,
    #[serde(alias = "fechaFin")]
    pub fecha_fin: Option<String>,
    pub adultos: Option<i32>,
    pub ninos: Option<i32>,
}

/// Validated form of [`DisponibilidadQuery`].
#[derive(Debug, Clone, Copy)]
pub struct Disponibilidad {
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub adultos: i32,
    pub ninos: i32,
}
