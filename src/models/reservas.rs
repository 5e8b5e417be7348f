use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::models::servicios::Servicio;

/// Reservation lifecycle. Stored as the `estado_reserva` Postgres enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, sqlx::Type,
)]
#[sqlx(type_name = "estado_reserva", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EstadoReserva {
    Pendiente,
    Confirmada,
    Cancelada,
}

impl EstadoReserva {
    /// Only pending and confirmed reservations can still be cancelled.
    pub fn es_cancelable(self) -> bool {
        matches!(self, EstadoReserva::Pendiente | EstadoReserva::Confirmada)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reserva {
    pub id: i32,
    pub usuario_id: i32,
    pub cabana_id: i32,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub adultos: i32,
    pub ninos: i32,
    pub total: f64,
    pub estado: EstadoReserva,
    pub creado_en: DateTime<Utc>,
    pub actualizado_en: DateTime<Utc>,
}

/// A reservation together with its contracted add-on services.
#[derive(Debug, Clone, Serialize)]
pub struct ReservaDetalle {
    #[serde(flatten)]
    pub reserva: Reserva,
    pub servicios: Vec<Servicio>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrearReservaRequest {
    pub cabana_id: Option<i32>,
    pub fecha_inicio: Option<String>,
    pub fecha_fin: Option<String>,
    pub adultos: Option<i32>,
    pub ninos: Option<i32>,
    #[serde(default)]
    pub servicios: Vec<i32>,
}

/// Validated form of [`CrearReservaRequest`], ready for insertion.
#[derive(Debug, Clone)]
pub struct NuevaReserva {
    pub usuario_id: i32,
    pub cabana_id: i32,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin: NaiveDate,
    pub adultos: i32,
    pub ninos: i32,
    pub total: f64,
    pub servicios: Vec<i32>,
}
