use chrono::NaiveDate;

use crate::{
    database::DbConn,
    error::{Error, Result},
    models::{
        reservas::{EstadoReserva, NuevaReserva, Reserva},
        servicios::Servicio,
    },
};

const COLUMNAS: &str = "id, usuario_id, cabana_id, fecha_inicio, fecha_fin, adultos, ninos, total, estado, creado_en, actualizado_en";

/// Closed-interval overlap test over booked dates. [`existe_solape`] and the
/// cabin availability search embed exactly these three clauses in SQL; this
/// pins the semantics they must match. Both endpoints count as occupied, so
/// ranges that merely touch on a boundary day still collide.
pub fn rango_ocupado(
    reserva_inicio: NaiveDate,
    reserva_fin: NaiveDate,
    inicio: NaiveDate,
    fin: NaiveDate,
) -> bool {
    (reserva_inicio <= inicio && reserva_fin >= inicio)
        || (reserva_inicio <= fin && reserva_fin >= fin)
        || (reserva_inicio >= inicio && reserva_fin <= fin)
}

/// Whether a reservation blocks the requested range. Cancelling a
/// reservation frees its dates, so cancelled rows never block.
pub fn reserva_bloquea(
    estado: EstadoReserva,
    reserva_inicio: NaiveDate,
    reserva_fin: NaiveDate,
    inicio: NaiveDate,
    fin: NaiveDate,
) -> bool {
    estado != EstadoReserva::Cancelada && rango_ocupado(reserva_inicio, reserva_fin, inicio, fin)
}

pub async fn list_reservas(conn: &mut DbConn) -> Result<Vec<Reserva>> {
    let reservas = sqlx::query_as::<_, Reserva>(&format!(
        "SELECT {COLUMNAS} FROM reservas ORDER BY creado_en DESC"
    ))
    .fetch_all(&mut *conn)
    .await?;

    Ok(reservas)
}

pub async fn list_reservas_by_usuario(conn: &mut DbConn, usuario_id: i32) -> Result<Vec<Reserva>> {
    let reservas = sqlx::query_as::<_, Reserva>(&format!(
        "SELECT {COLUMNAS} FROM reservas WHERE usuario_id = $1 ORDER BY creado_en DESC"
    ))
    .bind(usuario_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(reservas)
}

pub async fn get_reserva_by_id(conn: &mut DbConn, id: i32) -> Result<Option<Reserva>> {
    let reserva = sqlx::query_as::<_, Reserva>(&format!(
        "SELECT {COLUMNAS} FROM reservas WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(reserva)
}

/// Add-on services contracted with a reservation.
pub async fn list_servicios_de_reserva(conn: &mut DbConn, reserva_id: i32) -> Result<Vec<Servicio>> {
    let servicios = sqlx::query_as::<_, Servicio>(
        r#"
        SELECT s.id, s.nombre, s.descripcion, s.precio, s.creado_en, s.actualizado_en
        FROM servicios s
        JOIN reserva_servicios rs ON rs.servicio_id = s.id
        WHERE rs.reserva_id = $1
        ORDER BY s.id
        "#,
    )
    .bind(reserva_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(servicios)
}

/// Locks the cabin row so concurrent bookings for the same cabin serialize on
/// it. Returns false when the cabin does not exist.
pub async fn lock_cabana(conn: &mut DbConn, cabana_id: i32) -> Result<bool> {
    let id: Option<i32> = sqlx::query_scalar("SELECT id FROM cabanas WHERE id = $1 FOR UPDATE")
        .bind(cabana_id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(id.is_some())
}

/// True when a non-cancelled reservation for the cabin overlaps the range.
pub async fn existe_solape(
    conn: &mut DbConn,
    cabana_id: i32,
    fecha_inicio: NaiveDate,
    fecha_fin: NaiveDate,
) -> Result<bool> {
    let existe: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM reservas r
            WHERE r.cabana_id = $1
              AND r.estado <> 'cancelada'
              AND (
                  (r.fecha_inicio <= $2 AND r.fecha_fin >= $2) OR
                  (r.fecha_inicio <= $3 AND r.fecha_fin >= $3) OR
                  (r.fecha_inicio >= $2 AND r.fecha_fin <= $3)
              )
        )
        "#,
    )
    .bind(cabana_id)
    .bind(fecha_inicio)
    .bind(fecha_fin)
    .fetch_one(&mut *conn)
    .await?;

    Ok(existe)
}

/// Inserts the reservation row and its service associations. Expects to run
/// inside the transaction that already holds the cabin lock; the exclusion
/// constraint still backs this up, surfacing as a conflict.
pub async fn create_reserva(conn: &mut DbConn, nueva: &NuevaReserva) -> Result<Reserva> {
    let reserva = sqlx::query_as::<_, Reserva>(&format!(
        r#"
        INSERT INTO reservas (usuario_id, cabana_id, fecha_inicio, fecha_fin, adultos, ninos, total)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {COLUMNAS}
        "#
    ))
    .bind(nueva.usuario_id)
    .bind(nueva.cabana_id)
    .bind(nueva.fecha_inicio)
    .bind(nueva.fecha_fin)
    .bind(nueva.adultos)
    .bind(nueva.ninos)
    .bind(nueva.total)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        if es_violacion_exclusion(&e) {
            Error::Conflict("La cabaña ya está reservada en esas fechas".to_string())
        } else {
            Error::Sqlx(e)
        }
    })?;

    for servicio_id in &nueva.servicios {
        sqlx::query("INSERT INTO reserva_servicios (reserva_id, servicio_id) VALUES ($1, $2)")
            .bind(reserva.id)
            .bind(servicio_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(reserva)
}

/// Moves a reservation to a new state. State-transition legality is checked
/// by the service layer against the freshly loaded row.
pub async fn update_estado(
    conn: &mut DbConn,
    id: i32,
    estado: EstadoReserva,
) -> Result<Option<Reserva>> {
    let reserva = sqlx::query_as::<_, Reserva>(&format!(
        r#"
        UPDATE reservas
        SET estado = $1, actualizado_en = now()
        WHERE id = $2
        RETURNING {COLUMNAS}
        "#
    ))
    .bind(estado)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(reserva)
}

/// Detects a Postgres exclusion-constraint violation (SQLSTATE 23P01).
fn es_violacion_exclusion(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23P01")
    )
}
