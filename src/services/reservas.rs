use chrono::{NaiveDate, Utc};

use crate::{
    database::{DbConn, DbPool},
    error::{Error, Result},
    models::{
        reservas::{CrearReservaRequest, EstadoReserva, NuevaReserva, Reserva, ReservaDetalle},
        servicios::Servicio,
    },
    queries::{cabanas, reservas as queries, servicios},
    validation,
};

/// Total price: nights times the cabin rate, plus each contracted service at
/// its per-night rate, as the original site priced it.
pub fn calcular_total(precio_cabana: f64, precios_servicios: &[f64], noches: i64) -> f64 {
    let por_noche: f64 = precio_cabana + precios_servicios.iter().sum::<f64>();
    por_noche * noches as f64
}

pub fn noches(fecha_inicio: NaiveDate, fecha_fin: NaiveDate) -> i64 {
    (fecha_fin - fecha_inicio).num_days()
}

/// Creates a reservation.
///
/// Runs inside a single transaction that locks the cabin row before
/// re-checking availability, so two concurrent requests for the same cabin
/// serialize and the loser sees the winner's row. The exclusion constraint
/// on `reservas` is the final backstop.
pub async fn crear(
    pool: &DbPool,
    usuario_id: i32,
    req: CrearReservaRequest,
) -> Result<ReservaDetalle> {
    let validada = validation::validar_reserva(&req, Utc::now().date_naive())?;

    let mut tx = pool.begin().await?;

    if !queries::lock_cabana(tx.as_mut(), validada.cabana_id).await? {
        return Err(Error::NotFound(
            "No se encontró la cabaña con ese ID".to_string(),
        ));
    }
    let cabana = cabanas::get_cabana_by_id(tx.as_mut(), validada.cabana_id)
        .await?
        .ok_or_else(|| Error::NotFound("No se encontró la cabaña con ese ID".to_string()))?;

    let mut contratados: Vec<Servicio> = Vec::with_capacity(req.servicios.len());
    for servicio_id in &req.servicios {
        let servicio = servicios::get_servicio_by_id(tx.as_mut(), *servicio_id)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!("No se encontró el servicio con ID {servicio_id}"))
            })?;
        contratados.push(servicio);
    }

    if queries::existe_solape(
        tx.as_mut(),
        validada.cabana_id,
        validada.fecha_inicio,
        validada.fecha_fin,
    )
    .await?
    {
        return Err(Error::Conflict(
            "La cabaña ya está reservada en esas fechas".to_string(),
        ));
    }

    let noches = noches(validada.fecha_inicio, validada.fecha_fin);
    let precios: Vec<f64> = contratados.iter().map(|s| s.precio).collect();
    let total = calcular_total(cabana.precio, &precios, noches);

    let nueva = NuevaReserva {
        usuario_id,
        cabana_id: validada.cabana_id,
        fecha_inicio: validada.fecha_inicio,
        fecha_fin: validada.fecha_fin,
        adultos: validada.adultos,
        ninos: validada.ninos,
        total,
        servicios: req.servicios,
    };

    let reserva = queries::create_reserva(tx.as_mut(), &nueva).await?;
    tx.commit().await?;

    tracing::info!(
        reserva_id = reserva.id,
        cabana_id = reserva.cabana_id,
        total = reserva.total,
        "reserva creada"
    );

    Ok(ReservaDetalle {
        reserva,
        servicios: contratados,
    })
}

/// Lists reservations: every one for admins, only their own for the rest.
pub async fn listar(conn: &mut DbConn, usuario_id: i32, es_admin: bool) -> Result<Vec<Reserva>> {
    if es_admin {
        queries::list_reservas(conn).await
    } else {
        queries::list_reservas_by_usuario(conn, usuario_id).await
    }
}

/// Loads a reservation with its services, enforcing owner-or-admin access.
pub async fn obtener(
    conn: &mut DbConn,
    id: i32,
    usuario_id: i32,
    es_admin: bool,
) -> Result<ReservaDetalle> {
    let reserva = cargar_autorizada(conn, id, usuario_id, es_admin, "acceder a").await?;
    let servicios = queries::list_servicios_de_reserva(conn, reserva.id).await?;

    Ok(ReservaDetalle { reserva, servicios })
}

/// Cancels a reservation; only pending or confirmed ones qualify.
/// Cancelled rows drop out of every overlap filter, so the date range
/// becomes bookable again.
pub async fn cancelar(
    conn: &mut DbConn,
    id: i32,
    usuario_id: i32,
    es_admin: bool,
) -> Result<Reserva> {
    let reserva = cargar_autorizada(conn, id, usuario_id, es_admin, "cancelar").await?;

    if !reserva.estado.es_cancelable() {
        return Err(Error::Validation(
            crate::error::ValidationErrors::single(
                "estado",
                "Solo se pueden cancelar reservas pendientes o confirmadas",
            ),
        ));
    }

    let cancelada = queries::update_estado(conn, id, EstadoReserva::Cancelada)
        .await?
        .ok_or_else(|| Error::NotFound("No se encontró la reserva con ese ID".to_string()))?;

    tracing::info!(reserva_id = id, estado = %cancelada.estado, "reserva cancelada");
    Ok(cancelada)
}

/// Confirms a pending reservation. Admin-only, enforced at the route layer.
pub async fn confirmar(conn: &mut DbConn, id: i32) -> Result<Reserva> {
    let reserva = queries::get_reserva_by_id(conn, id)
        .await?
        .ok_or_else(|| Error::NotFound("No se encontró la reserva con ese ID".to_string()))?;

    if reserva.estado != EstadoReserva::Pendiente {
        return Err(Error::Validation(
            crate::error::ValidationErrors::single(
                "estado",
                "Solo se pueden confirmar reservas pendientes",
            ),
        ));
    }

    let confirmada = queries::update_estado(conn, id, EstadoReserva::Confirmada)
        .await?
        .ok_or_else(|| Error::NotFound("No se encontró la reserva con ese ID".to_string()))?;

    tracing::info!(reserva_id = id, "reserva confirmada");
    Ok(confirmada)
}

async fn cargar_autorizada(
    conn: &mut DbConn,
    id: i32,
    usuario_id: i32,
    es_admin: bool,
    accion: &str,
) -> Result<Reserva> {
    let reserva = queries::get_reserva_by_id(conn, id)
        .await?
        .ok_or_else(|| Error::NotFound("No se encontró la reserva con ese ID".to_string()))?;

    if reserva.usuario_id != usuario_id && !es_admin {
        return Err(Error::Forbidden(format!(
            "No tienes permiso para {accion} esta reserva"
        )));
    }

    Ok(reserva)
}
