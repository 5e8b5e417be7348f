use chrono::NaiveDate;

use crate::{
    database::DbConn,
    error::Result,
    models::cabanas::{Cabana, CabanaRequest, IMAGEN_POR_DEFECTO},
};

const COLUMNAS: &str =
    "id, nombre, descripcion, precio, capacidad, imagen, disponible, destacada, creado_en, actualizado_en";

/// Lists every cabin currently marked as available.
pub async fn list_cabanas(conn: &mut DbConn) -> Result<Vec<Cabana>> {
    let cabanas = sqlx::query_as::<_, Cabana>(&format!(
        "SELECT {COLUMNAS} FROM cabanas WHERE disponible = TRUE ORDER BY id"
    ))
    .fetch_all(&mut *conn)
    .await?;

    Ok(cabanas)
}

pub async fn get_cabana_by_id(conn: &mut DbConn, id: i32) -> Result<Option<Cabana>> {
    let cabana = sqlx::query_as::<_, Cabana>(&format!(
        "SELECT {COLUMNAS} FROM cabanas WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(cabana)
}

/// Cabins flagged as featured for the landing page.
pub async fn list_destacadas(conn: &mut DbConn) -> Result<Vec<Cabana>> {
    let cabanas = sqlx::query_as::<_, Cabana>(&format!(
        r#"
        SELECT {COLUMNAS}
        FROM cabanas
        WHERE disponible = TRUE AND destacada = TRUE
        ORDER BY creado_en DESC
        "#
    ))
    .fetch_all(&mut *conn)
    .await?;

    Ok(cabanas)
}

/// SQL for the availability search: cabins with enough capacity whose id
/// does not appear among non-cancelled reservations overlapping the
/// requested range. The subquery's three clauses mirror
/// [`crate::queries::reservas::rango_ocupado`].
fn sql_disponibles() -> String {
    format!(
        r#"
        SELECT {COLUMNAS}
        FROM cabanas c
        WHERE c.disponible = TRUE
          AND c.capacidad >= $1
          AND c.id NOT IN (
              SELECT r.cabana_id
              FROM reservas r
              WHERE r.estado <> 'cancelada'
                AND (
                    (r.fecha_inicio <= $2 AND r.fecha_fin >= $2) OR
                    (r.fecha_inicio <= $3 AND r.fecha_fin >= $3) OR
                    (r.fecha_inicio >= $2 AND r.fecha_fin <= $3)
                )
          )
        ORDER BY c.id
        "#
    )
}

pub async fn list_disponibles(
    conn: &mut DbConn,
    fecha_inicio: NaiveDate,
    fecha_fin: NaiveDate,
    capacidad_total: i32,
) -> Result<Vec<Cabana>> {
    let cabanas = sqlx::query_as::<_, Cabana>(&sql_disponibles())
        .bind(capacidad_total)
        .bind(fecha_inicio)
        .bind(fecha_fin)
        .fetch_all(&mut *conn)
        .await?;

    Ok(cabanas)
}

pub async fn create_cabana(conn: &mut DbConn, req: CabanaRequest) -> Result<Cabana> {
    let cabana = sqlx::query_as::<_, Cabana>(&format!(
        r#"
        INSERT INTO cabanas (nombre, descripcion, precio, capacidad, imagen, disponible, destacada)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {COLUMNAS}
        "#
    ))
    .bind(&req.nombre)
    .bind(&req.descripcion)
    .bind(req.precio)
    .bind(req.capacidad)
    .bind(req.imagen.as_deref().unwrap_or(IMAGEN_POR_DEFECTO))
    .bind(req.disponible.unwrap_or(true))
    .bind(req.destacada.unwrap_or(false))
    .fetch_one(&mut *conn)
    .await?;

    Ok(cabana)
}

pub async fn update_cabana(
    conn: &mut DbConn,
    id: i32,
    req: CabanaRequest,
) -> Result<Option<Cabana>> {
    let cabana = sqlx::query_as::<_, Cabana>(&format!(
        r#"
        UPDATE cabanas
        SET nombre = $1,
            descripcion = $2,
            precio = $3,
            capacidad = $4,
            imagen = $5,
            disponible = $6,
            destacada = $7,
            actualizado_en = now()
        WHERE id = $8
        RETURNING {COLUMNAS}
        "#
    ))
    .bind(&req.nombre)
    .bind(&req.descripcion)
    .bind(req.precio)
    .bind(req.capacidad)
    .bind(req.imagen.as_deref().unwrap_or(IMAGEN_POR_DEFECTO))
    .bind(req.disponible.unwrap_or(true))
    .bind(req.destacada.unwrap_or(false))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(cabana)
}

/// Deletes a cabin by id, returning whether a row was removed.
pub async fn delete_cabana(conn: &mut DbConn, id: i32) -> Result<bool> {
    let rows_affected = sqlx::query("DELETE FROM cabanas WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    Ok(rows_affected > 0)
}
