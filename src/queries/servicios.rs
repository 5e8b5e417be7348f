use crate::{
    database::DbConn,
    error::Result,
    models::servicios::{Servicio, ServicioRequest},
};

const COLUMNAS: &str = "id, nombre, descripcion, precio, creado_en, actualizado_en";

pub async fn list_servicios(conn: &mut DbConn) -> Result<Vec<Servicio>> {
    let servicios = sqlx::query_as::<_, Servicio>(&format!(
        "SELECT {COLUMNAS} FROM servicios ORDER BY id"
    ))
    .fetch_all(&mut *conn)
    .await?;

    Ok(servicios)
}

pub async fn get_servicio_by_id(conn: &mut DbConn, id: i32) -> Result<Option<Servicio>> {
    let servicio = sqlx::query_as::<_, Servicio>(&format!(
        "SELECT {COLUMNAS} FROM servicios WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(servicio)
}

pub async fn create_servicio(conn: &mut DbConn, req: ServicioRequest) -> Result<Servicio> {
    let servicio = sqlx::query_as::<_, Servicio>(&format!(
        r#"
        INSERT INTO servicios (nombre, descripcion, precio)
        VALUES ($1, $2, $3)
        RETURNING {COLUMNAS}
        "#
    ))
    .bind(&req.nombre)
    .bind(req.descripcion.as_deref())
    .bind(req.precio)
    .fetch_one(&mut *conn)
    .await?;

    Ok(servicio)
}

pub async fn update_servicio(
    conn: &mut DbConn,
    id: i32,
    req: ServicioRequest,
) -> Result<Option<Servicio>> {
    let servicio = sqlx::query_as::<_, Servicio>(&format!(
        r#"
        UPDATE servicios
        SET nombre = $1, descripcion = $2, precio = $3, actualizado_en = now()
        WHERE id = $4
        RETURNING {COLUMNAS}
        "#
    ))
    .bind(&req.nombre)
    .bind(req.descripcion.as_deref())
    .bind(req.precio)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(servicio)
}

pub async fn delete_servicio(conn: &mut DbConn, id: i32) -> Result<bool> {
    let rows_affected = sqlx::query("DELETE FROM servicios WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    Ok(rows_affected > 0)
}
