use crate::{
    database::DbConn,
    error::{Error, Result},
    models::usuarios::{NuevoUsuario, Usuario},
};

const COLUMNAS: &str =
    "id, nombre, apellido, email, telefono, password_hash, es_admin, creado_en, actualizado_en";

/// Creates a new user. A unique violation on the email column is surfaced as
/// a conflict with the message the original API used.
pub async fn create_usuario(conn: &mut DbConn, nuevo: NuevoUsuario) -> Result<Usuario> {
    let usuario = sqlx::query_as::<_, Usuario>(&format!(
        r#"
        INSERT INTO usuarios (nombre, apellido, email, telefono, password_hash)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {COLUMNAS}
        "#
    ))
    .bind(&nuevo.nombre)
    .bind(&nuevo.apellido)
    .bind(&nuevo.email)
    .bind(&nuevo.telefono)
    .bind(&nuevo.password_hash)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        if es_violacion_unica(&e) {
            Error::Conflict("Ya existe un usuario con este email".to_string())
        } else {
            Error::Sqlx(e)
        }
    })?;

    Ok(usuario)
}

/// Gets a single user by their ID. The user may not exist.
pub async fn get_usuario_by_id(conn: &mut DbConn, id: i32) -> Result<Option<Usuario>> {
    let usuario = sqlx::query_as::<_, Usuario>(&format!(
        "SELECT {COLUMNAS} FROM usuarios WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(usuario)
}

/// Gets a single user by their email address. The user may not exist.
pub async fn get_usuario_by_email(conn: &mut DbConn, email: &str) -> Result<Option<Usuario>> {
    let usuario = sqlx::query_as::<_, Usuario>(&format!(
        "SELECT {COLUMNAS} FROM usuarios WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(usuario)
}

/// Detects a Postgres unique-constraint violation (SQLSTATE 23505).
pub fn es_violacion_unica(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}
