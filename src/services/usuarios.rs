use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::{
    database::DbConn,
    error::{Error, Result},
    models::usuarios::{LoginRequest, NuevoUsuario, RegistroRequest, Usuario},
    queries::usuarios as queries,
};

/// Registers a new user: hashes the password with Argon2 and inserts the
/// row. Expects an already-validated payload (the handler runs the field
/// validators before touching the pool). A duplicate email is rejected with
/// the message clients already rely on.
pub async fn registrar(conn: &mut DbConn, req: RegistroRequest) -> Result<Usuario> {
    let password_hash = hash_password(req.password.trim())?;

    let nuevo = NuevoUsuario {
        nombre: req.nombre.trim().to_string(),
        apellido: req.apellido.trim().to_string(),
        email: req.email.trim().to_lowercase(),
        telefono: req.telefono.trim().to_string(),
        password_hash,
    };

    let usuario = queries::create_usuario(conn, nuevo).await?;

    tracing::info!(usuario_id = usuario.id, "usuario registrado");
    Ok(usuario)
}

/// Authenticates a user by email and password.
///
/// Unknown email and wrong password both answer with the same generic
/// message so the endpoint cannot be used to enumerate accounts.
pub async fn login(conn: &mut DbConn, req: LoginRequest) -> Result<Usuario> {
    let usuario = queries::get_usuario_by_email(conn, req.email.trim().to_lowercase().as_str())
        .await?
        .ok_or_else(|| Error::Authentication("Credenciales inválidas".to_string()))?;

    if !verify_password(req.password.trim(), &usuario.password_hash)? {
        return Err(Error::Authentication("Credenciales inválidas".to_string()));
    }

    Ok(usuario)
}

/// Hashes a password using Argon2 with a random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))
}

/// Verifies a password against a stored Argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| Error::Internal(format!("Invalid password hash: {}", e)))?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Error::Internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}
