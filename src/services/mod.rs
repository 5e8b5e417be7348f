pub mod jwt;
pub mod reservas;
pub mod usuarios;
