pub mod cabanas;
pub mod reservas;
pub mod servicios;
pub mod usuarios;
