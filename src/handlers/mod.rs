pub mod auth;
pub mod cabanas;
pub mod health;
pub mod reservas;
pub mod servicios;
