//! API de gestión de talleres mecánicos
//!
//! Usuarios, talleres con su plantilla, clientes, vehículos, servicios,
//! insumos y órdenes de trabajo. Cada petición sobre recursos del taller
//! se resuelve contra el taller del usuario (propietario o empleado activo).

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
