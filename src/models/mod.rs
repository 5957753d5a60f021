//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL, más la política de acceso a talleres.

pub mod access;
pub mod customer;
pub mod employee;
pub mod service;
pub mod supply;
pub mod user;
pub mod vehicle;
pub mod work_order;
pub mod workshop;
