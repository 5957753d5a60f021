//! Servicios de la aplicación
//!
//! Autenticación, resolución de acceso a talleres y almacenamiento de imágenes.

pub mod access_service;
pub mod auth_service;
pub mod image_service;

pub use access_service::AccessService;
pub use auth_service::AuthService;
pub use image_service::{CloudinaryImageStore, ImageStore, UnconfiguredImageStore};
