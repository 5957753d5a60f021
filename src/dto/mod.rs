//! DTOs de la API
//!
//! Peticiones validadas con `validator` y respuestas compuestas.

pub mod auth_dto;
pub mod common_dto;
pub mod customer_dto;
pub mod employee_dto;
pub mod service_dto;
pub mod supply_dto;
pub mod user_dto;
pub mod vehicle_dto;
pub mod work_order_dto;
pub mod workshop_dto;
