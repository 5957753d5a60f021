//! Capa de repositorios
//!
//! Un trait por agregado con su implementación para PostgreSQL. Los
//! controladores sólo ven `Arc<dyn Trait>`, lo que permite sustituirlos
//! por implementaciones en memoria en los tests.

pub mod customer_repository;
pub mod employee_repository;
pub mod service_repository;
pub mod supply_repository;
pub mod user_repository;
pub mod vehicle_repository;
pub mod work_order_repository;
pub mod workshop_repository;

use sqlx::PgPool;
use std::sync::Arc;

pub use customer_repository::{CustomerRepository, PgCustomerRepository};
pub use employee_repository::{EmployeeRepository, PgEmployeeRepository};
pub use service_repository::{PgServiceRepository, ServiceRepository};
pub use supply_repository::{PgSupplyRepository, SupplyRepository};
pub use user_repository::{PgUserRepository, UserRepository};
pub use vehicle_repository::{PgVehicleRepository, VehicleRepository};
pub use work_order_repository::{PgWorkOrderRepository, WorkOrderRepository};
pub use workshop_repository::{PgWorkshopRepository, WorkshopRepository};

/// Conjunto de repositorios compartido por toda la aplicación
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub workshops: Arc<dyn WorkshopRepository>,
    pub employees: Arc<dyn EmployeeRepository>,
    pub customers: Arc<dyn CustomerRepository>,
    pub vehicles: Arc<dyn VehicleRepository>,
    pub services: Arc<dyn ServiceRepository>,
    pub supplies: Arc<dyn SupplyRepository>,
    pub work_orders: Arc<dyn WorkOrderRepository>,
}

impl Repositories {
    /// Repositorios respaldados por PostgreSQL
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            workshops: Arc::new(PgWorkshopRepository::new(pool.clone())),
            employees: Arc::new(PgEmployeeRepository::new(pool.clone())),
            customers: Arc::new(PgCustomerRepository::new(pool.clone())),
            vehicles: Arc::new(PgVehicleRepository::new(pool.clone())),
            services: Arc::new(PgServiceRepository::new(pool.clone())),
            supplies: Arc::new(PgSupplyRepository::new(pool.clone())),
            work_orders: Arc::new(PgWorkOrderRepository::new(pool)),
        }
    }
}
