pub mod auth_controller;
pub mod customer_controller;
pub mod employee_controller;
pub mod service_controller;
pub mod supply_controller;
pub mod user_controller;
pub mod vehicle_controller;
pub mod work_order_controller;
pub mod workshop_controller;
