//! Utilidades compartidas por los tests de integración
//!
//! La aplicación se monta con repositorios en memoria y un almacén de
//! imágenes falso; las peticiones se envían con `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

use workshop_api::config::EnvironmentConfig;
use workshop_api::models::customer::{Customer, CustomerChanges, CustomerCounts, NewCustomer};
use workshop_api::models::employee::{Employee, EmployeeChanges, EmployeeRole, NewEmployee};
use workshop_api::models::service::Service;
use workshop_api::models::supply::{NewSupply, Supply, SupplyChanges, LOW_STOCK_THRESHOLD};
use workshop_api::models::user::{NewUser, User, UserChanges};
use workshop_api::models::vehicle::{NewVehicle, Vehicle, VehicleChanges};
use workshop_api::models::work_order::{
    NewWorkOrder, OrderStatus, ServiceSummary, SupplyLine, SupplySummary, VehicleSummary, WorkOrder,
    WorkOrderChanges, WorkOrderDetails, WorkOrderFilter, WorkOrderSupply,
};
use workshop_api::models::workshop::{NewWorkshop, OwnerSummary, Workshop, WorkshopChanges, WorkshopStats};
use workshop_api::repositories::user_repository::EMAIL_TAKEN;
use workshop_api::repositories::vehicle_repository::PLATE_TAKEN;
use workshop_api::repositories::workshop_repository::ALREADY_OWNS_WORKSHOP;
use workshop_api::repositories::{
    CustomerRepository, EmployeeRepository, Repositories, ServiceRepository, SupplyRepository,
    UserRepository, VehicleRepository, WorkOrderRepository, WorkshopRepository,
};
use workshop_api::services::image_service::{ImageStore, ImageUpload, StoredImage};
use workshop_api::utils::errors::{conflict_error, not_found_error, AppResult};
use workshop_api::utils::jwt::{generate_token, JwtConfig};
use workshop_api::{create_app, AppState};

pub const TEST_SECRET: &str = "test-secret";

// ---------------------------------------------------------------------------
// Almacén en memoria
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Data {
    users: Vec<User>,
    workshops: Vec<Workshop>,
    employees: Vec<Employee>,
    customers: Vec<Customer>,
    vehicles: Vec<Vehicle>,
    services: Vec<Service>,
    supplies: Vec<Supply>,
    work_orders: Vec<WorkOrder>,
    lines: Vec<(Uuid, Uuid, SupplyLine)>,
    invoices: HashSet<Uuid>,
}

impl Data {
    fn customer_view(&self, customer: &Customer) -> Customer {
        let mut customer = customer.clone();
        customer.work_order_count = self
            .work_orders
            .iter()
            .filter(|o| o.customer_id == customer.id)
            .count() as i64;
        customer
    }

    fn vehicle_view(&self, vehicle: &Vehicle) -> Vehicle {
        let mut vehicle = vehicle.clone();
        vehicle.work_order_count = self
            .work_orders
            .iter()
            .filter(|o| o.vehicle_id == vehicle.id)
            .count() as i64;
        vehicle
    }

    fn details(&self, order: &WorkOrder) -> WorkOrderDetails {
        let customer = self
            .customers
            .iter()
            .find(|c| c.id == order.customer_id)
            .expect("customer of work order");
        let vehicle = self
            .vehicles
            .iter()
            .find(|v| v.id == order.vehicle_id)
            .expect("vehicle of work order");
        let service = self
            .services
            .iter()
            .find(|s| s.id == order.service_id)
            .expect("service of work order");

        let supplies = self
            .lines
            .iter()
            .filter(|(_, order_id, _)| *order_id == order.id)
            .map(|(id, _, line)| {
                let supply = self
                    .supplies
                    .iter()
                    .find(|s| s.id == line.supply_id)
                    .expect("supply of line");
                WorkOrderSupply {
                    id: *id,
                    supply_id: line.supply_id,
                    quantity: line.quantity,
                    supply: SupplySummary {
                        id: supply.id,
                        name: supply.name.clone(),
                        price: supply.price,
                    },
                }
            })
            .collect();

        WorkOrderDetails {
            order: order.clone(),
            customer: customer.summary(),
            vehicle: VehicleSummary {
                id: vehicle.id,
                brand: vehicle.brand.clone(),
                model: vehicle.model.clone(),
                year: vehicle.year,
                plate: vehicle.plate.clone(),
                color: vehicle.color.clone(),
            },
            service: ServiceSummary {
                id: service.id,
                name: service.name.clone(),
            },
            supplies,
        }
    }
}

/// Implementa todos los repositorios sobre vectores protegidos por un mutex
#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<Data>,
}

impl MemoryStore {
    fn with<R>(&self, f: impl FnOnce(&mut Data) -> R) -> R {
        let mut data = self.data.lock().unwrap();
        f(&mut data)
    }

    /// Marca una orden como facturada
    pub fn add_invoice(&self, work_order_id: Uuid) {
        self.with(|data| {
            data.invoices.insert(work_order_id);
        });
    }

    pub fn employee_by_id(&self, id: Uuid) -> Option<Employee> {
        self.with(|data| data.employees.iter().find(|e| e.id == id).cloned())
    }

    pub fn vehicle_count(&self) -> usize {
        self.with(|data| data.vehicles.len())
    }
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

fn same_email(employee: &Employee, email: &str) -> bool {
    employee
        .email
        .as_deref()
        .map(|own| own.to_lowercase() == email.to_lowercase())
        .unwrap_or(false)
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        self.with(|data| {
            if data.users.iter().any(|u| u.email == user.email) {
                return Err(conflict_error(EMAIL_TAKEN));
            }
            let created = User {
                id: Uuid::new_v4(),
                email: user.email,
                password_hash: user.password_hash,
                first_name: user.first_name,
                last_name: user.last_name,
                avatar: user.avatar,
                phone_number: None,
                date_of_birth: None,
                habeas_data: user.habeas_data,
                session_facebook: user.session_facebook,
                session_google: user.session_google,
                created_at: now(),
                updated_at: now(),
            };
            data.users.push(created.clone());
            Ok(created)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.with(|data| data.users.iter().find(|u| u.id == id).cloned()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.with(|data| data.users.iter().find(|u| u.email == email).cloned()))
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> AppResult<User> {
        self.with(|data| {
            let user = data
                .users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| not_found_error("User not found"))?;
            if let Some(v) = changes.email {
                user.email = v;
            }
            if let Some(v) = changes.first_name {
                user.first_name = v;
            }
            if let Some(v) = changes.last_name {
                user.last_name = v;
            }
            if let Some(v) = changes.phone_number {
                user.phone_number = Some(v);
            }
            if let Some(v) = changes.date_of_birth {
                user.date_of_birth = Some(v);
            }
            if let Some(v) = changes.avatar {
                user.avatar = Some(v);
            }
            user.updated_at = now();
            Ok(user.clone())
        })
    }
}

#[async_trait]
impl WorkshopRepository for MemoryStore {
    async fn create(&self, owner_id: Uuid, workshop: NewWorkshop) -> AppResult<Workshop> {
        self.with(|data| {
            if data.workshops.iter().any(|w| w.owner_id == owner_id) {
                return Err(conflict_error(ALREADY_OWNS_WORKSHOP));
            }
            let created = Workshop {
                id: Uuid::new_v4(),
                owner_id,
                name: workshop.name,
                address: workshop.address,
                phone: workshop.phone,
                email: workshop.email,
                logo: workshop.logo,
                logo_public_id: None,
                nit: workshop.nit,
                created_at: now(),
                updated_at: now(),
            };
            data.workshops.push(created.clone());
            Ok(created)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Workshop>> {
        Ok(self.with(|data| data.workshops.iter().find(|w| w.id == id).cloned()))
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> AppResult<Option<Workshop>> {
        Ok(self.with(|data| data.workshops.iter().find(|w| w.owner_id == owner_id).cloned()))
    }

    async fn find_owner(&self, workshop_id: Uuid) -> AppResult<Option<OwnerSummary>> {
        Ok(self.with(|data| {
            let workshop = data.workshops.iter().find(|w| w.id == workshop_id)?;
            data.users
                .iter()
                .find(|u| u.id == workshop.owner_id)
                .map(|u| OwnerSummary {
                    id: u.id,
                    first_name: u.first_name.clone(),
                    last_name: u.last_name.clone(),
                    email: u.email.clone(),
                })
        }))
    }

    async fn update(&self, id: Uuid, changes: WorkshopChanges) -> AppResult<Workshop> {
        self.with(|data| {
            let workshop = data
                .workshops
                .iter_mut()
                .find(|w| w.id == id)
                .ok_or_else(|| not_found_error("Workshop not found"))?;
            if let Some(v) = changes.name {
                workshop.name = v;
            }
            if let Some(v) = changes.address {
                workshop.address = v;
            }
            if let Some(v) = changes.phone {
                workshop.phone = v;
            }
            if let Some(v) = changes.email {
                workshop.email = Some(v);
            }
            if let Some(v) = changes.logo {
                workshop.logo = Some(v);
            }
            if let Some(v) = changes.logo_public_id {
                workshop.logo_public_id = Some(v);
            }
            if let Some(v) = changes.nit {
                workshop.nit = Some(v);
            }
            workshop.updated_at = now();
            Ok(workshop.clone())
        })
    }

    async fn stats(&self, id: Uuid, since: DateTime<Utc>) -> AppResult<WorkshopStats> {
        Ok(self.with(|data| {
            let recent: Vec<&WorkOrder> = data
                .work_orders
                .iter()
                .filter(|o| o.workshop_id == id && o.created_at >= since)
                .collect();
            WorkshopStats {
                total_employees: data
                    .employees
                    .iter()
                    .filter(|e| e.workshop_id == id && e.active)
                    .count() as i64,
                recent_work_orders: recent.len() as i64,
                low_stock_supplies: data
                    .supplies
                    .iter()
                    .filter(|s| s.workshop_id == id && s.stock <= LOW_STOCK_THRESHOLD)
                    .count() as i64,
                total_revenue: recent.iter().map(|o| o.total).sum::<Decimal>(),
            }
        }))
    }
}

#[async_trait]
impl EmployeeRepository for MemoryStore {
    async fn create(&self, workshop_id: Uuid, employee: NewEmployee) -> AppResult<Employee> {
        Ok(self.with(|data| {
            let created = Employee {
                id: Uuid::new_v4(),
                workshop_id,
                first_name: employee.first_name,
                last_name: employee.last_name,
                email: employee.email,
                phone: employee.phone,
                role: employee.role,
                active: true,
                created_at: now(),
                updated_at: now(),
            };
            data.employees.push(created.clone());
            created
        }))
    }

    async fn find_in_workshop(&self, workshop_id: Uuid, employee_id: Uuid) -> AppResult<Option<Employee>> {
        Ok(self.with(|data| {
            data.employees
                .iter()
                .find(|e| e.id == employee_id && e.workshop_id == workshop_id)
                .cloned()
        }))
    }

    async fn find_active_by_email(&self, workshop_id: Uuid, email: &str) -> AppResult<Option<Employee>> {
        Ok(self.with(|data| {
            data.employees
                .iter()
                .find(|e| e.workshop_id == workshop_id && e.active && same_email(e, email))
                .cloned()
        }))
    }

    async fn find_active_memberships(&self, email: &str) -> AppResult<Vec<Employee>> {
        Ok(self.with(|data| {
            let mut found: Vec<Employee> = data
                .employees
                .iter()
                .filter(|e| e.active && same_email(e, email))
                .cloned()
                .collect();
            found.sort_by_key(|e| e.created_at);
            found
        }))
    }

    async fn list_active(&self, workshop_id: Uuid, role: Option<EmployeeRole>) -> AppResult<Vec<Employee>> {
        Ok(self.with(|data| {
            let mut found: Vec<Employee> = data
                .employees
                .iter()
                .rev()
                .filter(|e| e.workshop_id == workshop_id && e.active)
                .filter(|e| role.map(|r| e.role == r).unwrap_or(true))
                .cloned()
                .collect();
            match role {
                Some(_) => found.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
                None => found.sort_by(|a, b| a.first_name.cmp(&b.first_name)),
            }
            found
        }))
    }

    async fn update(&self, employee_id: Uuid, changes: EmployeeChanges) -> AppResult<Employee> {
        self.with(|data| {
            let employee = data
                .employees
                .iter_mut()
                .find(|e| e.id == employee_id)
                .ok_or_else(|| not_found_error("Employee not found"))?;
            if let Some(v) = changes.first_name {
                employee.first_name = v;
            }
            if let Some(v) = changes.last_name {
                employee.last_name = v;
            }
            if let Some(v) = changes.email {
                employee.email = Some(v);
            }
            if let Some(v) = changes.phone {
                employee.phone = Some(v);
            }
            if let Some(v) = changes.role {
                employee.role = v;
            }
            employee.updated_at = now();
            Ok(employee.clone())
        })
    }

    async fn set_active(&self, employee_id: Uuid, active: bool) -> AppResult<Employee> {
        self.with(|data| {
            let employee = data
                .employees
                .iter_mut()
                .find(|e| e.id == employee_id)
                .ok_or_else(|| not_found_error("Employee not found"))?;
            employee.active = active;
            employee.updated_at = now();
            Ok(employee.clone())
        })
    }
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn create(&self, workshop_id: Uuid, customer: NewCustomer) -> AppResult<Customer> {
        Ok(self.with(|data| {
            let created = Customer {
                id: Uuid::new_v4(),
                workshop_id,
                first_name: customer.first_name,
                last_name: customer.last_name,
                email: customer.email,
                phone: customer.phone,
                address: customer.address,
                notes: customer.notes,
                created_at: now(),
                updated_at: now(),
                work_order_count: 0,
            };
            data.customers.push(created.clone());
            created
        }))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Customer>> {
        Ok(self.with(|data| {
            data.customers
                .iter()
                .find(|c| c.id == id)
                .map(|c| data.customer_view(c))
        }))
    }

    async fn list_by_workshop(&self, workshop_id: Uuid) -> AppResult<Vec<Customer>> {
        Ok(self.with(|data| {
            let mut found: Vec<Customer> = data
                .customers
                .iter()
                .rev()
                .filter(|c| c.workshop_id == workshop_id)
                .map(|c| data.customer_view(c))
                .collect();
            found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            found
        }))
    }

    async fn find_by_phone(&self, workshop_id: Uuid, phone: &str) -> AppResult<Option<Customer>> {
        Ok(self.with(|data| {
            data.customers
                .iter()
                .find(|c| c.workshop_id == workshop_id && c.phone == phone)
                .map(|c| data.customer_view(c))
        }))
    }

    async fn find_by_email(&self, workshop_id: Uuid, email: &str) -> AppResult<Option<Customer>> {
        Ok(self.with(|data| {
            data.customers
                .iter()
                .find(|c| c.workshop_id == workshop_id && c.email == email)
                .map(|c| data.customer_view(c))
        }))
    }

    async fn update(&self, id: Uuid, changes: CustomerChanges) -> AppResult<Customer> {
        self.with(|data| {
            let customer = data
                .customers
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| not_found_error("Customer not found"))?;
            if let Some(v) = changes.first_name {
                customer.first_name = v;
            }
            if let Some(v) = changes.last_name {
                customer.last_name = v;
            }
            if let Some(v) = changes.email {
                customer.email = v;
            }
            if let Some(v) = changes.phone {
                customer.phone = v;
            }
            if let Some(v) = changes.address {
                customer.address = Some(v);
            }
            if let Some(v) = changes.notes {
                customer.notes = Some(v);
            }
            customer.updated_at = now();
            let updated = customer.clone();
            Ok(data.customer_view(&updated))
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.with(|data| {
            data.customers.retain(|c| c.id != id);
            data.vehicles.retain(|v| v.customer_id != id);
        });
        Ok(())
    }

    async fn counts(&self, workshop_id: Uuid, since: DateTime<Utc>) -> AppResult<CustomerCounts> {
        Ok(self.with(|data| {
            let customers: Vec<&Customer> = data
                .customers
                .iter()
                .filter(|c| c.workshop_id == workshop_id)
                .collect();
            let vehicles_of = |id: Uuid| data.vehicles.iter().filter(|v| v.customer_id == id).count();
            let orders_of = |id: Uuid| data.work_orders.iter().filter(|o| o.customer_id == id).count();

            CustomerCounts {
                total_customers: customers.len() as i64,
                customers_with_vehicles: customers.iter().filter(|c| vehicles_of(c.id) > 0).count() as i64,
                customers_with_work_orders: customers.iter().filter(|c| orders_of(c.id) > 0).count() as i64,
                total_vehicles: customers.iter().map(|c| vehicles_of(c.id)).sum::<usize>() as i64,
                recent_customers: customers.iter().filter(|c| c.created_at >= since).count() as i64,
            }
        }))
    }
}

#[async_trait]
impl VehicleRepository for MemoryStore {
    async fn create(&self, workshop_id: Uuid, customer_id: Uuid, vehicle: NewVehicle) -> AppResult<Vehicle> {
        self.with(|data| {
            if data
                .vehicles
                .iter()
                .any(|v| v.workshop_id == workshop_id && v.plate == vehicle.plate)
            {
                return Err(conflict_error(PLATE_TAKEN));
            }
            let created = Vehicle {
                id: Uuid::new_v4(),
                workshop_id,
                customer_id,
                brand: vehicle.brand,
                model: vehicle.model,
                year: vehicle.year,
                plate: vehicle.plate,
                color: vehicle.color,
                vehicle_type: vehicle.vehicle_type,
                mileage: vehicle.mileage,
                created_at: now(),
                updated_at: now(),
                work_order_count: 0,
            };
            data.vehicles.push(created.clone());
            Ok(created)
        })
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.with(|data| {
            data.vehicles
                .iter()
                .find(|v| v.id == id)
                .map(|v| data.vehicle_view(v))
        }))
    }

    async fn find_by_plate(&self, workshop_id: Uuid, plate: &str) -> AppResult<Option<Vehicle>> {
        Ok(self.with(|data| {
            data.vehicles
                .iter()
                .find(|v| v.workshop_id == workshop_id && v.plate == plate)
                .map(|v| data.vehicle_view(v))
        }))
    }

    async fn list_by_customer(&self, customer_id: Uuid) -> AppResult<Vec<Vehicle>> {
        Ok(self.with(|data| {
            data.vehicles
                .iter()
                .rev()
                .filter(|v| v.customer_id == customer_id)
                .map(|v| data.vehicle_view(v))
                .collect()
        }))
    }

    async fn list_by_workshop(&self, workshop_id: Uuid) -> AppResult<Vec<Vehicle>> {
        Ok(self.with(|data| {
            data.vehicles
                .iter()
                .rev()
                .filter(|v| v.workshop_id == workshop_id)
                .map(|v| data.vehicle_view(v))
                .collect()
        }))
    }

    async fn count_by_customer(&self, customer_id: Uuid) -> AppResult<i64> {
        Ok(self.with(|data| data.vehicles.iter().filter(|v| v.customer_id == customer_id).count() as i64))
    }

    async fn update(&self, id: Uuid, changes: VehicleChanges) -> AppResult<Vehicle> {
        self.with(|data| {
            let vehicle = data
                .vehicles
                .iter_mut()
                .find(|v| v.id == id)
                .ok_or_else(|| not_found_error("Vehicle not found"))?;
            if let Some(v) = changes.brand {
                vehicle.brand = v;
            }
            if let Some(v) = changes.model {
                vehicle.model = v;
            }
            if let Some(v) = changes.year {
                vehicle.year = v;
            }
            if let Some(v) = changes.plate {
                vehicle.plate = v;
            }
            if let Some(v) = changes.color {
                vehicle.color = v;
            }
            if let Some(v) = changes.vehicle_type {
                vehicle.vehicle_type = v;
            }
            if let Some(v) = changes.mileage {
                vehicle.mileage = Some(v);
            }
            vehicle.updated_at = now();
            let updated = vehicle.clone();
            Ok(data.vehicle_view(&updated))
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.with(|data| data.vehicles.retain(|v| v.id != id));
        Ok(())
    }
}

#[async_trait]
impl ServiceRepository for MemoryStore {
    async fn create(&self, workshop_id: Uuid, name: String) -> AppResult<Service> {
        Ok(self.with(|data| {
            let created = Service {
                id: Uuid::new_v4(),
                workshop_id,
                name,
                created_at: now(),
                updated_at: now(),
            };
            data.services.push(created.clone());
            created
        }))
    }

    async fn find_in_workshop(&self, workshop_id: Uuid, id: Uuid) -> AppResult<Option<Service>> {
        Ok(self.with(|data| {
            data.services
                .iter()
                .find(|s| s.id == id && s.workshop_id == workshop_id)
                .cloned()
        }))
    }

    async fn list_by_workshop(&self, workshop_id: Uuid) -> AppResult<Vec<Service>> {
        Ok(self.with(|data| {
            let mut found: Vec<Service> = data
                .services
                .iter()
                .filter(|s| s.workshop_id == workshop_id)
                .cloned()
                .collect();
            found.sort_by(|a, b| a.name.cmp(&b.name));
            found
        }))
    }

    async fn rename(&self, id: Uuid, name: String) -> AppResult<Service> {
        self.with(|data| {
            let service = data
                .services
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| not_found_error("Service not found"))?;
            service.name = name;
            service.updated_at = now();
            Ok(service.clone())
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.with(|data| data.services.retain(|s| s.id != id));
        Ok(())
    }

    async fn usage_count(&self, id: Uuid) -> AppResult<i64> {
        Ok(self.with(|data| data.work_orders.iter().filter(|o| o.service_id == id).count() as i64))
    }
}

#[async_trait]
impl SupplyRepository for MemoryStore {
    async fn create(&self, workshop_id: Uuid, supply: NewSupply) -> AppResult<Supply> {
        Ok(self.with(|data| {
            let created = Supply {
                id: Uuid::new_v4(),
                workshop_id,
                name: supply.name,
                description: supply.description,
                price: supply.price,
                stock: supply.stock,
                created_at: now(),
                updated_at: now(),
            };
            data.supplies.push(created.clone());
            created
        }))
    }

    async fn find_in_workshop(&self, workshop_id: Uuid, id: Uuid) -> AppResult<Option<Supply>> {
        Ok(self.with(|data| {
            data.supplies
                .iter()
                .find(|s| s.id == id && s.workshop_id == workshop_id)
                .cloned()
        }))
    }

    async fn find_many_in_workshop(&self, workshop_id: Uuid, ids: &[Uuid]) -> AppResult<Vec<Supply>> {
        Ok(self.with(|data| {
            data.supplies
                .iter()
                .filter(|s| s.workshop_id == workshop_id && ids.contains(&s.id))
                .cloned()
                .collect()
        }))
    }

    async fn list_by_workshop(&self, workshop_id: Uuid) -> AppResult<Vec<Supply>> {
        Ok(self.with(|data| {
            let mut found: Vec<Supply> = data
                .supplies
                .iter()
                .filter(|s| s.workshop_id == workshop_id)
                .cloned()
                .collect();
            found.sort_by(|a, b| a.name.cmp(&b.name));
            found
        }))
    }

    async fn list_in_stock(&self, workshop_id: Uuid) -> AppResult<Vec<Supply>> {
        let supplies = SupplyRepository::list_by_workshop(self, workshop_id).await?;
        Ok(supplies.into_iter().filter(|s| s.stock > 0).collect())
    }

    async fn update(&self, id: Uuid, changes: SupplyChanges) -> AppResult<Supply> {
        self.with(|data| {
            let supply = data
                .supplies
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| not_found_error("Supply not found"))?;
            if let Some(v) = changes.name {
                supply.name = v;
            }
            if let Some(v) = changes.description {
                supply.description = Some(v);
            }
            if let Some(v) = changes.price {
                supply.price = v;
            }
            if let Some(v) = changes.stock {
                supply.stock = v;
            }
            supply.updated_at = now();
            Ok(supply.clone())
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.with(|data| data.supplies.retain(|s| s.id != id));
        Ok(())
    }

    async fn usage_count(&self, id: Uuid) -> AppResult<i64> {
        Ok(self.with(|data| data.lines.iter().filter(|(_, _, l)| l.supply_id == id).count() as i64))
    }
}

#[async_trait]
impl WorkOrderRepository for MemoryStore {
    async fn create(&self, workshop_id: Uuid, order: NewWorkOrder) -> AppResult<WorkOrderDetails> {
        Ok(self.with(|data| {
            let created = WorkOrder {
                id: Uuid::new_v4(),
                workshop_id,
                customer_id: order.customer_id,
                vehicle_id: order.vehicle_id,
                service_id: order.service_id,
                mechanic: order.mechanic,
                priority: order.priority,
                status: OrderStatus::Pending,
                start_date: order.start_date,
                description: order.description,
                additional_notes: order.additional_notes,
                subtotal: order.subtotal,
                total: order.total,
                created_at: now(),
                updated_at: now(),
            };
            for line in order.supplies {
                data.lines.push((Uuid::new_v4(), created.id, line));
            }
            data.work_orders.push(created.clone());
            data.details(&created)
        }))
    }

    async fn find_in_workshop(&self, workshop_id: Uuid, id: Uuid) -> AppResult<Option<WorkOrderDetails>> {
        Ok(self.with(|data| {
            data.work_orders
                .iter()
                .find(|o| o.id == id && o.workshop_id == workshop_id)
                .map(|o| data.details(o))
        }))
    }

    async fn list(&self, workshop_id: Uuid, filter: WorkOrderFilter) -> AppResult<Vec<WorkOrderDetails>> {
        Ok(self.with(|data| {
            data.work_orders
                .iter()
                .rev()
                .filter(|o| o.workshop_id == workshop_id)
                .filter(|o| filter.status.map(|s| o.status == s).unwrap_or(true))
                .filter(|o| filter.customer_id.map(|id| o.customer_id == id).unwrap_or(true))
                .filter(|o| filter.vehicle_id.map(|id| o.vehicle_id == id).unwrap_or(true))
                .filter(|o| filter.service_id.map(|id| o.service_id == id).unwrap_or(true))
                .skip(filter.offset as usize)
                .take(filter.limit as usize)
                .map(|o| data.details(o))
                .collect()
        }))
    }

    async fn update(&self, workshop_id: Uuid, id: Uuid, changes: WorkOrderChanges) -> AppResult<WorkOrderDetails> {
        self.with(|data| {
            let order = data
                .work_orders
                .iter_mut()
                .find(|o| o.id == id && o.workshop_id == workshop_id)
                .ok_or_else(|| not_found_error("Work order not found"))?;
            if let Some(v) = changes.status {
                order.status = v;
            }
            if let Some(v) = changes.mechanic {
                order.mechanic = v;
            }
            if let Some(v) = changes.priority {
                order.priority = v;
            }
            if let Some(v) = changes.start_date {
                order.start_date = v;
            }
            if let Some(v) = changes.description {
                order.description = v;
            }
            if let Some(v) = changes.additional_notes {
                order.additional_notes = Some(v);
            }
            if let Some(v) = changes.subtotal {
                order.subtotal = v;
            }
            if let Some(v) = changes.total {
                order.total = v;
            }
            order.updated_at = now();
            let updated = order.clone();
            Ok(data.details(&updated))
        })
    }

    async fn has_invoice(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.with(|data| data.invoices.contains(&id)))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.with(|data| {
            data.lines.retain(|(_, order_id, _)| *order_id != id);
            data.work_orders.retain(|o| o.id != id);
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Almacén de imágenes falso
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeImageStore {
    pub uploaded: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl ImageStore for FakeImageStore {
    async fn upload(&self, _image: ImageUpload, folder: &str, public_id: &str) -> AppResult<StoredImage> {
        let full_id = format!("{}/{}", folder, public_id);
        self.uploaded.lock().unwrap().push(full_id.clone());
        Ok(StoredImage {
            url: format!("https://images.test/{}.png", full_id),
            public_id: full_id,
        })
    }

    async fn delete(&self, public_id: &str) -> AppResult<()> {
        self.deleted.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Aplicación de prueba
// ---------------------------------------------------------------------------

pub struct TestResponse {
    status: StatusCode,
    body: Value,
}

impl TestResponse {
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn json(&self) -> &Value {
        &self.body
    }
}

pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryStore>,
    pub images: Arc<FakeImageStore>,
    jwt: JwtConfig,
}

pub fn create_test_app() -> TestApp {
    let config = EnvironmentConfig::from_lookup(|key| match key {
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        "BCRYPT_COST" => Some("4".to_string()),
        _ => None,
    })
    .expect("test config");

    let store = Arc::new(MemoryStore::default());
    let images = Arc::new(FakeImageStore::default());
    let repos = Repositories {
        users: store.clone(),
        workshops: store.clone(),
        employees: store.clone(),
        customers: store.clone(),
        vehicles: store.clone(),
        services: store.clone(),
        supplies: store.clone(),
        work_orders: store.clone(),
    };

    let jwt = JwtConfig::from(&config);
    let router = create_app(AppState::new(config, repos, images.clone()));

    TestApp {
        router,
        store,
        images,
        jwt,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.expect("request");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse { status, body }
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Usuario creado directamente en el almacén con su token
    pub async fn user(&self, email: &str) -> (User, String) {
        let user = UserRepository::create(
            self.store.as_ref(),
            NewUser {
                email: email.to_string(),
                password_hash: "not-a-real-hash".to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                avatar: None,
                habeas_data: true,
                session_facebook: false,
                session_google: false,
            },
        )
        .await
        .expect("user");
        let token = generate_token(user.id, &self.jwt).expect("token");
        (user, token)
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        generate_token(user_id, &self.jwt).expect("token")
    }

    pub async fn workshop(&self, owner_id: Uuid, name: &str) -> Workshop {
        WorkshopRepository::create(
            self.store.as_ref(),
            owner_id,
            NewWorkshop {
                name: name.to_string(),
                address: "Calle 10 # 20-30".to_string(),
                phone: "3001234567".to_string(),
                email: None,
                logo: None,
                nit: None,
            },
        )
        .await
        .expect("workshop")
    }

    pub async fn employee(&self, workshop_id: Uuid, email: &str, role: EmployeeRole, active: bool) -> Employee {
        let employee = EmployeeRepository::create(
            self.store.as_ref(),
            workshop_id,
            NewEmployee {
                first_name: "Empleado".to_string(),
                last_name: "Prueba".to_string(),
                email: Some(email.to_string()),
                phone: None,
                role,
            },
        )
        .await
        .expect("employee");

        if active {
            employee
        } else {
            EmployeeRepository::set_active(self.store.as_ref(), employee.id, false)
                .await
                .expect("deactivate")
        }
    }

    /// Usuario propietario de un taller, con su token
    pub async fn owner(&self, email: &str) -> (User, Workshop, String) {
        let (user, token) = self.user(email).await;
        let workshop = self.workshop(user.id, "Taller de Prueba").await;
        (user, workshop, token)
    }
}
