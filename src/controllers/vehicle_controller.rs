use uuid::Uuid;

use crate::controllers::customer_controller::{find_customer_in_workshop, CUSTOMER_NOT_FOUND};
use crate::dto::common_dto::MessageResponse;
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::models::access::WorkshopAccess;
use crate::models::vehicle::{Vehicle, MAX_VEHICLES_PER_CUSTOMER};
use crate::repositories::vehicle_repository::PLATE_TAKEN;
use crate::repositories::Repositories;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, conflict_error, forbidden_error, not_found_error, AppResult};

pub const VEHICLE_NOT_FOUND: &str = "Vehicle not found";
pub const VEHICLE_IN_OTHER_WORKSHOP: &str = "Vehicle not found in your workshop";
pub const VEHICLE_HAS_WORK_ORDERS: &str = "Cannot delete vehicle with associated work orders";

pub struct VehicleController {
    repos: Repositories,
}

impl VehicleController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repos: state.repos.clone(),
        }
    }

    /// Registrar un vehículo para un cliente del taller
    pub async fn create(
        &self,
        access: &WorkshopAccess,
        customer_id: Uuid,
        request: CreateVehicleRequest,
    ) -> AppResult<VehicleResponse> {
        let customer = find_customer_in_workshop(self.repos.customers.as_ref(), access, customer_id).await?;

        let owned = self.repos.vehicles.count_by_customer(customer.id).await?;
        if owned >= MAX_VEHICLES_PER_CUSTOMER {
            return Err(bad_request_error(&format!(
                "Customer has reached the maximum limit of {} vehicles",
                MAX_VEHICLES_PER_CUSTOMER
            )));
        }

        if self
            .repos
            .vehicles
            .find_by_plate(access.workshop_id, &request.plate)
            .await?
            .is_some()
        {
            return Err(conflict_error(PLATE_TAKEN));
        }

        let vehicle = self
            .repos
            .vehicles
            .create(access.workshop_id, customer.id, request.into())
            .await?;
        tracing::info!(workshop_id = %access.workshop_id, vehicle_id = %vehicle.id, plate = %vehicle.plate, "🚗 Vehículo registrado");
        Ok(VehicleResponse::new(vehicle, customer.summary()))
    }

    pub async fn list_by_customer(&self, access: &WorkshopAccess, customer_id: Uuid) -> AppResult<Vec<Vehicle>> {
        let customer = find_customer_in_workshop(self.repos.customers.as_ref(), access, customer_id).await?;
        self.repos.vehicles.list_by_customer(customer.id).await
    }

    pub async fn get(&self, access: &WorkshopAccess, vehicle_id: Uuid) -> AppResult<VehicleResponse> {
        let vehicle = self.require_vehicle(access, vehicle_id).await?;
        self.with_customer(vehicle).await
    }

    pub async fn update(
        &self,
        access: &WorkshopAccess,
        vehicle_id: Uuid,
        request: UpdateVehicleRequest,
    ) -> AppResult<VehicleResponse> {
        let vehicle = self.require_vehicle(access, vehicle_id).await?;

        if let Some(plate) = request.plate.as_deref().filter(|plate| *plate != vehicle.plate) {
            if let Some(existing) = self.repos.vehicles.find_by_plate(access.workshop_id, plate).await? {
                if existing.id != vehicle.id {
                    return Err(conflict_error(PLATE_TAKEN));
                }
            }
        }

        let updated = self.repos.vehicles.update(vehicle.id, request.into()).await?;
        self.with_customer(updated).await
    }

    pub async fn delete(&self, access: &WorkshopAccess, vehicle_id: Uuid) -> AppResult<MessageResponse> {
        let vehicle = self.require_vehicle(access, vehicle_id).await?;

        if vehicle.work_order_count > 0 {
            return Err(bad_request_error(VEHICLE_HAS_WORK_ORDERS));
        }

        self.repos.vehicles.delete(vehicle.id).await?;
        tracing::info!(workshop_id = %access.workshop_id, vehicle_id = %vehicle.id, "Vehículo eliminado");
        Ok(MessageResponse::new("Vehicle deleted successfully"))
    }

    async fn require_vehicle(&self, access: &WorkshopAccess, vehicle_id: Uuid) -> AppResult<Vehicle> {
        let vehicle = self
            .repos
            .vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error(VEHICLE_NOT_FOUND))?;

        if vehicle.workshop_id != access.workshop_id {
            return Err(forbidden_error(VEHICLE_IN_OTHER_WORKSHOP));
        }
        Ok(vehicle)
    }

    async fn with_customer(&self, vehicle: Vehicle) -> AppResult<VehicleResponse> {
        let customer = self
            .repos
            .customers
            .find_by_id(vehicle.customer_id)
            .await?
            .ok_or_else(|| not_found_error(CUSTOMER_NOT_FOUND))?;
        Ok(VehicleResponse::new(vehicle, customer.summary()))
    }
}
