use std::collections::HashSet;
use uuid::Uuid;

use crate::dto::common_dto::MessageResponse;
use crate::dto::work_order_dto::{CreateWorkOrderRequest, UpdateWorkOrderRequest, WorkOrderQuery};
use crate::models::access::WorkshopAccess;
use crate::models::work_order::WorkOrderDetails;
use crate::repositories::Repositories;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppResult};

pub const WORK_ORDER_NOT_FOUND: &str = "Work order not found";
pub const WORK_ORDER_HAS_INVOICE: &str = "Cannot delete work order that has an invoice";

pub struct WorkOrderController {
    repos: Repositories,
}

impl WorkOrderController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repos: state.repos.clone(),
        }
    }

    /// Crear una orden de trabajo con sus insumos
    ///
    /// Cliente, servicio e insumos deben pertenecer al taller y el vehículo
    /// al cliente; cualquier referencia ajena es un 400.
    pub async fn create(&self, access: &WorkshopAccess, request: CreateWorkOrderRequest) -> AppResult<WorkOrderDetails> {
        let workshop_id = access.workshop_id;

        let customer = self
            .repos
            .customers
            .find_by_id(request.customer_id)
            .await?
            .filter(|customer| customer.workshop_id == workshop_id)
            .ok_or_else(|| bad_request_error("Customer not found in this workshop"))?;

        self.repos
            .vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .filter(|vehicle| vehicle.customer_id == customer.id)
            .ok_or_else(|| bad_request_error("Vehicle not found for this customer"))?;

        self.repos
            .services
            .find_in_workshop(workshop_id, request.service_id)
            .await?
            .ok_or_else(|| bad_request_error("Service not found in this workshop"))?;

        let requested: Vec<Uuid> = request.supplies.iter().map(|line| line.supply_id).collect();
        if !requested.is_empty() {
            let found: HashSet<Uuid> = self
                .repos
                .supplies
                .find_many_in_workshop(workshop_id, &requested)
                .await?
                .into_iter()
                .map(|supply| supply.id)
                .collect();

            if let Some(missing) = requested.iter().find(|id| !found.contains(id)) {
                return Err(bad_request_error(&format!(
                    "Supply {} not found in this workshop",
                    missing
                )));
            }
        }

        let order = self.repos.work_orders.create(workshop_id, request.try_into()?).await?;
        tracing::info!(
            workshop_id = %workshop_id,
            work_order_id = %order.order.id,
            supplies = order.supplies.len(),
            "🔧 Orden de trabajo creada"
        );
        Ok(order)
    }

    pub async fn list(&self, access: &WorkshopAccess, query: WorkOrderQuery) -> AppResult<Vec<WorkOrderDetails>> {
        self.repos.work_orders.list(access.workshop_id, query.into()).await
    }

    pub async fn get(&self, access: &WorkshopAccess, work_order_id: Uuid) -> AppResult<WorkOrderDetails> {
        self.repos
            .work_orders
            .find_in_workshop(access.workshop_id, work_order_id)
            .await?
            .ok_or_else(|| not_found_error(WORK_ORDER_NOT_FOUND))
    }

    pub async fn update(
        &self,
        access: &WorkshopAccess,
        work_order_id: Uuid,
        request: UpdateWorkOrderRequest,
    ) -> AppResult<WorkOrderDetails> {
        let existing = self.get(access, work_order_id).await?;
        self.repos
            .work_orders
            .update(access.workshop_id, existing.order.id, request.try_into()?)
            .await
    }

    pub async fn delete(&self, access: &WorkshopAccess, work_order_id: Uuid) -> AppResult<MessageResponse> {
        let existing = self.get(access, work_order_id).await?;

        if self.repos.work_orders.has_invoice(existing.order.id).await? {
            return Err(bad_request_error(WORK_ORDER_HAS_INVOICE));
        }

        self.repos.work_orders.delete(existing.order.id).await?;
        tracing::info!(workshop_id = %access.workshop_id, work_order_id = %existing.order.id, "Orden de trabajo eliminada");
        Ok(MessageResponse::new("Work order deleted successfully"))
    }
}
