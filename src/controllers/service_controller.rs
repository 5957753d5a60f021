use std::sync::Arc;
use uuid::Uuid;

use crate::dto::common_dto::MessageResponse;
use crate::dto::service_dto::ServiceRequest;
use crate::models::access::WorkshopAccess;
use crate::models::service::Service;
use crate::repositories::ServiceRepository;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppResult};

pub const SERVICE_NOT_FOUND: &str = "Service not found";
pub const SERVICE_IN_USE: &str = "Cannot delete service that is being used in work orders";

pub struct ServiceController {
    services: Arc<dyn ServiceRepository>,
}

impl ServiceController {
    pub fn new(state: &AppState) -> Self {
        Self {
            services: state.repos.services.clone(),
        }
    }

    pub async fn create(&self, access: &WorkshopAccess, request: ServiceRequest) -> AppResult<Service> {
        self.services
            .create(access.workshop_id, request.name.trim().to_string())
            .await
    }

    pub async fn list(&self, access: &WorkshopAccess) -> AppResult<Vec<Service>> {
        self.services.list_by_workshop(access.workshop_id).await
    }

    pub async fn get(&self, access: &WorkshopAccess, service_id: Uuid) -> AppResult<Service> {
        self.services
            .find_in_workshop(access.workshop_id, service_id)
            .await?
            .ok_or_else(|| not_found_error(SERVICE_NOT_FOUND))
    }

    pub async fn update(&self, access: &WorkshopAccess, service_id: Uuid, request: ServiceRequest) -> AppResult<Service> {
        let service = self.get(access, service_id).await?;
        self.services.rename(service.id, request.name.trim().to_string()).await
    }

    pub async fn delete(&self, access: &WorkshopAccess, service_id: Uuid) -> AppResult<MessageResponse> {
        let service = self.get(access, service_id).await?;

        if self.services.usage_count(service.id).await? > 0 {
            return Err(bad_request_error(SERVICE_IN_USE));
        }

        self.services.delete(service.id).await?;
        Ok(MessageResponse::new("Service deleted successfully"))
    }
}
