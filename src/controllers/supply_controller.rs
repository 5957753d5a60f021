use std::sync::Arc;
use uuid::Uuid;

use crate::dto::common_dto::MessageResponse;
use crate::dto::supply_dto::{CreateSupplyRequest, UpdateSupplyRequest};
use crate::models::access::WorkshopAccess;
use crate::models::supply::Supply;
use crate::repositories::SupplyRepository;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, not_found_error, AppResult};

pub const SUPPLY_NOT_FOUND: &str = "Supply not found";
pub const SUPPLY_IN_USE: &str = "Cannot delete supply that is being used in work orders";

pub struct SupplyController {
    supplies: Arc<dyn SupplyRepository>,
}

impl SupplyController {
    pub fn new(state: &AppState) -> Self {
        Self {
            supplies: state.repos.supplies.clone(),
        }
    }

    pub async fn create(&self, access: &WorkshopAccess, request: CreateSupplyRequest) -> AppResult<Supply> {
        self.supplies.create(access.workshop_id, request.try_into()?).await
    }

    pub async fn list(&self, access: &WorkshopAccess) -> AppResult<Vec<Supply>> {
        self.supplies.list_by_workshop(access.workshop_id).await
    }

    pub async fn get(&self, access: &WorkshopAccess, supply_id: Uuid) -> AppResult<Supply> {
        self.supplies
            .find_in_workshop(access.workshop_id, supply_id)
            .await?
            .ok_or_else(|| not_found_error(SUPPLY_NOT_FOUND))
    }

    pub async fn update(
        &self,
        access: &WorkshopAccess,
        supply_id: Uuid,
        request: UpdateSupplyRequest,
    ) -> AppResult<Supply> {
        let supply = self.get(access, supply_id).await?;
        self.supplies.update(supply.id, request.try_into()?).await
    }

    pub async fn delete(&self, access: &WorkshopAccess, supply_id: Uuid) -> AppResult<MessageResponse> {
        let supply = self.get(access, supply_id).await?;

        if self.supplies.usage_count(supply.id).await? > 0 {
            return Err(bad_request_error(SUPPLY_IN_USE));
        }

        self.supplies.delete(supply.id).await?;
        Ok(MessageResponse::new("Supply deleted successfully"))
    }
}
