use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::models::work_order::{
    NewWorkOrder, OrderPriority, OrderStatus, SupplyLine, WorkOrderChanges, WorkOrderFilter,
};
use crate::utils::validation::to_money;

pub const DEFAULT_PAGE_SIZE: i64 = 50;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SupplyLineRequest {
    pub supply_id: Uuid,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkOrderRequest {
    pub customer_id: Uuid,
    pub vehicle_id: Uuid,
    pub service_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Mechanic must be between 1 and 100 characters"))]
    pub mechanic: String,

    #[serde(default)]
    pub priority: OrderPriority,

    pub start_date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, max = 1000, message = "Description must be between 1 and 1000 characters"))]
    pub description: String,

    #[validate(length(max = 500, message = "Additional notes must be at most 500 characters"))]
    pub additional_notes: Option<String>,

    #[serde(default)]
    #[validate]
    pub supplies: Vec<SupplyLineRequest>,

    #[validate(range(min = 0.0, max = 9999999999.99, message = "Subtotal must be between 0 and 9999999999.99"))]
    pub subtotal: f64,

    #[validate(range(min = 0.0, max = 9999999999.99, message = "Total must be between 0 and 9999999999.99"))]
    pub total: f64,
}

impl TryFrom<CreateWorkOrderRequest> for NewWorkOrder {
    type Error = ValidationErrors;

    fn try_from(request: CreateWorkOrderRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            customer_id: request.customer_id,
            vehicle_id: request.vehicle_id,
            service_id: request.service_id,
            mechanic: request.mechanic,
            priority: request.priority,
            start_date: request.start_date.unwrap_or_else(Utc::now),
            description: request.description,
            additional_notes: request.additional_notes,
            supplies: request
                .supplies
                .into_iter()
                .map(|line| SupplyLine {
                    supply_id: line.supply_id,
                    quantity: line.quantity,
                })
                .collect(),
            subtotal: to_money("subtotal", request.subtotal)?,
            total: to_money("total", request.total)?,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkOrderRequest {
    pub status: Option<OrderStatus>,

    #[validate(length(min = 1, max = 100, message = "Mechanic must be between 1 and 100 characters"))]
    pub mechanic: Option<String>,

    pub priority: Option<OrderPriority>,

    pub start_date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, max = 1000, message = "Description must be between 1 and 1000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 500, message = "Additional notes must be at most 500 characters"))]
    pub additional_notes: Option<String>,

    #[validate(range(min = 0.0, max = 9999999999.99, message = "Subtotal must be between 0 and 9999999999.99"))]
    pub subtotal: Option<f64>,

    #[validate(range(min = 0.0, max = 9999999999.99, message = "Total must be between 0 and 9999999999.99"))]
    pub total: Option<f64>,
}

impl TryFrom<UpdateWorkOrderRequest> for WorkOrderChanges {
    type Error = ValidationErrors;

    fn try_from(request: UpdateWorkOrderRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            status: request.status,
            mechanic: request.mechanic,
            priority: request.priority,
            start_date: request.start_date,
            description: request.description,
            additional_notes: request.additional_notes,
            subtotal: request
                .subtotal
                .map(|subtotal| to_money("subtotal", subtotal))
                .transpose()?,
            total: request.total.map(|total| to_money("total", total)).transpose()?,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderQuery {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub service_id: Option<Uuid>,

    #[validate(range(min = 1, max = 1000000, message = "Page must be between 1 and 1000000"))]
    pub page: Option<i64>,

    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<i64>,
}

impl From<WorkOrderQuery> for WorkOrderFilter {
    fn from(query: WorkOrderQuery) -> Self {
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        let page = query.page.unwrap_or(1);
        Self {
            status: query.status,
            customer_id: query.customer_id,
            vehicle_id: query.vehicle_id,
            service_id: query.service_id,
            limit,
            offset: (page - 1).saturating_mul(limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_to_filter_paging() {
        let filter = WorkOrderFilter::from(WorkOrderQuery {
            page: Some(3),
            limit: Some(20),
            ..Default::default()
        });
        assert_eq!(filter.limit, 20);
        assert_eq!(filter.offset, 40);

        let filter = WorkOrderFilter::from(WorkOrderQuery::default());
        assert_eq!(filter.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(filter.offset, 0);
    }

    #[test]
    fn test_huge_page_is_rejected_and_never_overflows() {
        let query = WorkOrderQuery {
            page: Some(i64::MAX),
            limit: Some(100),
            ..Default::default()
        };
        assert!(query.validate().is_err());

        let filter = WorkOrderFilter::from(query);
        assert_eq!(filter.offset, i64::MAX);
    }

    #[test]
    fn test_out_of_range_total_is_rejected() {
        let request: CreateWorkOrderRequest = serde_json::from_value(serde_json::json!({
            "customerId": Uuid::new_v4(),
            "vehicleId": Uuid::new_v4(),
            "serviceId": Uuid::new_v4(),
            "mechanic": "Luis",
            "description": "Cambio de aceite",
            "subtotal": 100.0,
            "total": 1e30
        }))
        .unwrap();
        assert!(request.validate().is_err());

        let errors = NewWorkOrder::try_from(request).unwrap_err();
        assert!(errors.field_errors().contains_key("total"));
    }
}
