use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::work_order_controller::WorkOrderController;
use crate::dto::common_dto::MessageResponse;
use crate::dto::work_order_dto::{CreateWorkOrderRequest, UpdateWorkOrderRequest, WorkOrderQuery};
use crate::models::access::WorkshopAccess;
use crate::models::work_order::WorkOrderDetails;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiPath, ValidatedJson, ValidatedQuery};

pub fn create_work_order_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_work_orders).post(create_work_order))
        .route("/:id", get(get_work_order).patch(update_work_order).delete(delete_work_order))
}

async fn create_work_order(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ValidatedJson(request): ValidatedJson<CreateWorkOrderRequest>,
) -> Result<(StatusCode, Json<WorkOrderDetails>), AppError> {
    let controller = WorkOrderController::new(&state);
    let response = controller.create(&access, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_work_orders(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ValidatedQuery(query): ValidatedQuery<WorkOrderQuery>,
) -> Result<Json<Vec<WorkOrderDetails>>, AppError> {
    let controller = WorkOrderController::new(&state);
    let response = controller.list(&access, query).await?;
    Ok(Json(response))
}

async fn get_work_order(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<WorkOrderDetails>, AppError> {
    let controller = WorkOrderController::new(&state);
    let response = controller.get(&access, id).await?;
    Ok(Json(response))
}

async fn update_work_order(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateWorkOrderRequest>,
) -> Result<Json<WorkOrderDetails>, AppError> {
    let controller = WorkOrderController::new(&state);
    let response = controller.update(&access, id, request).await?;
    Ok(Json(response))
}

async fn delete_work_order(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let controller = WorkOrderController::new(&state);
    let response = controller.delete(&access, id).await?;
    Ok(Json(response))
}
