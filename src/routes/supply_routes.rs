use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::supply_controller::SupplyController;
use crate::dto::common_dto::MessageResponse;
use crate::dto::supply_dto::{CreateSupplyRequest, UpdateSupplyRequest};
use crate::models::access::WorkshopAccess;
use crate::models::supply::Supply;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiPath, ValidatedJson};

pub fn create_supply_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_supplies).post(create_supply))
        .route("/:id", get(get_supply).patch(update_supply).delete(delete_supply))
}

async fn create_supply(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ValidatedJson(request): ValidatedJson<CreateSupplyRequest>,
) -> Result<(StatusCode, Json<Supply>), AppError> {
    let controller = SupplyController::new(&state);
    let response = controller.create(&access, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_supplies(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
) -> Result<Json<Vec<Supply>>, AppError> {
    let controller = SupplyController::new(&state);
    let response = controller.list(&access).await?;
    Ok(Json(response))
}

async fn get_supply(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Supply>, AppError> {
    let controller = SupplyController::new(&state);
    let response = controller.get(&access, id).await?;
    Ok(Json(response))
}

async fn update_supply(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateSupplyRequest>,
) -> Result<Json<Supply>, AppError> {
    let controller = SupplyController::new(&state);
    let response = controller.update(&access, id, request).await?;
    Ok(Json(response))
}

async fn delete_supply(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let controller = SupplyController::new(&state);
    let response = controller.delete(&access, id).await?;
    Ok(Json(response))
}
