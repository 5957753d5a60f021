use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::service_controller::ServiceController;
use crate::dto::common_dto::MessageResponse;
use crate::dto::service_dto::ServiceRequest;
use crate::models::access::WorkshopAccess;
use crate::models::service::Service;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiPath, ValidatedJson};

pub fn create_service_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_services).post(create_service))
        .route("/:id", get(get_service).patch(update_service).delete(delete_service))
}

async fn create_service(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ValidatedJson(request): ValidatedJson<ServiceRequest>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    let controller = ServiceController::new(&state);
    let response = controller.create(&access, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_services(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
) -> Result<Json<Vec<Service>>, AppError> {
    let controller = ServiceController::new(&state);
    let response = controller.list(&access).await?;
    Ok(Json(response))
}

async fn get_service(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Service>, AppError> {
    let controller = ServiceController::new(&state);
    let response = controller.get(&access, id).await?;
    Ok(Json(response))
}

async fn update_service(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<ServiceRequest>,
) -> Result<Json<Service>, AppError> {
    let controller = ServiceController::new(&state);
    let response = controller.update(&access, id, request).await?;
    Ok(Json(response))
}

async fn delete_service(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let controller = ServiceController::new(&state);
    let response = controller.delete(&access, id).await?;
    Ok(Json(response))
}
