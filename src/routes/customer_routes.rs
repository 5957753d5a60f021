use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::customer_controller::CustomerController;
use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::common_dto::MessageResponse;
use crate::dto::customer_dto::{CreateCustomerRequest, CustomerResponse, UpdateCustomerRequest};
use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::models::access::WorkshopAccess;
use crate::models::customer::CustomerStats;
use crate::models::vehicle::Vehicle;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiPath, ValidatedJson};

/// Clientes y sus vehículos; requiere acceso a taller
pub fn create_customer_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route("/stats", get(customer_stats))
        .route("/vehicles/:id", get(get_vehicle).put(update_vehicle).delete(delete_vehicle))
        .route("/:id", get(get_customer).put(update_customer).delete(delete_customer))
        .route("/:id/vehicles", get(list_vehicles).post(create_vehicle))
}

async fn create_customer(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ValidatedJson(request): ValidatedJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>), AppError> {
    let controller = CustomerController::new(&state);
    let response = controller.create(&access, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_customers(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
) -> Result<Json<Vec<CustomerResponse>>, AppError> {
    let controller = CustomerController::new(&state);
    let response = controller.list(&access).await?;
    Ok(Json(response))
}

async fn customer_stats(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
) -> Result<Json<CustomerStats>, AppError> {
    let controller = CustomerController::new(&state);
    let response = controller.stats(&access).await?;
    Ok(Json(response))
}

async fn get_customer(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<CustomerResponse>, AppError> {
    let controller = CustomerController::new(&state);
    let response = controller.get(&access, id).await?;
    Ok(Json(response))
}

async fn update_customer(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, AppError> {
    let controller = CustomerController::new(&state);
    let response = controller.update(&access, id, request).await?;
    Ok(Json(response))
}

async fn delete_customer(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let controller = CustomerController::new(&state);
    let response = controller.delete(&access, id).await?;
    Ok(Json(response))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ApiPath(customer_id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<VehicleResponse>), AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.create(&access, customer_id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ApiPath(customer_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.list_by_customer(&access, customer_id).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<VehicleResponse>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.get(&access, id).await?;
    Ok(Json(response))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateVehicleRequest>,
) -> Result<Json<VehicleResponse>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.update(&access, id, request).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(access): Extension<WorkshopAccess>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let controller = VehicleController::new(&state);
    let response = controller.delete(&access, id).await?;
    Ok(Json(response))
}
