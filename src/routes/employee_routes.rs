use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::employee_controller::EmployeeController;
use crate::dto::employee_dto::{
    CreateEmployeeRequest, EmployeeListQuery, UpdateEmployeeRequest, UpdateEmployeeStatusRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::employee::Employee;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiPath, ValidatedJson, ValidatedQuery};

/// Rutas de plantilla bajo `/api/workshops/:id/employees`
pub fn create_employee_router() -> Router<AppState> {
    Router::new()
        .route("/:id/employees", get(list_employees).post(create_employee))
        .route("/:id/employees/:employee_id", get(get_employee).put(update_employee))
        .route("/:id/employees/:employee_id/status", patch(update_employee_status))
}

async fn create_employee(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(workshop_id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    let controller = EmployeeController::new(&state);
    let response = controller.create(workshop_id, &user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_employees(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(workshop_id): ApiPath<Uuid>,
    ValidatedQuery(query): ValidatedQuery<EmployeeListQuery>,
) -> Result<Json<Vec<Employee>>, AppError> {
    let controller = EmployeeController::new(&state);
    let response = controller.list(workshop_id, &user, query).await?;
    Ok(Json(response))
}

async fn get_employee(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath((workshop_id, employee_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Employee>, AppError> {
    let controller = EmployeeController::new(&state);
    let response = controller.get(workshop_id, employee_id, &user).await?;
    Ok(Json(response))
}

async fn update_employee(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath((workshop_id, employee_id)): ApiPath<(Uuid, Uuid)>,
    ValidatedJson(request): ValidatedJson<UpdateEmployeeRequest>,
) -> Result<Json<Employee>, AppError> {
    let controller = EmployeeController::new(&state);
    let response = controller.update(workshop_id, employee_id, &user, request).await?;
    Ok(Json(response))
}

async fn update_employee_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath((workshop_id, employee_id)): ApiPath<(Uuid, Uuid)>,
    ValidatedJson(request): ValidatedJson<UpdateEmployeeStatusRequest>,
) -> Result<Json<Employee>, AppError> {
    let controller = EmployeeController::new(&state);
    let response = controller.update_status(workshop_id, employee_id, &user, request.active).await?;
    Ok(Json(response))
}
