use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::controllers::workshop_controller::WorkshopController;
use crate::dto::workshop_dto::{CreateWorkshopRequest, UpdateWorkshopRequest, WorkshopDetails};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::workshop::{Workshop, WorkshopStats};
use crate::routes::employee_routes;
use crate::services::image_service::ImageUpload;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{ApiPath, ValidatedJson};

/// Tamaño máximo del logo
pub const MAX_LOGO_BYTES: usize = 5 * 1024 * 1024;

pub const LOGO_FIELD: &str = "logo";
pub const NO_FILE_UPLOADED: &str = "No file uploaded. Please provide a logo image";
pub const ONLY_IMAGES: &str = "Only image files are allowed";
pub const FILE_TOO_LARGE: &str = "File size too large. Maximum size is 5MB";

/// Margen para los campos de texto que acompañan al logo
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn create_workshop_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_workshop))
        .route("/my-workshop", get(my_workshop))
        .route(
            "/:id",
            get(get_workshop)
                .patch(update_workshop)
                .put(upload_logo)
                .layer(DefaultBodyLimit::max(MAX_LOGO_BYTES + MULTIPART_OVERHEAD)),
        )
        .route("/:id/stats", get(workshop_stats))
        .merge(employee_routes::create_employee_router())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_workshop(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateWorkshopRequest>,
) -> Result<(StatusCode, Json<Workshop>), AppError> {
    let controller = WorkshopController::new(&state);
    let response = controller.create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn my_workshop(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<WorkshopDetails>, AppError> {
    let controller = WorkshopController::new(&state);
    let response = controller.my_workshop(&user).await?;
    Ok(Json(response))
}

async fn get_workshop(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<WorkshopDetails>, AppError> {
    let controller = WorkshopController::new(&state);
    let response = controller.get(id, &user).await?;
    Ok(Json(response))
}

async fn update_workshop(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateWorkshopRequest>,
) -> Result<Json<Workshop>, AppError> {
    let controller = WorkshopController::new(&state);
    let response = controller.update(id, &user, request).await?;
    Ok(Json(response))
}

async fn upload_logo(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Workshop>, AppError> {
    let multipart = multipart.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let (request, logo) = read_logo_form(multipart).await?;

    let controller = WorkshopController::new(&state);
    let response = controller.update_with_logo(id, &user, request, logo).await?;
    Ok(Json(response))
}

async fn workshop_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<WorkshopStats>, AppError> {
    let controller = WorkshopController::new(&state);
    let response = controller.stats(id, &user).await?;
    Ok(Json(response))
}

/// Lee el formulario multipart: el archivo `logo` y los campos de texto opcionales
async fn read_logo_form(mut multipart: Multipart) -> Result<(UpdateWorkshopRequest, ImageUpload), AppError> {
    let mut request = UpdateWorkshopRequest::default();
    let mut logo = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == LOGO_FIELD {
            let content_type = field.content_type().unwrap_or_default().to_string();
            if !content_type.starts_with("image/") {
                return Err(AppError::BadRequest(ONLY_IMAGES.to_string()));
            }
            let file_name = field.file_name().unwrap_or(LOGO_FIELD).to_string();
            let bytes = field.bytes().await.map_err(multipart_error)?;
            if bytes.len() > MAX_LOGO_BYTES {
                return Err(AppError::BadRequest(FILE_TOO_LARGE.to_string()));
            }

            logo = Some(ImageUpload {
                bytes: bytes.to_vec(),
                content_type,
                file_name,
            });
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        match name.as_str() {
            "name" => request.name = Some(value),
            "address" => request.address = Some(value),
            "phone" => request.phone = Some(value),
            "email" => request.email = Some(value),
            "nit" => request.nit = Some(value),
            _ => tracing::debug!(field = %name, "Campo multipart ignorado"),
        }
    }

    let logo = logo.ok_or_else(|| AppError::BadRequest(NO_FILE_UPLOADED.to_string()))?;
    request.validate()?;
    Ok((request, logo))
}

fn multipart_error(error: MultipartError) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::BadRequest(FILE_TOO_LARGE.to_string());
    }
    AppError::BadRequest(error.body_text())
}
