use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::workshop_dto::{CreateWorkshopRequest, UpdateWorkshopRequest, WorkshopDetails};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::access::{
    WorkshopRole, CANNOT_UPDATE_WORKSHOP, CANNOT_VIEW_WORKSHOP, NO_WORKSHOP_FOR_USER,
};
use crate::models::workshop::{Workshop, WorkshopChanges, WorkshopStats};
use crate::repositories::workshop_repository::ALREADY_OWNS_WORKSHOP;
use crate::repositories::Repositories;
use crate::services::image_service::{public_id_from_url, ImageUpload, LOGO_FOLDER};
use crate::services::{AccessService, ImageStore};
use crate::state::AppState;
use crate::utils::errors::{conflict_error, forbidden_error, not_found_error, AppResult};

/// Ventana de las estadísticas recientes
const STATS_WINDOW_DAYS: i64 = 30;

pub struct WorkshopController {
    repos: Repositories,
    access: AccessService,
    images: Arc<dyn ImageStore>,
}

impl WorkshopController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repos: state.repos.clone(),
            access: state.access.clone(),
            images: state.images.clone(),
        }
    }

    /// Crear el taller del usuario; cada usuario posee como mucho uno
    pub async fn create(&self, user: &AuthenticatedUser, request: CreateWorkshopRequest) -> AppResult<Workshop> {
        if self.repos.workshops.find_by_owner(user.user_id).await?.is_some() {
            return Err(conflict_error(ALREADY_OWNS_WORKSHOP));
        }

        let workshop = self.repos.workshops.create(user.user_id, request.into()).await?;
        tracing::info!(workshop_id = %workshop.id, owner_id = %user.user_id, "🏭 Taller creado");
        Ok(workshop)
    }

    pub async fn my_workshop(&self, user: &AuthenticatedUser) -> AppResult<WorkshopDetails> {
        let workshop = self
            .repos
            .workshops
            .find_by_owner(user.user_id)
            .await?
            .ok_or_else(|| not_found_error(NO_WORKSHOP_FOR_USER))?;

        self.details(workshop).await
    }

    pub async fn get(&self, workshop_id: Uuid, user: &AuthenticatedUser) -> AppResult<WorkshopDetails> {
        let workshop = self.access.require_workshop(workshop_id).await?;
        self.require_member(&workshop, user).await?;
        self.details(workshop).await
    }

    pub async fn update(
        &self,
        workshop_id: Uuid,
        user: &AuthenticatedUser,
        request: UpdateWorkshopRequest,
    ) -> AppResult<Workshop> {
        let workshop = self.require_manager(workshop_id, user).await?;
        self.repos.workshops.update(workshop.id, request.into()).await
    }

    /// Actualizar datos y logo en una sola petición multipart
    ///
    /// El logo anterior se borra después de subir el nuevo; si el borrado
    /// falla sólo se registra.
    pub async fn update_with_logo(
        &self,
        workshop_id: Uuid,
        user: &AuthenticatedUser,
        request: UpdateWorkshopRequest,
        logo: ImageUpload,
    ) -> AppResult<Workshop> {
        let workshop = self.require_manager(workshop_id, user).await?;

        let public_id = format!("workshop-{}-logo-{}", workshop.id, Utc::now().timestamp_millis());
        let stored = self.images.upload(logo, LOGO_FOLDER, &public_id).await?;

        let previous = workshop
            .logo_public_id
            .clone()
            .or_else(|| workshop.logo.as_deref().and_then(public_id_from_url));
        if let Some(previous) = previous.filter(|id| *id != stored.public_id) {
            if let Err(e) = self.images.delete(&previous).await {
                tracing::warn!(workshop_id = %workshop.id, public_id = %previous, "No se pudo borrar el logo anterior: {}", e);
            }
        }

        let changes = WorkshopChanges {
            logo: Some(stored.url),
            logo_public_id: Some(stored.public_id),
            ..WorkshopChanges::from(request)
        };
        self.repos.workshops.update(workshop.id, changes).await
    }

    pub async fn stats(&self, workshop_id: Uuid, user: &AuthenticatedUser) -> AppResult<WorkshopStats> {
        let workshop = self.access.require_workshop(workshop_id).await?;
        self.require_member(&workshop, user).await?;

        let since = Utc::now() - Duration::days(STATS_WINDOW_DAYS);
        self.repos.workshops.stats(workshop.id, since).await
    }

    async fn require_member(&self, workshop: &Workshop, user: &AuthenticatedUser) -> AppResult<WorkshopRole> {
        self.access
            .role_in(workshop, user)
            .await?
            .ok_or_else(|| forbidden_error(CANNOT_VIEW_WORKSHOP))
    }

    async fn require_manager(&self, workshop_id: Uuid, user: &AuthenticatedUser) -> AppResult<Workshop> {
        let workshop = self.access.require_workshop(workshop_id).await?;
        match self.access.role_in(&workshop, user).await? {
            Some(role) if role.can_manage_staff() => Ok(workshop),
            _ => Err(forbidden_error(CANNOT_UPDATE_WORKSHOP)),
        }
    }

    async fn details(&self, workshop: Workshop) -> AppResult<WorkshopDetails> {
        let owner = self.repos.workshops.find_owner(workshop.id).await?;
        let employees = self.repos.employees.list_active(workshop.id, None).await?;
        let services = self.repos.services.list_by_workshop(workshop.id).await?;
        let supplies = self.repos.supplies.list_in_stock(workshop.id).await?;

        Ok(WorkshopDetails {
            workshop,
            owner,
            employees,
            services,
            supplies,
        })
    }
}
