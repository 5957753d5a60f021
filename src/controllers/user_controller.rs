use std::sync::Arc;

use crate::dto::user_dto::UpdateProfileRequest;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::User;
use crate::repositories::user_repository::EMAIL_TAKEN;
use crate::repositories::UserRepository;
use crate::state::AppState;
use crate::utils::errors::{conflict_error, not_found_error, AppResult};

pub struct UserController {
    users: Arc<dyn UserRepository>,
}

impl UserController {
    pub fn new(state: &AppState) -> Self {
        Self {
            users: state.repos.users.clone(),
        }
    }

    pub async fn me(&self, user: &AuthenticatedUser) -> AppResult<User> {
        self.users
            .find_by_id(user.user_id)
            .await?
            .ok_or_else(|| not_found_error("User not found"))
    }

    pub async fn update_me(&self, user: &AuthenticatedUser, request: UpdateProfileRequest) -> AppResult<User> {
        if let Some(email) = request.email.as_deref() {
            if let Some(existing) = self.users.find_by_email(email).await? {
                if existing.id != user.user_id {
                    return Err(conflict_error(EMAIL_TAKEN));
                }
            }
        }

        self.users.update(user.user_id, request.into_changes()).await
    }
}
