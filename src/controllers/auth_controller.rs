use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::services::AuthService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct AuthController {
    auth: AuthService,
}

impl AuthController {
    pub fn new(state: &AppState) -> Self {
        Self {
            auth: state.auth.clone(),
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<RegisterResponse> {
        let user = self.auth.register(request).await?;
        Ok(RegisterResponse {
            message: "User registered successfully".to_string(),
            user,
        })
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        self.auth.login(request).await
    }
}
