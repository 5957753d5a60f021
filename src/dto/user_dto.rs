use serde::Deserialize;
use validator::Validate;

use crate::models::user::UserChanges;
use crate::utils::validation::parse_date;

// Actualización del perfil propio
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "First name must be between 1 and 50 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Last name must be between 1 and 50 characters"))]
    pub last_name: Option<String>,

    #[validate(length(min = 7, max = 20, message = "Phone number must be between 7 and 20 characters"))]
    pub phone_number: Option<String>,

    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_date")]
    pub date_of_birth: Option<String>,

    #[validate(url(message = "Avatar must be a valid url"))]
    pub avatar: Option<String>,
}

impl UpdateProfileRequest {
    pub fn into_changes(self) -> UserChanges {
        UserChanges {
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone_number: self.phone_number,
            // Ya validada por el derive
            date_of_birth: self.date_of_birth.as_deref().and_then(|d| parse_date(d).ok()),
            avatar: self.avatar,
        }
    }
}
