//! User-related DTOs for API requests and responses.

use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::dto::patch_rules;
use crate::models::{NewUser, Patch, User, UserPatch};

pub const NAME_MAX: u64 = 255;
pub const GENDER_MAX: u64 = 16;

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating a new user.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    #[schema(min_length = 1, max_length = 255, example = "Ada Lovelace")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(format = "email")]
    pub email: String,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date, example = "1990-04-02")]
    pub date_of_birth: Option<Date>,
    #[serde(default)]
    #[validate(length(max = 16, message = "Gender must be at most 16 characters"))]
    pub gender: Option<String>,
    /// Films to associate with the user. Stored once, in this order.
    #[serde(default)]
    pub film_ids: Vec<String>,
}

impl CreateUserRequest {
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            name: self.name,
            email: self.email,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            film_ids: self.film_ids,
        }
    }
}

/// Request body for replacing a user. Optional fields left out keep their
/// stored values; film associations cannot be changed here.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    #[schema(min_length = 1, max_length = 255)]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(format = "email")]
    pub email: String,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub date_of_birth: Option<Date>,
    #[serde(default)]
    #[validate(length(max = 16, message = "Gender must be at most 16 characters"))]
    pub gender: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            name: self.name,
            email: self.email,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            film_ids: Vec::new(),
        }
    }
}

/// Request body for a partial update.
///
/// Absent fields are kept. `null` clears `date_of_birth` and `gender`; it is
/// rejected for `name` and `email`.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct PatchUserRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_patch_name"))]
    #[schema(value_type = Option<String>, min_length = 1, max_length = 255)]
    pub name: Patch<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_patch_email"))]
    #[schema(value_type = Option<String>, format = "email")]
    pub email: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date, nullable)]
    pub date_of_birth: Patch<Option<Date>>,
    #[serde(default)]
    #[validate(custom(function = "validate_patch_gender"))]
    #[schema(value_type = Option<String>, nullable)]
    pub gender: Patch<Option<String>>,
}

impl PatchUserRequest {
    pub fn into_patch(self) -> UserPatch {
        UserPatch {
            name: self.name,
            email: self.email,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
        }
    }
}

fn validate_patch_name(value: &Patch<String>) -> Result<(), ValidationError> {
    patch_rules::length(value.as_set().map(String::as_str), 1, NAME_MAX, "Name must be between 1 and 255 characters")
}

fn validate_patch_email(value: &Patch<String>) -> Result<(), ValidationError> {
    patch_rules::email(value.as_set().map(String::as_str))
}

fn validate_patch_gender(value: &Patch<Option<String>>) -> Result<(), ValidationError> {
    let gender = value.as_set().and_then(|g| g.as_deref());
    patch_rules::length(gender, 0, GENDER_MAX, "Gender must be at most 16 characters")
}

// ============================================================================
// Response DTOs
// ============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    #[schema(value_type = Option<String>, format = Date)]
    pub date_of_birth: Option<Date>,
    pub gender: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
    pub film_ids: Vec<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            date_of_birth: user.date_of_birth,
            gender: user.gender,
            created_at: user.created_at,
            updated_at: user.updated_at,
            film_ids: user.film_ids,
        }
    }
}
