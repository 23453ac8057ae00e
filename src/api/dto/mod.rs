//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `user` / `film` - resource request/response DTOs
//! - `health` - probe and banner responses
//! - `error` - Common error response DTOs

mod error;
mod film;
mod health;
pub(crate) mod patch_rules;
mod user;

pub use error::ErrorResponse;
pub use film::{FilmRequest, FilmResponse, PatchFilmRequest};
pub use health::{BannerResponse, ComponentHealth, HealthResponse, HealthStatus};
pub use user::{CreateUserRequest, PatchUserRequest, UpdateUserRequest, UserResponse};
