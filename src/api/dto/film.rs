//! Film-related DTOs for API requests and responses.

use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::dto::patch_rules;
use crate::models::{Film, FilmPatch, NewFilm, Patch};

/// Request body for creating or replacing a film.
///
/// On replace, an absent `description` keeps the stored one.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct FilmRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    #[schema(min_length = 1, max_length = 255, example = "Heat")]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 4000, message = "Description must be at most 4000 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0.0, max = 10.0, message = "Rating must be between 0 and 10"))]
    #[schema(minimum = 0.0, maximum = 10.0, example = 8.3)]
    pub rating: f64,
    #[schema(value_type = String, format = Date, example = "1995-12-15")]
    pub release_date: Date,
}

impl FilmRequest {
    pub fn into_new_film(self) -> NewFilm {
        NewFilm {
            title: self.title,
            description: self.description,
            rating: self.rating,
            release_date: self.release_date,
        }
    }
}

/// Request body for a partial update. Absent fields are kept; `null`
/// clears `description`.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct PatchFilmRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_patch_title"))]
    #[schema(value_type = Option<String>, min_length = 1, max_length = 255)]
    pub title: Patch<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_patch_description"))]
    #[schema(value_type = Option<String>, nullable)]
    pub description: Patch<Option<String>>,
    #[serde(default)]
    #[validate(custom(function = "validate_patch_rating"))]
    #[schema(value_type = Option<f64>, minimum = 0.0, maximum = 10.0)]
    pub rating: Patch<f64>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub release_date: Patch<Date>,
}

impl PatchFilmRequest {
    pub fn into_patch(self) -> FilmPatch {
        FilmPatch {
            title: self.title,
            description: self.description,
            rating: self.rating,
            release_date: self.release_date,
        }
    }
}

fn validate_patch_title(value: &Patch<String>) -> Result<(), ValidationError> {
    patch_rules::length(value.as_set().map(String::as_str), 1, 255, "Title must be between 1 and 255 characters")
}

fn validate_patch_description(value: &Patch<Option<String>>) -> Result<(), ValidationError> {
    let description = value.as_set().and_then(|d| d.as_deref());
    patch_rules::length(description, 0, 4000, "Description must be at most 4000 characters")
}

fn validate_patch_rating(value: &Patch<f64>) -> Result<(), ValidationError> {
    patch_rules::range(value.as_set().copied(), 0.0, 10.0, "Rating must be between 0 and 10")
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FilmResponse {
    pub film_id: String,
    pub title: String,
    pub description: Option<String>,
    pub rating: f64,
    #[schema(value_type = String, format = Date)]
    pub release_date: Date,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

impl From<Film> for FilmResponse {
    fn from(film: Film) -> Self {
        Self {
            film_id: film.id,
            title: film.title,
            description: film.description,
            rating: film.rating,
            release_date: film.release_date,
            created_at: film.created_at,
            updated_at: film.updated_at,
        }
    }
}
