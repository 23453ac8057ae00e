use jiff::Timestamp;
use jiff::civil::Date;

use crate::models::Patch;

#[derive(Debug, Clone, PartialEq)]
pub struct Film {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// 0 to 10; the range is enforced at the HTTP boundary, not by the store.
    pub rating: f64,
    pub release_date: Date,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFilm {
    pub title: String,
    pub description: Option<String>,
    pub rating: f64,
    pub release_date: Date,
}

impl NewFilm {
    pub fn into_film(self, id: String, now: Timestamp) -> Film {
        Film {
            id,
            title: self.title,
            description: self.description,
            rating: self.rating,
            release_date: self.release_date,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilmPatch {
    pub title: Patch<String>,
    pub description: Patch<Option<String>>,
    pub rating: Patch<f64>,
    pub release_date: Patch<Date>,
}
