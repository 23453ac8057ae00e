use jiff::Timestamp;
use jiff::civil::Date;

use crate::models::Patch;

/// A registered viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub date_of_birth: Option<Date>,
    pub gender: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Films associated with the user; written once at creation.
    pub film_ids: Vec<String>,
}

/// Caller-supplied fields of a [`User`]; the store side assigns the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub date_of_birth: Option<Date>,
    pub gender: Option<String>,
    pub film_ids: Vec<String>,
}

impl NewUser {
    /// Both timestamps start at `now`.
    pub fn into_user(self, id: String, now: Timestamp) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            created_at: now,
            updated_at: now,
            film_ids: self.film_ids,
        }
    }
}

/// Field-wise changes to a stored [`User`]. `id`, `created_at` and `film_ids` are never merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Patch<String>,
    pub email: Patch<String>,
    pub date_of_birth: Patch<Option<Date>>,
    pub gender: Patch<Option<String>>,
}
