//! Repository layer for data access operations.
//!
//! Users and films share one generic implementation, [`EntityRepository`];
//! the association table has its own read-only repository.

mod entity;
mod film_repo;
mod relation_repo;
mod user_repo;

pub use entity::{BoxedQuery, Entity, EntityRepository, bind_merge_field};
pub use film_repo::FilmRow;
pub use relation_repo::{RelationRepository, USER_FILM};
pub use user_repo::UserRow;

use crate::db::AsyncDbPool;
use crate::models::{Film, User};

pub type UserRepository = EntityRepository<User>;
pub type FilmRepository = EntityRepository<Film>;

/// Aggregates all repositories for convenient access.
///
/// Since `AsyncDbPool` uses `Arc` internally, cloning is cheap.
#[derive(Clone)]
pub struct Repositories {
    pub users: UserRepository,
    pub films: FilmRepository,
    pub relations: RelationRepository,
}

impl Repositories {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            films: FilmRepository::new(pool.clone()),
            relations: RelationRepository::new(pool),
        }
    }
}
