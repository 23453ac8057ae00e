//! User service for business logic operations.
//!
//! Assigns identity and timestamps on creation and delegates storage to the
//! generic repository.

use jiff::Timestamp;
use tracing::info;
use uuid::Uuid;

use crate::db::OpContext;
use crate::error::AppResult;
use crate::models::{Film, NewUser, User, UserPatch};
use crate::repositories::{RelationRepository, UserRepository};

/// Since both repositories share the pool's `Arc`, cloning is cheap.
#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    relations: RelationRepository,
}

impl UserService {
    pub fn new(repo: UserRepository, relations: RelationRepository) -> Self {
        Self { repo, relations }
    }

    /// Creates a user with a fresh id and equal `created_at`/`updated_at`,
    /// together with its film associations.
    pub async fn create_user(&self, ctx: &OpContext, new_user: NewUser) -> AppResult<User> {
        let user = new_user.into_user(Uuid::new_v4().to_string(), Timestamp::now());
        let created = self.repo.create(ctx, user).await?;
        info!(user_id = %created.id, films = created.film_ids.len(), "User created");
        Ok(created)
    }

    pub async fn list_users(&self, ctx: &OpContext) -> AppResult<Vec<User>> {
        self.repo.find_all(ctx).await
    }

    pub async fn get_user(&self, ctx: &OpContext, id: &str) -> AppResult<User> {
        self.repo.find_one(ctx, id).await
    }

    /// Full update. Absent optional fields keep their stored values and the
    /// film associations are left as they are.
    pub async fn update_user(&self, ctx: &OpContext, id: &str, replacement: NewUser) -> AppResult<User> {
        let entity = replacement.into_user(id.to_string(), Timestamp::now());
        self.repo.update(ctx, id, &entity).await
    }

    pub async fn patch_user(&self, ctx: &OpContext, id: &str, patch: UserPatch) -> AppResult<User> {
        self.repo.partial_update(ctx, id, &patch).await
    }

    /// Succeeds whether or not the user exists.
    pub async fn delete_user(&self, ctx: &OpContext, id: &str) -> AppResult<()> {
        self.repo.delete(ctx, id).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Films associated with the user; an unknown user has none.
    pub async fn films_of_user(&self, ctx: &OpContext, id: &str) -> AppResult<Vec<Film>> {
        self.relations.films_for_user(ctx, id).await
    }
}
