//! Film service for business logic operations.

use jiff::Timestamp;
use tracing::info;
use uuid::Uuid;

use crate::db::OpContext;
use crate::error::AppResult;
use crate::models::{Film, FilmPatch, NewFilm};
use crate::repositories::FilmRepository;

#[derive(Clone)]
pub struct FilmService {
    repo: FilmRepository,
}

impl FilmService {
    pub fn new(repo: FilmRepository) -> Self {
        Self { repo }
    }

    pub async fn create_film(&self, ctx: &OpContext, new_film: NewFilm) -> AppResult<Film> {
        let film = new_film.into_film(Uuid::new_v4().to_string(), Timestamp::now());
        let created = self.repo.create(ctx, film).await?;
        info!(film_id = %created.id, "Film created");
        Ok(created)
    }

    pub async fn list_films(&self, ctx: &OpContext) -> AppResult<Vec<Film>> {
        self.repo.find_all(ctx).await
    }

    /// Ordered by title, then rating, then release date.
    pub async fn list_films_sorted(&self, ctx: &OpContext) -> AppResult<Vec<Film>> {
        self.repo.find_all_sorted(ctx).await
    }

    pub async fn get_film(&self, ctx: &OpContext, id: &str) -> AppResult<Film> {
        self.repo.find_one(ctx, id).await
    }

    pub async fn update_film(&self, ctx: &OpContext, id: &str, replacement: NewFilm) -> AppResult<Film> {
        let entity = replacement.into_film(id.to_string(), Timestamp::now());
        self.repo.update(ctx, id, &entity).await
    }

    pub async fn patch_film(&self, ctx: &OpContext, id: &str, patch: FilmPatch) -> AppResult<Film> {
        self.repo.partial_update(ctx, id, &patch).await
    }

    /// Also removes the film from every user's associations.
    pub async fn delete_film(&self, ctx: &OpContext, id: &str) -> AppResult<()> {
        self.repo.delete(ctx, id).await?;
        info!(film_id = %id, "Film deleted");
        Ok(())
    }
}
