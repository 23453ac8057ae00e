//! Film CRUD request handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::FILM_TAG;
use crate::api::dto::{ErrorResponse, FilmRequest, FilmResponse, PatchFilmRequest};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Routes:
/// - GET /           - List films
/// - POST /          - Create film
/// - GET /sort       - List films ordered by title, rating, release date
/// - GET /{id}       - Get film
/// - PUT /{id}       - Replace film fields
/// - PATCH /{id}     - Partially update film
/// - DELETE /{id}    - Delete film and its associations
/// - GET /user/{id}  - Films associated with a user
pub fn film_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_films))
        .routes(routes!(create_film))
        .routes(routes!(list_films_sorted))
        .routes(routes!(get_film))
        .routes(routes!(update_film))
        .routes(routes!(patch_film))
        .routes(routes!(delete_film))
        .routes(routes!(list_films_of_user))
}

fn to_responses(films: Vec<crate::models::Film>) -> Json<Vec<FilmResponse>> {
    Json(films.into_iter().map(FilmResponse::from).collect())
}

#[utoipa::path(
    get,
    path = "/",
    tag = FILM_TAG,
    responses((status = 200, description = "All films", body = Vec<FilmResponse>))
)]
async fn list_films(State(state): State<AppState>) -> AppResult<Json<Vec<FilmResponse>>> {
    let ctx = state.op_context();
    Ok(to_responses(state.services.films.list_films(&ctx).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = FILM_TAG,
    request_body = FilmRequest,
    responses(
        (status = 201, description = "Film created", body = FilmResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
async fn create_film(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<FilmRequest>,
) -> AppResult<(StatusCode, Json<FilmResponse>)> {
    let ctx = state.op_context();
    let film = state.services.films.create_film(&ctx, payload.into_new_film()).await?;
    Ok((StatusCode::CREATED, Json(FilmResponse::from(film))))
}

#[utoipa::path(
    get,
    path = "/sort",
    tag = FILM_TAG,
    responses((status = 200, description = "Films ordered by title, rating, release date", body = Vec<FilmResponse>))
)]
async fn list_films_sorted(State(state): State<AppState>) -> AppResult<Json<Vec<FilmResponse>>> {
    let ctx = state.op_context();
    Ok(to_responses(state.services.films.list_films_sorted(&ctx).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = FILM_TAG,
    params(("id" = String, Path, description = "Film ID")),
    responses(
        (status = 200, description = "Film found", body = FilmResponse),
        (status = 404, description = "Film not found", body = ErrorResponse)
    )
)]
async fn get_film(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<FilmResponse>> {
    let ctx = state.op_context();
    let film = state.services.films.get_film(&ctx, &id).await?;
    Ok(Json(FilmResponse::from(film)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = FILM_TAG,
    params(("id" = String, Path, description = "Film ID")),
    request_body = FilmRequest,
    responses(
        (status = 200, description = "Film updated", body = FilmResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Film not found", body = ErrorResponse)
    )
)]
async fn update_film(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<FilmRequest>,
) -> AppResult<Json<FilmResponse>> {
    let ctx = state.op_context();
    let film = state
        .services
        .films
        .update_film(&ctx, &id, payload.into_new_film())
        .await?;
    Ok(Json(FilmResponse::from(film)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = FILM_TAG,
    params(("id" = String, Path, description = "Film ID")),
    request_body = PatchFilmRequest,
    responses(
        (status = 200, description = "Film updated", body = FilmResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Film not found", body = ErrorResponse)
    )
)]
async fn patch_film(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<PatchFilmRequest>,
) -> AppResult<Json<FilmResponse>> {
    let ctx = state.op_context();
    let film = state.services.films.patch_film(&ctx, &id, payload.into_patch()).await?;
    Ok(Json(FilmResponse::from(film)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = FILM_TAG,
    params(("id" = String, Path, description = "Film ID")),
    responses((status = 204, description = "Film deleted"))
)]
async fn delete_film(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    let ctx = state.op_context();
    state.services.films.delete_film(&ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/user/{id}",
    tag = FILM_TAG,
    params(("id" = String, Path, description = "User ID")),
    responses((status = 200, description = "Films of the user", body = Vec<FilmResponse>))
)]
async fn list_films_of_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<FilmResponse>>> {
    let ctx = state.op_context();
    Ok(to_responses(state.services.users.films_of_user(&ctx, &id).await?))
}
