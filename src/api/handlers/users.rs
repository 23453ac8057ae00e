//! User CRUD request handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::USER_TAG;
use crate::api::dto::{
    CreateUserRequest, ErrorResponse, FilmResponse, PatchUserRequest, UpdateUserRequest, UserResponse,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Routes:
/// - GET /            - List users
/// - POST /           - Create user (with film associations)
/// - GET /{id}        - Get user
/// - PUT /{id}        - Replace user fields
/// - PATCH /{id}      - Partially update user
/// - DELETE /{id}     - Delete user and its associations
/// - GET /{id}/films  - Films associated with the user
pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_users))
        .routes(routes!(create_user))
        .routes(routes!(get_user))
        .routes(routes!(update_user))
        .routes(routes!(patch_user))
        .routes(routes!(delete_user))
        .routes(routes!(list_user_films))
}

#[utoipa::path(
    get,
    path = "/",
    tag = USER_TAG,
    responses(
        (status = 200, description = "All users", body = Vec<UserResponse>)
    )
)]
async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let ctx = state.op_context();
    let users = state.services.users.list_users(&ctx).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/users - Create user
///
/// Film ids are stored as given; an unknown film id is rejected by the store.
#[utoipa::path(
    post,
    path = "/",
    tag = USER_TAG,
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Duplicate entry", body = ErrorResponse)
    )
)]
async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let ctx = state.op_context();
    let user = state.services.users.create_user(&ctx, payload.into_new_user()).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<UserResponse>> {
    let ctx = state.op_context();
    let user = state.services.users.get_user(&ctx, &id).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let ctx = state.op_context();
    let user = state
        .services
        .users
        .update_user(&ctx, &id, payload.into_new_user())
        .await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = String, Path, description = "User ID")),
    request_body = PatchUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn patch_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<PatchUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let ctx = state.op_context();
    let user = state.services.users.patch_user(&ctx, &id, payload.into_patch()).await?;
    Ok(Json(UserResponse::from(user)))
}

/// DELETE /api/users/{id} - Delete user
///
/// Returns 204 whether or not the user existed.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted")
    )
)]
async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    let ctx = state.op_context();
    state.services.users.delete_user(&ctx, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{id}/films",
    tag = USER_TAG,
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Films of the user, ordered by title", body = Vec<FilmResponse>)
    )
)]
async fn list_user_films(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<FilmResponse>>> {
    let ctx = state.op_context();
    let films = state.services.users.films_of_user(&ctx, &id).await?;
    Ok(Json(films.into_iter().map(FilmResponse::from).collect()))
}
