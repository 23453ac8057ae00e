use utoipa::OpenApi;

pub const USER_TAG: &str = "Users";
pub const FILM_TAG: &str = "Films";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Movie API",
        description = "Users, films and the films each user is associated with",
    ),
    components(schemas(crate::api::dto::ErrorResponse)),
    tags(
        (name = USER_TAG, description = "User management endpoints"),
        (name = FILM_TAG, description = "Film management endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
