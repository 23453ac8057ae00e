use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// JSON body that has passed `validator` checks.
///
/// Malformed bodies become [`AppError::BadRequest`]; rule violations become
/// [`AppError::ValidationErrors`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest {
                message: rejection.body_text(),
            })?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct TestBody {
        #[validate(length(min = 1, max = 10, message = "Title must be between 1 and 10 characters"))]
        title: String,
        #[validate(range(min = 0.0, max = 10.0, message = "Rating must be between 0 and 10"))]
        rating: f64,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/test")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let result =
            ValidatedJson::<TestBody>::from_request(json_request(r#"{"title": "Heat", "rating": 8.3}"#), &()).await;
        let ValidatedJson(body) = result.unwrap();
        assert_eq!(body.title, "Heat");
        assert_eq!(body.rating, 8.3);
    }

    #[tokio::test]
    async fn test_rule_violations_are_collected() {
        let result =
            ValidatedJson::<TestBody>::from_request(json_request(r#"{"title": "", "rating": 12}"#), &()).await;
        match result.unwrap_err() {
            AppError::ValidationErrors { errors } => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field, "rating");
                assert_eq!(errors[1].field, "title");
                assert!(errors[1].message.contains("between 1 and 10"));
            }
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let result = ValidatedJson::<TestBody>::from_request(json_request("{not json"), &()).await;
        assert!(matches!(result.unwrap_err(), AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/test")
            .body(Body::from(r#"{"title": "Heat", "rating": 1}"#))
            .unwrap();
        let result = ValidatedJson::<TestBody>::from_request(request, &()).await;
        assert!(matches!(result.unwrap_err(), AppError::BadRequest { .. }));
    }
}
