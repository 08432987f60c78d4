//! JSON body extractor with `validator` checks
//!
//! Malformed JSON keeps axum's rejection status (400 syntax, 415 content
//! type, 422 shape). A body that parses but fails `Validate` is answered
//! with 422 listing every offending field.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::ApiResponse;

/// `Json<T>` that also runs `T::validate()`.
///
/// ```ignore
/// async fn set_mode(ValidatedJson(body): ValidatedJson<UpdateBillingModeRequest>) {
///     // body.mode is non-empty here
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    Malformed(JsonRejection),
    Invalid(ValidationErrors),
}

/// `field: message` pairs, sorted by field for stable output.
fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let parts: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: failed '{}' check", field, e.code),
            })
        })
        .collect();

    if parts.is_empty() {
        "validation failed".to_string()
    } else {
        parts.join("; ")
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Malformed(rejection) => (
                rejection.status(),
                format!("Invalid JSON: {}", rejection.body_text()),
            ),
            Self::Invalid(errors) => (StatusCode::UNPROCESSABLE_ENTITY, describe(&errors)),
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Malformed)?;
        value.validate().map_err(ValidatedJsonRejection::Invalid)?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::header;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct EstimateBody {
        #[validate(length(min = 1, max = 32))]
        service: String,
        #[validate(range(min = 0.0, max = 600.0))]
        duration: Option<f64>,
    }

    async fn echo_service(ValidatedJson(body): ValidatedJson<EstimateBody>) -> String {
        body.service
    }

    async fn post_body(content_type: Option<&str>, body: &str) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().method("POST").uri("/estimate");
        if let Some(value) = content_type {
            builder = builder.header(header::CONTENT_TYPE, value);
        }
        let response = Router::new()
            .route("/estimate", post(echo_service))
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    const JSON: Option<&str> = Some("application/json");

    #[tokio::test]
    async fn valid_body_reaches_handler() {
        let (status, body) =
            post_body(JSON, r#"{"service": "text_to_video", "duration": 12.5}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "text_to_video");
    }

    #[tokio::test]
    async fn syntax_error_is_400() {
        let (status, _) = post_body(JSON, "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn failed_checks_list_every_field() {
        let (status, body) = post_body(JSON, r#"{"service": "", "duration": -1.0}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["success"], false);
        let error = body["error"].as_str().unwrap();
        let duration_at = error.find("duration").unwrap();
        let service_at = error.find("service").unwrap();
        assert!(duration_at < service_at);
    }

    #[tokio::test]
    async fn wrongly_typed_field_is_422() {
        let (status, _) =
            post_body(JSON, r#"{"service": "text_to_video", "duration": "long"}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn missing_content_type_is_415() {
        let (status, _) = post_body(None, r#"{"service": "text_to_image"}"#).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
