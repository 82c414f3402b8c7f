use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use gentax_core::GentaxError;

/// Wrapper mapping [`GentaxError`] onto HTTP responses.
///
/// Validation failures are the client's fault (400); everything else that
/// escapes a handler is a server-side failure (500). Bodies use the
/// `{"detail": ...}` envelope.
#[derive(Debug)]
pub struct ApiError(pub GentaxError);

impl From<GentaxError> for ApiError {
    fn from(e: GentaxError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            GentaxError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400_with_bare_message() {
        let resp = ApiError(GentaxError::Validation("Empty question".to_string()))
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_llm_error_maps_to_500() {
        let resp = ApiError(GentaxError::Llm("model overloaded".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
