//! The response envelope shared by every handler.
//!
//! Success bodies look like `{"status": "success", "message": ..., "data": ...}` and
//! error bodies like `{"status": "error", "message": ..., "errors": ...}`.

use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Request processed successfully.";
pub const DEFAULT_ERROR_MESSAGE: &str = "An unexpected error occurred.";
pub const INVALID_DATA_MESSAGE: &str = "Invalid data provided.";

#[derive(Debug, Serialize)]
struct SuccessBody<'a, T: Serialize> {
    status: &'static str,
    message: &'a str,
    data: &'a T,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    status: &'static str,
    message: &'a str,
    errors: &'a JsonValue,
}

#[derive(Debug)]
pub struct ApiResponse<T> {
    status_code: StatusCode,
    message: Cow<'static, str>,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<Cow<'static, str>>, data: T) -> Self {
        Self {
            status_code: StatusCode::OK,
            message: message.into(),
            data,
        }
    }

    pub fn created(message: impl Into<Cow<'static, str>>, data: T) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            message: message.into(),
            data,
        }
    }
}

impl ApiResponse<JsonValue> {
    /// A success envelope with an empty `data` object.
    pub fn message(message: impl Into<Cow<'static, str>>) -> Self {
        Self::ok(message, json!({}))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = SuccessBody {
            status: "success",
            message: &self.message,
            data: &self.data,
        };
        match serde_json::to_value(&body) {
            Ok(value) => (self.status_code, Json(value)).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize response body");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    DEFAULT_ERROR_MESSAGE,
                    JsonValue::String(err.to_string()),
                )
            }
        }
    }
}

pub fn error_response(status: StatusCode, message: &str, errors: JsonValue) -> Response {
    let body = ErrorBody {
        status: "error",
        message,
        errors: &errors,
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> JsonValue {
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn created_envelope_carries_data() {
        let response =
            ApiResponse::created("New Job Created!", json!({"id": 7})).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "New Job Created!");
        assert_eq!(body["data"]["id"], 7);
    }

    #[tokio::test]
    async fn message_only_envelope_has_empty_data_object() {
        let response = ApiResponse::message("Job Deleted Successfully").into_response();
        let body = body_json(response).await;
        assert_eq!(body["data"], json!({}));
    }

    #[tokio::test]
    async fn error_envelope_uses_errors_key() {
        let response = error_response(
            StatusCode::FORBIDDEN,
            "You do not have permission to perform this action.",
            json!({}),
        );
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert!(body.get("data").is_none());
        assert_eq!(body["errors"], json!({}));
    }
}
