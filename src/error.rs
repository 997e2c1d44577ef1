use std::collections::BTreeMap;

use axum::{
    extract::{
        multipart::MultipartError,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{json, Value as JsonValue};
use validator::ValidationErrors;

use crate::dto::api_response::{error_response, DEFAULT_ERROR_MESSAGE, INVALID_DATA_MESSAGE};

pub type Result<T> = std::result::Result<T, Error>;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Too many requests")]
    TooManyRequests,

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid request body: {0}")]
    JsonBody(#[from] JsonRejection),

    #[error("Invalid path parameter: {0}")]
    PathParam(#[from] PathRejection),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest(_)
            | Error::Validation(_)
            | Error::JsonBody(_)
            | Error::PathParam(_)
            | Error::Multipart(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized(_) | Error::Token(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Error::Config(_)
            | Error::Database(_)
            | Error::Migrate(_)
            | Error::PasswordHash(_)
            | Error::Internal(_)
            | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Flattens validator output into `{field: first message}`.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let message = errs
                .first()
                .map(|err| match &err.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value ({}).", err.code),
                })
                .unwrap_or_else(|| "Invalid value.".to_string());
            (field.to_string(), message)
        })
        .collect()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (message, errors): (String, JsonValue) = match self {
            Error::Validation(errors) => (
                INVALID_DATA_MESSAGE.to_string(),
                json!(field_messages(&errors)),
            ),
            Error::JsonBody(rejection) => (
                INVALID_DATA_MESSAGE.to_string(),
                JsonValue::String(rejection.body_text()),
            ),
            Error::PathParam(rejection) => (
                INVALID_DATA_MESSAGE.to_string(),
                JsonValue::String(rejection.body_text()),
            ),
            Error::Multipart(err) => (
                INVALID_DATA_MESSAGE.to_string(),
                JsonValue::String(err.to_string()),
            ),
            Error::BadRequest(msg)
            | Error::Unauthorized(msg)
            | Error::Forbidden(msg)
            | Error::NotFound(msg) => (msg, json!({})),
            Error::Token(err) => (
                "Given token not valid for any token type".to_string(),
                JsonValue::String(err.to_string()),
            ),
            Error::TooManyRequests => ("Request was throttled.".to_string(), json!({})),
            other => {
                tracing::error!(error = %other, "unhandled error while serving request");
                (DEFAULT_ERROR_MESSAGE.to_string(), JsonValue::String(other.to_string()))
            }
        };

        error_response(status, &message, errors)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err)
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Error::BadRequest("A record with these values already exists.".to_string())
            }
            other => Error::Database(other),
        }
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(err: argon2::password_hash::Error) -> Self {
        Error::PasswordHash(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::field_error;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> JsonValue {
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_errors_are_reported_per_field() {
        let err = Error::from(field_error("user_type", "invalid_choice", "Invalid User Type"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], INVALID_DATA_MESSAGE);
        assert_eq!(body["errors"]["user_type"], "Invalid User Type");
    }

    #[tokio::test]
    async fn unexpected_errors_hide_behind_generic_message() {
        let response = Error::Internal("disk on fire".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], DEFAULT_ERROR_MESSAGE);
        assert_eq!(body["errors"], "Internal error: disk on fire");
    }

    #[tokio::test]
    async fn domain_errors_map_to_their_status_codes() {
        let cases = [
            (Error::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (Error::NotFound("Job not found.".into()), StatusCode::NOT_FOUND),
            (Error::Unauthorized("who".into()), StatusCode::UNAUTHORIZED),
            (Error::BadRequest("dup".into()), StatusCode::BAD_REQUEST),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn row_not_found_becomes_not_found() {
        assert!(matches!(Error::from(sqlx::Error::RowNotFound), Error::NotFound(_)));
    }
}
