use axum::extract::FromRequestParts;

use crate::error::Error;

/// `axum::extract::Path` whose rejections render as the error envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct ApiPath<T>(pub T);
