use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::{Error, Result};
use crate::models::principal::Principal;
use crate::services::token_service::TokenType;
use crate::AppState;

const CREDENTIALS_MISSING: &str = "Authentication credentials were not provided.";
const BAD_HEADER: &str = "Authorization header must be of the form \"Bearer <token>\".";

/// Pulls the bearer token out of the `Authorization` header.
pub fn bearer_token(parts: &Parts) -> Result<&str> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::Unauthorized(CREDENTIALS_MISSING.to_string()))?;
    let raw = header
        .to_str()
        .map_err(|_| Error::Unauthorized(BAD_HEADER.to_string()))?;
    let token = raw
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::Unauthorized(BAD_HEADER.to_string()))?;
    Ok(token)
}

#[async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = bearer_token(parts)?;
        let claims = state.token_service.verify(token, TokenType::Access)?;
        state.account_service.resolve_principal(claims.sub).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/job/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn missing_header_is_unauthorized() {
        match bearer_token(&parts(None)) {
            Err(Error::Unauthorized(message)) => assert_eq!(message, CREDENTIALS_MISSING),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn other_schemes_are_rejected() {
        assert!(bearer_token(&parts(Some("Basic dXNlcjpwYXNz"))).is_err());
        assert!(bearer_token(&parts(Some("Bearer "))).is_err());
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc.def.ghi"))).unwrap(), "abc.def.ghi");
    }
}
