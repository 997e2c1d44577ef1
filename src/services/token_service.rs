use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub jti: Uuid,
    pub token_type: TokenType,
    pub iat: u64,
    pub exp: u64,
}

pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Issues and checks HS256 access/refresh tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl_secs: u64, refresh_ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.jwt_secret,
            config.access_token_ttl_secs,
            config.refresh_token_ttl_secs,
        )
    }

    pub fn issue(&self, user_id: i64, token_type: TokenType) -> Result<(String, Claims)> {
        let now = Utc::now().timestamp().max(0) as u64;
        let ttl = match token_type {
            TokenType::Access => self.access_ttl_secs,
            TokenType::Refresh => self.refresh_ttl_secs,
        };
        let claims = Claims {
            sub: user_id,
            jti: Uuid::new_v4(),
            token_type,
            iat: now,
            exp: now + ttl,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok((token, claims))
    }

    pub fn issue_pair(&self, user_id: i64) -> Result<TokenPair> {
        let (access, _) = self.issue(user_id, TokenType::Access)?;
        let (refresh, _) = self.issue(user_id, TokenType::Refresh)?;
        Ok(TokenPair { access, refresh })
    }

    /// Decodes `token` and checks signature, expiry and that it is of `expected` type.
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        if data.claims.token_type != expected {
            return Err(Error::Unauthorized(
                "Given token not valid for any token type".to_string(),
            ));
        }
        Ok(data.claims)
    }
}
