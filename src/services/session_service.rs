use chrono::{TimeZone, Utc};
use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::services::account_service::AccountService;
use crate::services::token_service::{TokenPair, TokenService, TokenType};
use crate::utils::crypto::verify_password;

const BAD_CREDENTIALS: &str = "No active account found with the given credentials";

/// Login, refresh and logout on top of the token service and the revocation list.
#[derive(Clone)]
pub struct SessionService {
    pool: PgPool,
    accounts: AccountService,
    tokens: TokenService,
}

impl SessionService {
    pub fn new(pool: PgPool, accounts: AccountService, tokens: TokenService) -> Self {
        Self {
            pool,
            accounts,
            tokens,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
        let user = self
            .accounts
            .find_active_by_username(username)
            .await?
            .ok_or_else(|| Error::Unauthorized(BAD_CREDENTIALS.to_string()))?;
        if !verify_password(password, &user.password_hash) {
            tracing::info!(user_id = user.id, "login rejected");
            return Err(Error::Unauthorized(BAD_CREDENTIALS.to_string()));
        }
        self.tokens.issue_pair(user.id)
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<String> {
        let claims = self.tokens.verify(refresh_token, TokenType::Refresh)?;
        if self.is_revoked(claims.jti).await? {
            return Err(Error::Unauthorized("Token is blacklisted".to_string()));
        }
        let (access, _) = self.tokens.issue(claims.sub, TokenType::Access)?;
        Ok(access)
    }

    /// Revokes a refresh token owned by `user_id`. Revoking twice is not an error.
    pub async fn logout(&self, user_id: i64, refresh_token: &str) -> Result<()> {
        let claims = self
            .tokens
            .verify(refresh_token, TokenType::Refresh)
            .map_err(|_| Error::BadRequest("Token is invalid or expired".to_string()))?;
        if claims.sub != user_id {
            return Err(Error::BadRequest(
                "Token does not belong to the authenticated user".to_string(),
            ));
        }

        let expires_at = Utc
            .timestamp_opt(claims.exp as i64, 0)
            .single()
            .ok_or_else(|| Error::BadRequest("Token is invalid or expired".to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (jti, user_id, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (jti) DO NOTHING
            "#,
        )
        .bind(claims.jti)
        .bind(user_id)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(user_id, jti = %claims.jti, "refresh token revoked");
        Ok(())
    }

    async fn is_revoked(&self, jti: uuid::Uuid) -> Result<bool> {
        let revoked: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE jti = $1)")
                .bind(jti)
                .fetch_one(&self.pool)
                .await?;
        Ok(revoked)
    }
}
