use sqlx::{PgConnection, PgPool};

use crate::error::{Error, Result};
use crate::models::notification::Notification;

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, message, is_read, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn notify(
        &self,
        conn: &mut PgConnection,
        user_id: i64,
        message: &str,
    ) -> Result<Notification> {
        let row = sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (user_id, message)
            VALUES ($1, $2)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(message)
        .fetch_one(conn)
        .await?;
        Ok(row)
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM notifications
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn mark_read(&self, user_id: i64, notification_id: i64) -> Result<Notification> {
        sqlx::query_as::<_, Notification>(&format!(
            r#"
            UPDATE notifications
            SET is_read = TRUE, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(notification_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Notification not found.".to_string()))
    }
}
