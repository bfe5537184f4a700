use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::user_models::User;
use crate::{
    db::is_unique_violation,
    error::{AppError, Result},
    notification::notification_models::Notification,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new user. A taken email is a `Conflict`.
    async fn create(&self, name: &str, email: &str, password_hash: &str) -> Result<User>;

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_all(&self) -> Result<Vec<User>>;

    async fn find_admins(&self) -> Result<Vec<User>>;

    /// Appends to the unseen list in place. Returns `None` for an unknown user.
    async fn push_notification(
        &self,
        user_id: Uuid,
        notification: &Notification,
    ) -> Result<Option<User>>;

    /// Moves every unseen entry to the end of the seen list in one statement.
    async fn mark_all_seen(&self, user_id: Uuid) -> Result<Option<User>>;

    async fn clear_notifications(&self, user_id: Uuid) -> Result<Option<User>>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Sets the doctor role flag and notifies the owner inside the caller's transaction.
    /// Only `is_doctor` and the unseen list are touched.
    pub(crate) async fn set_doctor_role_with_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: Uuid,
        is_doctor: bool,
        notification: &Notification,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users
             SET is_doctor = $2,
                 unseen_notifications = unseen_notifications || $3::jsonb,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(user_id)
        .bind(is_doctor)
        .bind(Json([notification]))
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user)
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        let user = User::new(name, email, password_hash);

        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("User already exists".to_string())
            } else {
                AppError::Database(e)
            }
        })
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn find_admins(&self) -> Result<Vec<User>> {
        let users =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE is_admin ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;

        Ok(users)
    }

    async fn push_notification(
        &self,
        user_id: Uuid,
        notification: &Notification,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users
             SET unseen_notifications = unseen_notifications || $2::jsonb,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(user_id)
        .bind(Json([notification]))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn mark_all_seen(&self, user_id: Uuid) -> Result<Option<User>> {
        // Both right-hand sides read the row as it was before the update.
        let user = sqlx::query_as::<_, User>(
            "UPDATE users
             SET seen_notifications = seen_notifications || unseen_notifications,
                 unseen_notifications = '[]'::jsonb,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn clear_notifications(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users
             SET unseen_notifications = '[]'::jsonb,
                 seen_notifications = '[]'::jsonb,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
