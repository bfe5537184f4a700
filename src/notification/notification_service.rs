use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use super::notification_models::Notification;
use crate::{
    error::{AppError, Result},
    user::{user_models::User, user_repository::UserRepository},
};

/// Inbox operations. Each one is a single in-place update of the owner's
/// notification columns; role flags are never written here.
#[derive(Clone)]
pub struct NotificationService {
    user_repository: Arc<dyn UserRepository>,
}

impl NotificationService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn push(&self, user_id: Uuid, notification: Notification) -> Result<User> {
        self.user_repository
            .push_notification(user_id, &notification)
            .await?
            .ok_or_else(user_missing)
    }

    /// Like `push`, but a failure is logged instead of returned. Used after the
    /// primary write of a request has already been committed.
    pub async fn deliver(&self, user_id: Uuid, notification: Notification) {
        if let Err(e) = self.push(user_id, notification).await {
            warn!("Failed to deliver notification to user {}: {}", user_id, e);
        }
    }

    pub async fn mark_all_seen(&self, user_id: Uuid) -> Result<User> {
        self.user_repository
            .mark_all_seen(user_id)
            .await?
            .ok_or_else(user_missing)
    }

    pub async fn clear_all(&self, user_id: Uuid) -> Result<User> {
        self.user_repository
            .clear_notifications(user_id)
            .await?
            .ok_or_else(user_missing)
    }
}

fn user_missing() -> AppError {
    AppError::NotFound("User does not exist".to_string())
}
