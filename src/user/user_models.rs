use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::notification::notification_models::Notification;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_doctor: bool,
    pub is_admin: bool,
    #[sqlx(json)]
    pub unseen_notifications: Vec<Notification>,
    #[sqlx(json)]
    pub seen_notifications: Vec<Notification>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: &str, email: &str, password_hash: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            is_doctor: false,
            is_admin: false,
            unseen_notifications: Vec::new(),
            seen_notifications: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn push_notification(&mut self, notification: Notification) {
        self.unseen_notifications.push(notification);
    }

    /// Moves every unseen entry to the end of the seen list, keeping order.
    pub fn mark_all_seen(&mut self) {
        let unseen = std::mem::take(&mut self.unseen_notifications);
        self.seen_notifications.extend(unseen);
    }

    pub fn clear_notifications(&mut self) {
        self.unseen_notifications.clear();
        self.seen_notifications.clear();
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_doctor: bool,
    pub is_admin: bool,
    pub unseen_notifications: Vec<Notification>,
    pub seen_notifications: Vec<Notification>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            is_doctor: user.is_doctor,
            is_admin: user.is_admin,
            unseen_notifications: user.unseen_notifications,
            seen_notifications: user.seen_notifications,
            created_at: user.created_at,
        }
    }
}
