use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    user::{user_models::UserResponse, user_repository::UserRepository},
};

#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn get_current_user(&self, user_id: Uuid) -> Result<UserResponse> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

        Ok(user.into())
    }
}
