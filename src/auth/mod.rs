pub mod auth_dto;
pub mod auth_handlers;
pub mod auth_service;
pub mod jwt;
pub mod password;

pub use jwt::{create_session_token, verify_session_token};
pub use password::{hash_password, verify_password};
