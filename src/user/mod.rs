pub mod user_handlers;
pub mod user_models;
pub mod user_repository;
pub mod user_service;
