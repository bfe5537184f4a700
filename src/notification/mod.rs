pub mod notification_handlers;
pub mod notification_models;
pub mod notification_service;
