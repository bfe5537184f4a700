pub mod admin_dto;
pub mod admin_handlers;
pub mod admin_middleware;
pub mod admin_service;
