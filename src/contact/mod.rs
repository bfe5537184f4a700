pub mod contact_dto;
pub mod contact_handlers;
pub mod mailer;
