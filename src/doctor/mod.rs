pub mod doctor_dto;
pub mod doctor_handlers;
pub mod doctor_models;
pub mod doctor_repository;
pub mod doctor_service;
