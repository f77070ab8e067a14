pub mod auth;
pub mod catalog;
pub mod config;
pub mod database_validator;
pub mod submission;
