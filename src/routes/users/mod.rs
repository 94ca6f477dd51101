pub mod user_handlers;
pub mod user_models;
