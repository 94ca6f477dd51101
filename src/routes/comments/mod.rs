pub mod comment_handlers;
pub mod comment_models;
