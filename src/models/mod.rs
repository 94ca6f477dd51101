pub mod category;
pub mod comment;
pub mod session;
pub mod task;
pub mod user;
