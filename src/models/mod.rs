pub mod movie;
pub mod pagination;
pub mod user;
