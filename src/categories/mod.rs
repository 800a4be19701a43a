pub mod bridge;
mod dto;
pub mod guard;
pub mod handlers;
pub mod repo;
pub mod repo_types;

pub use handlers::category_routes as router;
