pub mod models;

pub use models::user::{User, UserRole};
