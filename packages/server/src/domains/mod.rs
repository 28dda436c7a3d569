// Domain modules (one directory per domain)

pub mod auth;
pub mod events;
pub mod tickets;
pub mod users;
