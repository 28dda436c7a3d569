// Auth domain: JWT verification only. Login/registration is handled by the
// campus identity provider; this server just verifies its tokens.

pub mod jwt;

pub use jwt::{Claims, JwtService};
