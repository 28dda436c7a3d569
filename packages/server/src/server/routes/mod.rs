// HTTP routes
pub mod events;
pub mod health;
pub mod tickets;

pub use events::*;
pub use health::*;
pub use tickets::*;
