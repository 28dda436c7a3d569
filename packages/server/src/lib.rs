// CampusEvents - API Core
//
// Backend API for campus event discovery and first-come-first-served
// ticketing. Students browse and claim tickets, organizers manage events
// and check in attendees, admins moderate.
//
// The correctness-critical piece is ticket issuance (domains/tickets):
// capacity and duplicate-claim invariants are enforced at the store level
// and hold under concurrent claims.

pub mod common;
pub mod config;
pub mod domains;
pub mod server;

pub use config::*;
