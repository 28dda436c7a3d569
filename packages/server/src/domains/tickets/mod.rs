// Tickets domain: issuance (the claim workflow), redemption, and queries.

pub mod code;
pub mod issuance;
pub mod models;
pub mod redemption;

pub use issuance::{claim_ticket, ClaimError};
pub use models::ticket::{AttendeeRow, IssueOutcome, Ticket, TicketWithEvent};
pub use redemption::{redeem_ticket, RedeemError};
