//! Typed ID definitions for all domain entities.
//!
//! This module defines type aliases for each domain entity, providing
//! compile-time type safety for ID usage throughout the application.

// Re-export the core Id type and version marker
pub use super::id::{Id, V7};

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for User entities (students, organizers, admins).
pub struct User;

/// Marker type for Event entities.
pub struct Event;

/// Marker type for Ticket entities.
pub struct Ticket;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for User entities.
pub type UserId = Id<User>;

/// Typed ID for Event entities.
pub type EventId = Id<Event>;

/// Typed ID for Ticket entities.
pub type TicketId = Id<Ticket>;
