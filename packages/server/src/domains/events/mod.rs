pub mod models;

pub use models::event::{Event, EventFilter, EventSort, NewEvent, UpdateEvent};
