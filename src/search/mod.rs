//! Search state: mode and filter selections, request building, and the
//! submit/complete state machine.

pub mod controller;
mod filters;
mod mode;

pub use controller::{SearchController, Ticket};
pub use filters::{Filters, SortOrder};
pub use mode::SearchMode;
