//! Read-side indices built once per generation.
//!
//! Each index is constructed from the immutable input snapshot before
//! any slot is visited. The history index additionally absorbs the
//! assignments the builder commits during the run, so later slots see
//! earlier decisions.

mod availability;
mod history;
mod siblings;

pub use availability::{AvailabilityIndex, IneligibleReason};
pub use history::HistoryIndex;
pub use siblings::{PairingIntent, SiblingIndex};
