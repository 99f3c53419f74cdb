//! mockall doubles of the storage and notification seams, for exercising
//! failure paths that the in-memory store cannot produce.

pub mod repositories;

pub use repositories::{MockNotifier, MockStore};
