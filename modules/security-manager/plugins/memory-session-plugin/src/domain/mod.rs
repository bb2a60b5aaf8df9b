//! Domain layer for the in-memory session store.

pub mod clock;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::MemorySessionStore;
