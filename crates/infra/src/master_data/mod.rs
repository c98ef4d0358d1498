//! Master-data collection adapters.

pub mod in_memory;

pub use in_memory::{InMemoryCollection, InMemoryMasterData};
