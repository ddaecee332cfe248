//! Hash states for the crate's maps, re-exports *hashbrown*.

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use hasher::{NoOpHashState, NoOpHasher};

// -----------------------------------------------------------------------------
// Re-export crates

pub use hashbrown;
