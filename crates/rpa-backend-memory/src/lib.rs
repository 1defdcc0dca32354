//! In-process backends for the console's three remote boundaries.
//!
//! Suitable for:
//! - Development and testing
//! - Single-operator local installs, when constructed with a snapshot
//!   location so state survives restarts
//!
//! Nothing here talks to the network.

mod blobs;
mod code;
mod documents;
mod identity;
mod snapshot;

pub use blobs::{DirBlobStore, MemoryBlobStore};
pub use code::generate_verification_code;
pub use documents::MemoryStore;
pub use identity::MemoryIdentityProvider;
