//! Type definitions for console storage.

mod activities;
mod articles;
mod commits;
mod events;
mod ids;
mod requests;
mod team;
mod users;

// Re-export all types from submodules
pub use activities::*;
pub use articles::*;
pub use commits::*;
pub use events::*;
pub use ids::*;
pub use requests::*;
pub use team::*;
pub use users::*;
