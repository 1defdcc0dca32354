//! Admin console for the RPA membership organisation.
//!
//! - [`login`]: phone OTP sign-in gated by the user registry.
//! - [`attachments`]: staged image attachment editing with a commit journal.
//! - [`records`]: CRUD services for every managed collection.
//! - [`session`]: the signed-in operator, restored from local storage.

pub mod attachments;
pub mod console;
pub mod error;
pub mod format;
pub mod login;
pub mod notify;
pub mod records;
pub mod session;
pub mod validation;

mod uploads;

#[cfg(test)]
mod tests;

pub use console::Console;
