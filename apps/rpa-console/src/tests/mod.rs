//! Console scenario tests.
//!
//! Tests are organized into modules by feature area:
//! - `common` - Shared backends, fixtures and a failure-injecting blob store
//! - `login_flow` - Registry-gated OTP sign-in through to sign-out
//! - `attachment_flow` - Staging, committing and recovering image attachments
//! - `records` - Record services driven through the console

pub mod common;
