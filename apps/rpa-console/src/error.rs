//! Console error types.
//!
//! `Display` of every variant a user can trigger is the exact text shown to them.

use rpa_blob::BlobError;
use rpa_config::ConfigError;
use rpa_identity::IdentityError;
use rpa_storage::StoreError;
use thiserror::Error;

use crate::validation::FieldErrors;

/// Login failures, one variant per user-facing message.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Access denied. User not registered in the system.")]
    NotRegistered,
    #[error("Invalid phone number format")]
    InvalidPhoneNumber,
    #[error("Too many attempts. Please try again later.")]
    TooManyRequests,
    /// Registry lookup or dispatch failed for any other reason.
    #[error("Error sending OTP. Please try again.")]
    SendFailed(String),
    #[error("Invalid OTP. Please try again.")]
    InvalidCode,
    #[error("No verification code has been requested")]
    NoChallenge,
    #[error("Already signed in")]
    AlreadySignedIn,
    #[error("Failed to save session: {0}")]
    Session(#[from] ConfigError),
}

impl LoginError {
    /// Classify a dispatch failure from the identity provider.
    pub(crate) fn from_dispatch(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidPhoneNumber => LoginError::InvalidPhoneNumber,
            IdentityError::TooManyRequests => LoginError::TooManyRequests,
            other => LoginError::SendFailed(other.to_string()),
        }
    }
}

/// Attachment editing failures.
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Attachments can only be changed while editing")]
    NotEditing,
    #[error("No attachment at position {0}")]
    NoSuchAttachment(usize),
    #[error("Upload of {file_name} failed: {source}")]
    Upload {
        file_name: String,
        #[source]
        source: BlobError,
    },
    #[error(transparent)]
    Blob(#[from] BlobError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Record service failures.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Please fix the errors before submitting")]
    Validation(FieldErrors),
    #[error("Please upload at least one image")]
    MissingImages,
    #[error("At most {max} images can be attached")]
    TooManyImages { max: usize },
    #[error("Phone number is not available.")]
    NoPhoneNumber,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Blob(#[from] BlobError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failures opening the console's backends.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Failed to open document store: {0}")]
    Store(#[from] StoreError),
    #[error("Failed to open blob store: {0}")]
    Blob(#[from] BlobError),
    #[error("Failed to open identity provider: {0}")]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_classification() {
        assert!(matches!(
            LoginError::from_dispatch(IdentityError::InvalidPhoneNumber),
            LoginError::InvalidPhoneNumber
        ));
        assert!(matches!(
            LoginError::from_dispatch(IdentityError::TooManyRequests),
            LoginError::TooManyRequests
        ));
        let err = LoginError::from_dispatch(IdentityError::Provider("quota".into()));
        assert_eq!(err.to_string(), "Error sending OTP. Please try again.");
    }

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            LoginError::NotRegistered.to_string(),
            "Access denied. User not registered in the system."
        );
        assert_eq!(
            RecordError::Validation(FieldErrors::new()).to_string(),
            "Please fix the errors before submitting"
        );
        assert_eq!(
            RecordError::NoPhoneNumber.to_string(),
            "Phone number is not available."
        );
    }
}
