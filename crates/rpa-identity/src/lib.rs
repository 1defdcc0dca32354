//! Identity provider abstraction for phone-number sign-in.
//!
//! Sign-in is a two-step one-time-passcode exchange:
//! 1. `send_code` dispatches a passcode to a phone number through an
//!    anti-abuse verifier and returns a [`ChallengeHandle`].
//! 2. `confirm_code` redeems the passcode against that challenge and returns
//!    the signed-in [`Credential`] plus whether it was seen for the first time.

mod phone;

pub use phone::PhoneNumber;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity provider errors, classified the way callers need to react to them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("invalid phone number")]
    InvalidPhoneNumber,
    #[error("too many requests")]
    TooManyRequests,
    #[error("invalid verification code")]
    InvalidCode,
    #[error("verification challenge expired")]
    ChallengeExpired,
    #[error("provider error: {0}")]
    Provider(String),
}

/// Human-verification widget instance (an invisible captcha or equivalent).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifierHandle {
    pub id: String,
}

/// Outstanding passcode challenge for one phone number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChallengeHandle {
    pub id: String,
    pub phone_number: PhoneNumber,
}

/// A verified phone-number identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub uid: String,
    pub phone_number: PhoneNumber,
}

/// Outcome of a successful passcode confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignInResult {
    pub credential: Credential,
    /// True when the provider has never seen this credential before.
    pub is_new_user: bool,
}

/// Phone OTP identity provider.
#[cfg_attr(feature = "test-support", mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a human-verification widget. Callers reuse it across attempts.
    async fn create_verifier(&self) -> Result<VerifierHandle, IdentityError>;

    /// Dispatch a passcode to `phone_number`.
    async fn send_code(
        &self,
        phone_number: &PhoneNumber,
        verifier: &VerifierHandle,
    ) -> Result<ChallengeHandle, IdentityError>;

    /// Redeem a passcode against an outstanding challenge.
    async fn confirm_code(
        &self,
        challenge: &ChallengeHandle,
        code: &str,
    ) -> Result<SignInResult, IdentityError>;

    /// End the provider-side session for `credential`.
    async fn sign_out(&self, credential: &Credential) -> Result<(), IdentityError>;
}
