//! Phone OTP login, gated by the user registry.

use std::sync::Arc;

use chrono::Utc;
use rpa_config::{keys, LocalStore};
use rpa_identity::{ChallengeHandle, IdentityProvider, PhoneNumber, VerifierHandle};
use rpa_storage::DocumentStore;
use tracing::{info, warn};

use crate::error::LoginError;
use crate::notify::Notifier;
use crate::records::registry::lookup_by_phone;
use crate::session::store_credential;

/// Where a verified operator goes next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    /// First sign-in for this credential
    ProfileCompletion,
    Dashboard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginState {
    /// Awaiting a phone number
    Idle,
    /// Registry lookup in flight
    Checking,
    /// Phone number not registered; cleared by editing the phone number
    Blocked,
    /// Code dispatched, awaiting entry
    ChallengeSent,
    Verifying,
    Authenticated(Destination),
}

/// Drives one login attempt from phone entry to a verified session.
///
/// Owns the human-verification widget (created on first dispatch, reused
/// afterwards) and the outstanding challenge.
pub struct LoginSequencer {
    documents: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    local: Arc<dyn LocalStore>,
    notifier: Arc<dyn Notifier>,
    country_code: String,
    state: LoginState,
    error: Option<String>,
    verifier: Option<VerifierHandle>,
    challenge: Option<ChallengeHandle>,
}

impl LoginSequencer {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        local: Arc<dyn LocalStore>,
        notifier: Arc<dyn Notifier>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            documents,
            identity,
            local,
            notifier,
            country_code: country_code.into(),
            state: LoginState::Idle,
            error: None,
            verifier: None,
            challenge: None,
        }
    }

    pub fn state(&self) -> LoginState {
        self.state
    }

    /// Message for the last failed step, cleared when a new step starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_verifier(&self) -> bool {
        self.verifier.is_some()
    }

    /// The operator changed the phone number; lifts a registry block.
    pub fn edit_phone(&mut self) {
        if matches!(self.state, LoginState::Blocked) {
            self.state = LoginState::Idle;
            self.error = None;
        }
    }

    /// Check the registry and dispatch a code to `phone_input`.
    pub async fn request_challenge(&mut self, phone_input: &str) -> Result<(), LoginError> {
        match self.state {
            LoginState::Authenticated(_) => return Err(LoginError::AlreadySignedIn),
            LoginState::Blocked => return Err(LoginError::NotRegistered),
            _ => {}
        }
        self.error = None;

        let phone = match PhoneNumber::from_input(phone_input, &self.country_code) {
            Ok(phone) => phone,
            Err(_) => return self.fail_request(LoginState::Idle, LoginError::InvalidPhoneNumber),
        };

        self.state = LoginState::Checking;
        match lookup_by_phone(self.documents.as_ref(), phone.as_str()).await {
            Ok(Some(user)) => {
                if let Some(name) = user.record.full_name.as_deref() {
                    if let Err(e) = self.local.set(keys::FULL_NAME, name) {
                        warn!(error = %e, "Failed to cache display name");
                    }
                }
            }
            Ok(None) => {
                info!(phone = %phone, "Sign-in refused: not registered");
                return self.fail_request(LoginState::Blocked, LoginError::NotRegistered);
            }
            Err(e) => {
                warn!(phone = %phone, error = %e, "Registry lookup failed");
                return self.fail_request(LoginState::Idle, LoginError::SendFailed(e.to_string()));
            }
        }

        let verifier = match &self.verifier {
            Some(v) => v.clone(),
            None => match self.identity.create_verifier().await {
                Ok(v) => {
                    self.verifier = Some(v.clone());
                    v
                }
                Err(e) => {
                    warn!(error = %e, "Failed to create verifier");
                    return self.fail_request(LoginState::Idle, LoginError::from_dispatch(e));
                }
            },
        };

        match self.identity.send_code(&phone, &verifier).await {
            Ok(challenge) => {
                info!(phone = %phone, challenge = %challenge.id, "Verification code sent");
                self.challenge = Some(challenge);
                self.state = LoginState::ChallengeSent;
                self.notifier.success("OTP sent successfully!");
                Ok(())
            }
            Err(e) => {
                warn!(phone = %phone, error = %e, "Failed to send verification code");
                self.fail_request(LoginState::Idle, LoginError::from_dispatch(e))
            }
        }
    }

    /// Redeem `code` against the outstanding challenge.
    pub async fn verify_challenge(&mut self, code: &str) -> Result<Destination, LoginError> {
        if let LoginState::Authenticated(_) = self.state {
            return Err(LoginError::AlreadySignedIn);
        }
        let Some(challenge) = self.challenge.clone() else {
            return Err(LoginError::NoChallenge);
        };
        self.error = None;
        self.state = LoginState::Verifying;

        let result = match self.identity.confirm_code(&challenge, code.trim()).await {
            Ok(result) => result,
            Err(e) => {
                warn!(challenge = %challenge.id, error = %e, "Code verification failed");
                self.state = LoginState::ChallengeSent;
                self.error = Some(LoginError::InvalidCode.to_string());
                self.notifier.error("Invalid OTP");
                return Err(LoginError::InvalidCode);
            }
        };

        if let Err(e) = store_credential(self.local.as_ref(), &result.credential, Utc::now()) {
            self.state = LoginState::ChallengeSent;
            let err = LoginError::from(e);
            self.error = Some(err.to_string());
            return Err(err);
        }

        let destination = if result.is_new_user {
            self.notifier.error("Please create a profile");
            Destination::ProfileCompletion
        } else {
            Destination::Dashboard
        };
        info!(
            uid = %result.credential.uid,
            new_user = result.is_new_user,
            "Signed in"
        );
        self.challenge = None;
        self.state = LoginState::Authenticated(destination);
        Ok(destination)
    }

    fn fail_request(&mut self, state: LoginState, err: LoginError) -> Result<(), LoginError> {
        self.state = state;
        self.error = Some(err.to_string());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{ToastKind, ToastLog};
    use rpa_backend_memory::{MemoryIdentityProvider, MemoryStore};
    use rpa_config::MemoryLocalStore;
    use rpa_storage::{insert_record, RegisteredUser};

    struct Fixture {
        identity: Arc<MemoryIdentityProvider>,
        local: Arc<MemoryLocalStore>,
        toasts: Arc<ToastLog>,
        login: LoginSequencer,
    }

    async fn fixture(registered: &[(&str, Option<&str>)]) -> Fixture {
        let documents = Arc::new(MemoryStore::new());
        for (phone, name) in registered {
            let user = RegisteredUser {
                phone_number: phone.to_string(),
                full_name: name.map(str::to_string),
                created_at: None,
            };
            insert_record(documents.as_ref(), &user).await.unwrap();
        }
        let identity = Arc::new(MemoryIdentityProvider::new());
        let local = Arc::new(MemoryLocalStore::new());
        let toasts = Arc::new(ToastLog::new());
        let login = LoginSequencer::new(
            documents,
            identity.clone(),
            local.clone(),
            toasts.clone(),
            "91",
        );
        Fixture {
            identity,
            local,
            toasts,
            login,
        }
    }

    #[tokio::test]
    async fn test_registered_phone_gets_a_challenge() {
        let mut f = fixture(&[("+911234567890", Some("Asha"))]).await;
        f.login.request_challenge("1234567890").await.unwrap();

        assert_eq!(f.login.state(), LoginState::ChallengeSent);
        assert!(f.login.has_verifier());
        assert_eq!(f.local.get(keys::FULL_NAME).as_deref(), Some("Asha"));
        assert!(f
            .toasts
            .contains(ToastKind::Success, "OTP sent successfully!"));
    }

    #[tokio::test]
    async fn test_unregistered_phone_blocks_until_edited() {
        let mut f = fixture(&[("+911234567890", None)]).await;
        let err = f.login.request_challenge("+919999999999").await.unwrap_err();
        assert!(matches!(err, LoginError::NotRegistered));
        assert_eq!(f.login.state(), LoginState::Blocked);
        assert_eq!(
            f.login.error(),
            Some("Access denied. User not registered in the system.")
        );
        let phone = PhoneNumber::parse("+919999999999").unwrap();
        assert_eq!(f.identity.last_code_for(&phone), None);

        // Still blocked without an edit
        let err = f.login.request_challenge("1234567890").await.unwrap_err();
        assert!(matches!(err, LoginError::NotRegistered));

        f.login.edit_phone();
        assert_eq!(f.login.state(), LoginState::Idle);
        assert_eq!(f.login.error(), None);
        f.login.request_challenge("1234567890").await.unwrap();
        assert_eq!(f.login.state(), LoginState::ChallengeSent);
    }

    #[tokio::test]
    async fn test_malformed_phone_stays_idle() {
        let mut f = fixture(&[]).await;
        let err = f.login.request_challenge("12ab").await.unwrap_err();
        assert!(matches!(err, LoginError::InvalidPhoneNumber));
        assert_eq!(f.login.state(), LoginState::Idle);
        assert_eq!(f.login.error(), Some("Invalid phone number format"));
    }

    #[tokio::test]
    async fn test_wrong_code_then_right_code() {
        let mut f = fixture(&[("+911234567890", None)]).await;
        f.login.request_challenge("1234567890").await.unwrap();
        let phone = PhoneNumber::parse("+911234567890").unwrap();
        let code = f.identity.last_code_for(&phone).unwrap();
        let wrong = if code == "000000" { "111111" } else { "000000" };

        let err = f.login.verify_challenge(wrong).await.unwrap_err();
        assert!(matches!(err, LoginError::InvalidCode));
        assert_eq!(f.login.state(), LoginState::ChallengeSent);
        assert_eq!(f.login.error(), Some("Invalid OTP. Please try again."));
        assert!(f.toasts.contains(ToastKind::Error, "Invalid OTP"));

        let destination = f.login.verify_challenge(&code).await.unwrap();
        assert_eq!(destination, Destination::ProfileCompletion);
        assert_eq!(
            f.login.state(),
            LoginState::Authenticated(Destination::ProfileCompletion)
        );
        assert!(f
            .toasts
            .contains(ToastKind::Error, "Please create a profile"));
        assert_eq!(f.local.get(keys::PHONE_NUMBER).as_deref(), Some("+911234567890"));
        assert!(f.local.get(keys::VERIFIED_AT).is_some());
        assert!(f.local.get(keys::UID).is_some());

        assert!(matches!(
            f.login.request_challenge("1234567890").await,
            Err(LoginError::AlreadySignedIn)
        ));
    }

    #[tokio::test]
    async fn test_verify_without_challenge() {
        let mut f = fixture(&[]).await;
        assert!(matches!(
            f.login.verify_challenge("123456").await,
            Err(LoginError::NoChallenge)
        ));
    }
}
