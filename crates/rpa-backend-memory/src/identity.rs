//! Development identity provider.
//!
//! Codes are "dispatched" by logging them at info level, so an operator running
//! the console locally reads the code from the log instead of an SMS.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rpa_identity::{
    ChallengeHandle, Credential, IdentityError, IdentityProvider, PhoneNumber, SignInResult,
    VerifierHandle,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::code::generate_verification_code;
use crate::snapshot;

/// Maximum verification attempts per code
const MAX_ATTEMPTS: u32 = 5;

/// Maximum codes sent to one number inside [`SEND_WINDOW_MINUTES`]
const MAX_SENDS_PER_WINDOW: usize = 5;
const SEND_WINDOW_MINUTES: i64 = 10;

const DEFAULT_CODE_TTL_MINUTES: i64 = 5;

/// Verifiers unused for this long are forgotten
const VERIFIER_IDLE_MINUTES: i64 = 60;

struct Challenge {
    phone_number: PhoneNumber,
    code: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    attempts: u32,
}

#[derive(Default, Serialize, Deserialize)]
struct IdentitySnapshot {
    /// phone number -> uid
    accounts: BTreeMap<String, String>,
}

/// In-process phone OTP provider.
pub struct MemoryIdentityProvider {
    accounts: DashMap<String, String>,
    verifiers: DashMap<String, DateTime<Utc>>,
    challenges: DashMap<String, Challenge>,
    sends: DashMap<String, Vec<DateTime<Utc>>>,
    sessions: DashMap<String, PhoneNumber>,
    code_ttl: Duration,
    snapshot: Option<PathBuf>,
    persist_lock: tokio::sync::Mutex<()>,
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            verifiers: DashMap::new(),
            challenges: DashMap::new(),
            sends: DashMap::new(),
            sessions: DashMap::new(),
            code_ttl: Duration::minutes(DEFAULT_CODE_TTL_MINUTES),
            snapshot: None,
            persist_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Load known accounts from `path` and persist new ones back to it.
    pub fn open_snapshot<P: AsRef<Path>>(path: P) -> Result<Self, IdentityError> {
        let path = path.as_ref().to_path_buf();
        let state: IdentitySnapshot = snapshot::load(&path).map_err(IdentityError::Provider)?;
        let provider = Self::new();
        for (phone, uid) in state.accounts {
            provider.accounts.insert(phone, uid);
        }
        Ok(Self {
            snapshot: Some(path),
            ..provider
        })
    }

    pub fn with_code_ttl(mut self, ttl: Duration) -> Self {
        self.code_ttl = ttl;
        self
    }

    /// Most recently issued, still outstanding code for `phone_number`.
    pub fn last_code_for(&self, phone_number: &PhoneNumber) -> Option<String> {
        self.challenges
            .iter()
            .filter(|c| &c.phone_number == phone_number)
            .max_by_key(|c| c.issued_at)
            .map(|c| c.code.clone())
    }

    /// True while `uid` holds a provider-side session.
    pub fn is_signed_in(&self, uid: &str) -> bool {
        self.sessions.contains_key(uid)
    }

    /// Drop expired challenges and send windows that have fully elapsed.
    fn prune_challenges(&self, now: DateTime<Utc>) {
        let window_start = now - Duration::minutes(SEND_WINDOW_MINUTES);
        self.challenges.retain(|_, c| c.expires_at >= now);
        self.sends
            .retain(|_, times| times.iter().any(|t| *t > window_start));
    }

    fn prune_verifiers(&self, now: DateTime<Utc>) {
        let idle_since = now - Duration::minutes(VERIFIER_IDLE_MINUTES);
        self.verifiers.retain(|_, last_used| *last_used > idle_since);
    }

    fn check_send_rate(&self, phone_number: &PhoneNumber, now: DateTime<Utc>) -> bool {
        let window_start = now - Duration::minutes(SEND_WINDOW_MINUTES);
        let mut sends = self
            .sends
            .entry(phone_number.as_str().to_string())
            .or_default();
        sends.retain(|t| *t > window_start);
        if sends.len() >= MAX_SENDS_PER_WINDOW {
            return false;
        }
        sends.push(now);
        true
    }

    /// Returns the account uid and whether it was created just now.
    fn account_for(&self, phone_number: &PhoneNumber) -> (String, bool) {
        let mut created = false;
        let uid = self
            .accounts
            .entry(phone_number.as_str().to_string())
            .or_insert_with(|| {
                created = true;
                Uuid::new_v4().simple().to_string()
            })
            .clone();
        (uid, created)
    }

    async fn persist(&self) -> Result<(), IdentityError> {
        let Some(path) = &self.snapshot else {
            return Ok(());
        };
        let _guard = self.persist_lock.lock().await;
        let state = IdentitySnapshot {
            accounts: self
                .accounts
                .iter()
                .map(|e| (e.key().clone(), e.value().clone()))
                .collect(),
        };
        snapshot::save(path, &state)
            .await
            .map_err(IdentityError::Provider)
    }
}

impl Default for MemoryIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn create_verifier(&self) -> Result<VerifierHandle, IdentityError> {
        let now = Utc::now();
        self.prune_verifiers(now);
        let id = Uuid::new_v4().simple().to_string();
        self.verifiers.insert(id.clone(), now);
        debug!(verifier_id = %id, "Created verifier");
        Ok(VerifierHandle { id })
    }

    async fn send_code(
        &self,
        phone_number: &PhoneNumber,
        verifier: &VerifierHandle,
    ) -> Result<ChallengeHandle, IdentityError> {
        let now = Utc::now();
        match self.verifiers.get_mut(&verifier.id) {
            Some(mut last_used) => *last_used = now,
            None => {
                return Err(IdentityError::Provider(format!(
                    "unknown verifier: {}",
                    verifier.id
                )))
            }
        }

        self.prune_challenges(now);
        if !self.check_send_rate(phone_number, now) {
            warn!(phone = %phone_number, "Verification code rate limit reached");
            return Err(IdentityError::TooManyRequests);
        }

        let code = generate_verification_code();
        let id = Uuid::new_v4().simple().to_string();
        info!(
            phone = %phone_number,
            code = %code,
            "Verification code dispatched"
        );
        self.challenges.insert(
            id.clone(),
            Challenge {
                phone_number: phone_number.clone(),
                code,
                issued_at: now,
                expires_at: now + self.code_ttl,
                attempts: 0,
            },
        );

        Ok(ChallengeHandle {
            id,
            phone_number: phone_number.clone(),
        })
    }

    async fn confirm_code(
        &self,
        challenge: &ChallengeHandle,
        code: &str,
    ) -> Result<SignInResult, IdentityError> {
        {
            let mut pending = self
                .challenges
                .get_mut(&challenge.id)
                .ok_or(IdentityError::ChallengeExpired)?;

            if pending.expires_at < Utc::now() {
                drop(pending);
                self.challenges.remove(&challenge.id);
                return Err(IdentityError::ChallengeExpired);
            }

            // Verify the code using constant-time comparison
            let code_matches: bool =
                subtle::ConstantTimeEq::ct_eq(code.trim().as_bytes(), pending.code.as_bytes())
                    .into();
            if !code_matches {
                pending.attempts += 1;
                if pending.attempts >= MAX_ATTEMPTS {
                    drop(pending);
                    self.challenges.remove(&challenge.id);
                    return Err(IdentityError::TooManyRequests);
                }
                return Err(IdentityError::InvalidCode);
            }
        }

        let Some((_, pending)) = self.challenges.remove(&challenge.id) else {
            return Err(IdentityError::ChallengeExpired);
        };
        let (uid, is_new_user) = self.account_for(&pending.phone_number);
        if is_new_user {
            self.persist().await?;
        }
        self.sessions.insert(uid.clone(), pending.phone_number.clone());
        info!(phone = %pending.phone_number, uid = %uid, is_new_user, "Phone number verified");

        Ok(SignInResult {
            credential: Credential {
                uid,
                phone_number: pending.phone_number,
            },
            is_new_user,
        })
    }

    async fn sign_out(&self, credential: &Credential) -> Result<(), IdentityError> {
        self.sessions.remove(&credential.uid);
        debug!(uid = %credential.uid, "Signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> PhoneNumber {
        PhoneNumber::parse("+911234567890").unwrap()
    }

    async fn challenge_for(
        provider: &MemoryIdentityProvider,
        phone_number: &PhoneNumber,
    ) -> ChallengeHandle {
        let verifier = provider.create_verifier().await.unwrap();
        provider.send_code(phone_number, &verifier).await.unwrap()
    }

    #[tokio::test]
    async fn test_first_confirmation_is_new_user() {
        let provider = MemoryIdentityProvider::new();
        let challenge = challenge_for(&provider, &phone()).await;
        let code = provider.last_code_for(&phone()).unwrap();

        let result = provider.confirm_code(&challenge, &code).await.unwrap();
        assert!(result.is_new_user);
        assert_eq!(result.credential.phone_number, phone());
        assert!(provider.is_signed_in(&result.credential.uid));

        let challenge = challenge_for(&provider, &phone()).await;
        let code = provider.last_code_for(&phone()).unwrap();
        let again = provider.confirm_code(&challenge, &code).await.unwrap();
        assert!(!again.is_new_user);
        assert_eq!(again.credential.uid, result.credential.uid);
    }

    #[tokio::test]
    async fn test_wrong_code_then_lockout() {
        let provider = MemoryIdentityProvider::new();
        let challenge = challenge_for(&provider, &phone()).await;
        let code = provider.last_code_for(&phone()).unwrap();
        let wrong = if code == "000000" { "111111" } else { "000000" };

        for _ in 0..MAX_ATTEMPTS - 1 {
            let err = provider.confirm_code(&challenge, wrong).await.unwrap_err();
            assert_eq!(err, IdentityError::InvalidCode);
        }
        let err = provider.confirm_code(&challenge, wrong).await.unwrap_err();
        assert_eq!(err, IdentityError::TooManyRequests);

        // The challenge is gone, even the right code no longer works
        let err = provider.confirm_code(&challenge, &code).await.unwrap_err();
        assert_eq!(err, IdentityError::ChallengeExpired);
    }

    #[tokio::test]
    async fn test_expired_code() {
        let provider = MemoryIdentityProvider::new().with_code_ttl(Duration::seconds(-1));
        let challenge = challenge_for(&provider, &phone()).await;
        let code = provider.last_code_for(&phone()).unwrap();

        let err = provider.confirm_code(&challenge, &code).await.unwrap_err();
        assert_eq!(err, IdentityError::ChallengeExpired);
    }

    #[tokio::test]
    async fn test_send_rate_limit() {
        let provider = MemoryIdentityProvider::new();
        let verifier = provider.create_verifier().await.unwrap();
        for _ in 0..MAX_SENDS_PER_WINDOW {
            provider.send_code(&phone(), &verifier).await.unwrap();
        }
        let err = provider.send_code(&phone(), &verifier).await.unwrap_err();
        assert_eq!(err, IdentityError::TooManyRequests);

        // Other numbers are unaffected
        let other = PhoneNumber::parse("+919876543210").unwrap();
        provider.send_code(&other, &verifier).await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_challenges_are_pruned_on_send() {
        let provider = MemoryIdentityProvider::new().with_code_ttl(Duration::seconds(-1));
        let verifier = provider.create_verifier().await.unwrap();
        provider.send_code(&phone(), &verifier).await.unwrap();
        provider.send_code(&phone(), &verifier).await.unwrap();
        assert_eq!(provider.challenges.len(), 1);

        let provider = MemoryIdentityProvider::new();
        let verifier = provider.create_verifier().await.unwrap();
        let first = provider.send_code(&phone(), &verifier).await.unwrap();
        provider.send_code(&phone(), &verifier).await.unwrap();
        assert_eq!(provider.challenges.len(), 2);
        assert!(provider.challenges.contains_key(&first.id));
    }

    #[tokio::test]
    async fn test_idle_verifiers_are_pruned() {
        let provider = MemoryIdentityProvider::new();
        let stale = provider.create_verifier().await.unwrap();
        let active = provider.create_verifier().await.unwrap();
        let long_ago = Utc::now() - Duration::minutes(VERIFIER_IDLE_MINUTES + 1);
        provider.verifiers.insert(stale.id.clone(), long_ago);
        provider.verifiers.insert(active.id.clone(), long_ago);

        // Sending refreshes the verifier it goes through
        provider.send_code(&phone(), &active).await.unwrap();
        provider.create_verifier().await.unwrap();

        assert!(!provider.verifiers.contains_key(&stale.id));
        assert!(provider.verifiers.contains_key(&active.id));
        let err = provider.send_code(&phone(), &stale).await.unwrap_err();
        assert!(matches!(err, IdentityError::Provider(_)));
    }

    #[tokio::test]
    async fn test_unknown_verifier_is_provider_error() {
        let provider = MemoryIdentityProvider::new();
        let verifier = VerifierHandle {
            id: "never-created".to_string(),
        };
        let err = provider.send_code(&phone(), &verifier).await.unwrap_err();
        assert!(matches!(err, IdentityError::Provider(_)));
    }

    #[tokio::test]
    async fn test_sign_out_ends_session() {
        let provider = MemoryIdentityProvider::new();
        let challenge = challenge_for(&provider, &phone()).await;
        let code = provider.last_code_for(&phone()).unwrap();
        let result = provider.confirm_code(&challenge, &code).await.unwrap();

        provider.sign_out(&result.credential).await.unwrap();
        assert!(!provider.is_signed_in(&result.credential.uid));
    }

    #[tokio::test]
    async fn test_accounts_survive_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("identity.json");

        let uid = {
            let provider = MemoryIdentityProvider::open_snapshot(&path).unwrap();
            let challenge = challenge_for(&provider, &phone()).await;
            let code = provider.last_code_for(&phone()).unwrap();
            provider
                .confirm_code(&challenge, &code)
                .await
                .unwrap()
                .credential
                .uid
        };

        let provider = MemoryIdentityProvider::open_snapshot(&path).unwrap();
        let challenge = challenge_for(&provider, &phone()).await;
        let code = provider.last_code_for(&phone()).unwrap();
        let result = provider.confirm_code(&challenge, &code).await.unwrap();
        assert!(!result.is_new_user);
        assert_eq!(result.credential.uid, uid);
    }
}
