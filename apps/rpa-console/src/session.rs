//! Signed-in session held in local storage.

use chrono::{DateTime, Utc};
use rpa_config::{keys, ConfigError, LocalStore};
use rpa_identity::{Credential, IdentityProvider, PhoneNumber};
use tracing::{info, warn};

const FALLBACK_DISPLAY_NAME: &str = "User";

/// The signed-in operator, as restored from local storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub phone_number: String,
    pub full_name: Option<String>,
    pub uid: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Restore the session, or `None` when nobody is signed in.
    pub fn restore(local: &dyn LocalStore) -> Option<Session> {
        let phone_number = local.get(keys::PHONE_NUMBER)?;
        if phone_number.trim().is_empty() {
            return None;
        }
        Some(Session {
            phone_number,
            full_name: local.get(keys::FULL_NAME).filter(|n| !n.trim().is_empty()),
            uid: local.get(keys::UID),
            verified_at: local
                .get(keys::VERIFIED_AT)
                .and_then(|t| DateTime::parse_from_rfc3339(&t).ok())
                .map(|t| t.with_timezone(&Utc)),
        })
    }

    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(FALLBACK_DISPLAY_NAME)
    }

    fn credential(&self) -> Option<Credential> {
        Some(Credential {
            uid: self.uid.clone()?,
            phone_number: PhoneNumber::parse(&self.phone_number).ok()?,
        })
    }
}

/// Persist a freshly verified credential.
pub(crate) fn store_credential(
    local: &dyn LocalStore,
    credential: &Credential,
    verified_at: DateTime<Utc>,
) -> Result<(), ConfigError> {
    local.set(keys::PHONE_NUMBER, credential.phone_number.as_str())?;
    local.set(keys::UID, &credential.uid)?;
    local.set(keys::VERIFIED_AT, &verified_at.to_rfc3339())?;
    Ok(())
}

/// Sign out of the identity provider, then clear local storage.
///
/// A provider failure is logged; local storage is cleared regardless.
pub async fn sign_out(
    identity: &dyn IdentityProvider,
    local: &dyn LocalStore,
) -> Result<(), ConfigError> {
    match Session::restore(local).and_then(|s| s.credential()) {
        Some(credential) => match identity.sign_out(&credential).await {
            Ok(()) => info!(uid = %credential.uid, "Signed out"),
            Err(e) => warn!(uid = %credential.uid, error = %e, "Identity provider sign-out failed"),
        },
        None => info!("No provider session to sign out"),
    }
    local.clear()
}
