//! Strongly-typed identifiers (avoid mixing strings arbitrarily).

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque document identifier, generated by the store or chosen by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    /// Generate a fresh 32-character id.
    pub fn generate() -> Self {
        DocumentId(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        DocumentId(s.to_string())
    }
}

/// Collections the console reads and writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Collection {
    #[serde(rename = "users")]
    Users,
    #[serde(rename = "team")]
    Team,
    #[serde(rename = "activities")]
    Activities,
    #[serde(rename = "articles")]
    Articles,
    #[serde(rename = "events")]
    Events,
    #[serde(rename = "servicerequests")]
    ServiceRequests,
    #[serde(rename = "membershiprequests")]
    MembershipRequests,
    #[serde(rename = "attachment_commits")]
    AttachmentCommits,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Collection::Users,
        Collection::Team,
        Collection::Activities,
        Collection::Articles,
        Collection::Events,
        Collection::ServiceRequests,
        Collection::MembershipRequests,
        Collection::AttachmentCommits,
    ];

    /// Collection name as stored remotely.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Team => "team",
            Collection::Activities => "activities",
            Collection::Articles => "articles",
            Collection::Events => "events",
            Collection::ServiceRequests => "servicerequests",
            Collection::MembershipRequests => "membershiprequests",
            Collection::AttachmentCommits => "attachment_commits",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
