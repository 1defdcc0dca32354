//! Service and membership request types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Collection;
use crate::Record;

/// Lifecycle of a service request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    Submitted,
    Contacted,
    Resolved,
}

/// Lifecycle of a membership request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipStatus {
    Pending,
    Approved,
    Rejected,
}

/// Service request raised on behalf of a member of the public.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub full_name: String,
    pub type_of_service: String,
    #[serde(default)]
    pub more_details: Option<String>,
    pub contact_number: String,
    pub status: ServiceStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for ServiceRequest {
    const COLLECTION: Collection = Collection::ServiceRequests;
}

/// Membership application.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRequest {
    pub full_name: String,
    pub contact_number: String,
    pub location: String,
    pub membership_type: String,
    pub status: MembershipStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for MembershipRequest {
    const COLLECTION: Collection = Collection::MembershipRequests;
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceStatus::Submitted => "Submitted",
            ServiceStatus::Contacted => "Contacted",
            ServiceStatus::Resolved => "Resolved",
        };
        f.write_str(s)
    }
}

impl FromStr for ServiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "submitted" => Ok(ServiceStatus::Submitted),
            "contacted" => Ok(ServiceStatus::Contacted),
            "resolved" => Ok(ServiceStatus::Resolved),
            other => Err(format!("unknown service status: {}", other)),
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MembershipStatus::Pending => "Pending",
            MembershipStatus::Approved => "Approved",
            MembershipStatus::Rejected => "Rejected",
        };
        f.write_str(s)
    }
}

impl FromStr for MembershipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(MembershipStatus::Pending),
            "approved" => Ok(MembershipStatus::Approved),
            "rejected" => Ok(MembershipStatus::Rejected),
            other => Err(format!("unknown membership status: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ServiceStatus::Submitted).unwrap(),
            "\"Submitted\""
        );
        assert_eq!(
            serde_json::to_string(&MembershipStatus::Pending).unwrap(),
            "\"Pending\""
        );
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(
            "contacted".parse::<ServiceStatus>().unwrap(),
            ServiceStatus::Contacted
        );
        assert_eq!(
            "APPROVED".parse::<MembershipStatus>().unwrap(),
            MembershipStatus::Approved
        );
        assert!("closed".parse::<ServiceStatus>().is_err());
    }

    #[test]
    fn test_service_request_without_details_deserializes() {
        let json = r#"{
            "fullName": "Ravi",
            "typeOfService": "Legal aid",
            "contactNumber": "+91 98765 43210",
            "status": "Submitted",
            "createdAt": "2024-02-01T10:00:00Z"
        }"#;
        let req: ServiceRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.more_details, None);
        assert_eq!(req.status, ServiceStatus::Submitted);
    }
}
