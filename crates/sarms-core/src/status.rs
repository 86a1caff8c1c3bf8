//! Request statuses and the roles that act on them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Workflow status of a request. Requests start as [`RequestStatus::New`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    New,
    UnderReview,
    RequestForDiscussion,
    Approved,
    Rejected,
    OnHold,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 6] = [
        Self::New,
        Self::UnderReview,
        Self::RequestForDiscussion,
        Self::Approved,
        Self::Rejected,
        Self::OnHold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::UnderReview => "under_review",
            Self::RequestForDiscussion => "request_for_discussion",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::OnHold => "on_hold",
        }
    }

    /// Display label used by the UI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::UnderReview => "Under Review",
            Self::RequestForDiscussion => "Request for Discussion",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::OnHold => "On Hold",
        }
    }

    /// Approved and rejected requests never change status again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Whether moving to this status needs a justification remark.
    pub fn requires_remark(&self) -> bool {
        matches!(self, Self::Rejected | Self::OnHold)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("unknown request status: {s}"))
    }
}

/// Role of the acting user. Only admins and project managers manage status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    ProjectManager,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::ProjectManager => "project_manager",
            Self::Customer => "customer",
        }
    }

    pub fn can_manage_status(&self) -> bool {
        matches!(self, Self::Admin | Self::ProjectManager)
    }

    /// Only admins assign project managers.
    pub fn can_assign(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "admin" => Ok(Self::Admin),
            "project_manager" | "pm" => Ok(Self::ProjectManager),
            "customer" => Ok(Self::Customer),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}
