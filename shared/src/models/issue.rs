//! Issue Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    Reported,
    InProgress,
    Resolved,
    Closed,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reported => "REPORTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }
}

/// File attached to an issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: Option<i64>,
    pub file_url: String,
    pub file_name: String,
}

/// Issue reported against a single asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: i64,
    /// Back-reference to the affected pole, if any
    #[serde(default)]
    pub pole_code: Option<String>,
    /// Back-reference to the affected park, if any
    #[serde(default)]
    pub park_code: Option<String>,
    pub severity: IssueSeverity,
    pub status: IssueStatus,
    pub description: String,
    #[serde(default)]
    pub resolution_notes: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Issue {
    /// Code of the asset this issue belongs to
    pub fn asset_code(&self) -> Option<&str> {
        self.pole_code.as_deref().or(self.park_code.as_deref())
    }

    /// Edit and delete are only offered while the issue is still `REPORTED`
    pub fn is_editable(&self) -> bool {
        self.status == IssueStatus::Reported
    }

    /// Attachments of a closed issue are frozen
    pub fn can_delete_attachment(&self) -> bool {
        self.status != IssueStatus::Closed
    }
}
