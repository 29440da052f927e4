//! Maintenance Schedule Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::asset::AssetKind;
use super::serde_helpers::{option_date, pick_subcity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleStatus {
    Requested,
    Started,
    Paused,
    Completed,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Started => "STARTED",
            Self::Paused => "PAUSED",
            Self::Completed => "COMPLETED",
        }
    }

    /// Transitions into these states must carry a remark
    pub fn requires_remark(&self) -> bool {
        matches!(self, Self::Paused | Self::Completed)
    }
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScheduleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "REQUESTED" => Ok(Self::Requested),
            "STARTED" => Ok(Self::Started),
            "PAUSED" => Ok(Self::Paused),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(format!("unknown schedule status: {other}")),
        }
    }
}

/// Location summary of the asset a schedule points at, embedded by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawAssetSummary")]
pub struct AssetSummary {
    pub code: String,
    pub subcity: Option<String>,
    pub street: Option<String>,
}

#[derive(Deserialize)]
struct RawAssetSummary {
    code: String,
    #[serde(default)]
    subcity: Option<String>,
    #[serde(default)]
    district: Option<String>,
    #[serde(default)]
    street: Option<String>,
}

impl From<RawAssetSummary> for AssetSummary {
    fn from(raw: RawAssetSummary) -> Self {
        Self {
            code: raw.code,
            subcity: pick_subcity(raw.subcity, raw.district),
            street: raw.street,
        }
    }
}

/// Maintenance schedule entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceSchedule {
    pub id: i64,
    #[serde(default)]
    pub pole_code: Option<String>,
    #[serde(default)]
    pub park_code: Option<String>,
    /// Issue this schedule was raised for; `None` for direct schedules
    #[serde(default)]
    pub issue_id: Option<i64>,
    pub status: ScheduleStatus,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default, deserialize_with = "option_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "option_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_cost: Option<f64>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub pole: Option<AssetSummary>,
    #[serde(default)]
    pub park: Option<AssetSummary>,
}

impl MaintenanceSchedule {
    /// Code of the referenced asset, pole first
    pub fn asset_code(&self) -> Option<&str> {
        self.pole_code
            .as_deref()
            .or(self.park_code.as_deref())
            .or_else(|| self.pole.as_ref().map(|p| p.code.as_str()))
            .or_else(|| self.park.as_ref().map(|p| p.code.as_str()))
    }

    /// Kind of the referenced asset, if any
    pub fn asset_kind(&self) -> Option<AssetKind> {
        if self.pole_code.is_some() || self.pole.is_some() {
            Some(AssetKind::Pole)
        } else if self.park_code.is_some() || self.park.is_some() {
            Some(AssetKind::Park)
        } else {
            None
        }
    }

    /// Sub-city of the referenced asset as embedded by the backend
    pub fn subcity(&self) -> Option<&str> {
        self.pole
            .as_ref()
            .or(self.park.as_ref())
            .and_then(|a| a.subcity.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    pub fn is_in_progress(&self) -> bool {
        self.status != ScheduleStatus::Completed
    }

    /// Completed schedules are frozen
    pub fn is_editable(&self) -> bool {
        self.status != ScheduleStatus::Completed
    }

    /// Delete is only offered before work has started
    pub fn is_deletable(&self) -> bool {
        self.status == ScheduleStatus::Requested
    }
}

/// Create schedule payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSchedule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pole_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub park_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_id: Option<i64>,
    pub status: ScheduleStatus,
    pub frequency: String,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

impl NewSchedule {
    /// Direct (issue-less) schedule for an asset of a schedulable kind
    pub fn for_asset(kind: AssetKind, code: impl Into<String>, start_date: NaiveDate) -> Option<Self> {
        let code = code.into();
        let (pole_code, park_code) = match kind {
            AssetKind::Pole => (Some(code), None),
            AssetKind::Park => (None, Some(code)),
            _ => return None,
        };
        Some(Self {
            pole_code,
            park_code,
            issue_id: None,
            status: ScheduleStatus::Started,
            frequency: "ONE_TIME".to_string(),
            start_date,
            estimated_cost: None,
            remark: None,
        })
    }

    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }

    pub fn asset_code(&self) -> Option<&str> {
        self.pole_code.as_deref().or(self.park_code.as_deref())
    }
}

/// Status transition payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStatusUpdate {
    pub status: ScheduleStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}
