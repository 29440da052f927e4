//! Aggregation view-model
//!
//! Turns report rows and schedule lists into chart-ready series. Most series
//! come pre-aggregated from the backend; "in progress maintenances" is
//! counted here because no endpoint provides that cross-cut.

use city_client::Dimension;
use serde::Serialize;
use shared::CategoryCount;
use shared::models::MaintenanceSchedule;
use std::collections::HashMap;

/// Label for schedules whose asset location is unknown
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Three-way status toggle of the dashboard breakdown panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusView {
    #[default]
    Faulty,
    Working,
    InProgressMaintenance,
}

impl StatusView {
    pub const ALL: [StatusView; 3] = [Self::Faulty, Self::Working, Self::InProgressMaintenance];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Faulty => "Faulty",
            Self::Working => "Working",
            Self::InProgressMaintenance => "In Progress Maintenances",
        }
    }
}

impl std::str::FromStr for StatusView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "faulty" | "failed" => Ok(Self::Faulty),
            "working" | "operational" => Ok(Self::Working),
            "in-progress" | "in_progress" | "maintenance" => Ok(Self::InProgressMaintenance),
            other => Err(format!("unknown status view: {other}")),
        }
    }
}

/// What a chart renders: either a series or the "no data" placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "series", rename_all = "snake_case")]
pub enum ChartData {
    NoData,
    Series(Vec<CategoryCount>),
}

impl ChartData {
    /// Empty or all-zero input renders the placeholder
    pub fn from_counts(counts: Vec<CategoryCount>) -> Self {
        if counts.iter().all(|c| c.count == 0) {
            Self::NoData
        } else {
            Self::Series(counts)
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }

    pub fn series(&self) -> &[CategoryCount] {
        match self {
            Self::NoData => &[],
            Self::Series(s) => s,
        }
    }

    pub fn total(&self) -> u64 {
        total(self.series())
    }

    /// Count for one category, 0 when absent
    pub fn count_of(&self, category: &str) -> u64 {
        self.series()
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    /// Largest first; ties keep their current order
    pub fn sorted_by_count(self) -> Self {
        match self {
            Self::NoData => Self::NoData,
            Self::Series(mut s) => {
                s.sort_by(|a, b| b.count.cmp(&a.count));
                Self::Series(s)
            }
        }
    }
}

pub fn total(series: &[CategoryCount]) -> u64 {
    series.iter().map(|c| c.count).sum()
}

/// Pre-aggregated report rows for one asset kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Breakdowns {
    pub failed_by_subcity: Vec<CategoryCount>,
    pub failed_by_street: Vec<CategoryCount>,
    pub maintenance_by_subcity: Vec<CategoryCount>,
    pub maintenance_by_street: Vec<CategoryCount>,
    pub operational_by_subcity: Vec<CategoryCount>,
    pub operational_by_street: Vec<CategoryCount>,
}

impl Breakdowns {
    pub fn failed(&self, dimension: Dimension) -> &[CategoryCount] {
        match dimension {
            Dimension::Subcity => &self.failed_by_subcity,
            Dimension::Street => &self.failed_by_street,
        }
    }

    pub fn maintenance(&self, dimension: Dimension) -> &[CategoryCount] {
        match dimension {
            Dimension::Subcity => &self.maintenance_by_subcity,
            Dimension::Street => &self.maintenance_by_street,
        }
    }

    pub fn operational(&self, dimension: Dimension) -> &[CategoryCount] {
        match dimension {
            Dimension::Subcity => &self.operational_by_subcity,
            Dimension::Street => &self.operational_by_street,
        }
    }
}

/// Count unfinished schedules per asset location, in first-seen order
pub fn in_progress_by(schedules: &[MaintenanceSchedule], dimension: Dimension) -> Vec<CategoryCount> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for schedule in schedules.iter().filter(|s| s.is_in_progress()) {
        let key = location_key(schedule, dimension);
        match index.get(key) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(key.to_string(), counts.len());
                counts.push(CategoryCount::new(key, 1));
            }
        }
    }
    counts
}

/// Sub-city form of [`in_progress_by`]
pub fn in_progress_by_subcity(schedules: &[MaintenanceSchedule]) -> Vec<CategoryCount> {
    in_progress_by(schedules, Dimension::Subcity)
}

/// Grouping key of a schedule for `dimension`
pub fn location_key(schedule: &MaintenanceSchedule, dimension: Dimension) -> &str {
    let value = match dimension {
        Dimension::Subcity => schedule.subcity(),
        Dimension::Street => schedule
            .pole
            .as_ref()
            .or(schedule.park.as_ref())
            .and_then(|a| a.street.as_deref())
            .filter(|s| !s.trim().is_empty()),
    };
    value.unwrap_or(UNKNOWN_CATEGORY)
}

/// Assets currently `UNDER_MAINTENANCE`, shown beside the toggle panel
pub fn maintenance_series(dimension: Dimension, breakdowns: &Breakdowns) -> ChartData {
    ChartData::from_counts(breakdowns.maintenance(dimension).to_vec())
}

/// Series shown for the active toggle
pub fn select_series(
    view: StatusView,
    dimension: Dimension,
    breakdowns: &Breakdowns,
    schedules: &[MaintenanceSchedule],
) -> ChartData {
    let counts = match view {
        StatusView::Faulty => breakdowns.failed(dimension).to_vec(),
        StatusView::Working => breakdowns.operational(dimension).to_vec(),
        StatusView::InProgressMaintenance => in_progress_by(schedules, dimension),
    };
    ChartData::from_counts(counts)
}
