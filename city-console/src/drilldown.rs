//! Drill-down selector
//!
//! Selecting a row of a breakdown ("Bole: 12 faulty") shows a preview of the
//! matching records, capped at [`PREVIEW_LIMIT`], plus a "view all" link to
//! the fully filtered list when more exist. Read-only and safe to re-run on
//! every toggle change.

use city_client::{AssetApi, ClientResult, ListQuery};
use serde::Serialize;
use shared::models::{Asset, AssetKind, AssetStatus, MaintenanceSchedule};

use crate::aggregation::{StatusView, UNKNOWN_CATEGORY, location_key};
use crate::routes::Route;
use city_client::Dimension;

/// Rows shown in a drill-down preview
pub const PREVIEW_LIMIT: usize = 10;

/// One preview row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrillItem {
    Asset(Asset),
    Schedule(MaintenanceSchedule),
}

impl DrillItem {
    pub fn code(&self) -> &str {
        match self {
            Self::Asset(a) => &a.code,
            Self::Schedule(s) => s.asset_code().unwrap_or("-"),
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Asset(a) => a.status.as_str(),
            Self::Schedule(s) => s.status.as_str(),
        }
    }
}

/// Capped preview of the records behind one breakdown row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrillDown {
    pub kind: AssetKind,
    pub subcity: String,
    pub view: StatusView,
    pub rows: Vec<DrillItem>,
    /// Matches in total, shown as the count badge
    pub total: u64,
    /// Present only when `total` exceeds the preview
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_all: Option<String>,
}

impl DrillDown {
    fn new(
        kind: AssetKind,
        subcity: &str,
        view: StatusView,
        mut rows: Vec<DrillItem>,
        total: u64,
        view_all: Route,
    ) -> Self {
        rows.truncate(PREVIEW_LIMIT);
        let view_all = (total > PREVIEW_LIMIT as u64).then(|| view_all.to_path());
        Self {
            kind,
            subcity: subcity.to_string(),
            view,
            rows,
            total,
            view_all,
        }
    }

    pub fn has_more(&self) -> bool {
        self.view_all.is_some()
    }
}

/// Status filter behind a toggle, for the server-backed views
pub fn status_for(view: StatusView) -> Option<AssetStatus> {
    match view {
        StatusView::Faulty => Some(AssetStatus::FaultDamaged),
        StatusView::Working => Some(AssetStatus::Operational),
        StatusView::InProgressMaintenance => None,
    }
}

/// Preview for `subcity` under `view`
///
/// Faulty and working views issue a scoped first-page fetch; the in-progress
/// view reuses the schedule list the dashboard already holds.
pub async fn fetch_drilldown<A: AssetApi + ?Sized>(
    api: &A,
    kind: AssetKind,
    subcity: &str,
    view: StatusView,
    schedules: &[MaintenanceSchedule],
) -> ClientResult<DrillDown> {
    let Some(status) = status_for(view) else {
        return Ok(from_schedules(kind, subcity, schedules));
    };

    let query = ListQuery::all()
        .paginate(1, PREVIEW_LIMIT as u32)
        .filter("subcity", subcity)
        .filter("status", status.as_str());
    tracing::debug!(kind = %kind, %subcity, status = %status, "drill-down fetch");
    let page = api.list_assets(kind, &query).await?;

    let rows = page.items.into_iter().map(DrillItem::Asset).collect();
    let view_all = Route::asset_list(kind, [("subcity", subcity), ("status", status.as_str())]);
    Ok(DrillDown::new(kind, subcity, view, rows, page.total, view_all))
}

/// In-progress preview from an already fetched schedule list
pub fn from_schedules(kind: AssetKind, subcity: &str, schedules: &[MaintenanceSchedule]) -> DrillDown {
    let matching: Vec<DrillItem> = schedules
        .iter()
        .filter(|s| s.is_in_progress())
        .filter(|s| s.asset_kind().is_none_or(|k| k == kind))
        .filter(|s| location_key(s, Dimension::Subcity) == subcity)
        .cloned()
        .map(DrillItem::Schedule)
        .collect();
    let total = matching.len() as u64;

    let view_all = if subcity == UNKNOWN_CATEGORY {
        Route::maintenance(kind, [("inProgress", "true")])
    } else {
        Route::maintenance(kind, [("subcity", subcity), ("inProgress", "true")])
    };
    DrillDown::new(kind, subcity, StatusView::InProgressMaintenance, matching, total, view_all)
}
