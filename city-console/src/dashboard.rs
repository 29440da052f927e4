//! Dashboard orchestrator
//!
//! Owns the gateway and one asset kind's snapshot: status totals, the six
//! pre-aggregated breakdowns and the schedule list. Charts and in-progress
//! drill-downs read the cached snapshot; reconciliation drops it when it
//! wrote anything so the next read re-fetches.

use std::sync::Arc;

use city_client::{AssetApi, Breakdown, Dimension, ListQuery};
use serde::Serialize;
use shared::models::{AssetKind, AssetStatusCounts, MaintenanceSchedule, User};

use crate::aggregation::{Breakdowns, ChartData, StatusView, maintenance_series, select_series};
use crate::drilldown::{DrillDown, fetch_drilldown};
use crate::error::ConsoleResult;
use crate::panel::collect_all_pages;
use crate::reconcile::{Outcome, ReconcileConfig, ScheduleReconciler};

/// Page size used to pull the full schedule list
const SCHEDULE_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub kind: AssetKind,
    pub counts: AssetStatusCounts,
    pub breakdowns: Breakdowns,
    /// Schedules of this kind, plus any whose asset is unknown
    pub schedules: Vec<MaintenanceSchedule>,
}

pub struct Dashboard<A: AssetApi> {
    api: A,
    kind: AssetKind,
    reconcile_config: ReconcileConfig,
    snapshot: Option<Arc<DashboardSnapshot>>,
}

impl<A: AssetApi> Dashboard<A> {
    pub fn new(api: A, kind: AssetKind) -> Self {
        Self {
            api,
            kind,
            reconcile_config: ReconcileConfig::default(),
            snapshot: None,
        }
    }

    pub fn with_reconcile_config(mut self, config: ReconcileConfig) -> Self {
        self.reconcile_config = config;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Switch asset kind; the cached snapshot no longer applies
    pub fn set_kind(&mut self, kind: AssetKind) {
        if self.kind != kind {
            self.kind = kind;
            self.invalidate();
        }
    }

    /// Cached snapshot, if loaded
    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        self.snapshot.as_deref()
    }

    pub fn invalidate(&mut self) {
        if self.snapshot.take().is_some() {
            tracing::debug!(kind = %self.kind, "dashboard snapshot invalidated");
        }
    }

    /// Cached snapshot, fetching it first when absent
    pub async fn load(&mut self) -> ConsoleResult<Arc<DashboardSnapshot>> {
        if let Some(snapshot) = &self.snapshot {
            return Ok(Arc::clone(snapshot));
        }
        let snapshot = Arc::new(self.fetch().await?);
        self.snapshot = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Drop the cache and fetch again
    pub async fn refresh(&mut self) -> ConsoleResult<Arc<DashboardSnapshot>> {
        self.invalidate();
        self.load().await
    }

    async fn fetch(&self) -> ConsoleResult<DashboardSnapshot> {
        let kind = self.kind;
        let api = &self.api;
        tracing::debug!(%kind, "loading dashboard");

        let (
            counts,
            failed_by_subcity,
            failed_by_street,
            maintenance_by_subcity,
            maintenance_by_street,
            operational_by_subcity,
            operational_by_street,
            mut schedules,
        ) = tokio::try_join!(
            api.asset_counts(kind),
            api.breakdown(kind, Breakdown::Failed, Dimension::Subcity),
            api.breakdown(kind, Breakdown::Failed, Dimension::Street),
            api.breakdown(kind, Breakdown::Maintenance, Dimension::Subcity),
            api.breakdown(kind, Breakdown::Maintenance, Dimension::Street),
            api.breakdown(kind, Breakdown::Operational, Dimension::Subcity),
            api.breakdown(kind, Breakdown::Operational, Dimension::Street),
            collect_all_pages(SCHEDULE_PAGE_SIZE, |page, limit| {
                let query = ListQuery::all().paginate(page, limit);
                async move { api.list_schedules(&query).await }
            }),
        )?;
        schedules.retain(|s| s.asset_kind().is_none_or(|k| k == kind));

        tracing::info!(
            %kind,
            total = counts.total,
            schedules = schedules.len(),
            "dashboard loaded"
        );
        Ok(DashboardSnapshot {
            kind,
            counts,
            breakdowns: Breakdowns {
                failed_by_subcity,
                failed_by_street,
                maintenance_by_subcity,
                maintenance_by_street,
                operational_by_subcity,
                operational_by_street,
            },
            schedules,
        })
    }

    /// Series for the breakdown panel
    pub async fn chart(&mut self, view: StatusView, dimension: Dimension) -> ConsoleResult<ChartData> {
        let snapshot = self.load().await?;
        Ok(select_series(view, dimension, &snapshot.breakdowns, &snapshot.schedules))
    }

    /// Under-maintenance series for the side panel
    pub async fn maintenance_chart(&mut self, dimension: Dimension) -> ConsoleResult<ChartData> {
        let snapshot = self.load().await?;
        Ok(maintenance_series(dimension, &snapshot.breakdowns))
    }

    /// Preview behind one sub-city row of the breakdown panel
    ///
    /// Only the in-progress view reads the snapshot; the others issue their
    /// own scoped fetch.
    pub async fn drilldown(&mut self, subcity: &str, view: StatusView) -> ConsoleResult<DrillDown> {
        if view != StatusView::InProgressMaintenance {
            return Ok(fetch_drilldown(&self.api, self.kind, subcity, view, &[]).await?);
        }
        let snapshot = self.load().await?;
        Ok(fetch_drilldown(&self.api, self.kind, subcity, view, &snapshot.schedules).await?)
    }

    /// Create missing schedules; dependent views re-fetch afterwards when anything was written
    pub async fn reconcile(&mut self, user: &User) -> Outcome {
        let outcome = ScheduleReconciler::new(&self.api, self.reconcile_config.clone())
            .run(user)
            .await;
        if outcome.requires_refresh() {
            self.invalidate();
        }
        outcome
    }
}
