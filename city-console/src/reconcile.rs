//! Schedule reconciliation
//!
//! Every asset that is `UNDER_MAINTENANCE` should have a maintenance
//! schedule. This admin action finds the ones that do not and creates the
//! missing schedules in fixed-size concurrent batches, pausing between
//! batches. Individual creation failures are logged and counted; they do not
//! stop the run. A failure while listing assets or schedules aborts the run.
//!
//! Running it twice without intervening changes creates nothing the second
//! time. There is no locking: two admins reconciling at the same moment can
//! both create a schedule for the same asset unless the backend rejects
//! duplicates.

use chrono::NaiveDate;
use city_client::{AssetApi, ClientResult, ListQuery};
use futures::future::join_all;
use serde::Serialize;
use shared::capability::{self, Action, Denied};
use shared::models::{AssetKind, AssetStatus, NewSchedule, User};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};

use crate::panel::collect_all_pages;

/// Remark stored on schedules created by reconciliation
pub const AUTO_REMARK: &str = "Auto-created: asset is under maintenance without a schedule";

#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Creations issued concurrently per batch
    pub batch_size: usize,
    /// Pause between batches
    pub batch_delay: Duration,
    /// Kinds checked; only schedulable kinds are honored
    pub kinds: Vec<AssetKind>,
    /// Page size used while listing assets and schedules
    pub fetch_page_size: u32,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            batch_delay: Duration::from_millis(500),
            kinds: vec![AssetKind::Pole, AssetKind::Park],
            fetch_page_size: 100,
        }
    }
}

/// Per-asset creation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateFailure {
    pub kind: AssetKind,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Assets found under maintenance
    pub examined: usize,
    /// Of those, already covered by a schedule
    pub already_scheduled: usize,
    pub created: usize,
    pub failed: Vec<CreateFailure>,
    pub batches: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The user may not reconcile; nothing was requested
    Skipped { reason: String },
    /// Listing assets or schedules failed
    Aborted { error: String },
    Completed(ReconcileReport),
}

impl Outcome {
    pub fn created(&self) -> usize {
        match self {
            Self::Completed(report) => report.created,
            _ => 0,
        }
    }

    /// Dependent views must re-fetch when anything was written
    pub fn requires_refresh(&self) -> bool {
        self.created() > 0
    }
}

impl From<Denied> for Outcome {
    fn from(denied: Denied) -> Self {
        Self::Skipped {
            reason: denied.to_string(),
        }
    }
}

pub struct ScheduleReconciler<'a, A: AssetApi + ?Sized> {
    api: &'a A,
    config: ReconcileConfig,
}

impl<'a, A: AssetApi + ?Sized> ScheduleReconciler<'a, A> {
    pub fn new(api: &'a A, config: ReconcileConfig) -> Self {
        Self { api, config }
    }

    /// Reconcile on behalf of `user`
    pub async fn run(&self, user: &User) -> Outcome {
        if let Err(denied) = capability::check(user.role, Action::ReconcileSchedules) {
            info!(user = %user.username, role = %user.role, "schedule reconciliation skipped");
            return denied.into();
        }

        let today = chrono::Local::now().date_naive();
        match self.reconcile(today).await {
            Ok(report) => {
                info!(
                    examined = report.examined,
                    already_scheduled = report.already_scheduled,
                    created = report.created,
                    failed = report.failed.len(),
                    batches = report.batches,
                    "schedule reconciliation finished"
                );
                Outcome::Completed(report)
            }
            Err(err) => {
                warn!(error = %err, "schedule reconciliation aborted");
                Outcome::Aborted {
                    error: err.user_message(),
                }
            }
        }
    }

    /// Core pass, without the capability gate
    pub async fn reconcile(&self, start_date: NaiveDate) -> ClientResult<ReconcileReport> {
        let mut report = ReconcileReport::default();
        let page_size = self.config.fetch_page_size;

        let mut under_maintenance: Vec<(AssetKind, String)> = Vec::new();
        let mut seen = HashSet::new();
        for kind in self.config.kinds.iter().copied().filter(AssetKind::is_schedulable) {
            let base = ListQuery::all().filter("status", AssetStatus::UnderMaintenance.as_str());
            let assets = collect_all_pages(page_size, |page, limit| {
                let query = base.clone().paginate(page, limit);
                async move { self.api.list_assets(kind, &query).await }
            })
            .await?;
            for asset in assets {
                if asset.status == AssetStatus::UnderMaintenance && seen.insert((kind, asset.code.clone())) {
                    under_maintenance.push((kind, asset.code));
                }
            }
        }

        report.examined = under_maintenance.len();
        if under_maintenance.is_empty() {
            return Ok(report);
        }

        let schedules = collect_all_pages(page_size, |page, limit| {
            let query = ListQuery::all().paginate(page, limit);
            async move { self.api.list_schedules(&query).await }
        })
        .await?;
        let covered: HashSet<(AssetKind, &str)> = schedules
            .iter()
            .filter_map(|s| Some((s.asset_kind()?, s.asset_code()?)))
            .collect();

        let missing: Vec<NewSchedule> = under_maintenance
            .iter()
            .filter(|(kind, code)| !covered.contains(&(*kind, code.as_str())))
            .filter_map(|(kind, code)| {
                NewSchedule::for_asset(*kind, code.clone(), start_date).map(|s| s.with_remark(AUTO_REMARK))
            })
            .collect();
        report.already_scheduled = report.examined - missing.len();
        if missing.is_empty() {
            return Ok(report);
        }

        info!(missing = missing.len(), "creating missing maintenance schedules");
        let batch_size = self.config.batch_size.max(1);
        for (index, batch) in missing.chunks(batch_size).enumerate() {
            if index > 0 && !self.config.batch_delay.is_zero() {
                tokio::time::sleep(self.config.batch_delay).await;
            }
            report.batches += 1;

            let results = join_all(batch.iter().map(|s| self.api.create_schedule(s))).await;
            for (schedule, result) in batch.iter().zip(results) {
                let code = schedule.asset_code().unwrap_or_default().to_string();
                match result {
                    Ok(_) => report.created += 1,
                    Err(err) => {
                        warn!(asset = %code, error = %err, "failed to create maintenance schedule");
                        let kind = if schedule.pole_code.is_some() {
                            AssetKind::Pole
                        } else {
                            AssetKind::Park
                        };
                        report.failed.push(CreateFailure {
                            kind,
                            code,
                            message: err.user_message(),
                        });
                    }
                }
            }
        }

        Ok(report)
    }
}
