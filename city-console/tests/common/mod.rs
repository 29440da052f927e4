//! In-memory backend for console integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use city_client::{AssetApi, Breakdown, ClientError, ClientResult, Dimension, ListQuery};
use shared::models::{
    Asset, AssetDetails, AssetKind, AssetStatus, AssetStatusCounts, AssetSummary, Availability,
    InventoryItem, Issue, Location, MaintenanceSchedule, MaterialRequestLine, NewSchedule,
    ParkDetails, PoleDetails, Role, ScheduleStatus, ScheduleStatusUpdate, User,
};
use shared::{CategoryCount, Paged};

#[derive(Default)]
pub struct FakeApi {
    assets: Mutex<Vec<Asset>>,
    schedules: Mutex<Vec<MaintenanceSchedule>>,
    breakdowns: Mutex<HashMap<(AssetKind, Breakdown, Dimension), Vec<CategoryCount>>>,
    stock: Mutex<HashMap<String, (u32, f64)>>,
    failing_codes: Mutex<HashSet<String>>,
    fail_lists: AtomicBool,
    fail_reports: AtomicBool,
    requests: AtomicUsize,
    writes: AtomicUsize,
    pub created: Mutex<Vec<NewSchedule>>,
    pub status_updates: Mutex<Vec<(i64, ScheduleStatusUpdate)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(self, asset: Asset) -> Self {
        self.assets.lock().unwrap().push(asset);
        self
    }

    pub fn with_assets(self, assets: impl IntoIterator<Item = Asset>) -> Self {
        self.assets.lock().unwrap().extend(assets);
        self
    }

    pub fn with_schedule(self, schedule: MaintenanceSchedule) -> Self {
        self.schedules.lock().unwrap().push(schedule);
        self
    }

    pub fn with_breakdown(
        self,
        kind: AssetKind,
        report: Breakdown,
        dimension: Dimension,
        rows: Vec<CategoryCount>,
    ) -> Self {
        self.breakdowns.lock().unwrap().insert((kind, report, dimension), rows);
        self
    }

    pub fn with_stock(self, code: &str, quantity: u32, unit_cost: f64) -> Self {
        self.stock.lock().unwrap().insert(code.to_string(), (quantity, unit_cost));
        self
    }

    /// Creating a schedule for `code` fails with a 500
    pub fn failing_create(self, code: &str) -> Self {
        self.failing_codes.lock().unwrap().insert(code.to_string());
        self
    }

    /// Every list call fails with a 503
    pub fn failing_lists(self) -> Self {
        self.fail_lists.store(true, Ordering::SeqCst);
        self
    }

    /// Summary and breakdown reports fail with a 500
    pub fn failing_reports(self) -> Self {
        self.fail_reports.store(true, Ordering::SeqCst);
        self
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn schedule_count(&self) -> usize {
        self.schedules.lock().unwrap().len()
    }

    fn hit(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    fn check_list(&self) -> ClientResult<()> {
        self.hit();
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 503,
                message: "Service unavailable".into(),
            });
        }
        Ok(())
    }

    fn check_report(&self) -> ClientResult<()> {
        self.check_list()?;
        if self.fail_reports.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 500,
                message: "summary endpoint down".into(),
            });
        }
        Ok(())
    }
}

fn page_of<T: Clone>(items: Vec<T>, query: &ListQuery) -> Paged<T> {
    let total = items.len() as u64;
    let Some(limit) = query.limit else {
        return Paged::new(items, total);
    };
    let page = query.page.unwrap_or(1).max(1);
    let start = ((page - 1) * limit) as usize;
    let items = items.into_iter().skip(start).take(limit as usize).collect();
    Paged::new(items, total)
}

#[async_trait]
impl AssetApi for FakeApi {
    async fn list_assets(&self, kind: AssetKind, query: &ListQuery) -> ClientResult<Paged<Asset>> {
        self.check_list()?;
        let matching: Vec<Asset> = self
            .assets
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.kind() == kind)
            .filter(|a| query.filters.get("status").is_none_or(|s| a.status.as_str() == s))
            .filter(|a| query.filters.get("subcity").is_none_or(|s| a.subcity() == s))
            .cloned()
            .collect();
        Ok(page_of(matching, query))
    }

    async fn get_asset(&self, kind: AssetKind, code: &str) -> ClientResult<Asset> {
        self.hit();
        self.assets
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.kind() == kind && a.code == code)
            .cloned()
            .ok_or_else(|| ClientError::Api {
                status: 404,
                message: format!("{code} not found"),
            })
    }

    async fn asset_counts(&self, kind: AssetKind) -> ClientResult<AssetStatusCounts> {
        self.check_report()?;
        let assets = self.assets.lock().unwrap();
        let mut counts = AssetStatusCounts::default();
        for asset in assets.iter().filter(|a| a.kind() == kind) {
            counts.total += 1;
            match asset.status {
                AssetStatus::Operational => counts.operational += 1,
                AssetStatus::FaultDamaged => counts.fault_damaged += 1,
                AssetStatus::UnderMaintenance => counts.under_maintenance += 1,
                AssetStatus::Replaced => counts.replaced += 1,
                _ => {}
            }
        }
        Ok(counts)
    }

    async fn breakdown(
        &self,
        kind: AssetKind,
        report: Breakdown,
        dimension: Dimension,
    ) -> ClientResult<Vec<CategoryCount>> {
        self.check_report()?;
        Ok(self
            .breakdowns
            .lock()
            .unwrap()
            .get(&(kind, report, dimension))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_issues(&self, query: &ListQuery) -> ClientResult<Paged<Issue>> {
        self.check_list()?;
        Ok(page_of(Vec::new(), query))
    }

    async fn list_schedules(&self, query: &ListQuery) -> ClientResult<Paged<MaintenanceSchedule>> {
        self.check_list()?;
        let schedules = self.schedules.lock().unwrap().clone();
        Ok(page_of(schedules, query))
    }

    async fn create_schedule(&self, schedule: &NewSchedule) -> ClientResult<MaintenanceSchedule> {
        self.hit();
        self.writes.fetch_add(1, Ordering::SeqCst);
        let code = schedule.asset_code().unwrap_or_default().to_string();
        if self.failing_codes.lock().unwrap().contains(&code) {
            return Err(ClientError::Api {
                status: 500,
                message: format!("could not schedule {code}"),
            });
        }

        self.created.lock().unwrap().push(schedule.clone());
        let mut schedules = self.schedules.lock().unwrap();
        let created = MaintenanceSchedule {
            id: schedules.len() as i64 + 1,
            pole_code: schedule.pole_code.clone(),
            park_code: schedule.park_code.clone(),
            issue_id: schedule.issue_id,
            status: schedule.status,
            frequency: Some(schedule.frequency.clone()),
            start_date: Some(schedule.start_date),
            end_date: None,
            estimated_cost: schedule.estimated_cost,
            cost: None,
            remark: schedule.remark.clone(),
            pole: None,
            park: None,
        };
        schedules.push(created.clone());
        Ok(created)
    }

    async fn update_schedule_status(
        &self,
        id: i64,
        update: &ScheduleStatusUpdate,
    ) -> ClientResult<MaintenanceSchedule> {
        self.hit();
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.status_updates.lock().unwrap().push((id, update.clone()));
        let mut schedules = self.schedules.lock().unwrap();
        let schedule = schedules
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ClientError::Api {
                status: 404,
                message: format!("schedule {id} not found"),
            })?;
        schedule.status = update.status;
        schedule.remark = update.remark.clone();
        Ok(schedule.clone())
    }

    async fn list_inventory(&self, query: &ListQuery) -> ClientResult<Paged<InventoryItem>> {
        self.check_list()?;
        let items = self
            .stock
            .lock()
            .unwrap()
            .iter()
            .map(|(code, (quantity, cost))| InventoryItem {
                code: code.clone(),
                name: code.clone(),
                category: None,
                unit: None,
                current_stock: *quantity,
                minimum_threshold: 0,
                unit_cost: *cost,
            })
            .collect();
        Ok(page_of(items, query))
    }

    async fn check_availability(
        &self,
        lines: &[MaterialRequestLine],
    ) -> ClientResult<Vec<Availability>> {
        self.hit();
        let stock = self.stock.lock().unwrap();
        Ok(lines
            .iter()
            .filter_map(|line| {
                let (available, cost) = stock.get(&line.item_code)?;
                Some(Availability {
                    item_code: line.item_code.clone(),
                    requested_quantity: line.quantity,
                    available_quantity: *available,
                    unit_cost: Some(*cost),
                })
            })
            .collect())
    }

    async fn current_user(&self) -> ClientResult<User> {
        self.hit();
        Ok(user(Role::Admin))
    }

    async fn list_users(&self, query: &ListQuery) -> ClientResult<Paged<User>> {
        self.check_list()?;
        Ok(page_of(vec![user(Role::Admin)], query))
    }

    async fn assign_notification_role(&self, _user_id: i64, _role_id: i64) -> ClientResult<()> {
        self.hit();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove_notification_role(&self, _user_id: i64, _role_id: i64) -> ClientResult<()> {
        self.hit();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn user(role: Role) -> User {
    User {
        id: 1,
        username: format!("{}-user", role.as_str().to_lowercase()),
        full_name: None,
        role,
        notification_roles: vec![],
    }
}

pub fn pole(code: &str, subcity: &str, status: AssetStatus) -> Asset {
    Asset {
        code: code.to_string(),
        name: None,
        status,
        location: Location {
            subcity: subcity.to_string(),
            street: Some("Africa Ave".into()),
            gps_lat: None,
            gps_lng: None,
        },
        details: AssetDetails::Pole(PoleDetails::default()),
    }
}

pub fn park(code: &str, subcity: &str, status: AssetStatus) -> Asset {
    Asset {
        details: AssetDetails::Park(ParkDetails::default()),
        ..pole(code, subcity, status)
    }
}

/// Schedule pointing at a pole
pub fn pole_schedule(id: i64, code: &str, subcity: &str, status: ScheduleStatus) -> MaintenanceSchedule {
    MaintenanceSchedule {
        id,
        pole_code: Some(code.to_string()),
        park_code: None,
        issue_id: None,
        status,
        frequency: Some("ONE_TIME".into()),
        start_date: None,
        end_date: None,
        estimated_cost: None,
        cost: None,
        remark: None,
        pole: Some(AssetSummary {
            code: code.to_string(),
            subcity: Some(subcity.to_string()),
            street: None,
        }),
        park: None,
    }
}
