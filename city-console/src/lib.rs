//! City Console - dashboard view-models for municipal asset management
//!
//! Panel query state, chart aggregation, drill-downs, schedule
//! reconciliation, material request allocation and maintenance form
//! submission, all driven through [`city_client::AssetApi`].

pub mod aggregation;
pub mod config;
pub mod dashboard;
pub mod drilldown;
pub mod error;
pub mod logger;
pub mod maintenance;
pub mod panel;
pub mod procurement;
pub mod reconcile;
pub mod routes;

pub use aggregation::{Breakdowns, ChartData, StatusView};
pub use config::ConsoleConfig;
pub use dashboard::{Dashboard, DashboardSnapshot};
pub use drilldown::{DrillDown, DrillItem, PREVIEW_LIMIT};
pub use error::{ConsoleError, ConsoleResult};
pub use panel::{PageSizeBounds, PanelQuery, PanelState};
pub use procurement::{Allocation, AllocatedLine};
pub use reconcile::{Outcome, ReconcileConfig, ReconcileReport, ScheduleReconciler};
pub use routes::Route;
