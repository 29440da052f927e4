//! Typed gateway to the asset backend
//!
//! [`AssetApi`] is the seam the view-model layer depends on; [`Gateway`]
//! implements it over any [`HttpClient`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::Paged;
use shared::models::{
    Asset, AssetKind, AssetStatusCounts, Availability, InventoryItem, Issue,
    MaintenanceSchedule, MaterialRequestLine, NewSchedule, ScheduleStatusUpdate, User,
};
use shared::response::CategoryCount;

use crate::{
    Breakdown, ClientConfig, ClientError, ClientResult, Dimension, HttpClient, ListQuery,
    NetworkHttpClient, Session,
};

/// Typed operations of the asset backend
#[async_trait]
pub trait AssetApi: Send + Sync {
    async fn list_assets(&self, kind: AssetKind, query: &ListQuery) -> ClientResult<Paged<Asset>>;
    async fn get_asset(&self, kind: AssetKind, code: &str) -> ClientResult<Asset>;
    async fn asset_counts(&self, kind: AssetKind) -> ClientResult<AssetStatusCounts>;
    async fn breakdown(
        &self,
        kind: AssetKind,
        report: Breakdown,
        dimension: Dimension,
    ) -> ClientResult<Vec<CategoryCount>>;

    async fn list_issues(&self, query: &ListQuery) -> ClientResult<Paged<Issue>>;

    async fn list_schedules(&self, query: &ListQuery) -> ClientResult<Paged<MaintenanceSchedule>>;
    async fn create_schedule(&self, schedule: &NewSchedule) -> ClientResult<MaintenanceSchedule>;
    async fn update_schedule_status(
        &self,
        id: i64,
        update: &ScheduleStatusUpdate,
    ) -> ClientResult<MaintenanceSchedule>;

    async fn list_inventory(&self, query: &ListQuery) -> ClientResult<Paged<InventoryItem>>;
    async fn check_availability(
        &self,
        lines: &[MaterialRequestLine],
    ) -> ClientResult<Vec<Availability>>;

    async fn current_user(&self) -> ClientResult<User>;
    async fn list_users(&self, query: &ListQuery) -> ClientResult<Paged<User>>;
    async fn assign_notification_role(&self, user_id: i64, role_id: i64) -> ClientResult<()>;
    async fn remove_notification_role(&self, user_id: i64, role_id: i64) -> ClientResult<()>;
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(alias = "access_token", alias = "accessToken")]
    pub token: String,
    pub user: User,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AvailabilityRequest<'a> {
    items: &'a [MaterialRequestLine],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationRoleRequest {
    role_id: i64,
}

/// Gateway over an HTTP transport
#[derive(Debug, Clone)]
pub struct Gateway<C = NetworkHttpClient> {
    http: C,
}

impl Gateway<NetworkHttpClient> {
    /// Gateway over the network transport
    pub fn connect(config: &ClientConfig, session: Session) -> ClientResult<Self> {
        Ok(Self::new(NetworkHttpClient::new(config, session)?))
    }
}

impl<C: HttpClient> Gateway<C> {
    pub fn new(http: C) -> Self {
        Self { http }
    }

    pub fn session(&self) -> &Session {
        self.http.session()
    }

    /// Exchange credentials for a token and store it in the session
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        #[derive(Serialize)]
        struct LoginRequest<'a> {
            username: &'a str,
            password: &'a str,
        }

        let response: LoginResponse = self
            .http
            .post("auth/login", &LoginRequest { username, password })
            .await?;
        self.session().set_token(response.token.clone())?;
        tracing::info!(user = %response.user.username, role = %response.user.role, "logged in");
        Ok(response)
    }

    /// Forget the token locally
    pub fn logout(&self) -> ClientResult<()> {
        self.session().clear_token()?;
        Ok(())
    }
}

#[async_trait]
impl<C: HttpClient> AssetApi for Gateway<C> {
    async fn list_assets(&self, kind: AssetKind, query: &ListQuery) -> ClientResult<Paged<Asset>> {
        tracing::debug!(resource = kind.resource(), ?query, "list assets");
        let page: Paged<serde_json::Value> = self.http.get(kind.resource(), &query.to_pairs()).await?;
        // A malformed row is dropped; the rest of the page still renders
        let items = page
            .items
            .into_iter()
            .filter_map(|value| match Asset::from_json(kind, value) {
                Ok(asset) => Some(asset),
                Err(e) => {
                    tracing::warn!(resource = kind.resource(), error = %e, "skipping undecodable asset row");
                    None
                }
            })
            .collect();
        Ok(Paged::new(items, page.total))
    }

    async fn get_asset(&self, kind: AssetKind, code: &str) -> ClientResult<Asset> {
        let value: serde_json::Value = self
            .http
            .get(&format!("{}/{}", kind.resource(), urlencoding::encode(code)), &[])
            .await?;
        Asset::from_json(kind, value)
            .map_err(|e| ClientError::InvalidResponse(format!("{}/{code}: {e}", kind.resource())))
    }

    async fn asset_counts(&self, kind: AssetKind) -> ClientResult<AssetStatusCounts> {
        self.http
            .get(&format!("reports/{}/summary", kind.resource()), &[])
            .await
    }

    async fn breakdown(
        &self,
        kind: AssetKind,
        report: Breakdown,
        dimension: Dimension,
    ) -> ClientResult<Vec<CategoryCount>> {
        let path = format!(
            "reports/{}/{}-by-{}",
            kind.resource(),
            report.slug(),
            dimension.slug()
        );
        tracing::debug!(%path, "fetch breakdown");
        self.http.get(&path, &[]).await
    }

    async fn list_issues(&self, query: &ListQuery) -> ClientResult<Paged<Issue>> {
        self.http.get("issues", &query.to_pairs()).await
    }

    async fn list_schedules(&self, query: &ListQuery) -> ClientResult<Paged<MaintenanceSchedule>> {
        self.http.get("maintenance-schedules", &query.to_pairs()).await
    }

    async fn create_schedule(&self, schedule: &NewSchedule) -> ClientResult<MaintenanceSchedule> {
        tracing::debug!(asset = ?schedule.asset_code(), status = %schedule.status, "create schedule");
        self.http.post("maintenance-schedules", schedule).await
    }

    async fn update_schedule_status(
        &self,
        id: i64,
        update: &ScheduleStatusUpdate,
    ) -> ClientResult<MaintenanceSchedule> {
        self.http
            .patch(&format!("maintenance-schedules/{id}/status"), update)
            .await
    }

    async fn list_inventory(&self, query: &ListQuery) -> ClientResult<Paged<InventoryItem>> {
        self.http.get("inventory/items", &query.to_pairs()).await
    }

    async fn check_availability(
        &self,
        lines: &[MaterialRequestLine],
    ) -> ClientResult<Vec<Availability>> {
        self.http
            .post(
                "material-requests/check-availability",
                &AvailabilityRequest { items: lines },
            )
            .await
    }

    async fn current_user(&self) -> ClientResult<User> {
        self.http.get("auth/me", &[]).await
    }

    async fn list_users(&self, query: &ListQuery) -> ClientResult<Paged<User>> {
        self.http.get("users", &query.to_pairs()).await
    }

    async fn assign_notification_role(&self, user_id: i64, role_id: i64) -> ClientResult<()> {
        let _: serde_json::Value = self
            .http
            .post(
                &format!("users/{user_id}/notification-roles"),
                &NotificationRoleRequest { role_id },
            )
            .await?;
        Ok(())
    }

    async fn remove_notification_role(&self, user_id: i64, role_id: i64) -> ClientResult<()> {
        let _: serde_json::Value = self
            .http
            .delete(&format!("users/{user_id}/notification-roles/{role_id}"))
            .await?;
        Ok(())
    }
}
