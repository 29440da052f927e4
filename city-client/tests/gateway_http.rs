// city-client/tests/gateway_http.rs
// Gateway against a local axum backend

use axum::{
    Json, Router,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode, Uri},
    response::IntoResponse,
    routing::{delete, get, post},
};
use city_client::{
    AssetApi, Breakdown, ClientConfig, ClientError, Dimension, Gateway, ListQuery, Session,
    SortOrder,
};
use serde_json::json;
use shared::models::{AssetKind, AssetStatus, NewSchedule};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorder {
    queries: Arc<Mutex<Vec<Option<String>>>>,
    paths: Arc<Mutex<Vec<String>>>,
    bodies: Arc<Mutex<Vec<serde_json::Value>>>,
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

async fn list_poles(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    match bearer(&headers).as_deref() {
        Some("good-token") | Some("rotated-token") => {}
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Invalid token" })),
            )
                .into_response();
        }
    }
    recorder.queries.lock().unwrap().push(query);
    Json(json!({
        "items": [{
            "code": "POLE-001",
            "status": "FAULT_DAMAGED",
            "subcity": "Bole",
            "street": "Africa Ave",
            "heightMeters": 9.0
        }],
        "total": 23
    }))
    .into_response()
}

async fn get_parking_lot(
    State(recorder): State<Recorder>,
    uri: Uri,
    Path(code): Path<String>,
) -> impl IntoResponse {
    recorder.paths.lock().unwrap().push(uri.path().to_string());
    Json(json!({
        "code": code,
        "status": "OPERATIONAL",
        "district": "Kirkos",
        "capacity": 120,
        "hasPaidParking": true
    }))
}

async fn list_museums() -> impl IntoResponse {
    Json(json!({
        "items": [
            { "code": "MUS-1", "status": "OPERATIONAL", "subcity": "Arada" },
            { "code": "MUS-2", "status": "CLOSED_FOREVER", "subcity": "Arada" }
        ],
        "total": 2
    }))
}

async fn list_inventory(
    State(recorder): State<Recorder>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    recorder.queries.lock().unwrap().push(query);
    Json(json!({
        "items": [{
            "code": "LAMP-LED",
            "name": "LED lamp 150W",
            "unit": "pcs",
            "currentStock": 4,
            "minimumThreshold": 5,
            "unitCost": 45.5
        }],
        "total": 1
    }))
}

async fn list_users(
    State(recorder): State<Recorder>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    recorder.queries.lock().unwrap().push(query);
    Json(json!({
        "items": [
            { "id": 7, "username": "selam", "role": "MAINTENANCE_ENGINEER",
              "notificationRoles": [{ "id": 3, "name": "FAULT_ALERTS" }] },
            { "id": 8, "username": "abebe", "fullName": "Abebe K.", "role": "ADMIN" }
        ],
        "total": 2
    }))
}

async fn assign_role(
    State(recorder): State<Recorder>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    recorder.bodies.lock().unwrap().push(body);
    StatusCode::CREATED
}

async fn failed_by_subcity() -> impl IntoResponse {
    Json(json!([
        { "dimension": "Bole", "count": 3 },
        { "dimension": "Yeka", "count": 1 }
    ]))
}

async fn create_schedule() -> impl IntoResponse {
    (
        StatusCode::CONFLICT,
        Json(json!({ "message": "Schedule already exists for POLE-001" })),
    )
}

async fn remove_role() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

async fn broken() -> impl IntoResponse {
    (StatusCode::BAD_GATEWAY, "<html>upstream down</html>")
}

async fn spawn_backend(recorder: Recorder) -> String {
    let app = Router::new()
        .route("/api/v1/poles", get(list_poles))
        .route("/api/v1/parks", get(broken))
        .route("/api/v1/parking-lots/{code}", get(get_parking_lot))
        .route("/api/v1/museums", get(list_museums))
        .route("/api/v1/inventory/items", get(list_inventory))
        .route("/api/v1/users", get(list_users))
        .route("/api/v1/users/7/notification-roles", post(assign_role))
        .route("/api/v1/reports/poles/failed-by-subcity", get(failed_by_subcity))
        .route("/api/v1/maintenance-schedules", post(create_schedule))
        .route("/api/v1/users/7/notification-roles/3", delete(remove_role))
        .with_state(recorder);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn gateway(token: Option<&str>) -> (Gateway, Recorder) {
    let recorder = Recorder::default();
    let base = spawn_backend(recorder.clone()).await;
    let session = Session::in_memory(token.map(str::to_string));
    let gateway = Gateway::connect(&ClientConfig::new(base), session).unwrap();
    (gateway, recorder)
}

#[tokio::test]
async fn test_list_assets_sends_bearer_and_query() {
    let (gateway, recorder) = gateway(Some("good-token")).await;

    let query = ListQuery::all()
        .paginate(2, 10)
        .order_by("code", SortOrder::Desc)
        .filter("subcity", "Bole");
    let page = gateway.list_assets(AssetKind::Pole, &query).await.unwrap();

    assert_eq!(page.total, 23);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].code, "POLE-001");
    assert_eq!(page.items[0].status, AssetStatus::FaultDamaged);
    assert_eq!(page.items[0].kind(), AssetKind::Pole);

    let queries = recorder.queries.lock().unwrap();
    assert_eq!(
        queries[0].as_deref(),
        Some("page=2&limit=10&sortBy=code&sortOrder=DESC&subcity=Bole")
    );
}

#[tokio::test]
async fn test_rotated_token_is_picked_up_without_rebuilding() {
    let (gateway, _) = gateway(Some("stale-token")).await;

    let err = gateway
        .list_assets(AssetKind::Pole, &ListQuery::all())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(ref m) if m == "Invalid token"));

    gateway.session().set_token("rotated-token").unwrap();
    let page = gateway
        .list_assets(AssetKind::Pole, &ListQuery::all())
        .await
        .unwrap();
    assert_eq!(page.total, 23);
}

#[tokio::test]
async fn test_breakdown_reads_dimension_rows() {
    let (gateway, _) = gateway(Some("good-token")).await;
    let rows = gateway
        .breakdown(AssetKind::Pole, Breakdown::Failed, Dimension::Subcity)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].category, "Bole");
    assert_eq!(rows[0].count, 3);
}

#[tokio::test]
async fn test_error_body_message_is_surfaced() {
    let (gateway, _) = gateway(Some("good-token")).await;
    let date = chrono_date();
    let schedule = NewSchedule::for_asset(AssetKind::Pole, "POLE-001", date).unwrap();

    let err = gateway.create_schedule(&schedule).await.unwrap_err();
    match &err {
        ClientError::Api { status, message } => {
            assert_eq!(*status, 409);
            assert_eq!(message, "Schedule already exists for POLE-001");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), "Schedule already exists for POLE-001");
}

#[tokio::test]
async fn test_non_json_error_falls_back_to_generic_message() {
    let (gateway, _) = gateway(Some("good-token")).await;
    let err = gateway
        .list_assets(AssetKind::Park, &ListQuery::all())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 502, .. }));
    assert_eq!(err.user_message(), city_client::error::GENERIC_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_empty_success_body_is_accepted() {
    let (gateway, _) = gateway(Some("good-token")).await;
    gateway.remove_notification_role(7, 3).await.unwrap();
}

#[tokio::test]
async fn test_get_asset_encodes_code_segment() {
    let (gateway, recorder) = gateway(Some("good-token")).await;
    let lot = gateway
        .get_asset(AssetKind::ParkingLot, "LOT 4/B")
        .await
        .unwrap();

    assert_eq!(lot.code, "LOT 4/B");
    assert_eq!(lot.subcity(), "Kirkos");
    assert_eq!(lot.kind(), AssetKind::ParkingLot);
    assert_eq!(
        recorder.paths.lock().unwrap().as_slice(),
        ["/api/v1/parking-lots/LOT%204%2FB"]
    );
}

#[tokio::test]
async fn test_undecodable_row_does_not_sink_the_page() {
    let (gateway, _) = gateway(Some("good-token")).await;
    let page = gateway
        .list_assets(AssetKind::Museum, &ListQuery::all())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].code, "MUS-1");
}

#[tokio::test]
async fn test_list_inventory_reads_stock() {
    let (gateway, recorder) = gateway(Some("good-token")).await;
    let page = gateway
        .list_inventory(&ListQuery::all().paginate(1, 20))
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    let item = &page.items[0];
    assert_eq!(item.code, "LAMP-LED");
    assert_eq!(item.category, None);
    assert!(item.is_low_stock());
    assert_eq!(recorder.queries.lock().unwrap()[0].as_deref(), Some("page=1&limit=20"));
}

#[tokio::test]
async fn test_list_users_with_notification_roles() {
    let (gateway, recorder) = gateway(Some("good-token")).await;
    let page = gateway
        .list_users(&ListQuery::all().filter("role", "ADMIN"))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].notification_roles[0].name, "FAULT_ALERTS");
    assert!(page.items[1].notification_roles.is_empty());
    assert!(page.items[1].is_admin());
    assert_eq!(recorder.queries.lock().unwrap()[0].as_deref(), Some("role=ADMIN"));
}

#[tokio::test]
async fn test_assign_notification_role_posts_role_id() {
    let (gateway, recorder) = gateway(Some("good-token")).await;
    gateway.assign_notification_role(7, 3).await.unwrap();
    assert_eq!(
        recorder.bodies.lock().unwrap().as_slice(),
        [json!({ "roleId": 3 })]
    );
}

fn chrono_date() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}
