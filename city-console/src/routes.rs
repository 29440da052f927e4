//! Navigable routes
//!
//! The console's page surface. Drill-downs link to list routes with their
//! filters pre-applied as query parameters.

use shared::models::AssetKind;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    AssetList {
        kind: AssetKind,
        filters: BTreeMap<String, String>,
    },
    AssetDetail {
        kind: AssetKind,
        code: String,
    },
    AssetEdit {
        kind: AssetKind,
        code: String,
    },
    AssetNew {
        kind: AssetKind,
    },
    Issues {
        filters: BTreeMap<String, String>,
    },
    Maintenance {
        kind: AssetKind,
        filters: BTreeMap<String, String>,
    },
    Users,
    Inventory,
    Categories,
    MaterialRequests,
    PurchaseRequests,
}

impl Route {
    /// List page of `kind` filtered by `filters`
    pub fn asset_list<'a>(kind: AssetKind, filters: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::AssetList {
            kind,
            filters: collect(filters),
        }
    }

    pub fn maintenance<'a>(kind: AssetKind, filters: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::Maintenance {
            kind,
            filters: collect(filters),
        }
    }

    /// Path with percent-encoded query string
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::AssetList { kind, filters } => with_query(format!("/{}", kind.resource()), filters),
            Self::AssetDetail { kind, code } => {
                format!("/{}/{}", kind.resource(), urlencoding::encode(code))
            }
            Self::AssetEdit { kind, code } => {
                format!("/{}/{}/edit", kind.resource(), urlencoding::encode(code))
            }
            Self::AssetNew { kind } => format!("/{}/new", kind.resource()),
            Self::Issues { filters } => with_query("/issues".to_string(), filters),
            Self::Maintenance { kind, filters } => {
                let mut all = filters.clone();
                all.insert("type".to_string(), kind.type_param().to_string());
                with_query("/maintenance".to_string(), &all)
            }
            Self::Users => "/users".to_string(),
            Self::Inventory => "/inventory".to_string(),
            Self::Categories => "/categories".to_string(),
            Self::MaterialRequests => "/material-requests".to_string(),
            Self::PurchaseRequests => "/purchase-requests".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

fn collect<'a>(filters: impl IntoIterator<Item = (&'a str, &'a str)>) -> BTreeMap<String, String> {
    filters
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn with_query(path: String, filters: &BTreeMap<String, String>) -> String {
    if filters.is_empty() {
        return path;
    }
    let query = filters
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_triple() {
        assert_eq!(
            Route::AssetDetail { kind: AssetKind::Pole, code: "POLE-1".into() }.to_path(),
            "/poles/POLE-1"
        );
        assert_eq!(
            Route::AssetEdit { kind: AssetKind::ParkingLot, code: "PL 4".into() }.to_path(),
            "/parking-lots/PL%204/edit"
        );
        assert_eq!(Route::AssetNew { kind: AssetKind::Museum }.to_path(), "/museums/new");
    }

    #[test]
    fn test_list_with_encoded_filters() {
        let route = Route::asset_list(AssetKind::Pole, [("subcity", "Nifas Silk"), ("status", "FAULT_DAMAGED")]);
        assert_eq!(route.to_path(), "/poles?status=FAULT_DAMAGED&subcity=Nifas%20Silk");
    }

    #[test]
    fn test_maintenance_carries_type() {
        let route = Route::maintenance(AssetKind::Park, [("subcity", "Bole")]);
        assert_eq!(route.to_path(), "/maintenance?subcity=Bole&type=park");
    }

    #[test]
    fn test_plain_routes() {
        assert_eq!(Route::Dashboard.to_string(), "/dashboard");
        assert_eq!(Route::PurchaseRequests.to_path(), "/purchase-requests");
        assert_eq!(Route::Issues { filters: BTreeMap::new() }.to_path(), "/issues");
    }
}
