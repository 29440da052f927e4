//! Asset Model
//!
//! Seven physical asset kinds share a common envelope (code, status,
//! location) and differ in their type-specific attributes.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::serde_helpers::pick_subcity;

/// Physical asset kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetKind {
    Pole,
    Park,
    ParkingLot,
    Museum,
    PublicToilet,
    FootballField,
    RiverSideProject,
}

impl AssetKind {
    pub const ALL: [AssetKind; 7] = [
        AssetKind::Pole,
        AssetKind::Park,
        AssetKind::ParkingLot,
        AssetKind::Museum,
        AssetKind::PublicToilet,
        AssetKind::FootballField,
        AssetKind::RiverSideProject,
    ];

    /// REST resource segment under the API prefix (e.g. `poles`)
    pub fn resource(&self) -> &'static str {
        match self {
            Self::Pole => "poles",
            Self::Park => "parks",
            Self::ParkingLot => "parking-lots",
            Self::Museum => "museums",
            Self::PublicToilet => "public-toilets",
            Self::FootballField => "football-fields",
            Self::RiverSideProject => "river-side-projects",
        }
    }

    /// Value of the `type` query parameter on the maintenance page
    pub fn type_param(&self) -> &'static str {
        match self {
            Self::Pole => "pole",
            Self::Park => "park",
            Self::ParkingLot => "parking-lot",
            Self::Museum => "museum",
            Self::PublicToilet => "public-toilet",
            Self::FootballField => "football-field",
            Self::RiverSideProject => "river-side-project",
        }
    }

    /// Schedule field that references this kind, if schedules can reference it at all
    pub fn schedule_code_field(&self) -> Option<&'static str> {
        match self {
            Self::Pole => Some("poleCode"),
            Self::Park => Some("parkCode"),
            _ => None,
        }
    }

    /// Whether maintenance schedules can point at this kind
    pub fn is_schedulable(&self) -> bool {
        self.schedule_code_field().is_some()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pole => "Light pole",
            Self::Park => "Park",
            Self::ParkingLot => "Parking lot",
            Self::Museum => "Museum",
            Self::PublicToilet => "Public toilet",
            Self::FootballField => "Football field",
            Self::RiverSideProject => "River-side project",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_param())
    }
}

impl std::str::FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetKind::ALL
            .into_iter()
            .find(|k| k.type_param() == s || k.resource() == s)
            .ok_or_else(|| format!("unknown asset kind: {s}"))
    }
}

/// Asset lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    Active,
    FaultDamaged,
    UnderMaintenance,
    Operational,
    Replaced,
}

impl AssetStatus {
    /// Wire value, used as a query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::FaultDamaged => "FAULT_DAMAGED",
            Self::UnderMaintenance => "UNDER_MAINTENANCE",
            Self::Operational => "OPERATIONAL",
            Self::Replaced => "REPLACED",
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an asset stands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawLocation")]
pub struct Location {
    /// Administrative sub-city; some resources call it `district`
    pub subcity: String,
    pub street: Option<String>,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
}

/// Wire form of [`Location`]; either sub-city name may be present, null or both
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawLocation {
    subcity: Option<String>,
    district: Option<String>,
    street: Option<String>,
    gps_lat: Option<f64>,
    gps_lng: Option<f64>,
}

impl From<RawLocation> for Location {
    fn from(raw: RawLocation) -> Self {
        Self {
            subcity: pick_subcity(raw.subcity, raw.district).unwrap_or_default(),
            street: raw.street,
            gps_lat: raw.gps_lat,
            gps_lng: raw.gps_lng,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoleDetails {
    pub height_meters: Option<f64>,
    pub lamp_type: Option<String>,
    pub power_rating_watt: Option<f64>,
    pub pole_type: Option<String>,
    pub has_led_display: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParkDetails {
    pub park_type: Option<String>,
    pub area_hectares: Option<f64>,
    pub has_paid_entrance: Option<bool>,
    pub entrance_fee: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParkingLotDetails {
    pub parking_type: Option<String>,
    pub capacity: Option<u32>,
    pub has_paid_parking: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MuseumDetails {
    pub museum_type: Option<String>,
    pub has_entrance_fee: Option<bool>,
    pub opening_hours: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublicToiletDetails {
    pub toilet_type: Option<String>,
    pub has_paid_access: Option<bool>,
    pub stall_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FootballFieldDetails {
    pub surface_type: Option<String>,
    pub capacity: Option<u32>,
    pub has_lighting: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiverSideProjectDetails {
    pub project_type: Option<String>,
    pub length_meters: Option<f64>,
    pub contractor: Option<String>,
}

/// Type-specific attributes, one variant per [`AssetKind`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "assetType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetDetails {
    Pole(PoleDetails),
    Park(ParkDetails),
    ParkingLot(ParkingLotDetails),
    Museum(MuseumDetails),
    PublicToilet(PublicToiletDetails),
    FootballField(FootballFieldDetails),
    RiverSideProject(RiverSideProjectDetails),
}

impl AssetDetails {
    /// Decode the attributes of an untagged backend payload of a known kind
    pub fn from_json(kind: AssetKind, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            AssetKind::Pole => Self::Pole(serde_json::from_value(value)?),
            AssetKind::Park => Self::Park(serde_json::from_value(value)?),
            AssetKind::ParkingLot => Self::ParkingLot(serde_json::from_value(value)?),
            AssetKind::Museum => Self::Museum(serde_json::from_value(value)?),
            AssetKind::PublicToilet => Self::PublicToilet(serde_json::from_value(value)?),
            AssetKind::FootballField => Self::FootballField(serde_json::from_value(value)?),
            AssetKind::RiverSideProject => Self::RiverSideProject(serde_json::from_value(value)?),
        })
    }

    pub fn kind(&self) -> AssetKind {
        match self {
            Self::Pole(_) => AssetKind::Pole,
            Self::Park(_) => AssetKind::Park,
            Self::ParkingLot(_) => AssetKind::ParkingLot,
            Self::Museum(_) => AssetKind::Museum,
            Self::PublicToilet(_) => AssetKind::PublicToilet,
            Self::FootballField(_) => AssetKind::FootballField,
            Self::RiverSideProject(_) => AssetKind::RiverSideProject,
        }
    }
}

/// Fields every asset payload carries
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetEnvelope {
    code: String,
    #[serde(default)]
    name: Option<String>,
    status: AssetStatus,
    #[serde(flatten)]
    location: Location,
}

/// Asset entity
///
/// `code` is unique within its kind and never changes after registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub code: String,
    pub name: Option<String>,
    pub status: AssetStatus,
    #[serde(flatten)]
    pub location: Location,
    pub details: AssetDetails,
}

impl Asset {
    /// Build a typed asset from the backend's untagged JSON for `kind`
    pub fn from_json(kind: AssetKind, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let envelope: AssetEnvelope = serde_json::from_value(value.clone())?;
        let details = AssetDetails::from_json(kind, value)?;
        Ok(Self {
            code: envelope.code,
            name: envelope.name,
            status: envelope.status,
            location: envelope.location,
            details,
        })
    }

    pub fn kind(&self) -> AssetKind {
        self.details.kind()
    }

    pub fn subcity(&self) -> &str {
        &self.location.subcity
    }
}

/// Per-status totals shown on the dashboard header cards
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetStatusCounts {
    pub total: u64,
    pub operational: u64,
    pub fault_damaged: u64,
    pub under_maintenance: u64,
    pub replaced: u64,
}
