//! Inventory and Material Request Models

use serde::{Deserialize, Serialize};

/// Stock record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    pub current_stock: u32,
    pub minimum_threshold: u32,
    pub unit_cost: f64,
}

impl InventoryItem {
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.minimum_threshold
    }
}

/// One line of a material request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRequestLine {
    pub item_code: String,
    pub quantity: u32,
}

/// Availability reported by the backend for a requested line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub item_code: String,
    #[serde(alias = "quantity")]
    pub requested_quantity: u32,
    pub available_quantity: u32,
    #[serde(default)]
    pub unit_cost: Option<f64>,
}

impl Availability {
    /// Enough stock to serve the line from inventory
    pub fn is_available(&self) -> bool {
        self.available_quantity >= self.requested_quantity
    }
}
