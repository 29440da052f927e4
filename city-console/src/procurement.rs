//! Material request allocation
//!
//! Before a material request is submitted every line is checked against
//! stock. Lines the inventory can serve go to the usage group; the rest go
//! to the purchase group.

use city_client::{AssetApi, ClientResult};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Serialize;
use shared::capability::{self, Action};
use shared::models::{Availability, MaterialRequestLine, User};
use shared::validation::validate_request_lines;

/// A checked request line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocatedLine {
    pub item_code: String,
    pub requested_quantity: u32,
    pub available_quantity: u32,
    /// `available_quantity >= requested_quantity` at check time
    pub available: bool,
    pub unit_cost: Option<f64>,
}

impl From<Availability> for AllocatedLine {
    fn from(a: Availability) -> Self {
        Self {
            available: a.is_available(),
            item_code: a.item_code,
            requested_quantity: a.requested_quantity,
            available_quantity: a.available_quantity,
            unit_cost: a.unit_cost,
        }
    }
}

/// Request lines split into usage and purchase groups
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub usage: Vec<AllocatedLine>,
    pub purchase: Vec<AllocatedLine>,
}

impl Allocation {
    pub fn needs_purchase(&self) -> bool {
        !self.purchase.is_empty()
    }

    /// Cost of buying every purchase line in full; lines without a unit cost count as zero
    pub fn estimated_purchase_cost(&self) -> Decimal {
        self.purchase
            .iter()
            .map(|line| {
                let unit = line.unit_cost.and_then(Decimal::from_f64).unwrap_or(Decimal::ZERO);
                unit * Decimal::from(line.requested_quantity)
            })
            .sum::<Decimal>()
            .round_dp(2)
    }
}

/// Split checked lines by availability, keeping request order within each group
pub fn partition(availabilities: impl IntoIterator<Item = Availability>) -> Allocation {
    let mut allocation = Allocation::default();
    for line in availabilities.into_iter().map(AllocatedLine::from) {
        if line.available {
            allocation.usage.push(line);
        } else {
            allocation.purchase.push(line);
        }
    }
    allocation
}

/// Validate, check stock and allocate a material request for `user`
///
/// Lines the backend does not report on are treated as out of stock.
pub async fn prepare_material_request<A: AssetApi + ?Sized>(
    api: &A,
    user: &User,
    lines: &[MaterialRequestLine],
) -> ClientResult<Allocation> {
    capability::check(user.role, Action::SubmitMaterialRequest)?;
    validate_request_lines(lines)?;

    let mut reported = api.check_availability(lines).await?;
    let checked: Vec<Availability> = lines
        .iter()
        .map(|line| {
            match reported.iter().position(|a| a.item_code == line.item_code) {
                Some(idx) => {
                    let mut a = reported.swap_remove(idx);
                    a.requested_quantity = line.quantity;
                    a
                }
                None => {
                    tracing::warn!(item = %line.item_code, "no availability reported, marking for purchase");
                    Availability {
                        item_code: line.item_code.clone(),
                        requested_quantity: line.quantity,
                        available_quantity: 0,
                        unit_cost: None,
                    }
                }
            }
        })
        .collect();

    let allocation = partition(checked);
    tracing::debug!(
        usage = allocation.usage.len(),
        purchase = allocation.purchase.len(),
        "material request allocated"
    );
    Ok(allocation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn availability(code: &str, requested: u32, available: u32, cost: Option<f64>) -> Availability {
        Availability {
            item_code: code.into(),
            requested_quantity: requested,
            available_quantity: available,
            unit_cost: cost,
        }
    }

    #[test]
    fn test_available_iff_stock_covers_request() {
        let cases = [(5, 5, true), (5, 6, true), (5, 4, false), (1, 0, false)];
        for (requested, stock, expected) in cases {
            let line = AllocatedLine::from(availability("X", requested, stock, None));
            assert_eq!(line.available, expected, "requested {requested}, stock {stock}");
        }
    }

    #[test]
    fn test_partition_keeps_order() {
        let allocation = partition(vec![
            availability("LAMP", 2, 10, Some(30.0)),
            availability("CABLE", 50, 20, Some(1.25)),
            availability("BOLT", 4, 4, None),
            availability("POLE", 1, 0, Some(900.0)),
        ]);
        let usage: Vec<_> = allocation.usage.iter().map(|l| l.item_code.as_str()).collect();
        let purchase: Vec<_> = allocation.purchase.iter().map(|l| l.item_code.as_str()).collect();
        assert_eq!(usage, vec!["LAMP", "BOLT"]);
        assert_eq!(purchase, vec!["CABLE", "POLE"]);
        assert!(allocation.needs_purchase());
    }

    #[test]
    fn test_purchase_cost_estimate() {
        let allocation = partition(vec![
            availability("CABLE", 50, 20, Some(1.25)),
            availability("POLE", 1, 0, Some(900.0)),
            availability("MISC", 3, 0, None),
        ]);
        assert_eq!(allocation.estimated_purchase_cost(), Decimal::new(96250, 2));
    }
}
