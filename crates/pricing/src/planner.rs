//! Greedy, priority-first procurement planner.

use serde::{Deserialize, Serialize};

use procura_catalog::Offer;
use procura_core::{DomainResult, Money, OfferId, Quantity, SupplierId};

/// One supplier allocation within a procurement plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcurementPlanEntry {
    pub supplier_id: SupplierId,
    pub supplier_name: String,
    pub offer_id: OfferId,
    pub quantity: Quantity,
    pub price_per_unit: Money,
    /// `quantity * price_per_unit`, rounded half-up to 2 decimals.
    pub cost: Money,
    pub priority: i32,
}

/// Allocations in walk order plus the quantity no offer could cover.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcurementPlan {
    pub entries: Vec<ProcurementPlanEntry>,
    pub shortfall: Quantity,
}

impl ProcurementPlan {
    /// Sum of entry costs (each already rounded).
    pub fn total_cost(&self) -> Money {
        self.entries.iter().map(|entry| entry.cost).sum()
    }

    pub fn allocated_quantity(&self) -> Quantity {
        self.entries.iter().map(|entry| entry.quantity).sum()
    }

    pub fn has_shortfall(&self) -> bool {
        self.shortfall.is_positive()
    }
}

/// Allocate `required` across `ranked` offers, walking them in the given order.
///
/// Each offer with positive stock contributes `min(remaining, stock)`; offers
/// with missing or non-positive stock are skipped. There is no backtracking and
/// no re-sorting: the caller's ranking is the allocation order. Whatever is left
/// once the offers run out is reported as `shortfall`.
///
/// Fails with a validation error when `required` is negative.
pub fn plan(required: Quantity, ranked: &[&Offer]) -> DomainResult<ProcurementPlan> {
    required.ensure_non_negative("required quantity")?;

    let mut result = ProcurementPlan::default();
    let mut remaining = required;

    for offer in ranked {
        if !remaining.is_positive() {
            break;
        }
        if !offer.has_stock() {
            continue;
        }

        let quantity = remaining.min(offer.stock_or_zero());
        let price = offer.price();

        result.entries.push(ProcurementPlanEntry {
            supplier_id: offer.supplier_id(),
            supplier_name: offer.supplier().name.clone(),
            offer_id: offer.id_typed(),
            quantity,
            price_per_unit: price,
            cost: price.times(quantity),
            priority: offer.priority(),
        });

        remaining = remaining - quantity;
    }

    result.shortfall = if remaining.is_positive() {
        remaining
    } else {
        Quantity::ZERO
    };

    tracing::trace!(
        required = %required,
        entries = result.entries.len(),
        shortfall = %result.shortfall,
        "procurement plan computed"
    );

    Ok(result)
}
