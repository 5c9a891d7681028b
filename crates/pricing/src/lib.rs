//! Procurement pricing engine.
//!
//! Given a product's supplier offers and a required quantity, the engine
//! produces a deterministic multi-supplier fulfilment plan, and builds the
//! aggregate views on top of it: order pricing matrices, supplier
//! recommendations, purchase batches grouped by supplier, supplier comparison,
//! product pricing matrices and best-offer lookups.
//!
//! Every operation is a pure function of its inputs (no IO, no shared state).
//! Callers hand in a consistent, account-scoped snapshot; inputs that belong to
//! another account are rejected rather than silently mixed in.

pub mod best_offer;
pub mod comparison;
pub mod grouping;
pub mod matrix;
pub mod planner;
pub mod product_matrix;
pub mod ranking;
pub mod recommend;
mod scope;

#[cfg(test)]
pub(crate) mod test_support;

pub use best_offer::{BestOffer, BestOffers, best_offers};
pub use comparison::{SupplierComparison, SupplierOfferLine, SupplierStats, compare_suppliers};
pub use grouping::{SupplierBatches, SupplierGroup, SupplierGroupItem, group_by_supplier};
pub use matrix::{LinePricing, OrderPricingLine, OrderPricingMatrix, PlannedLine, build_matrix};
pub use planner::{ProcurementPlan, ProcurementPlanEntry, plan};
pub use product_matrix::{OfferSummary, ProductPricingMatrix, ProductPricingRow, build_product_matrix};
pub use ranking::{RankingCriterion, rank};
pub use recommend::{Recommendation, recommend};
