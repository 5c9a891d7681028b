//! Procurement service: load an account-scoped snapshot, run the engine.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{info, warn};

use procura_catalog::{Offer, OrderPosition, Product};
use procura_core::{AccountId, DomainError, OrderPositionId, ProductId, Quantity, SupplierId};
use procura_pricing::{
    BestOffers, OrderPricingMatrix, ProductPricingMatrix, RankingCriterion, Recommendation,
    SupplierBatches, SupplierComparison, best_offers, build_matrix, build_product_matrix,
    compare_suppliers, group_by_supplier, recommend,
};

use crate::catalog::{CatalogSource, SourceError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
}

/// Every requested id must resolve to a record in the account.
fn ensure_found<I, T>(
    entity: &'static str,
    requested: &[I],
    found: &[T],
    id_of: impl Fn(&T) -> I,
) -> Result<(), ServiceError>
where
    I: PartialEq + std::fmt::Display,
{
    let found_ids: Vec<I> = found.iter().map(id_of).collect();
    match requested.iter().find(|id| !found_ids.contains(id)) {
        Some(missing) => Err(ServiceError::NotFound {
            entity,
            id: missing.to_string(),
        }),
        None => Ok(()),
    }
}

pub struct ProcurementService<S> {
    source: S,
}

impl<S> ProcurementService<S>
where
    S: CatalogSource,
{
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn load_order_lines(
        &self,
        account_id: AccountId,
        order_position_ids: &[OrderPositionId],
    ) -> Result<Vec<OrderPosition>, ServiceError> {
        let positions = self.source.order_positions(account_id, order_position_ids)?;
        ensure_found("order position", order_position_ids, &positions, OrderPosition::id_typed)?;

        let skipped = positions.iter().filter(|p| !p.is_customer_order()).count();
        if skipped > 0 {
            warn!(account_id = %account_id, skipped, "ignoring purchase-order positions in pricing request");
        }
        Ok(positions)
    }

    fn load_products(
        &self,
        account_id: AccountId,
        product_ids: &[ProductId],
    ) -> Result<Vec<Product>, ServiceError> {
        let products = self.source.products(account_id, product_ids)?;
        ensure_found("product", product_ids, &products, Product::id_typed)?;
        Ok(products)
    }

    /// Price a set of customer-order lines against the account's offers.
    pub fn order_pricing_matrix(
        &self,
        account_id: AccountId,
        order_position_ids: &[OrderPositionId],
    ) -> Result<OrderPricingMatrix, ServiceError> {
        info!(account_id = %account_id, orders = order_position_ids.len(), "building order pricing matrix");

        let positions = self.load_order_lines(account_id, order_position_ids)?;

        let mut product_ids: Vec<ProductId> = Vec::new();
        for position in positions.iter().filter(|p| p.is_customer_order()) {
            if !product_ids.contains(&position.product_id()) {
                product_ids.push(position.product_id());
            }
        }

        let products: HashMap<ProductId, Product> = self
            .source
            .products(account_id, &product_ids)?
            .into_iter()
            .map(|product| (product.id_typed(), product))
            .collect();
        let offers = self.source.offers_for_products(account_id, &product_ids)?;

        let matrix = build_matrix(account_id, &positions, &products, &offers)?;

        info!(
            account_id = %account_id,
            lines = matrix.orders_count,
            total_procurement_cost = %matrix.total_procurement_cost,
            "order pricing matrix built"
        );
        Ok(matrix)
    }

    /// Single supplier suggestion for `quantity` of a product; `None` when the
    /// product has no offers.
    pub fn recommend_supplier(
        &self,
        account_id: AccountId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<Option<Recommendation>, ServiceError> {
        self.load_products(account_id, &[product_id])?;

        let offers: Vec<Offer> = self
            .source
            .offers_for_products(account_id, &[product_id])?
            .remove(&product_id)
            .unwrap_or_default();

        let recommendation = recommend(&offers, quantity)?;
        match &recommendation {
            Some(r) => info!(
                account_id = %account_id,
                product_id = %product_id,
                supplier_id = %r.supplier_id,
                can_fulfill = r.can_fulfill,
                "supplier recommended"
            ),
            None => info!(account_id = %account_id, product_id = %product_id, "no offers to recommend from"),
        }
        Ok(recommendation)
    }

    /// Purchase batches: the order pricing matrix regrouped by supplier.
    pub fn group_orders_by_supplier(
        &self,
        account_id: AccountId,
        order_position_ids: &[OrderPositionId],
    ) -> Result<SupplierBatches, ServiceError> {
        let matrix = self.order_pricing_matrix(account_id, order_position_ids)?;
        let batches = group_by_supplier(&matrix);

        info!(account_id = %account_id, suppliers = batches.suppliers_count, "orders grouped by supplier");
        Ok(batches)
    }

    pub fn pricing_matrix(
        &self,
        account_id: AccountId,
        product_ids: &[ProductId],
        supplier_filter: Option<SupplierId>,
    ) -> Result<ProductPricingMatrix, ServiceError> {
        info!(account_id = %account_id, products = product_ids.len(), "building product pricing matrix");

        let products = self.load_products(account_id, product_ids)?;
        let offers = self.source.offers_for_products(account_id, product_ids)?;

        Ok(build_product_matrix(account_id, &products, &offers, supplier_filter)?)
    }

    pub fn best_offers(
        &self,
        account_id: AccountId,
        product_ids: &[ProductId],
        criterion: RankingCriterion,
    ) -> Result<BestOffers, ServiceError> {
        info!(account_id = %account_id, products = product_ids.len(), criteria = %criterion, "selecting best offers");

        let products = self.load_products(account_id, product_ids)?;
        let offers = self.source.offers_for_products(account_id, product_ids)?;

        Ok(best_offers(account_id, &products, &offers, criterion)?)
    }

    pub fn compare_suppliers(
        &self,
        account_id: AccountId,
        supplier_ids: &[SupplierId],
    ) -> Result<SupplierComparison, ServiceError> {
        info!(account_id = %account_id, suppliers = supplier_ids.len(), "comparing suppliers");

        let suppliers = self.source.suppliers(account_id, supplier_ids)?;
        ensure_found("supplier", supplier_ids, &suppliers, |s| s.id_typed())?;
        let offers = self.source.offers_for_suppliers(account_id, supplier_ids)?;

        Ok(compare_suppliers(account_id, &suppliers, &offers)?)
    }
}
