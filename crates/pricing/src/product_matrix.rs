//! Product pricing matrix: every offer per product, the preferred one first.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use procura_catalog::{Offer, Product, SupplierRef};
use procura_core::{AccountId, DomainResult, Money, OfferId, ProductId, Quantity, SupplierId};

use crate::ranking::{RankingCriterion, rank};
use crate::scope::{ensure_account, ensure_product_offers};

/// Flat view of one offer as shown in matrices and best-offer lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferSummary {
    pub offer_id: OfferId,
    pub supplier_id: SupplierId,
    pub supplier_name: String,
    pub price: Money,
    pub stock: Quantity,
    pub priority: i32,
}

impl From<&Offer> for OfferSummary {
    fn from(offer: &Offer) -> Self {
        Self {
            offer_id: offer.id_typed(),
            supplier_id: offer.supplier_id(),
            supplier_name: offer.supplier().name.clone(),
            price: offer.price(),
            stock: offer.stock_or_zero(),
            priority: offer.priority(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPricingRow {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_code: Option<String>,
    pub product_article: Option<String>,
    /// Price of the highest-priority offer.
    pub current_price: Option<Money>,
    /// Stock of the highest-priority offer.
    pub current_stock: Option<Quantity>,
    pub best_supplier: Option<SupplierRef>,
    /// Offers in priority order.
    pub offers: Vec<OfferSummary>,
    pub offers_count: usize,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    pub total_stock: Quantity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPricingMatrix {
    pub account_id: AccountId,
    pub products_count: usize,
    pub products: Vec<ProductPricingRow>,
}

/// One row per product (input order). With `supplier_filter`, only that
/// supplier's offers are considered.
pub fn build_product_matrix(
    account_id: AccountId,
    products: &[Product],
    offers_by_product: &HashMap<ProductId, Vec<Offer>>,
    supplier_filter: Option<SupplierId>,
) -> DomainResult<ProductPricingMatrix> {
    let mut rows = Vec::with_capacity(products.len());

    for product in products {
        ensure_account(account_id, product, "product")?;

        let product_id = product.id_typed();
        let offers = offers_by_product
            .get(&product_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        ensure_product_offers(account_id, product_id, offers)?;

        let considered: Vec<Offer> = offers
            .iter()
            .filter(|offer| supplier_filter.is_none_or(|id| offer.supplier_id() == id))
            .cloned()
            .collect();
        let ranked = rank(&considered, RankingCriterion::Priority);
        let best = ranked.first().copied();

        rows.push(ProductPricingRow {
            product_id,
            product_name: product.name().to_string(),
            product_code: product.code().map(str::to_string),
            product_article: product.article().map(str::to_string),
            current_price: best.map(Offer::price),
            current_stock: best.map(Offer::stock_or_zero),
            best_supplier: best.map(|offer| offer.supplier().clone()),
            offers: ranked.iter().map(|offer| OfferSummary::from(*offer)).collect(),
            offers_count: ranked.len(),
            min_price: ranked.iter().map(|offer| offer.price()).min(),
            max_price: ranked.iter().map(|offer| offer.price()).max(),
            total_stock: ranked.iter().map(|offer| offer.stock_or_zero()).sum(),
        });
    }

    tracing::debug!(account_id = %account_id, products = rows.len(), "product pricing matrix built");

    Ok(ProductPricingMatrix {
        account_id,
        products_count: rows.len(),
        products: rows,
    })
}
