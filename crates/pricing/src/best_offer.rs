//! Best offer per product under a chosen criterion.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use procura_catalog::{Offer, Product};
use procura_core::{AccountId, DomainResult, ProductId};

use crate::product_matrix::OfferSummary;
use crate::ranking::{RankingCriterion, rank};
use crate::scope::{ensure_account, ensure_product_offers};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestOffer {
    pub product_id: ProductId,
    pub product_name: String,
    pub best_offer: OfferSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestOffers {
    pub account_id: AccountId,
    pub criteria: RankingCriterion,
    pub offers: Vec<BestOffer>,
}

/// Top-ranked offer for each product; products without offers are left out.
pub fn best_offers(
    account_id: AccountId,
    products: &[Product],
    offers_by_product: &HashMap<ProductId, Vec<Offer>>,
    criterion: RankingCriterion,
) -> DomainResult<BestOffers> {
    let mut best = Vec::new();

    for product in products {
        ensure_account(account_id, product, "product")?;

        let product_id = product.id_typed();
        let offers = offers_by_product
            .get(&product_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        ensure_product_offers(account_id, product_id, offers)?;

        if let Some(top) = rank(offers, criterion).first() {
            best.push(BestOffer {
                product_id,
                product_name: product.name().to_string(),
                best_offer: OfferSummary::from(*top),
            });
        }
    }

    Ok(BestOffers {
        account_id,
        criteria: criterion,
        offers: best,
    })
}
