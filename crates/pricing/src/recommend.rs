//! Single-supplier recommendation for one product and quantity.

use serde::{Deserialize, Serialize};

use procura_catalog::Offer;
use procura_core::{DomainResult, Money, OfferId, Quantity, SupplierId};

use crate::ranking::{RankingCriterion, rank};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub supplier_id: SupplierId,
    pub supplier_name: String,
    pub offer_id: OfferId,
    pub price: Money,
    pub available_stock: Quantity,
    /// Whether the chosen supplier alone holds the full quantity.
    pub can_fulfill: bool,
    /// `price * quantity`, rounded half-up to 2 decimals.
    pub total_cost: Money,
}

/// Pick one supplier for `quantity` units.
///
/// Offers are ranked by priority; the first one whose stock covers the whole
/// quantity wins, even if a higher-priority offer could cover part of it. When
/// no single offer can, the highest-priority offer is returned with
/// `can_fulfill == false`. Returns `None` only when there are no offers.
pub fn recommend(offers: &[Offer], quantity: Quantity) -> DomainResult<Option<Recommendation>> {
    quantity.ensure_non_negative("quantity")?;

    let ranked = rank(offers, RankingCriterion::Priority);
    let fulfils = |offer: &Offer| offer.stock_or_zero() >= quantity;

    let chosen = ranked
        .iter()
        .copied()
        .find(|offer| fulfils(offer))
        .or_else(|| ranked.first().copied());

    Ok(chosen.map(|offer| Recommendation {
        supplier_id: offer.supplier_id(),
        supplier_name: offer.supplier().name.clone(),
        offer_id: offer.id_typed(),
        price: offer.price(),
        available_stock: offer.stock_or_zero(),
        can_fulfill: fulfils(offer),
        total_cost: offer.price().times(quantity),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use procura_core::{AccountId, DomainError, ProductId};
    use rust_decimal_macros::dec;

    #[test]
    fn empty_offers_give_none() {
        assert_eq!(recommend(&[], qty(dec!(3))).unwrap(), None);
    }

    #[test]
    fn picks_lower_priority_supplier_that_can_fulfil() {
        let account = AccountId::new();
        let product = ProductId::new();
        let offers = vec![
            offer(account, product, &supplier_ref("S1"), dec!(9), Some(dec!(3)), 5),
            offer(account, product, &supplier_ref("S2"), dec!(11), Some(dec!(10)), 1),
        ];

        let rec = recommend(&offers, qty(dec!(6))).unwrap().unwrap();

        assert_eq!(rec.supplier_name, "S2");
        assert!(rec.can_fulfill);
        assert_eq!(rec.available_stock, qty(dec!(10)));
        assert_eq!(rec.total_cost, money(dec!(66)));
    }

    #[test]
    fn prefers_highest_priority_when_it_can_fulfil() {
        let account = AccountId::new();
        let product = ProductId::new();
        let offers = vec![
            offer(account, product, &supplier_ref("cheap"), dec!(1), Some(dec!(100)), 0),
            offer(account, product, &supplier_ref("preferred"), dec!(5), Some(dec!(6)), 3),
        ];

        let rec = recommend(&offers, qty(dec!(6))).unwrap().unwrap();
        assert_eq!(rec.supplier_name, "preferred");
        assert!(rec.can_fulfill);
    }

    #[test]
    fn falls_back_to_highest_priority_when_nobody_can_fulfil() {
        let account = AccountId::new();
        let product = ProductId::new();
        let offers = vec![
            offer(account, product, &supplier_ref("second"), dec!(2), Some(dec!(4)), 1),
            offer(account, product, &supplier_ref("first"), dec!(3.333), None, 7),
        ];

        let rec = recommend(&offers, qty(dec!(5))).unwrap().unwrap();

        assert_eq!(rec.supplier_name, "first");
        assert!(!rec.can_fulfill);
        assert_eq!(rec.available_stock, qty(dec!(0)));
        // 3.33 * 5
        assert_eq!(rec.total_cost, money(dec!(16.65)));
    }

    #[test]
    fn rejects_negative_quantity() {
        let err = recommend(&[], qty(dec!(-2))).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
