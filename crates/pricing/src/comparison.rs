//! Cross-supplier aggregate statistics.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use procura_catalog::{Offer, Supplier};
use procura_core::{AccountId, DomainResult, Money, OfferId, ProductId, Quantity, SupplierId};

use crate::scope::{ensure_account, ensure_supplier_offers};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierOfferLine {
    pub offer_id: OfferId,
    pub product_id: ProductId,
    pub price: Money,
    pub stock: Quantity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierStats {
    pub supplier_id: SupplierId,
    pub supplier_name: String,
    pub total_offers: usize,
    /// Mean offer price, half-up to 2 decimals; 0 when the supplier has no offers.
    pub avg_price: Money,
    pub total_stock: Quantity,
    pub products_covered: usize,
    pub offers: Vec<SupplierOfferLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierComparison {
    pub account_id: AccountId,
    pub suppliers_count: usize,
    pub suppliers: Vec<SupplierStats>,
}

/// Summarise each supplier's offers. Suppliers keep their input order.
pub fn compare_suppliers(
    account_id: AccountId,
    suppliers: &[Supplier],
    offers_by_supplier: &HashMap<SupplierId, Vec<Offer>>,
) -> DomainResult<SupplierComparison> {
    let mut stats = Vec::with_capacity(suppliers.len());

    for supplier in suppliers {
        ensure_account(account_id, supplier, "supplier")?;

        let supplier_id = supplier.id_typed();
        let offers = offers_by_supplier
            .get(&supplier_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        ensure_supplier_offers(account_id, supplier_id, offers)?;

        stats.push(supplier_stats(supplier, offers));
    }

    Ok(SupplierComparison {
        account_id,
        suppliers_count: stats.len(),
        suppliers: stats,
    })
}

fn supplier_stats(supplier: &Supplier, offers: &[Offer]) -> SupplierStats {
    let total_offers = offers.len();

    let avg_price = if offers.is_empty() {
        Money::ZERO
    } else {
        let sum: Decimal = offers.iter().map(|offer| offer.price().amount()).sum();
        Money::new(sum / Decimal::from(total_offers as u64))
    };

    let products_covered = offers
        .iter()
        .map(Offer::product_id)
        .collect::<HashSet<_>>()
        .len();

    SupplierStats {
        supplier_id: supplier.id_typed(),
        supplier_name: supplier.name().to_string(),
        total_offers,
        avg_price,
        total_stock: offers.iter().map(Offer::stock_or_zero).sum(),
        products_covered,
        offers: offers
            .iter()
            .map(|offer| SupplierOfferLine {
                offer_id: offer.id_typed(),
                product_id: offer.product_id(),
                price: offer.price(),
                stock: offer.stock_or_zero(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use procura_core::DomainError;
    use rust_decimal_macros::dec;

    #[test]
    fn aggregates_per_supplier() {
        let account = AccountId::new();
        let acme_ref = supplier_ref("Acme");
        let acme = supplier(account, &acme_ref);
        let p1 = product(account, "p1");
        let p2 = product(account, "p2");

        let offers = HashMap::from([(
            acme.id_typed(),
            vec![
                offer(account, p1.id_typed(), &acme_ref, dec!(10), Some(dec!(2.5)), 1),
                offer(account, p2.id_typed(), &acme_ref, dec!(5), None, 0),
                offer(account, p2.id_typed(), &acme_ref, dec!(5.01), Some(dec!(1)), 0),
            ],
        )]);

        let comparison = compare_suppliers(account, &[acme], &offers).unwrap();

        assert_eq!(comparison.suppliers_count, 1);
        let stats = &comparison.suppliers[0];
        assert_eq!(stats.total_offers, 3);
        // 20.01 / 3 = 6.67
        assert_eq!(stats.avg_price, money(dec!(6.67)));
        assert_eq!(stats.total_stock, qty(dec!(3.5)));
        assert_eq!(stats.products_covered, 2);
        assert_eq!(stats.offers.len(), 3);
        assert_eq!(stats.offers[1].stock, Quantity::ZERO);
    }

    #[test]
    fn supplier_without_offers_has_zero_stats() {
        let account = AccountId::new();
        let idle = supplier(account, &supplier_ref("Idle"));

        let comparison = compare_suppliers(account, &[idle], &HashMap::new()).unwrap();

        let stats = &comparison.suppliers[0];
        assert_eq!(stats.total_offers, 0);
        assert_eq!(stats.avg_price, Money::ZERO);
        assert_eq!(stats.total_stock, Quantity::ZERO);
        assert_eq!(stats.products_covered, 0);
    }

    #[test]
    fn keeps_supplier_input_order() {
        let account = AccountId::new();
        let b = supplier(account, &supplier_ref("B"));
        let a = supplier(account, &supplier_ref("A"));

        let comparison = compare_suppliers(account, &[b, a], &HashMap::new()).unwrap();

        let names: Vec<_> = comparison.suppliers.iter().map(|s| s.supplier_name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn rejects_supplier_from_other_account() {
        let foreign = supplier(AccountId::new(), &supplier_ref("Foreign"));

        let err = compare_suppliers(AccountId::new(), &[foreign], &HashMap::new()).unwrap_err();
        assert!(matches!(err, DomainError::AccountMismatch(_)));
    }
}
