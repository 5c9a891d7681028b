//! Batch grouping: regroup an order pricing matrix by supplier so one purchase
//! order can be raised per supplier.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use procura_core::{AccountId, Money, OrderPositionId, ProductId, Quantity, SupplierId};

use crate::matrix::OrderPricingMatrix;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierGroupItem {
    pub order_id: OrderPositionId,
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub quantity: Quantity,
    pub price: Money,
    pub cost: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierGroup {
    pub supplier_id: SupplierId,
    pub supplier_name: String,
    pub items: Vec<SupplierGroupItem>,
    /// Running sum of item costs.
    pub total_cost: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierBatches {
    pub account_id: AccountId,
    pub suppliers_count: usize,
    pub suppliers: Vec<SupplierGroup>,
}

/// Bucket every plan entry of `matrix` by supplier.
///
/// Buckets appear in the order their supplier is first seen while walking the
/// lines and entries. `NoOffers` lines contribute nothing; the shortfall of a
/// partially planned line contributes nothing either, while its allocated
/// entries are grouped like any other.
pub fn group_by_supplier(matrix: &OrderPricingMatrix) -> SupplierBatches {
    let mut suppliers: Vec<SupplierGroup> = Vec::new();
    let mut index: HashMap<SupplierId, usize> = HashMap::new();

    for line in &matrix.orders {
        let Some(plan) = line.plan() else {
            continue;
        };

        for entry in &plan.entries {
            let slot = *index.entry(entry.supplier_id).or_insert_with(|| {
                suppliers.push(SupplierGroup {
                    supplier_id: entry.supplier_id,
                    supplier_name: entry.supplier_name.clone(),
                    items: Vec::new(),
                    total_cost: Money::ZERO,
                });
                suppliers.len() - 1
            });

            let group = &mut suppliers[slot];
            group.items.push(SupplierGroupItem {
                order_id: line.order_id,
                product_id: line.product_id,
                product_name: line.product_name.clone(),
                quantity: entry.quantity,
                price: entry.price_per_unit,
                cost: entry.cost,
            });
            group.total_cost += entry.cost;
        }
    }

    SupplierBatches {
        account_id: matrix.account_id,
        suppliers_count: suppliers.len(),
        suppliers,
    }
}
