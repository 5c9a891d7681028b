//! Order pricing matrix: procurement plans and margins for open order lines.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use procura_catalog::{Offer, OrderPosition, Product};
use procura_core::{
    AccountId, DomainResult, Money, OrderPositionId, ProductId, Quantity, round_half_up,
};

use crate::planner::{ProcurementPlan, plan};
use crate::ranking::{RankingCriterion, rank};
use crate::scope::{ensure_account, ensure_product_offers};

/// Pricing outcome of one order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LinePricing {
    /// The product has no offers at all; nothing was planned.
    NoOffers,
    Planned(PlannedLine),
}

/// Plan and margin figures for a line that had offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedLine {
    pub plan: ProcurementPlan,
    pub total_procurement_cost: Money,
    /// `customer_price * required_quantity - total_procurement_cost`.
    pub margin: Money,
    /// Percent, 2 decimals; 0 when there is no revenue to divide by.
    pub margin_percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPricingLine {
    pub order_id: OrderPositionId,
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub product_code: Option<String>,
    /// Uncovered quantity (`total - purchased`) the plan was computed for.
    pub required_quantity: Quantity,
    pub customer_price: Money,
    #[serde(flatten)]
    pub pricing: LinePricing,
}

impl OrderPricingLine {
    pub fn plan(&self) -> Option<&ProcurementPlan> {
        match &self.pricing {
            LinePricing::Planned(planned) => Some(&planned.plan),
            LinePricing::NoOffers => None,
        }
    }

    pub fn has_no_offers(&self) -> bool {
        matches!(self.pricing, LinePricing::NoOffers)
    }

    pub fn total_procurement_cost(&self) -> Option<Money> {
        match &self.pricing {
            LinePricing::Planned(planned) => Some(planned.total_procurement_cost),
            LinePricing::NoOffers => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPricingMatrix {
    pub account_id: AccountId,
    pub orders_count: usize,
    pub total_procurement_cost: Money,
    pub orders: Vec<OrderPricingLine>,
}

/// Build the pricing matrix for `order_lines`.
///
/// Lines keep their input order. Fully covered lines (remaining quantity
/// `<= 0`) and purchase-order positions are omitted. A product without offers
/// yields a `NoOffers` line; otherwise offers are ranked by priority and
/// planned for the remaining quantity.
///
/// `products` is only used for display fields; a missing entry leaves the
/// product name and code empty.
pub fn build_matrix(
    account_id: AccountId,
    order_lines: &[OrderPosition],
    products: &HashMap<ProductId, Product>,
    offers_by_product: &HashMap<ProductId, Vec<Offer>>,
) -> DomainResult<OrderPricingMatrix> {
    let mut orders = Vec::new();
    let mut total_procurement_cost = Money::ZERO;

    for line in order_lines {
        ensure_account(account_id, line, "order position")?;

        if !line.is_customer_order() {
            tracing::debug!(order_id = %line.id_typed(), "skipping purchase-order position");
            continue;
        }

        let remaining = line.remaining_quantity();
        if !remaining.is_positive() {
            tracing::debug!(order_id = %line.id_typed(), "order line fully covered");
            continue;
        }

        let product_id = line.product_id();
        let product = products.get(&product_id);
        if let Some(product) = product {
            ensure_account(account_id, product, "product")?;
        }

        let offers = offers_by_product
            .get(&product_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        ensure_product_offers(account_id, product_id, offers)?;

        let pricing = if offers.is_empty() {
            LinePricing::NoOffers
        } else {
            let ranked = rank(offers, RankingCriterion::Priority);
            let plan = plan(remaining, &ranked)?;
            let planned = price_line(line.price(), remaining, plan);
            total_procurement_cost += planned.total_procurement_cost;
            LinePricing::Planned(planned)
        };

        orders.push(OrderPricingLine {
            order_id: line.id_typed(),
            product_id,
            product_name: product.map(|p| p.name().to_string()),
            product_code: product.and_then(|p| p.code().map(str::to_string)),
            required_quantity: remaining,
            customer_price: line.price(),
            pricing,
        });
    }

    Ok(OrderPricingMatrix {
        account_id,
        orders_count: orders.len(),
        total_procurement_cost: Money::new(total_procurement_cost.amount()),
        orders,
    })
}

fn price_line(customer_price: Money, quantity: Quantity, plan: ProcurementPlan) -> PlannedLine {
    let total_procurement_cost = plan.total_cost();
    let revenue = customer_price.amount() * quantity.value();
    let margin = Money::new(revenue - total_procurement_cost.amount());

    let margin_percentage = if customer_price.is_zero() || quantity.is_zero() {
        Decimal::ZERO
    } else {
        total_procurement_cost
            .amount()
            .checked_div(revenue)
            .map(|ratio| round_half_up((Decimal::ONE - ratio) * Decimal::ONE_HUNDRED, 2))
            .unwrap_or(Decimal::ZERO)
    };

    PlannedLine {
        plan,
        total_procurement_cost,
        margin,
        margin_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use procura_core::DomainError;
    use rust_decimal_macros::dec;

    struct Fixture {
        account: AccountId,
        product: Product,
        offers: HashMap<ProductId, Vec<Offer>>,
        products: HashMap<ProductId, Product>,
    }

    /// One product with S1 (stock 5 @ 10, prio 2) and S2 (stock 10 @ 8, prio 1).
    fn fixture() -> Fixture {
        let account = AccountId::new();
        let product = product(account, "widget");
        let offers = vec![
            offer(account, product.id_typed(), &supplier_ref("S1"), dec!(10), Some(dec!(5)), 2),
            offer(account, product.id_typed(), &supplier_ref("S2"), dec!(8), Some(dec!(10)), 1),
        ];
        Fixture {
            account,
            offers: HashMap::from([(product.id_typed(), offers)]),
            products: HashMap::from([(product.id_typed(), product.clone())]),
            product,
        }
    }

    fn planned(line: &OrderPricingLine) -> &PlannedLine {
        match &line.pricing {
            LinePricing::Planned(planned) => planned,
            LinePricing::NoOffers => panic!("expected a planned line"),
        }
    }

    #[test]
    fn prices_remaining_quantity_with_margin() {
        let fx = fixture();
        let line = customer_line(fx.account, fx.product.id_typed(), dec!(10), dec!(2), dec!(12));

        let matrix = build_matrix(fx.account, &[line.clone()], &fx.products, &fx.offers).unwrap();

        assert_eq!(matrix.orders_count, 1);
        let priced = &matrix.orders[0];
        assert_eq!(priced.order_id, line.id_typed());
        assert_eq!(priced.product_name.as_deref(), Some("widget"));
        assert_eq!(priced.required_quantity, qty(dec!(8)));

        let planned = planned(priced);
        assert_eq!(planned.total_procurement_cost, money(dec!(74)));
        // 12 * 8 = 96 revenue
        assert_eq!(planned.margin, money(dec!(22)));
        // (1 - 74/96) * 100 = 22.916.. -> 22.92
        assert_eq!(planned.margin_percentage, dec!(22.92));
        assert_eq!(matrix.total_procurement_cost, money(dec!(74)));
    }

    #[test]
    fn omits_fully_covered_lines_and_keeps_order() {
        let fx = fixture();
        let pid = fx.product.id_typed();
        let first = customer_line(fx.account, pid, dec!(3), dec!(0), dec!(12));
        let covered = customer_line(fx.account, pid, dec!(4), dec!(4), dec!(12));
        let over_covered = customer_line(fx.account, pid, dec!(4), dec!(6), dec!(12));
        let last = customer_line(fx.account, pid, dec!(1), dec!(0), dec!(12));

        let matrix = build_matrix(
            fx.account,
            &[first.clone(), covered, over_covered, last.clone()],
            &fx.products,
            &fx.offers,
        )
        .unwrap();

        let ids: Vec<_> = matrix.orders.iter().map(|l| l.order_id).collect();
        assert_eq!(ids, vec![first.id_typed(), last.id_typed()]);
        assert_eq!(matrix.orders_count, 2);
    }

    #[test]
    fn product_without_offers_is_flagged() {
        let fx = fixture();
        let lonely = product(fx.account, "lonely");
        let line = customer_line(fx.account, lonely.id_typed(), dec!(5), dec!(0), dec!(3));

        let matrix = build_matrix(fx.account, &[line], &fx.products, &fx.offers).unwrap();

        assert_eq!(matrix.orders.len(), 1);
        assert!(matrix.orders[0].has_no_offers());
        assert!(matrix.orders[0].plan().is_none());
        assert_eq!(matrix.total_procurement_cost, Money::ZERO);
    }

    #[test]
    fn shortfall_is_kept_on_the_line() {
        let fx = fixture();
        let line = customer_line(fx.account, fx.product.id_typed(), dec!(20), dec!(0), dec!(15));

        let matrix = build_matrix(fx.account, &[line], &fx.products, &fx.offers).unwrap();

        let planned = planned(&matrix.orders[0]);
        assert_eq!(planned.plan.shortfall, qty(dec!(5)));
        assert_eq!(planned.total_procurement_cost, money(dec!(130)));
        // revenue is computed on the full remaining quantity: 15 * 20 = 300
        assert_eq!(planned.margin, money(dec!(170)));
    }

    #[test]
    fn zero_customer_price_gives_zero_margin_percentage() {
        let fx = fixture();
        let line = customer_line(fx.account, fx.product.id_typed(), dec!(2), dec!(0), dec!(0));

        let matrix = build_matrix(fx.account, &[line], &fx.products, &fx.offers).unwrap();

        let planned = planned(&matrix.orders[0]);
        assert_eq!(planned.margin_percentage, Decimal::ZERO);
        assert_eq!(planned.margin, money(dec!(-20)));
    }

    #[test]
    fn aggregates_total_across_lines() {
        let fx = fixture();
        let pid = fx.product.id_typed();
        let a = customer_line(fx.account, pid, dec!(1), dec!(0), dec!(12));
        let b = customer_line(fx.account, pid, dec!(7), dec!(0), dec!(12));

        let matrix = build_matrix(fx.account, &[a, b], &fx.products, &fx.offers).unwrap();

        // each line plans independently against the same snapshot: 10 + (50 + 16)
        assert_eq!(matrix.total_procurement_cost, money(dec!(76)));
    }

    #[test]
    fn missing_product_details_leave_names_empty() {
        let fx = fixture();
        let line = customer_line(fx.account, fx.product.id_typed(), dec!(1), dec!(0), dec!(12));

        let matrix = build_matrix(fx.account, &[line], &HashMap::new(), &fx.offers).unwrap();

        assert_eq!(matrix.orders[0].product_name, None);
        assert!(!matrix.orders[0].has_no_offers());
    }

    #[test]
    fn rejects_lines_from_another_account() {
        let fx = fixture();
        let foreign = customer_line(AccountId::new(), fx.product.id_typed(), dec!(1), dec!(0), dec!(1));

        let err = build_matrix(fx.account, &[foreign], &fx.products, &fx.offers).unwrap_err();
        assert!(matches!(err, DomainError::AccountMismatch(_)));
    }

    #[test]
    fn rejects_offers_listed_under_the_wrong_product() {
        let fx = fixture();
        let other = product(fx.account, "other");
        let misplaced = fx.offers[&fx.product.id_typed()].clone();
        let offers = HashMap::from([(other.id_typed(), misplaced)]);
        let line = customer_line(fx.account, other.id_typed(), dec!(1), dec!(0), dec!(1));

        let err = build_matrix(fx.account, &[line], &fx.products, &offers).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn serializes_status_tag() {
        let fx = fixture();
        let lonely = product(fx.account, "lonely");
        let line = customer_line(fx.account, lonely.id_typed(), dec!(5), dec!(0), dec!(3));

        let matrix = build_matrix(fx.account, &[line], &fx.products, &fx.offers).unwrap();
        let json = serde_json::to_value(&matrix).unwrap();

        assert_eq!(json["orders"][0]["status"], "no_offers");
    }
}
