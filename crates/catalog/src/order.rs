use serde::{Deserialize, Serialize};

use procura_core::{
    AccountId, DomainError, DomainResult, Entity, Money, OrderPositionId, ProductId, Quantity,
};

/// Which document an order position belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionKind {
    CustomerOrder,
    PurchaseOrder,
}

/// Input for creating an order position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderPosition {
    pub id: OrderPositionId,
    pub account_id: AccountId,
    #[serde(default)]
    pub external_id: Option<String>,
    pub kind: PositionKind,
    pub product_id: ProductId,
    pub total_quantity: Quantity,
    #[serde(default)]
    pub purchase_quantity: Quantity,
    pub price: Money,
    #[serde(default)]
    pub covered_by: Vec<OrderPositionId>,
}

/// A customer-order or purchase-order line.
///
/// For customer-order lines, `purchase_quantity` is the part of the demand
/// already covered by linked purchase-order lines (`covered_by`). The expected
/// steady state is `purchase_quantity <= total_quantity`, but over-coverage is
/// representable and simply yields a non-positive remaining quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NewOrderPosition")]
pub struct OrderPosition {
    id: OrderPositionId,
    account_id: AccountId,
    external_id: Option<String>,
    kind: PositionKind,
    product_id: ProductId,
    total_quantity: Quantity,
    purchase_quantity: Quantity,
    price: Money,
    covered_by: Vec<OrderPositionId>,
}

impl OrderPosition {
    pub fn new(input: NewOrderPosition) -> DomainResult<Self> {
        input.total_quantity.ensure_non_negative("total_quantity")?;
        input.purchase_quantity.ensure_non_negative("purchase_quantity")?;
        if input.price.is_negative() {
            return Err(DomainError::validation("position price must not be negative"));
        }
        if input.kind == PositionKind::PurchaseOrder && !input.covered_by.is_empty() {
            return Err(DomainError::validation(
                "only customer-order positions can be covered by purchase orders",
            ));
        }

        Ok(Self {
            id: input.id,
            account_id: input.account_id,
            external_id: input.external_id,
            kind: input.kind,
            product_id: input.product_id,
            total_quantity: input.total_quantity,
            purchase_quantity: input.purchase_quantity,
            price: input.price,
            covered_by: input.covered_by,
        })
    }

    pub fn id_typed(&self) -> OrderPositionId {
        self.id
    }

    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    pub fn kind(&self) -> PositionKind {
        self.kind
    }

    pub fn is_customer_order(&self) -> bool {
        self.kind == PositionKind::CustomerOrder
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    pub fn purchase_quantity(&self) -> Quantity {
        self.purchase_quantity
    }

    /// Customer-facing unit price.
    pub fn price(&self) -> Money {
        self.price
    }

    /// `price * total_quantity`.
    pub fn line_total(&self) -> Money {
        self.price.times(self.total_quantity)
    }

    pub fn covered_by(&self) -> &[OrderPositionId] {
        &self.covered_by
    }

    /// Demand not yet covered by purchase orders; may be zero or negative.
    pub fn remaining_quantity(&self) -> Quantity {
        self.total_quantity - self.purchase_quantity
    }

    pub fn is_fully_covered(&self) -> bool {
        !self.remaining_quantity().is_positive()
    }

    /// Link a purchase-order position as coverage for this customer-order line.
    ///
    /// Returns `false` when the link already existed (no quantity is added twice).
    pub fn link_coverage(&mut self, purchase: &OrderPosition) -> DomainResult<bool> {
        if self.kind != PositionKind::CustomerOrder {
            return Err(DomainError::validation(
                "coverage can only be linked to a customer-order position",
            ));
        }
        if purchase.kind != PositionKind::PurchaseOrder {
            return Err(DomainError::validation(
                "coverage must come from a purchase-order position",
            ));
        }
        if purchase.account_id != self.account_id {
            return Err(DomainError::account_mismatch(
                "purchase-order position belongs to another account",
            ));
        }
        if purchase.product_id != self.product_id {
            return Err(DomainError::invariant(
                "purchase-order position covers a different product",
            ));
        }
        if self.covered_by.contains(&purchase.id) {
            return Ok(false);
        }

        self.covered_by.push(purchase.id);
        self.purchase_quantity += purchase.total_quantity;
        Ok(true)
    }
}

impl TryFrom<NewOrderPosition> for OrderPosition {
    type Error = DomainError;

    fn try_from(value: NewOrderPosition) -> Result<Self, Self::Error> {
        OrderPosition::new(value)
    }
}

impl Entity for OrderPosition {
    type Id = OrderPositionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn account_id(&self) -> AccountId {
        self.account_id
    }
}
