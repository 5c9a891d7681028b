use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use procura_core::{
    AccountId, DomainError, DomainResult, Entity, Money, OfferId, ProductId, Quantity, SupplierId,
};

/// Supplier identity as carried on an offer (id + display name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupplierRef {
    pub id: SupplierId,
    pub name: String,
}

/// Input for creating (or upserting) an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOffer {
    pub id: OfferId,
    pub account_id: AccountId,
    pub supplier: SupplierRef,
    pub product_id: ProductId,
    pub price: Money,
    #[serde(default)]
    pub stock: Option<Quantity>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Partial update of an offer; each attribute changes independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferChanges {
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default)]
    pub stock: Option<Quantity>,
    #[serde(default)]
    pub priority: Option<i32>,
}

impl OfferChanges {
    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.stock.is_none() && self.priority.is_none()
    }
}

/// A supplier's price/stock/priority for one product within an account.
///
/// `stock` may be missing or non-positive; such offers stay listed but are
/// never allocated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NewOffer")]
pub struct Offer {
    id: OfferId,
    account_id: AccountId,
    supplier: SupplierRef,
    product_id: ProductId,
    price: Money,
    stock: Option<Quantity>,
    priority: i32,
    updated_at: DateTime<Utc>,
}

fn validate_price(price: Money) -> DomainResult<()> {
    if price.is_negative() {
        return Err(DomainError::validation(format!(
            "offer price must not be negative (got {price})"
        )));
    }
    Ok(())
}

fn validate_priority(priority: i32) -> DomainResult<()> {
    if priority < 0 {
        return Err(DomainError::validation(format!(
            "offer priority must not be negative (got {priority})"
        )));
    }
    Ok(())
}

impl Offer {
    pub fn new(input: NewOffer) -> DomainResult<Self> {
        validate_price(input.price)?;
        validate_priority(input.priority)?;

        Ok(Self {
            id: input.id,
            account_id: input.account_id,
            supplier: input.supplier,
            product_id: input.product_id,
            price: input.price,
            stock: input.stock,
            priority: input.priority,
            updated_at: input.updated_at,
        })
    }

    pub fn id_typed(&self) -> OfferId {
        self.id
    }

    pub fn supplier(&self) -> &SupplierRef {
        &self.supplier
    }

    pub fn supplier_id(&self) -> SupplierId {
        self.supplier.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn price(&self) -> Money {
        self.price
    }

    /// Raw stock as reported; `None` when unknown.
    pub fn stock(&self) -> Option<Quantity> {
        self.stock
    }

    /// Stock with "unknown" read as zero.
    pub fn stock_or_zero(&self) -> Quantity {
        self.stock.unwrap_or(Quantity::ZERO)
    }

    /// True when the offer can be allocated from (stock strictly positive).
    pub fn has_stock(&self) -> bool {
        self.stock_or_zero().is_positive()
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// True when this offer occupies the (account, supplier, product) slot.
    pub fn same_slot(&self, account_id: AccountId, supplier_id: SupplierId, product_id: ProductId) -> bool {
        self.account_id == account_id && self.supplier.id == supplier_id && self.product_id == product_id
    }

    /// Apply a partial update. Nothing changes if any attribute is invalid.
    pub fn apply_changes(&mut self, changes: &OfferChanges, at: DateTime<Utc>) -> DomainResult<()> {
        if let Some(price) = changes.price {
            validate_price(price)?;
        }
        if let Some(priority) = changes.priority {
            validate_priority(priority)?;
        }

        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(stock) = changes.stock {
            self.stock = Some(stock);
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        self.updated_at = at;
        Ok(())
    }

    /// Keep the supplier's display name in sync with the supplier record.
    pub fn refresh_supplier_name(&mut self, name: &str) {
        self.supplier.name = name.to_string();
    }
}

impl TryFrom<NewOffer> for Offer {
    type Error = DomainError;

    fn try_from(value: NewOffer) -> Result<Self, Self::Error> {
        Offer::new(value)
    }
}

impl Entity for Offer {
    type Id = OfferId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn account_id(&self) -> AccountId {
        self.account_id
    }
}
