//! Fixture builders shared by the engine's unit tests.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use procura_catalog::{
    NewOffer, NewOrderPosition, NewProduct, NewSupplier, Offer, OrderPosition, PositionKind,
    Product, ProductKind, Supplier, SupplierRef,
};
use procura_core::{AccountId, Money, OfferId, OrderPositionId, ProductId, Quantity, SupplierId};

pub fn supplier_ref(name: &str) -> SupplierRef {
    SupplierRef {
        id: SupplierId::new(),
        name: name.to_string(),
    }
}

pub fn supplier(account_id: AccountId, reference: &SupplierRef) -> Supplier {
    Supplier::new(NewSupplier {
        id: reference.id,
        account_id,
        external_id: None,
        name: reference.name.clone(),
    })
    .unwrap()
}

pub fn product(account_id: AccountId, name: &str) -> Product {
    Product::new(NewProduct {
        id: ProductId::new(),
        account_id,
        external_id: None,
        kind: ProductKind::Product,
        name: name.to_string(),
        code: Some(format!("code-{name}")),
        article: None,
        parent_id: None,
    })
    .unwrap()
}

pub fn offer(
    account_id: AccountId,
    product_id: ProductId,
    supplier: &SupplierRef,
    price: Decimal,
    stock: Option<Decimal>,
    priority: i32,
) -> Offer {
    Offer::new(NewOffer {
        id: OfferId::new(),
        account_id,
        supplier: supplier.clone(),
        product_id,
        price: Money::new(price),
        stock: stock.map(Quantity::new),
        priority,
        updated_at: Utc.with_ymd_and_hms(2026, 1, 14, 12, 0, 0).unwrap(),
    })
    .unwrap()
}

pub fn customer_line(
    account_id: AccountId,
    product_id: ProductId,
    total: Decimal,
    purchased: Decimal,
    price: Decimal,
) -> OrderPosition {
    OrderPosition::new(NewOrderPosition {
        id: OrderPositionId::new(),
        account_id,
        external_id: None,
        kind: PositionKind::CustomerOrder,
        product_id,
        total_quantity: Quantity::new(total),
        purchase_quantity: Quantity::new(purchased),
        price: Money::new(price),
        covered_by: Vec::new(),
    })
    .unwrap()
}

pub fn qty(value: Decimal) -> Quantity {
    Quantity::new(value)
}

pub fn money(value: Decimal) -> Money {
    Money::new(value)
}
