//! Catalog domain module (products, suppliers, offers, order positions).
//!
//! This crate contains the entities the pricing engine reads, with their
//! validation and mutation rules, implemented purely as deterministic domain
//! logic (no IO, no HTTP, no storage).

pub mod offer;
pub mod order;
pub mod product;
pub mod supplier;

pub use offer::{NewOffer, Offer, OfferChanges, SupplierRef};
pub use order::{NewOrderPosition, OrderPosition, PositionKind};
pub use product::{NewProduct, Product, ProductKind};
pub use supplier::{NewSupplier, Supplier};
