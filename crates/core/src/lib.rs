//! `procura-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, the domain error model and the fixed-point
//! money/quantity values every pricing computation is expressed in.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AccountId, OfferId, OrderPositionId, ProductId, SupplierId};
pub use money::{Money, Quantity, round_half_up};
pub use value_object::ValueObject;
