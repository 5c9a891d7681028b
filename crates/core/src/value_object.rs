//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. `Money` and
/// `Quantity` are the two the pricing engine is built on: two amounts with the
/// same decimal value are equal regardless of how they were computed.
///
/// - **Value Object**: no identity (two value objects with same values are equal)
/// - **Entity**: has identity (two entities with same ID are the same entity)
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
