//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects carry no identity and are never mutated in place; `Money` and
/// `LineItem` are the main examples. Two line items with the same description,
/// quantity, price and type are interchangeable.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
