//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. An
/// amount of `4500` cents is the same amount wherever it appears; an invoice
/// with a given id is the same invoice even after its fields change.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// struct AmountCents(i64);
///
/// impl ValueObject for AmountCents {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
