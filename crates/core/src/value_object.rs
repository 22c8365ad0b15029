//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values
/// (`Price`, `HexColor`, ...). To "modify" one, build a new one. Construction
/// is where validation happens, so a value object in hand is always valid.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
