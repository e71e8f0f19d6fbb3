//! Rows that keep their identity while their columns change.

/// Something addressed by a stable id rather than by its values.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    fn id(&self) -> &Self::Id;

    /// Same entity, regardless of the other fields.
    fn same_entity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
