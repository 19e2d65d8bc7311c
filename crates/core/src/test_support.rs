//! Fixtures shared by the unit tests.

use crate::model::{TypeDescriptor, TypeKind};

/// Descriptor that names a declaration in `origin`.
pub fn entity(name: impl Into<String>, origin: impl Into<String>) -> TypeDescriptor {
    TypeDescriptor::new(name, origin, TypeKind::Entity)
}
