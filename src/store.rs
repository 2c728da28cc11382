//! Helpers shared by the store-level operations of each entity.

use diesel::result::{DatabaseErrorKind, Error};

/// Outcome of deleting a row that other rows may still reference. Deletion
/// is refused (rather than cascaded) while references remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    Deleted,
    InUse,
    NotFound,
}

pub fn is_unique_violation(e: &Error) -> bool {
    matches!(e, Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
}
