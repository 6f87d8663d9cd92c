// Meal catalog: create, rename, re-tag, enable/disable, soft delete.
// Soft-deleted meals keep their rows so selection history stays intact.

pub mod handlers;
pub mod repo;
pub mod validation;
