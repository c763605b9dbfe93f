//! Column operations applied to a loaded table.

mod operations;

pub use operations::{ReorderOutcome, drop_missing, move_column_to_end, normalize_column};
