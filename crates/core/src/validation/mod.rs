//! Entity validation and transformation.
//!
//! Normalizes a raw grid payload into a record the remote store accepts,
//! or rejects it before any network call. Pure and deterministic: the same
//! input always yields the same output, and running the pipeline on its
//! own output is a no-op.

pub mod coerce;
pub mod rules;

use crate::entity::EntityType;
use crate::error::CoreError;
use crate::types::Record;

/// Normalize and check `data` for an update (and for every undo/redo
/// replay of one).
pub fn validate_and_transform(entity: EntityType, data: &Record) -> Result<Record, CoreError> {
    let mut record = data.clone();
    coerce::status_to_bool(&mut record);

    let result = match entity {
        EntityType::Student => rules::student(&mut record),
        EntityType::Teacher => rules::teacher(&mut record),
        EntityType::Material => rules::material(&mut record),
        EntityType::Lecture => rules::lecture(&mut record),
    };

    if let Err(e) = result {
        tracing::debug!(%entity, error = %e, "Record rejected by validation");
        return Err(e);
    }

    tracing::trace!(%entity, ?record, "Record normalized");
    Ok(record)
}

/// Apply create-time defaults, then [`validate_and_transform`].
pub fn prepare_for_create(entity: EntityType, data: &Record) -> Result<Record, CoreError> {
    let mut record = data.clone();
    if entity == EntityType::Lecture {
        rules::lecture_create_defaults(&mut record);
    }
    validate_and_transform(entity, &record)
}
