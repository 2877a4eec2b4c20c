use thiserror::Error;

use crate::db::DataStoreError;
use crate::sweep::models::EntityKind;

/// Crate-level error taxonomy.
///
/// Listing one of the four primary entity kinds is the only fatal failure: the
/// plan would be computed from incomplete inputs, so the run aborts instead of
/// showing a misleading partial plan. Delete failures are not represented
/// here at all; they are recorded per batch in the execution report and never
/// propagate.
#[derive(Error, Debug)]
pub enum LeadsweepError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to list {kind} records: {source}")]
    Fetch {
        kind: EntityKind,
        source: DataStoreError,
    },

    #[error("Datastore error: {0}")]
    Store(#[from] DataStoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LeadsweepError>;
