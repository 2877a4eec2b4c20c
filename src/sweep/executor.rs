use chrono::{DateTime, Utc};
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::{error, info};
use uuid::Uuid;

use super::models::{DeletionSet, MembershipVariant, StoreTable};
use crate::db::DataStore;

/// Result of one batched delete against one table.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub table: StoreTable,
    pub requested: usize,
    pub deleted: u64,
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Immutable record of an execution run, assembled once and returned.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    pub batches: Vec<BatchOutcome>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl ExecutionReport {
    pub fn deleted_total(&self) -> u64 {
        self.batches.iter().map(|b| b.deleted).sum()
    }

    pub fn failures(&self) -> Vec<&BatchOutcome> {
        self.batches.iter().filter(|b| !b.succeeded()).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.batches.iter().all(BatchOutcome::succeeded)
    }
}

/// Delete a planned set, leaves first: memberships (one batch per variant),
/// then conversations, leads, projects, accounts. The stage order is the one
/// correctness-critical sequencing constraint in the tool and must never be
/// reordered. A failed batch is recorded and the run moves on; there is no
/// rollback and no cancellation once the first batch is issued.
pub async fn execute<S>(store: &S, set: &DeletionSet) -> ExecutionReport
where
    S: DataStore + ?Sized,
{
    let started_at = Utc::now();
    let mut batches = Vec::new();

    for variant in MembershipVariant::iter() {
        let ids = set.membership_ids(variant);
        if ids.is_empty() {
            continue;
        }
        batches.push(delete_batch(store, variant.table(), &ids).await);
    }

    let stages: [(StoreTable, Vec<Uuid>); 4] = [
        (
            StoreTable::Conversations,
            set.conversations.iter().map(|r| r.id).collect(),
        ),
        (StoreTable::Leads, set.leads.iter().map(|r| r.id).collect()),
        (
            StoreTable::Projects,
            set.projects.iter().map(|r| r.id).collect(),
        ),
        (
            StoreTable::Accounts,
            set.accounts.iter().map(|r| r.id).collect(),
        ),
    ];

    for (table, ids) in stages {
        if ids.is_empty() {
            continue;
        }
        batches.push(delete_batch(store, table, &ids).await);
    }

    let report = ExecutionReport {
        batches,
        started_at,
        completed_at: Utc::now(),
    };
    info!(
        "Execution finished: {} deleted, {} failed batches",
        report.deleted_total(),
        report.failures().len()
    );
    report
}

async fn delete_batch<S>(store: &S, table: StoreTable, ids: &[Uuid]) -> BatchOutcome
where
    S: DataStore + ?Sized,
{
    match store.delete_by_ids(table, ids).await {
        Ok(deleted) => {
            info!("Deleted {} rows from {}", deleted, table);
            BatchOutcome {
                table,
                requested: ids.len(),
                deleted,
                error: None,
            }
        }
        Err(e) => {
            error!("Failed to delete from {}: {}", table, e);
            BatchOutcome {
                table,
                requested: ids.len(),
                deleted: 0,
                error: Some(e.to_string()),
            }
        }
    }
}
