use chrono::Utc;
use strum::IntoEnumIterator;
use tracing::{info, warn};

use super::executor::{execute, ExecutionReport};
use super::graph::build_deletion_set;
use super::models::{EntityKind, MembershipVariant, Snapshot};
use super::report::{summarize, Summary};
use super::rules::ClassifierRules;
use crate::core::error::{LeadsweepError, Result};
use crate::db::DataStore;

/// How the run decides whether to mutate anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    /// Compute and report the plan, never execute.
    DryRun,
    /// Ask the confirmation port before executing.
    Confirm,
    /// Execute without asking.
    Force,
}

/// Injected operator-confirmation capability, so the pipeline never touches a
/// terminal itself.
pub trait ConfirmationPort {
    fn confirm(&self, summary: &Summary) -> bool;
}

#[derive(Debug)]
pub enum SweepOutcome {
    /// Plan computed and reported; no mutation by request.
    DryRun(Summary),
    /// Nothing classified as test data; no mutation, no prompt.
    Clean(Summary),
    /// Operator declined the confirmation prompt.
    Declined(Summary),
    Completed {
        summary: Summary,
        report: ExecutionReport,
    },
}

impl SweepOutcome {
    pub fn summary(&self) -> &Summary {
        match self {
            Self::DryRun(s) | Self::Clean(s) | Self::Declined(s) => s,
            Self::Completed { summary, .. } => summary,
        }
    }
}

/// Load all five entity kinds, strictly sequentially.
///
/// The four primary listings are fatal on failure: classifying against
/// incomplete inputs would produce a misleading plan. A membership table that
/// cannot be listed (a deployment may simply not have it) degrades to an
/// empty set with a warning.
pub async fn fetch_snapshot<S>(store: &S) -> Result<Snapshot>
where
    S: DataStore + ?Sized,
{
    let accounts = store.list_accounts().await.map_err(|e| LeadsweepError::Fetch {
        kind: EntityKind::Account,
        source: e,
    })?;
    info!("Loaded {} accounts", accounts.len());

    let projects = store.list_projects().await.map_err(|e| LeadsweepError::Fetch {
        kind: EntityKind::Project,
        source: e,
    })?;
    info!("Loaded {} projects", projects.len());

    let leads = store.list_leads().await.map_err(|e| LeadsweepError::Fetch {
        kind: EntityKind::Lead,
        source: e,
    })?;
    info!("Loaded {} leads", leads.len());

    let conversations = store
        .list_conversations()
        .await
        .map_err(|e| LeadsweepError::Fetch {
            kind: EntityKind::Conversation,
            source: e,
        })?;
    info!("Loaded {} conversations", conversations.len());

    let mut memberships = Vec::new();
    for variant in MembershipVariant::iter() {
        match store.list_memberships(variant).await {
            Ok(mut rows) => memberships.append(&mut rows),
            Err(e) => {
                warn!(
                    "Membership table {} unavailable, treating as empty: {}",
                    variant.table(),
                    e
                );
            }
        }
    }
    info!("Loaded {} memberships", memberships.len());

    Ok(Snapshot {
        accounts,
        projects,
        leads,
        conversations,
        memberships,
    })
}

/// Run the full pipeline: snapshot, classify, plan, gate, execute.
///
/// Reads happen before any write; the executor is the only stage that
/// deletes, and it is only reached when the gate allows it.
pub async fn run_sweep<S>(
    store: &S,
    rules: &ClassifierRules,
    mode: SweepMode,
    confirmation: &dyn ConfirmationPort,
) -> Result<SweepOutcome>
where
    S: DataStore + ?Sized,
{
    let snapshot = fetch_snapshot(store).await?;
    let set = build_deletion_set(&snapshot, rules, Utc::now());
    let summary = summarize(&set);

    if set.is_empty() {
        info!("No test data found");
        return Ok(SweepOutcome::Clean(summary));
    }

    match mode {
        SweepMode::DryRun => {
            info!("Dry run: {} records planned, nothing deleted", summary.total);
            Ok(SweepOutcome::DryRun(summary))
        }
        SweepMode::Confirm if !confirmation.confirm(&summary) => {
            info!("Operator declined, aborting before execution");
            Ok(SweepOutcome::Declined(summary))
        }
        SweepMode::Confirm | SweepMode::Force => {
            let report = execute(store, &set).await;
            Ok(SweepOutcome::Completed { summary, report })
        }
    }
}
