pub mod classifier;
pub mod executor;
pub mod graph;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod rules;

#[cfg(test)]
pub(crate) mod testing;

pub use classifier::{classify, Classifiable, TextProfile};
pub use executor::{execute, BatchOutcome, ExecutionReport};
pub use graph::build_deletion_set;
pub use models::{
    Account, Conversation, DeletionSet, EntityKind, Lead, Membership, MembershipVariant, Project,
    Snapshot, StoreTable,
};
pub use pipeline::{fetch_snapshot, run_sweep, ConfirmationPort, SweepMode, SweepOutcome};
pub use report::{summarize, KindSummary, Summary};
pub use rules::ClassifierRules;
