use serde::Serialize;

use super::models::{DeletionSet, EntityKind};
use crate::{safe_truncate_ellipsis, MAX_SUMMARY_EXAMPLES};

const EXAMPLE_NAME_MAX_CHARS: usize = 40;

/// Per-kind slice of the deletion plan: how many records, a few display
/// names, and how many more there are beyond the examples.
#[derive(Debug, Clone, Serialize)]
pub struct KindSummary {
    pub kind: EntityKind,
    pub count: usize,
    pub examples: Vec<String>,
    pub more: usize,
}

/// Operator-facing view of the deletion plan. Pure data; rendering belongs to
/// the console layer.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub kinds: Vec<KindSummary>,
    pub total: usize,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

fn kind_summary(kind: EntityKind, names: Vec<String>) -> KindSummary {
    let count = names.len();
    let examples: Vec<String> = names
        .into_iter()
        .take(MAX_SUMMARY_EXAMPLES)
        .map(|name| safe_truncate_ellipsis(&name, EXAMPLE_NAME_MAX_CHARS))
        .collect();
    let more = count.saturating_sub(examples.len());

    KindSummary {
        kind,
        count,
        examples,
        more,
    }
}

/// Aggregate a deletion set into its operator summary.
pub fn summarize(set: &DeletionSet) -> Summary {
    let kinds = vec![
        kind_summary(
            EntityKind::Account,
            set.accounts.iter().map(|r| r.display_name()).collect(),
        ),
        kind_summary(
            EntityKind::Project,
            set.projects.iter().map(|r| r.display_name()).collect(),
        ),
        kind_summary(
            EntityKind::Lead,
            set.leads.iter().map(|r| r.display_name()).collect(),
        ),
        kind_summary(
            EntityKind::Conversation,
            set.conversations.iter().map(|r| r.display_name()).collect(),
        ),
        kind_summary(
            EntityKind::Membership,
            set.memberships.iter().map(|r| r.display_name()).collect(),
        ),
    ];

    Summary {
        total: kinds.iter().map(|k| k.count).sum(),
        kinds,
    }
}
