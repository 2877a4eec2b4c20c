use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use super::classifier::{classify, Classifiable};
use super::models::{DeletionSet, MembershipVariant, Snapshot};
use super::rules::ClassifierRules;

/// Compute the five-way deletion set from a snapshot.
///
/// One forward pass per entity kind, in dependency order. The graph is
/// acyclic and processed in exactly topological order, so no kind's set
/// depends on a kind computed after it and a single pass suffices.
/// Conversations are never classified directly; their inclusion is purely
/// relational, as is membership inclusion per variant.
pub fn build_deletion_set(
    snapshot: &Snapshot,
    rules: &ClassifierRules,
    now: DateTime<Utc>,
) -> DeletionSet {
    let accounts: Vec<_> = snapshot
        .accounts
        .iter()
        .filter(|a| classify(&a.text_profile(), rules, now))
        .cloned()
        .collect();
    let account_ids: HashSet<Uuid> = accounts.iter().map(|a| a.id).collect();
    debug!("Classified {} of {} accounts", accounts.len(), snapshot.accounts.len());

    let projects: Vec<_> = snapshot
        .projects
        .iter()
        .filter(|p| {
            account_ids.contains(&p.account_id) || classify(&p.text_profile(), rules, now)
        })
        .cloned()
        .collect();
    let project_ids: HashSet<Uuid> = projects.iter().map(|p| p.id).collect();
    debug!("Collected {} of {} projects", projects.len(), snapshot.projects.len());

    let leads: Vec<_> = snapshot
        .leads
        .iter()
        .filter(|l| {
            l.project_id.is_some_and(|id| project_ids.contains(&id))
                || l.account_id.is_some_and(|id| account_ids.contains(&id))
                || classify(&l.text_profile(), rules, now)
        })
        .cloned()
        .collect();
    let lead_ids: HashSet<Uuid> = leads.iter().map(|l| l.id).collect();
    debug!("Collected {} of {} leads", leads.len(), snapshot.leads.len());

    let conversations: Vec<_> = snapshot
        .conversations
        .iter()
        .filter(|c| {
            lead_ids.contains(&c.lead_id)
                || c.project_id.is_some_and(|id| project_ids.contains(&id))
        })
        .cloned()
        .collect();
    let conversation_ids: HashSet<Uuid> = conversations.iter().map(|c| c.id).collect();
    debug!(
        "Collected {} of {} conversations",
        conversations.len(),
        snapshot.conversations.len()
    );

    let memberships: Vec<_> = snapshot
        .memberships
        .iter()
        .filter(|m| {
            let parents = match m.variant {
                MembershipVariant::Account => &account_ids,
                MembershipVariant::Project => &project_ids,
                MembershipVariant::Lead => &lead_ids,
                MembershipVariant::Conversation => &conversation_ids,
            };
            parents.contains(&m.parent_id)
        })
        .cloned()
        .collect();
    debug!(
        "Collected {} of {} memberships",
        memberships.len(),
        snapshot.memberships.len()
    );

    let set = DeletionSet {
        accounts,
        projects,
        leads,
        conversations,
        memberships,
    };
    info!("Deletion set holds {} records", set.total());
    set
}
