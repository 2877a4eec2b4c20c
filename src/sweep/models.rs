use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use uuid::Uuid;

use crate::safe_truncate;

/// Top-level tenant/customer record, the root of the dependency graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub account_id: Uuid,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A lead may attach to an account directly, without a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub account_id: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub lead_id: Uuid,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Which of the four junction tables a membership row lives in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MembershipVariant {
    Account,
    Project,
    Lead,
    Conversation,
}

impl MembershipVariant {
    pub fn table(self) -> StoreTable {
        match self {
            Self::Account => StoreTable::AccountMembers,
            Self::Project => StoreTable::ProjectMembers,
            Self::Lead => StoreTable::LeadMembers,
            Self::Conversation => StoreTable::ConversationMembers,
        }
    }

    /// Column holding the parent foreign key in this variant's table.
    pub fn fk_column(self) -> &'static str {
        match self {
            Self::Account => "account_id",
            Self::Project => "project_id",
            Self::Lead => "lead_id",
            Self::Conversation => "conversation_id",
        }
    }
}

/// Normalized junction row: each variant's table carries exactly one parent
/// foreign key, flattened here to `parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub id: Uuid,
    pub variant: MembershipVariant,
    pub parent_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Account,
    Project,
    Lead,
    Conversation,
    Membership,
}

/// The eight datastore tables this tool touches. `Display` yields the wire
/// table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StoreTable {
    Accounts,
    Projects,
    Leads,
    Conversations,
    AccountMembers,
    ProjectMembers,
    LeadMembers,
    ConversationMembers,
}

/// Read-only snapshot of all five entity kinds at invocation time.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub accounts: Vec<Account>,
    pub projects: Vec<Project>,
    pub leads: Vec<Lead>,
    pub conversations: Vec<Conversation>,
    pub memberships: Vec<Membership>,
}

/// Five-way partition of records slated for removal.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeletionSet {
    pub accounts: Vec<Account>,
    pub projects: Vec<Project>,
    pub leads: Vec<Lead>,
    pub conversations: Vec<Conversation>,
    pub memberships: Vec<Membership>,
}

impl DeletionSet {
    pub fn total(&self) -> usize {
        self.accounts.len()
            + self.projects.len()
            + self.leads.len()
            + self.conversations.len()
            + self.memberships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn membership_ids(&self, variant: MembershipVariant) -> Vec<Uuid> {
        self.memberships
            .iter()
            .filter(|m| m.variant == variant)
            .map(|m| m.id)
            .collect()
    }
}

impl Account {
    pub fn display_name(&self) -> String {
        self.name.clone()
    }
}

impl Project {
    pub fn display_name(&self) -> String {
        self.name.clone()
    }
}

impl Lead {
    /// Full name when present, then email, then the id.
    pub fn display_name(&self) -> String {
        let full_name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .iter()
            .flatten()
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if !full_name.trim().is_empty() {
            return full_name.trim().to_string();
        }
        if let Some(email) = &self.email {
            if !email.is_empty() {
                return email.clone();
            }
        }
        self.id.to_string()
    }
}

impl Conversation {
    pub fn display_name(&self) -> String {
        format!("conversation {}", safe_truncate(&self.id.to_string(), 8))
    }
}

impl Membership {
    pub fn display_name(&self) -> String {
        format!(
            "{} member {}",
            self.variant,
            safe_truncate(&self.id.to_string(), 8)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn test_table_names() {
        assert_eq!(StoreTable::Accounts.to_string(), "accounts");
        assert_eq!(StoreTable::AccountMembers.to_string(), "account_members");
        assert_eq!(
            StoreTable::ConversationMembers.to_string(),
            "conversation_members"
        );
    }

    #[test]
    fn test_variant_tables_are_distinct() {
        let tables: HashSet<_> = MembershipVariant::iter().map(|v| v.table()).collect();
        assert_eq!(tables.len(), 4);
    }

    #[test]
    fn test_lead_display_name_fallbacks() {
        let mut lead = Lead {
            id: Uuid::new_v4(),
            first_name: Some("John".to_string()),
            last_name: Some("Doe".to_string()),
            email: Some("john@acme.test".to_string()),
            phone: None,
            project_id: None,
            account_id: None,
            created_at: None,
            updated_at: None,
        };
        assert_eq!(lead.display_name(), "John Doe");

        lead.first_name = None;
        lead.last_name = None;
        assert_eq!(lead.display_name(), "john@acme.test");

        lead.email = None;
        assert_eq!(lead.display_name(), lead.id.to_string());
    }
}
