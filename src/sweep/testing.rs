use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::models::{
    Account, Conversation, Lead, Membership, MembershipVariant, Project, Snapshot, StoreTable,
};
use crate::db::{DataStore, DataStoreError};

/// In-memory datastore fake. Deletes actually remove rows, so repeated runs
/// observe each other; every delete call is recorded in order.
pub(crate) struct MockStore {
    state: Mutex<Snapshot>,
    calls: Mutex<Vec<StoreTable>>,
    fail_deletes: HashSet<StoreTable>,
    fail_lists: HashSet<StoreTable>,
    missing_memberships: HashSet<MembershipVariant>,
}

impl MockStore {
    pub fn new(state: Snapshot) -> Self {
        Self {
            state: Mutex::new(state),
            calls: Mutex::new(Vec::new()),
            fail_deletes: HashSet::new(),
            fail_lists: HashSet::new(),
            missing_memberships: HashSet::new(),
        }
    }

    pub fn failing_delete(mut self, table: StoreTable) -> Self {
        self.fail_deletes.insert(table);
        self
    }

    pub fn failing_list(mut self, table: StoreTable) -> Self {
        self.fail_lists.insert(table);
        self
    }

    pub fn missing_memberships(mut self, variant: MembershipVariant) -> Self {
        self.missing_memberships.insert(variant);
        self
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<StoreTable> {
        self.calls.lock().unwrap().clone()
    }

    fn check_list(&self, table: StoreTable) -> Result<(), DataStoreError> {
        if self.fail_lists.contains(&table) {
            return Err(DataStoreError::Api {
                status: 500,
                body: format!("injected list failure for {}", table),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DataStore for MockStore {
    async fn list_accounts(&self) -> Result<Vec<Account>, DataStoreError> {
        self.check_list(StoreTable::Accounts)?;
        Ok(self.state.lock().unwrap().accounts.clone())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, DataStoreError> {
        self.check_list(StoreTable::Projects)?;
        Ok(self.state.lock().unwrap().projects.clone())
    }

    async fn list_leads(&self) -> Result<Vec<Lead>, DataStoreError> {
        self.check_list(StoreTable::Leads)?;
        Ok(self.state.lock().unwrap().leads.clone())
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>, DataStoreError> {
        self.check_list(StoreTable::Conversations)?;
        Ok(self.state.lock().unwrap().conversations.clone())
    }

    async fn list_memberships(
        &self,
        variant: MembershipVariant,
    ) -> Result<Vec<Membership>, DataStoreError> {
        if self.missing_memberships.contains(&variant) {
            return Err(DataStoreError::MissingTable(variant.table()));
        }
        self.check_list(variant.table())?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .memberships
            .iter()
            .filter(|m| m.variant == variant)
            .cloned()
            .collect())
    }

    async fn delete_by_ids(
        &self,
        table: StoreTable,
        ids: &[Uuid],
    ) -> Result<u64, DataStoreError> {
        self.calls.lock().unwrap().push(table);

        if self.fail_deletes.contains(&table) {
            return Err(DataStoreError::Api {
                status: 500,
                body: format!("injected delete failure for {}", table),
            });
        }

        let targets: HashSet<&Uuid> = ids.iter().collect();
        let mut state = self.state.lock().unwrap();
        let deleted = match table {
            StoreTable::Accounts => drain(&mut state.accounts, |r| targets.contains(&r.id)),
            StoreTable::Projects => drain(&mut state.projects, |r| targets.contains(&r.id)),
            StoreTable::Leads => drain(&mut state.leads, |r| targets.contains(&r.id)),
            StoreTable::Conversations => {
                drain(&mut state.conversations, |r| targets.contains(&r.id))
            }
            StoreTable::AccountMembers
            | StoreTable::ProjectMembers
            | StoreTable::LeadMembers
            | StoreTable::ConversationMembers => {
                drain(&mut state.memberships, |r| targets.contains(&r.id))
            }
        };

        Ok(deleted)
    }
}

fn drain<T>(rows: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> u64 {
    let before = rows.len();
    rows.retain(|r| !matches(r));
    (before - rows.len()) as u64
}

/// One classified account with a full chain of dependents (project, lead,
/// conversation, one membership per variant) and nothing else.
pub(crate) fn full_fixture() -> Snapshot {
    let now = Utc::now();

    let account = Account {
        id: Uuid::new_v4(),
        name: "Test Client".to_string(),
        email: Some("owner@example.com".to_string()),
        phone: None,
        created_at: Some(now),
        updated_at: None,
    };
    let project = Project {
        id: Uuid::new_v4(),
        name: "Riverside Funnel".to_string(),
        description: None,
        account_id: account.id,
        created_at: Some(now),
        updated_at: None,
    };
    let lead = Lead {
        id: Uuid::new_v4(),
        first_name: Some("John".to_string()),
        last_name: Some("Doe".to_string()),
        email: None,
        phone: None,
        project_id: Some(project.id),
        account_id: Some(account.id),
        created_at: Some(now),
        updated_at: None,
    };
    let conversation = Conversation {
        id: Uuid::new_v4(),
        lead_id: lead.id,
        project_id: Some(project.id),
        created_at: Some(now),
        updated_at: None,
    };

    let memberships = vec![
        Membership {
            id: Uuid::new_v4(),
            variant: MembershipVariant::Account,
            parent_id: account.id,
        },
        Membership {
            id: Uuid::new_v4(),
            variant: MembershipVariant::Project,
            parent_id: project.id,
        },
        Membership {
            id: Uuid::new_v4(),
            variant: MembershipVariant::Lead,
            parent_id: lead.id,
        },
        Membership {
            id: Uuid::new_v4(),
            variant: MembershipVariant::Conversation,
            parent_id: conversation.id,
        },
    ];

    Snapshot {
        accounts: vec![account],
        projects: vec![project],
        leads: vec![lead],
        conversations: vec![conversation],
        memberships,
    }
}
