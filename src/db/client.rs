use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::sweep::models::{
    Account, Conversation, Lead, Membership, MembershipVariant, Project, StoreTable,
};
use crate::DEFAULT_DATASTORE_URL;

#[derive(Debug, Error)]
pub enum DataStoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Datastore API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Response decode failed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("Table not found: {0}")]
    MissingTable(StoreTable),
}

/// Persistence seam the pipeline and executor run against.
///
/// Listing is read-only; `delete_by_ids` is the only mutating operation and is
/// only ever reached through the executor.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn list_accounts(&self) -> Result<Vec<Account>, DataStoreError>;
    async fn list_projects(&self) -> Result<Vec<Project>, DataStoreError>;
    async fn list_leads(&self) -> Result<Vec<Lead>, DataStoreError>;
    async fn list_conversations(&self) -> Result<Vec<Conversation>, DataStoreError>;
    async fn list_memberships(
        &self,
        variant: MembershipVariant,
    ) -> Result<Vec<Membership>, DataStoreError>;

    /// Delete the given rows from `table` in one batched request, returning
    /// how many the datastore reports deleted.
    async fn delete_by_ids(&self, table: StoreTable, ids: &[Uuid])
        -> Result<u64, DataStoreError>;
}

/// Client for a PostgREST-style CRM datastore API.
///
/// One attempt per request: a failed read or delete surfaces to the caller,
/// which decides whether it is fatal (primary listings) or degradable
/// (membership tables, delete batches).
pub struct RestClient {
    http: reqwest::Client,
    base: Url,
    service_key: Option<String>,
}

impl RestClient {
    pub fn new(base_url: &str, service_key: Option<String>) -> Result<Self, DataStoreError> {
        let base = Url::parse(base_url)?;
        info!("RestClient created for {}", base);

        Ok(Self {
            http: reqwest::Client::new(),
            base,
            service_key,
        })
    }

    pub fn from_env() -> Result<Self, DataStoreError> {
        let url =
            std::env::var("LEADSWEEP_URL").unwrap_or_else(|_| DEFAULT_DATASTORE_URL.to_string());
        let key = std::env::var("LEADSWEEP_SERVICE_KEY").ok();

        Self::new(&url, key)
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn table_url(&self, table: StoreTable) -> Result<Url, DataStoreError> {
        Ok(self.base.join(&format!("rest/v1/{}", table))?)
    }

    fn auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.service_key {
            Some(key) => request
                .header("apikey", key)
                .header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }

    /// Probe the API root. A 404 still proves the server is reachable.
    pub async fn health_check(&self) -> Result<(), DataStoreError> {
        let url = self.base.join("rest/v1/")?;
        let response = self.auth(self.http.get(url)).send().await?;
        let status = response.status();

        if status.is_success() || status.as_u16() == 404 {
            debug!("Health check passed for {}", self.base);
            Ok(())
        } else {
            Err(DataStoreError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }

    async fn list_rows<T: DeserializeOwned>(
        &self,
        table: StoreTable,
        select: &str,
    ) -> Result<Vec<T>, DataStoreError> {
        let url = self.table_url(table)?;
        debug!("Listing {} (select={})", table, select);

        let response = self
            .auth(self.http.get(url).query(&[("select", select)]))
            .send()
            .await?;
        let status = response.status();

        if status.as_u16() == 404 {
            return Err(DataStoreError::MissingTable(table));
        }
        if !status.is_success() {
            return Err(DataStoreError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct MembershipRow {
    id: Uuid,
    parent_id: Uuid,
}

#[async_trait]
impl DataStore for RestClient {
    async fn list_accounts(&self) -> Result<Vec<Account>, DataStoreError> {
        self.list_rows(
            StoreTable::Accounts,
            "id,name,email,phone,created_at,updated_at",
        )
        .await
    }

    async fn list_projects(&self) -> Result<Vec<Project>, DataStoreError> {
        self.list_rows(
            StoreTable::Projects,
            "id,name,description,account_id,created_at,updated_at",
        )
        .await
    }

    async fn list_leads(&self) -> Result<Vec<Lead>, DataStoreError> {
        self.list_rows(
            StoreTable::Leads,
            "id,first_name,last_name,email,phone,project_id,account_id,created_at,updated_at",
        )
        .await
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>, DataStoreError> {
        self.list_rows(
            StoreTable::Conversations,
            "id,lead_id,project_id,created_at,updated_at",
        )
        .await
    }

    async fn list_memberships(
        &self,
        variant: MembershipVariant,
    ) -> Result<Vec<Membership>, DataStoreError> {
        // Rename the variant's FK column to `parent_id` in the select so all
        // four tables decode into the same row shape.
        let select = format!("id,parent_id:{}", variant.fk_column());
        let rows: Vec<MembershipRow> = self.list_rows(variant.table(), &select).await?;

        Ok(rows
            .into_iter()
            .map(|row| Membership {
                id: row.id,
                variant,
                parent_id: row.parent_id,
            })
            .collect())
    }

    async fn delete_by_ids(
        &self,
        table: StoreTable,
        ids: &[Uuid],
    ) -> Result<u64, DataStoreError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let url = self.table_url(table)?;
        let id_list = ids
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(",");

        debug!("Deleting {} rows from {}", ids.len(), table);

        let response = self
            .auth(
                self.http
                    .delete(url)
                    .query(&[("id", format!("in.({})", id_list))])
                    .header("Prefer", "count=exact"),
            )
            .send()
            .await?;
        let status = response.status();

        if status.as_u16() == 404 {
            return Err(DataStoreError::MissingTable(table));
        }
        if !status.is_success() {
            return Err(DataStoreError::Api {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        // Content-Range looks like "0-24/25"; the total after the slash is
        // the deleted row count. An API that omits it deleted the full list.
        let deleted = response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.rsplit('/').next())
            .and_then(|total| total.parse::<u64>().ok())
            .unwrap_or(ids.len() as u64);

        if deleted < ids.len() as u64 {
            warn!(
                "Requested {} deletions from {} but datastore reports {}",
                ids.len(),
                table,
                deleted
            );
        }

        Ok(deleted)
    }
}
