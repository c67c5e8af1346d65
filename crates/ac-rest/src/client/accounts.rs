use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use activecampaign_client::{RequestExecutor, RequestMethod, RequestOptions, Result};

/// Accounts (companies) and their notes.
#[derive(Debug, Clone, Copy)]
pub struct Accounts<'a> {
    executor: &'a RequestExecutor,
}

impl<'a> Accounts<'a> {
    pub(crate) fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    /// Create an account.
    #[instrument(skip(self, data))]
    pub async fn create<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value> {
        self.executor.post_json("/api/3/accounts", data).await
    }

    /// Retrieve an account.
    #[instrument(skip(self))]
    pub async fn get(&self, id: u64) -> Result<Value> {
        self.executor.get(&format!("/api/3/accounts/{id}")).await
    }

    /// List accounts, filtered by the given query parameters.
    #[instrument(skip(self, query))]
    pub async fn list(&self, query: &[(&str, &str)]) -> Result<Value> {
        self.executor
            .get_with_query("/api/3/accounts", query.iter().copied())
            .await
    }

    /// Update an account.
    #[instrument(skip(self, data))]
    pub async fn update<T: Serialize + ?Sized>(&self, id: u64, data: &T) -> Result<Value> {
        self.executor
            .put_json(&format!("/api/3/accounts/{id}"), data)
            .await
    }

    /// Delete an account.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<Value> {
        self.executor.delete(&format!("/api/3/accounts/{id}")).await
    }

    /// Delete several accounts in one call.
    #[instrument(skip(self, ids))]
    pub async fn bulk_delete(&self, ids: &[u64]) -> Result<Value> {
        let options =
            RequestOptions::new().query_pairs(ids.iter().map(|id| ("ids[]", id.to_string())));
        self.executor
            .execute(RequestMethod::Delete, "/api/3/accounts/bulk_delete", options)
            .await
    }

    /// Add a note to an account.
    #[instrument(skip(self, data))]
    pub async fn create_note<T: Serialize + ?Sized>(
        &self,
        account_id: u64,
        data: &T,
    ) -> Result<Value> {
        self.executor
            .post_json(&format!("/api/3/accounts/{account_id}/notes"), data)
            .await
    }

    /// Update an account note.
    #[instrument(skip(self, data))]
    pub async fn update_note<T: Serialize + ?Sized>(
        &self,
        account_id: u64,
        note_id: u64,
        data: &T,
    ) -> Result<Value> {
        self.executor
            .put_json(&format!("/api/3/accounts/{account_id}/notes/{note_id}"), data)
            .await
    }
}
