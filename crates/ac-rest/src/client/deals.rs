use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use activecampaign_client::{RequestExecutor, Result};

/// Deals and their notes.
#[derive(Debug, Clone, Copy)]
pub struct Deals<'a> {
    executor: &'a RequestExecutor,
}

impl<'a> Deals<'a> {
    pub(crate) fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    /// Create a deal.
    #[instrument(skip(self, data))]
    pub async fn create<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value> {
        self.executor.post_json("/api/3/deals", data).await
    }

    /// Retrieve a deal.
    #[instrument(skip(self))]
    pub async fn get(&self, id: u64) -> Result<Value> {
        self.executor.get(&format!("/api/3/deals/{id}")).await
    }

    /// List deals, filtered by the given query parameters.
    #[instrument(skip(self, query))]
    pub async fn list(&self, query: &[(&str, &str)]) -> Result<Value> {
        self.executor
            .get_with_query("/api/3/deals", query.iter().copied())
            .await
    }

    /// Update a deal.
    #[instrument(skip(self, data))]
    pub async fn update<T: Serialize + ?Sized>(&self, id: u64, data: &T) -> Result<Value> {
        self.executor
            .put_json(&format!("/api/3/deals/{id}"), data)
            .await
    }

    /// Delete a deal.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<Value> {
        self.executor.delete(&format!("/api/3/deals/{id}")).await
    }

    /// Add a note to a deal.
    #[instrument(skip(self, data))]
    pub async fn create_note<T: Serialize + ?Sized>(&self, deal_id: u64, data: &T) -> Result<Value> {
        self.executor
            .post_json(&format!("/api/3/deals/{deal_id}/notes"), data)
            .await
    }

    /// Update a deal note.
    #[instrument(skip(self, data))]
    pub async fn update_note<T: Serialize + ?Sized>(
        &self,
        deal_id: u64,
        note_id: u64,
        data: &T,
    ) -> Result<Value> {
        self.executor
            .put_json(&format!("/api/3/deals/{deal_id}/notes/{note_id}"), data)
            .await
    }
}
