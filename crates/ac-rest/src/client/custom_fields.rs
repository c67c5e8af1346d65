use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use activecampaign_client::{RequestExecutor, Result};

/// Contact custom fields, field groups and field options.
#[derive(Debug, Clone, Copy)]
pub struct CustomFields<'a> {
    executor: &'a RequestExecutor,
}

impl<'a> CustomFields<'a> {
    pub(crate) fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    /// Create a custom field.
    #[instrument(skip(self, data))]
    pub async fn create<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value> {
        self.executor.post_json("/api/3/fields", data).await
    }

    /// Retrieve a custom field.
    #[instrument(skip(self))]
    pub async fn get(&self, id: u64) -> Result<Value> {
        self.executor.get(&format!("/api/3/fields/{id}")).await
    }

    /// List custom fields.
    #[instrument(skip(self, query))]
    pub async fn list(&self, query: &[(&str, &str)]) -> Result<Value> {
        self.executor
            .get_with_query("/api/3/fields", query.iter().copied())
            .await
    }

    /// Update a custom field.
    #[instrument(skip(self, data))]
    pub async fn update<T: Serialize + ?Sized>(&self, id: u64, data: &T) -> Result<Value> {
        self.executor
            .put_json(&format!("/api/3/fields/{id}"), data)
            .await
    }

    /// Delete a custom field.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<Value> {
        self.executor.delete(&format!("/api/3/fields/{id}")).await
    }

    /// Add a field to a field group.
    #[instrument(skip(self, data))]
    pub async fn add_to_group<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value> {
        self.executor.post_json("/api/3/groupMembers", data).await
    }

    /// Retrieve a field group membership.
    #[instrument(skip(self))]
    pub async fn field_group(&self, group_id: u64) -> Result<Value> {
        self.executor
            .get(&format!("/api/3/groupMembers/{group_id}"))
            .await
    }

    /// Update a field group membership.
    #[instrument(skip(self, data))]
    pub async fn update_field_group<T: Serialize + ?Sized>(
        &self,
        group_id: u64,
        data: &T,
    ) -> Result<Value> {
        self.executor
            .put_json(&format!("/api/3/groupMembers/{group_id}"), data)
            .await
    }

    /// Remove a field group membership.
    #[instrument(skip(self))]
    pub async fn delete_from_group(&self, group_id: u64) -> Result<Value> {
        self.executor
            .delete(&format!("/api/3/groupMembers/{group_id}"))
            .await
    }

    /// Create options for dropdown, listbox, radio or checkbox fields.
    #[instrument(skip(self, data))]
    pub async fn add_options<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value> {
        self.executor.post_json("/api/3/fieldOption/bulk", data).await
    }
}
