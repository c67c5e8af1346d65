use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use activecampaign_client::security::url;
use activecampaign_client::{RequestExecutor, Result};

/// Custom object schemas and records.
///
/// Schema and record ids are strings; they are URL-encoded before being
/// placed in the path.
#[derive(Debug, Clone, Copy)]
pub struct CustomObjects<'a> {
    executor: &'a RequestExecutor,
}

fn schema_path(schema_id: &str) -> String {
    format!("/api/3/customObjects/schemas/{}", url::encode_param(schema_id))
}

fn records_path(schema_id: &str) -> String {
    format!("/api/3/customObjects/records/{}", url::encode_param(schema_id))
}

fn record_path(schema_id: &str, record_id: &str) -> String {
    format!(
        "{}/{}",
        records_path(schema_id),
        url::encode_param(record_id)
    )
}

impl<'a> CustomObjects<'a> {
    pub(crate) fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    /// Create a schema.
    #[instrument(skip(self, data))]
    pub async fn create_schema<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value> {
        self.executor
            .post_json("/api/3/customObjects/schemas", data)
            .await
    }

    /// Retrieve a schema.
    #[instrument(skip(self))]
    pub async fn get_schema(&self, schema_id: &str) -> Result<Value> {
        self.executor.get(&schema_path(schema_id)).await
    }

    /// List schemas.
    #[instrument(skip(self, query))]
    pub async fn list_schemas(&self, query: &[(&str, &str)]) -> Result<Value> {
        self.executor
            .get_with_query("/api/3/customObjects/schemas", query.iter().copied())
            .await
    }

    /// Update a schema.
    #[instrument(skip(self, data))]
    pub async fn update_schema<T: Serialize + ?Sized>(
        &self,
        schema_id: &str,
        data: &T,
    ) -> Result<Value> {
        self.executor.put_json(&schema_path(schema_id), data).await
    }

    /// Delete a schema.
    #[instrument(skip(self))]
    pub async fn delete_schema(&self, schema_id: &str) -> Result<Value> {
        self.executor.delete(&schema_path(schema_id)).await
    }

    /// Create a record of a schema.
    #[instrument(skip(self, data))]
    pub async fn create_record<T: Serialize + ?Sized>(
        &self,
        schema_id: &str,
        data: &T,
    ) -> Result<Value> {
        self.executor.post_json(&records_path(schema_id), data).await
    }

    /// Retrieve a record.
    #[instrument(skip(self))]
    pub async fn get_record(&self, schema_id: &str, record_id: &str) -> Result<Value> {
        self.executor.get(&record_path(schema_id, record_id)).await
    }

    /// List records of a schema.
    #[instrument(skip(self, query))]
    pub async fn list_records(&self, schema_id: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.executor
            .get_with_query(&records_path(schema_id), query.iter().copied())
            .await
    }

    /// Update a record.
    #[instrument(skip(self, data))]
    pub async fn update_record<T: Serialize + ?Sized>(
        &self,
        schema_id: &str,
        record_id: &str,
        data: &T,
    ) -> Result<Value> {
        self.executor
            .put_json(&record_path(schema_id, record_id), data)
            .await
    }

    /// Delete a record.
    #[instrument(skip(self))]
    pub async fn delete_record(&self, schema_id: &str, record_id: &str) -> Result<Value> {
        self.executor
            .delete(&record_path(schema_id, record_id))
            .await
    }
}
