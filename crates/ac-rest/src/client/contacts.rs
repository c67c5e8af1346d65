use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use activecampaign_client::{RequestExecutor, Result};

/// Contacts and their custom field values.
#[derive(Debug, Clone, Copy)]
pub struct Contacts<'a> {
    executor: &'a RequestExecutor,
}

impl<'a> Contacts<'a> {
    pub(crate) fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    /// Create a contact.
    #[instrument(skip(self, data))]
    pub async fn create<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value> {
        self.executor.post_json("/api/3/contacts", data).await
    }

    /// Retrieve a contact.
    #[instrument(skip(self))]
    pub async fn get(&self, id: u64) -> Result<Value> {
        self.executor.get(&format!("/api/3/contacts/{id}")).await
    }

    /// List contacts, filtered by the given query parameters.
    #[instrument(skip(self, query))]
    pub async fn list(&self, query: &[(&str, &str)]) -> Result<Value> {
        self.executor
            .get_with_query("/api/3/contacts", query.iter().copied())
            .await
    }

    /// Update a contact.
    #[instrument(skip(self, data))]
    pub async fn update<T: Serialize + ?Sized>(&self, id: u64, data: &T) -> Result<Value> {
        self.executor
            .put_json(&format!("/api/3/contacts/{id}"), data)
            .await
    }

    /// Delete a contact.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<Value> {
        self.executor.delete(&format!("/api/3/contacts/{id}")).await
    }

    /// Create the contact, or update it if the email already exists.
    #[instrument(skip(self, data))]
    pub async fn sync<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value> {
        self.executor.post_json("/api/3/contact/sync", data).await
    }

    /// Custom field values of one contact.
    #[instrument(skip(self))]
    pub async fn custom_field_values(&self, contact_id: u64) -> Result<Value> {
        self.executor
            .get(&format!("/api/3/contacts/{contact_id}/fieldValues"))
            .await
    }

    /// Set a custom field value.
    #[instrument(skip(self, data))]
    pub async fn update_custom_field_value<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value> {
        self.executor.post_json("/api/3/fieldValues", data).await
    }

    /// Custom field values across all contacts.
    #[instrument(skip(self))]
    pub async fn list_all_custom_field_values(&self) -> Result<Value> {
        self.executor.get("/api/3/fieldValues").await
    }
}

#[cfg(test)]
mod tests {
    use super::super::mock_client;
    use serde::Serialize;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_contact_from_struct() {
        #[derive(Serialize)]
        struct NewContact<'a> {
            email: &'a str,
            #[serde(rename = "firstName")]
            first_name: &'a str,
        }

        #[derive(Serialize)]
        struct Envelope<'a> {
            contact: NewContact<'a>,
        }

        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/3/contacts"))
            .and(header("Api-Token", "test-token"))
            .and(body_json(json!({"contact": {"email": "jane@example.com", "firstName": "Jane"}})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"contact": {"id": "1", "email": "jane@example.com"}})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);
        let body = Envelope {
            contact: NewContact {
                email: "jane@example.com",
                first_name: "Jane",
            },
        };
        let result = client.contacts().create(&body).await.unwrap();
        assert_eq!(result["contact"]["id"], "1");
    }

    #[tokio::test]
    async fn test_contact_crud_wiremock() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/3/contacts/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"contact": {"id": 1}})))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/3/contacts"))
            .and(query_param("email", "jane@example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"contacts": [], "meta": {"total": "0"}})))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/api/3/contacts/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"contact": {"id": "1", "phone": "555"}})))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("DELETE"))
            .and(path("/api/3/contacts/1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);
        let contacts = client.contacts();

        assert_eq!(contacts.get(1).await.unwrap(), json!({"contact": {"id": 1}}));

        let list = contacts
            .list(&[("email", "jane@example.com")])
            .await
            .unwrap();
        assert_eq!(list["meta"]["total"], "0");

        let updated = contacts
            .update(1, &json!({"contact": {"phone": "555"}}))
            .await
            .unwrap();
        assert_eq!(updated["contact"]["phone"], "555");

        assert_eq!(contacts.delete(1).await.unwrap(), json!({}));
    }

    #[tokio::test]
    async fn test_sync_contact_wiremock() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/3/contact/sync"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"contact": {"id": "8"}})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);
        let result = client
            .contacts()
            .sync(&json!({"contact": {"email": "jane@example.com"}}))
            .await
            .unwrap();
        assert_eq!(result["contact"]["id"], "8");
    }

    #[tokio::test]
    async fn test_custom_field_values_wiremock() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/3/contacts/1/fieldValues"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"fieldValues": [{"field": "3", "value": "blue"}]})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/3/fieldValues"))
            .and(body_json(json!({"fieldValue": {"contact": 1, "field": 3, "value": "green"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"fieldValue": {"value": "green"}})))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/3/fieldValues"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"fieldValues": []})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);

        let values = client.contacts().custom_field_values(1).await.unwrap();
        assert_eq!(values["fieldValues"][0]["value"], "blue");

        let updated = client
            .contacts()
            .update_custom_field_value(&json!({"fieldValue": {"contact": 1, "field": 3, "value": "green"}}))
            .await
            .unwrap();
        assert_eq!(updated["fieldValue"]["value"], "green");

        let all = client.contacts().list_all_custom_field_values().await.unwrap();
        assert!(all["fieldValues"].is_array());
    }

    #[tokio::test]
    async fn test_missing_contact_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/3/contacts/404"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "No Result found for Subscriber with id 404"})),
            )
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server);
        let err = client.contacts().get(404).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.status(), 404);
    }
}
