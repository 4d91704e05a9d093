//! # Store Client
//!
//! The client half of the store: forwards requests to the [`StoreActor`] and
//! awaits their replies.
//!
//! [`StoreActor`]: super::StoreActor

use crate::error::{BackendError, StoreError};
use crate::filter::FindRequest;
use crate::store::message::StoreRequest;
use crate::store::StorageBackend;
use crate::value::{Record, Value};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

/// A handle for sending requests to a running `StoreActor`.
///
/// * **Cloneable** – holds only a sender, so cloning is inexpensive.
/// * **Async API** – every call resolves to `Result<…, StoreError>`.
#[derive(Clone, Debug)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    pub async fn find_records(
        &self,
        type_name: &str,
        request: FindRequest,
    ) -> Result<Vec<Record>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Find {
                type_name: type_name.to_string(),
                request,
                respond_to,
            })
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }

    pub async fn save_record(&self, type_name: &str, record: Record) -> Result<Value, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Save {
                type_name: type_name.to_string(),
                record,
                respond_to,
            })
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }

    pub async fn delete_record(&self, type_name: &str, id: Value) -> Result<bool, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Delete {
                type_name: type_name.to_string(),
                id,
                respond_to,
            })
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }
}

#[async_trait]
impl StorageBackend for StoreClient {
    fn backend_name(&self) -> &'static str {
        "store-actor"
    }

    async fn find(&self, type_name: &str, request: &FindRequest) -> Result<Vec<Record>, BackendError> {
        Ok(self.find_records(type_name, request.clone()).await?)
    }

    async fn save(&self, type_name: &str, record: Record) -> Result<Value, BackendError> {
        Ok(self.save_record(type_name, record).await?)
    }

    async fn delete(&self, type_name: &str, id: &Value) -> Result<bool, BackendError> {
        Ok(self.delete_record(type_name, id.clone()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::filter::{Filter, FilterOperand, OrderBy};
    use crate::predicate::CompareOp;
    use crate::record;
    use crate::store::StoreActor;

    #[tokio::test]
    async fn test_save_find_delete_round_trip() {
        let (client, _handle) = StoreActor::spawn(&StoreConfig::default());

        client.save("User", record! { "name" => "ann", "age" => 30 }).await.unwrap();
        let bob = client.save("User", record! { "name" => "bob", "age" => 20 }).await.unwrap();

        let request = FindRequest {
            filter: Some(Filter::Compare {
                field: "age".into(),
                op: CompareOp::Lt,
                operand: FilterOperand::Value(Value::Int(25)),
            }),
            ..FindRequest::default()
        };
        let found = client.find("User", &request).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["id"], bob);

        assert!(client.delete("User", &bob).await.unwrap());
        assert!(client.find("User", &request).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_honors_order_and_limit() {
        let (client, _handle) = StoreActor::spawn(&StoreConfig::default());
        for name in ["c", "a", "b"] {
            client.save("T", record! { "name" => name }).await.unwrap();
        }
        let request = FindRequest {
            order_by: vec![OrderBy::asc("name")],
            limit: Some(2),
            ..FindRequest::default()
        };
        let names: Vec<Value> = client
            .find("T", &request)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r["name"].clone())
            .collect();
        assert_eq!(names, vec![Value::from("a"), Value::from("b")]);
    }

    #[tokio::test]
    async fn test_exhausted_ids_fail_without_stopping_the_store() {
        let (client, handle) = StoreActor::spawn(&StoreConfig::default());

        let max = client
            .save_record("User", record! { "id" => i64::MAX, "name" => "a" })
            .await
            .unwrap();
        assert_eq!(max, Value::Int(i64::MAX));

        let err = client.save_record("User", record! { "name" => "b" }).await.unwrap_err();
        assert_eq!(err, StoreError::IdsExhausted("User".into()));

        // Other tables and later requests are unaffected.
        assert_eq!(client.save_record("Post", Record::new()).await.unwrap(), Value::Int(1));
        let rows = client.find_records("User", FindRequest::default()).await.unwrap();
        assert_eq!(rows.len(), 1);

        drop(client);
        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn test_closed_store_reports_closed() {
        let (actor, client) = StoreActor::new(&StoreConfig::default());
        drop(actor);
        let err = client.find_records("T", FindRequest::default()).await.unwrap_err();
        assert_eq!(err, StoreError::Closed);
    }
}
