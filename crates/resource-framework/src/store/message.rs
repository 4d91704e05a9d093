//! # Store Messages
//!
//! The request type sent from [`StoreClient`](super::StoreClient) to
//! [`StoreActor`](super::StoreActor). Each request carries a oneshot sender for
//! its reply.

use crate::error::StoreError;
use crate::filter::FindRequest;
use crate::value::{Record, Value};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the store.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

#[derive(Debug)]
pub enum StoreRequest {
    Find {
        type_name: String,
        request: FindRequest,
        respond_to: Response<Vec<Record>>,
    },
    Save {
        type_name: String,
        record: Record,
        respond_to: Response<Value>,
    },
    Delete {
        type_name: String,
        id: Value,
        respond_to: Response<bool>,
    },
}
