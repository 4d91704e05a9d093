//! # Store Actor
//!
//! This module defines the `StoreActor`, an in-memory record store that owns all
//! of its state inside a single Tokio task. Requests arrive over an mpsc channel
//! and are processed one at a time, so the tables need no locking.

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::store::client::StoreClient;
use crate::store::message::StoreRequest;
use crate::value::{Record, Value, ID};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Records of one resource type, kept in insertion order.
///
/// `next_id` is `None` once an explicit `i64::MAX` id has been stored.
#[derive(Debug)]
struct Table {
    rows: Vec<Record>,
    next_id: Option<i64>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: Some(1),
        }
    }
}

impl Table {
    fn position(&self, id: &Value) -> Option<usize> {
        self.rows
            .iter()
            .position(|r| r.get(ID).is_some_and(|v| v.loosely_eq(id)))
    }

    /// Stores the record, assigning the next integer id when it has none.
    /// Returns `None`, storing nothing, when no integer id is left to assign.
    fn save(&mut self, mut record: Record) -> Option<Value> {
        let id = match record.get(ID) {
            Some(id) if !id.is_null() => id.clone(),
            _ => {
                let id = Value::Int(self.next_id?);
                record.insert(ID.to_string(), id.clone());
                id
            }
        };
        if let Value::Int(n) = id {
            if self.next_id.is_some_and(|next| n >= next) {
                self.next_id = n.checked_add(1);
            }
        }
        match self.position(&id) {
            Some(index) => self.rows[index] = record,
            None => self.rows.push(record),
        }
        Some(id)
    }

    fn delete(&mut self, id: &Value) -> bool {
        match self.position(id) {
            Some(index) => {
                self.rows.remove(index);
                true
            }
            None => false,
        }
    }
}

/// The in-memory store server.
///
/// ## StoreActor
///
/// `StoreActor` is the *server* half of the store. It owns one table per
/// resource type and processes [`StoreRequest`]s sequentially. The *client* half
/// is [`StoreClient`], which implements [`StorageBackend`](crate::StorageBackend)
/// and can be cloned freely.
///
/// # Usage Pattern
///
/// 1.  **Create**: `StoreActor::new(&config)` returns the actor and its client.
/// 2.  **Run**: spawn `actor.run()` on the Tokio runtime.
/// 3.  **Use**: hand the client to a [`Resolver`](crate::Resolver).
///
/// ```rust
/// use resource_framework::{record, FindRequest, StorageBackend, StoreActor, StoreConfig};
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = StoreActor::new(&StoreConfig::default());
///     tokio::spawn(actor.run());
///
///     let id = client.save("User", record! { "name" => "Alice" }).await.unwrap();
///     let rows = client.find("User", &FindRequest::default()).await.unwrap();
///     assert_eq!(rows[0]["id"], id);
/// }
/// ```
///
/// # Operations
///
/// * **Find**: applies the [`FindRequest`](crate::FindRequest) to the type's rows (filter, stable sort,
///   offset, limit). Unknown types have no rows.
/// * **Save**: a record without an `id` gets the next per-type integer, starting
///   at 1. A record with an `id` replaces the row holding that id, or is appended.
///   Once `i64::MAX` is taken, saves that need a new id fail with
///   [`StoreError::IdsExhausted`].
/// * **Delete**: removes the row holding the id, reporting whether one existed.
///
/// The loop ends when every client has been dropped.
pub struct StoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    tables: HashMap<String, Table>,
}

impl StoreActor {
    /// Creates a new `StoreActor` and its associated `StoreClient`.
    ///
    /// `config.buffer_size` is the capacity of the request channel; when it is
    /// full, client calls wait for space.
    pub fn new(config: &StoreConfig) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(config.buffer_size.max(1));
        let actor = Self {
            receiver,
            tables: HashMap::new(),
        };
        (actor, StoreClient::new(sender))
    }

    /// Runs the actor's event loop, processing requests until the channel closes.
    pub async fn run(mut self) {
        info!("Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Find {
                    type_name,
                    request,
                    respond_to,
                } => {
                    let rows = self
                        .tables
                        .get(&type_name)
                        .map(|t| request.apply(&t.rows))
                        .unwrap_or_default();
                    debug!(type_name = %type_name, ?request, count = rows.len(), "Find");
                    let _ = respond_to.send(Ok(rows));
                }
                StoreRequest::Save {
                    type_name,
                    record,
                    respond_to,
                } => {
                    let table = self.tables.entry(type_name.clone()).or_default();
                    let reply = match table.save(record) {
                        Some(id) => {
                            info!(type_name = %type_name, %id, size = table.rows.len(), "Saved");
                            Ok(id)
                        }
                        None => {
                            warn!(type_name = %type_name, "No identifiers left");
                            Err(StoreError::IdsExhausted(type_name))
                        }
                    };
                    let _ = respond_to.send(reply);
                }
                StoreRequest::Delete {
                    type_name,
                    id,
                    respond_to,
                } => {
                    let removed = self
                        .tables
                        .get_mut(&type_name)
                        .is_some_and(|t| t.delete(&id));
                    info!(type_name = %type_name, %id, removed, "Deleted");
                    let _ = respond_to.send(Ok(removed));
                }
            }
        }

        let rows: usize = self.tables.values().map(|t| t.rows.len()).sum();
        info!(tables = self.tables.len(), rows, "Store shutdown");
    }

    /// Creates the actor and spawns its loop on the current runtime.
    pub fn spawn(config: &StoreConfig) -> (StoreClient, tokio::task::JoinHandle<()>) {
        let (actor, client) = Self::new(config);
        let handle = tokio::spawn(actor.run());
        (client, handle)
    }
}
