//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter whose
//! level is controlled by `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Registry**: every registered type, with its field and relationship counts
//! - **Resolution**: spans `resolve{predicate}`, `execute{type_name}`,
//!   `resolve_relationship{owner name}` and `preload{count name}`. Events inside
//!   them carry the compiled target, `first_only` and the result count
//! - **Store**: startup, every find/save/delete with the table size, shutdown totals
//!
//! ```bash
//! # Registrations, saves and deletes
//! RUST_LOG=info cargo run
//!
//! # Adds compiled filters and per-find counts
//! RUST_LOG=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug`, reading `account.owner` looks like this (timestamps
//! and the registry's `Resolve type` lines trimmed). The compact format appends
//! span fields after the event's own; the store's `Find` runs in its own task,
//! outside the span.
//!
//! ```text
//! DEBUG resolve_relationship: Compiled type_name="User" filter=Compare { field: "id", op: Eq, operand: Value(Int(1)) } owner="Account" name="owner"
//! DEBUG resolve_relationship: Bound bound=(User.id == 1) first_only=true owner="Account" name="owner"
//! DEBUG Find type_name=User request=FindRequest { .. } count=1
//! DEBUG resolve_relationship: Resolved count=1 owner="Account" name="owner"
//! ```

/// Initializes the global subscriber. Call once, from `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // type_name fields already say where a line came from
        .compact()
        .init();
}
