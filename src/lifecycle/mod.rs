//! # System Lifecycle & Orchestration
//!
//! Wiring is where the pieces meet: the type registry, the store actor, the
//! resolver, the typed clients and the function registry. [`AppSystem`] builds
//! them in dependency order and takes them down again.
//!
//! ## Startup
//!
//! 1. **Declare** - register `User` and `Account` (order is irrelevant)
//! 2. **Store** - spawn the [`StoreActor`](resource_framework::StoreActor) with the given config
//! 3. **Resolve** - one [`Resolver`](resource_framework::Resolver) over registry and store, cloned into each client
//! 4. **Expose** - register the business functions
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop every holder of a store client** - functions, clients, resolver
//! 2. **Store detects closure** - its `recv()` returns `None` and it logs its totals
//! 3. **Await completion** - the store task's handle is joined
//!
//! Anything else still holding a clone of a client keeps the store alive, so
//! callers should release their clones before calling [`AppSystem::shutdown`].

pub mod app_system;

pub use app_system::AppSystem;
