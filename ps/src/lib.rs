//! PlanStore - bounded FIFO persistence for finished meal plans
//!
//! Keeps at most [`MAX_SAVED_PLANS`] plans on disk. Saving one more evicts
//! the oldest by insertion order. Plan payloads are stored as opaque JSON
//! so the store stays independent of the client's model types.
//!
//! # Architecture
//!
//! ```text
//! planstore/
//! ├── {plan_id}.json   # SavedPlan { meta, plan }
//! └── ...
//! ```
//!
//! Plan ids are UUIDv7, so lexicographic id order is insertion order.
//!
//! # Example
//!
//! ```ignore
//! use planstore::PlanStore;
//!
//! let store = PlanStore::open(".planstore")?;
//! let id = store.save("28yo male, weight loss", 7, 84000.0, payload)?;
//! let saved = store.load(&id)?;
//! ```

pub mod cli;
pub mod config;
mod store;

pub use store::{PlanId, PlanStore, SavedPlan, SavedPlanMeta};

/// Maximum number of plans kept on disk; the oldest is evicted beyond this
pub const MAX_SAVED_PLANS: usize = 5;
