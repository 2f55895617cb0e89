//! topicsync core library — record persistence, reconciliation, errors.
//!
//! - [`types`] — record, snapshot and outcome types
//! - [`error`] — [`RecordError`], [`ReconcileError`]
//! - [`record`] — [`RecordStore`] load / save
//! - [`reconcile`] — `classify` plus the `init` / `update` workflows

pub mod error;
pub mod reconcile;
pub mod record;
pub mod types;

pub use error::{ReconcileError, RecordError};
pub use reconcile::{RemoteError, RepositoryHost};
pub use record::RecordStore;
pub use types::{Outcome, Record, RepositorySnapshot};
