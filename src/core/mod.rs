//! Core module - identity, configuration, stores, migration

pub mod config;
pub mod identity;
pub mod migrate;
pub mod oplog;
pub mod store;
pub mod workspace;

pub use config::Config;
pub use identity::{CategoryId, IdPrefix, ItemId, LogId};
pub use migrate::{migrate_categories, MigrationReport, RawCategory, RawItem};
pub use oplog::{OperationLogStore, OplogError, MAX_LOG_ENTRIES};
pub use store::{EquipmentStore, ImportOutcome, StoreError};
pub use workspace::{Workspace, WorkspaceError};
