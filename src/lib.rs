//! Client SDK for a backup-orchestration server, scoped to PostgreSQL
//! subclients.
//!
//! A *subclient* is a named backup policy unit under a backupset, which in
//! turn belongs to a PostgreSQL instance on a client machine. This crate
//! shapes high-level backup/restore calls into the REST documents the
//! orchestration server expects, submits them over a shared [`Transport`],
//! and hands back opaque [`Job`] handles.
//!
//! The SDK never executes backups itself: dumping, staging and storage all
//! happen server-side. It also does not poll job status; the returned job
//! id is the caller's ticket for whatever monitoring they run elsewhere.

pub mod entities;
pub mod errors;
pub mod instance;
pub mod job;
pub mod subclient;
pub mod transport;

pub use entities::{BackupsetRef, ClientRef, InstanceRef, SubclientEntity};
pub use errors::{Result, SdkError};
pub use instance::{CloneOptions, PostgresInstance, RestoreRequest};
pub use job::Job;
pub use subclient::{
    BackupLevel, PostgresBackupset, PostgresSubclient, RestoreOptions, SubclientProperties,
};
pub use transport::{HttpTransport, Transport};
