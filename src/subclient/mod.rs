//! PostgreSQL subclient: configure, trigger and query backup/restore
//! operations for one backup policy unit.
//!
//! The subclient sits at the bottom of the ownership chain
//! (client → instance → backupset → subclient). Backups are submitted
//! directly from here; restores resolve their destination from the owning
//! chain and delegate to the instance.

mod properties;
mod request;

pub use properties::{
    CommonProperties, ContentEntry, ImpersonateUser, PostgresContent, PostgresSubclientProps,
    ProxyClient, SubclientProperties,
};
pub use request::BackupLevel;

use std::sync::{Arc, RwLock};

use reqwest::Method;
use tracing::{debug, info};

use crate::entities::{BackupsetRef, SubclientEntity};
use crate::errors::{Result, SdkError};
use crate::instance::{CloneOptions, PostgresInstance, RestoreRequest};
use crate::job::Job;
use crate::transport::response::{process_job_response, require_success};
use crate::transport::{Transport, services};
use request::{backup_task_envelope, build_backup_request};

/// Backupset name whose restores are filesystem-based rather than
/// per-database.
const FS_BASED_BACKUPSET: &str = "fsbasedbackupset";

/// Content a filesystem-based restore always targets.
const FS_RESTORE_CONTENT: &str = "/data";

/// A named grouping of subclients under an instance.
pub struct PostgresBackupset {
    instance: Arc<PostgresInstance>,
    backupset: BackupsetRef,
}

impl PostgresBackupset {
    pub fn new(instance: Arc<PostgresInstance>, backupset: BackupsetRef) -> Self {
        Self {
            instance,
            backupset,
        }
    }

    pub fn backupset_name(&self) -> &str {
        &self.backupset.backupset_name
    }

    pub fn instance(&self) -> &Arc<PostgresInstance> {
        &self.instance
    }
}

/// Caller-facing restore parameters. Unset destination fields default to
/// the owning instance's identity; time and clone settings pass through
/// to the server unvalidated.
#[derive(Debug, Clone, Default)]
pub struct RestoreOptions {
    pub database_list: Option<Vec<String>>,
    pub dest_client_name: Option<String>,
    pub dest_instance_name: Option<String>,
    pub copy_precedence: Option<u32>,
    /// Restore contents after this time, `YYYY-MM-DD HH:MM:SS`.
    pub from_time: Option<String>,
    /// Restore contents before this time, `YYYY-MM-DD HH:MM:SS`.
    pub to_time: Option<String>,
    pub clone_env: bool,
    pub clone_options: Option<CloneOptions>,
}

/// One backup policy unit scoped to a PostgreSQL instance.
///
/// Holds an in-memory mirror of the server-side configuration, populated
/// on first access and refreshed on demand. The cache is per-object and
/// not meant to be shared across threads.
pub struct PostgresSubclient {
    backupset: Arc<PostgresBackupset>,
    subclient_name: String,
    subclient_id: Option<u32>,
    properties: RwLock<Option<SubclientProperties>>,
}

impl PostgresSubclient {
    pub fn new(
        backupset: Arc<PostgresBackupset>,
        subclient_name: impl Into<String>,
        subclient_id: Option<u32>,
    ) -> Self {
        Self {
            backupset,
            subclient_name: subclient_name.into(),
            subclient_id,
            properties: RwLock::new(None),
        }
    }

    pub fn subclient_name(&self) -> &str {
        &self.subclient_name
    }

    /// The `default` subclient backs up everything under the backupset
    /// and carries no explicit content list.
    pub fn is_default_subclient(&self) -> bool {
        self.subclient_name.eq_ignore_ascii_case("default")
    }

    fn transport(&self) -> &Arc<dyn Transport> {
        self.backupset.instance().transport()
    }

    /// Identity fields used to address this subclient in task documents.
    pub fn entity(&self) -> SubclientEntity {
        let instance = self.backupset.instance();
        SubclientEntity {
            client_name: instance.client_name().to_string(),
            instance_name: instance.instance_name().to_string(),
            backupset_name: self.backupset.backupset_name().to_string(),
            subclient_name: self.subclient_name.clone(),
            subclient_id: self.subclient_id,
        }
    }

    fn subclient_endpoint(&self) -> Result<String> {
        let subclient_id = self.subclient_id.ok_or_else(|| {
            SdkError::InvalidInput(format!(
                "subclient '{}' has no id, cannot address its properties",
                self.subclient_name
            ))
        })?;
        Ok(services::subclient(subclient_id))
    }

    fn cached_properties(&self) -> Option<SubclientProperties> {
        match self.properties.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn store_properties(&self, props: SubclientProperties) {
        let mut guard = match self.properties.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(props);
    }

    /// Cached properties, fetched from the server on first access.
    pub async fn properties(&self) -> Result<SubclientProperties> {
        if let Some(props) = self.cached_properties() {
            return Ok(props);
        }
        self.refresh_properties().await
    }

    /// Re-fetches the subclient configuration and repopulates the cache.
    pub async fn refresh_properties(&self) -> Result<SubclientProperties> {
        let endpoint = self.subclient_endpoint()?;
        let (flag, response) = self
            .transport()
            .make_request(Method::GET, &endpoint, None)
            .await?;
        let payload = require_success(flag, response)?;
        let props = SubclientProperties::from_response(&payload)?;
        self.store_properties(props.clone());
        Ok(props)
    }

    /// Pushes the cached configuration back to the server, replacing the
    /// server-side content list wholesale.
    pub async fn update_properties(&self) -> Result<()> {
        let props = self.properties().await?;
        let endpoint = self.subclient_endpoint()?;
        let (flag, response) = self
            .transport()
            .make_request(Method::POST, &endpoint, Some(props.to_request_document()))
            .await?;
        require_success(flag, response)?;
        Ok(())
    }

    /// Ordered database names in this subclient's content.
    ///
    /// `None` for the default subclient, and for subclients whose
    /// configuration carries no content list at all.
    pub async fn content(&self) -> Result<Option<Vec<String>>> {
        if self.is_default_subclient() {
            return Ok(None);
        }
        let props = self.properties().await?;
        Ok(props.content.as_ref().map(|_| props.database_names()))
    }

    /// Runs a backup job for this subclient at the given level.
    ///
    /// The level is matched case-insensitively against full, incremental
    /// and differential; anything else fails before any request is sent.
    /// A prefix, when supplied, rides along in the PostgreSQL option
    /// block of the request.
    pub async fn backup(&self, backup_level: &str, backup_prefix: Option<&str>) -> Result<Job> {
        let level: BackupLevel = backup_level.parse()?;

        let request = match backup_prefix {
            None => backup_task_envelope(level, &self.entity()),
            Some(prefix) => build_backup_request(level, prefix, &self.entity()),
        };
        info!(
            subclient = %self.subclient_name,
            %level,
            prefixed = backup_prefix.is_some(),
            "submitting backup task"
        );
        let (flag, response) = self
            .transport()
            .make_request(Method::POST, services::CREATE_TASK, Some(request))
            .await?;
        process_job_response(flag, response)
    }

    /// Restores the PostgreSQL server this subclient protects.
    ///
    /// Destination client and instance default to the owning instance's
    /// identity. When the backupset is the filesystem-based one, the
    /// restore targets the whole data directory and the caller's database
    /// list is ignored.
    pub async fn restore_postgres_server(&self, options: RestoreOptions) -> Result<Job> {
        let instance = self.backupset.instance();

        let dest_client_name = options
            .dest_client_name
            .unwrap_or_else(|| instance.client_name().to_string());
        let dest_instance_name = options
            .dest_instance_name
            .unwrap_or_else(|| instance.instance_name().to_string());
        let backupset_name = self.backupset.backupset_name().to_string();

        let filesystem_backupset = backupset_name.eq_ignore_ascii_case(FS_BASED_BACKUPSET);
        let database_list = if filesystem_backupset {
            vec![FS_RESTORE_CONTENT.to_string()]
        } else {
            options.database_list.unwrap_or_default()
        };

        debug!(
            %dest_client_name,
            %dest_instance_name,
            %backupset_name,
            filesystem_backupset,
            "resolved restore destination"
        );

        instance
            .restore_in_place(RestoreRequest {
                database_list,
                dest_client_name,
                dest_instance_name,
                backupset_name,
                filesystem_backupset,
                copy_precedence: options.copy_precedence,
                from_time: options.from_time,
                to_time: options.to_time,
                clone_env: options.clone_env,
                clone_options: options.clone_options,
                association: self.entity(),
            })
            .await
    }
}
