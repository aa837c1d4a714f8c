//! Builders for the backup-task documents the create-task endpoint
//! expects. Pure document shaping; validation happens in the facade.

use std::fmt;
use std::str::FromStr;

use serde_json::{Value, json};

use crate::entities::SubclientEntity;
use crate::errors::SdkError;

/// Incremental strategy tag carried by every backup envelope.
const INC_LEVEL_BEFORE_SYNTH: &str = "BEFORE_SYNTH";

/// Level of a PostgreSQL backup job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupLevel {
    Full,
    Incremental,
    Differential,
}

impl BackupLevel {
    /// Wire name used inside backup option blocks.
    pub fn as_str(self) -> &'static str {
        match self {
            BackupLevel::Full => "FULL",
            BackupLevel::Incremental => "INCREMENTAL",
            BackupLevel::Differential => "DIFFERENTIAL",
        }
    }
}

impl Default for BackupLevel {
    fn default() -> Self {
        BackupLevel::Differential
    }
}

impl fmt::Display for BackupLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackupLevel {
    type Err = SdkError;

    fn from_str(level: &str) -> Result<Self, Self::Err> {
        match level.to_lowercase().as_str() {
            "full" => Ok(BackupLevel::Full),
            "incremental" => Ok(BackupLevel::Incremental),
            "differential" => Ok(BackupLevel::Differential),
            _ => Err(SdkError::InvalidBackupLevel(level.to_string())),
        }
    }
}

/// Generic immediate-backup envelope for one subclient.
///
/// Synthetic fulls are never requested from this client; when the server
/// schedules one anyway, the incremental runs before it.
pub fn backup_task_envelope(level: BackupLevel, entity: &SubclientEntity) -> Value {
    json!({
        "taskInfo": {
            "associations": [entity],
            "task": {
                "taskType": "IMMEDIATE",
                "initiatedFrom": "COMMANDLINE",
            },
            "subTasks": [{
                "subTask": {
                    "subTaskType": "BACKUP",
                    "operationType": "BACKUP",
                },
                "options": {
                    "backupOpts": {
                        "backupLevel": level.as_str(),
                        "runIncrementalBackup": false,
                        "incLevel": INC_LEVEL_BEFORE_SYNTH,
                    },
                },
            }],
        },
    })
}

/// Envelope plus the PostgreSQL option block carrying the caller's
/// backup prefix.
pub fn build_backup_request(
    level: BackupLevel,
    backup_prefix: &str,
    entity: &SubclientEntity,
) -> Value {
    let mut request = backup_task_envelope(level, entity);
    request["taskInfo"]["subTasks"][0]["options"]["backupOpts"]["postgresOptions"] =
        json!({ "backupPrefix": backup_prefix });
    request
}
