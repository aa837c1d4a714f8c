//! Identity references for the ownership chain: client, instance,
//! backupset, subclient. These are the denormalized fields the server
//! uses to address entities in task documents.

use serde::{Deserialize, Serialize};

/// Identity of the client machine an instance runs on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientRef {
    pub client_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u32>,
}

impl ClientRef {
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            client_id: None,
        }
    }
}

/// Identity of a PostgreSQL instance under a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstanceRef {
    pub instance_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<u32>,
}

impl InstanceRef {
    pub fn new(instance_name: impl Into<String>) -> Self {
        Self {
            instance_name: instance_name.into(),
            instance_id: None,
        }
    }
}

/// Identity of a backupset under an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackupsetRef {
    pub backupset_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backupset_id: Option<u32>,
}

impl BackupsetRef {
    pub fn new(backupset_name: impl Into<String>) -> Self {
        Self {
            backupset_name: backupset_name.into(),
            backupset_id: None,
        }
    }
}

/// Full identity of one subclient, as task documents reference it.
///
/// Also serves as the restore association: restore requests carry the
/// entity of the subclient whose data they restore.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubclientEntity {
    pub client_name: String,
    pub instance_name: String,
    pub backupset_name: String,
    pub subclient_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subclient_id: Option<u32>,
}
