//! PostgreSQL instance collaborator.
//!
//! The instance owns the client identity and the shared transport, and
//! submits in-place restore tasks on behalf of its subclients. The
//! subclient a restore is associated with travels inside the
//! [`RestoreRequest`] instead of being parked on the instance, so two
//! restores through the same instance cannot race on shared context.

use std::sync::Arc;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::entities::{ClientRef, InstanceRef, SubclientEntity};
use crate::errors::Result;
use crate::job::Job;
use crate::transport::response::process_job_response;
use crate::transport::{Transport, services};

/// Settings for materializing a temporary clone environment from backup
/// data instead of overwriting the destination instance.
///
/// Passed through to the server without validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloneOptions {
    pub staging_location: String,
    pub force_cleanup: bool,
    pub port: String,
    pub lib_directory: String,
    pub is_instance_selected: bool,
    pub reservation_period_s: u64,
    pub user: String,
    pub binary_directory: String,
}

/// Fully-resolved parameters for an in-place restore.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreRequest {
    pub database_list: Vec<String>,
    pub dest_client_name: String,
    pub dest_instance_name: String,
    pub backupset_name: String,
    /// True when restoring from the filesystem-based backupset, which
    /// targets the whole data directory rather than individual databases.
    pub filesystem_backupset: bool,
    pub copy_precedence: Option<u32>,
    pub from_time: Option<String>,
    pub to_time: Option<String>,
    pub clone_env: bool,
    pub clone_options: Option<CloneOptions>,
    /// Subclient whose backup data this restore draws from.
    pub association: SubclientEntity,
}

/// A PostgreSQL engine deployment under a client machine.
pub struct PostgresInstance {
    client: ClientRef,
    instance: InstanceRef,
    transport: Arc<dyn Transport>,
}

impl PostgresInstance {
    pub fn new(client: ClientRef, instance: InstanceRef, transport: Arc<dyn Transport>) -> Self {
        Self {
            client,
            instance,
            transport,
        }
    }

    pub fn client_name(&self) -> &str {
        &self.client.client_name
    }

    pub fn instance_name(&self) -> &str {
        &self.instance.instance_name
    }

    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Submits an in-place restore task and returns its job handle.
    pub async fn restore_in_place(&self, request: RestoreRequest) -> Result<Job> {
        let document = restore_task_document(&request);
        info!(
            dest_client = %request.dest_client_name,
            dest_instance = %request.dest_instance_name,
            backupset = %request.backupset_name,
            "submitting restore task"
        );
        let (flag, response) = self
            .transport
            .make_request(Method::POST, services::CREATE_TASK, Some(document))
            .await?;
        process_job_response(flag, response)
    }
}

fn restore_task_document(request: &RestoreRequest) -> Value {
    json!({
        "taskInfo": {
            "associations": [request.association],
            "task": {
                "taskType": "IMMEDIATE",
                "initiatedFrom": "COMMANDLINE",
            },
            "subTasks": [{
                "subTask": {
                    "subTaskType": "RESTORE",
                    "operationType": "RESTORE",
                },
                "options": {
                    "restoreOptions": {
                        "browseOption": {
                            "backupset": {
                                "backupsetName": request.backupset_name,
                            },
                            "timeRange": {
                                "fromTime": request.from_time,
                                "toTime": request.to_time,
                            },
                            "copyPrecedence": {
                                "copyPrecedenceApplicable": request.copy_precedence.is_some(),
                                "copyPrecedence": request.copy_precedence.unwrap_or(0),
                            },
                        },
                        "destination": {
                            "destClient": {
                                "clientName": request.dest_client_name,
                            },
                            "destinationInstance": {
                                "clientName": request.dest_client_name,
                                "instanceName": request.dest_instance_name,
                            },
                        },
                        "fileOption": {
                            "sourceItem": request.database_list,
                        },
                        "postgresRstOption": {
                            "fsBackupSetRestore": request.filesystem_backupset,
                            "cloneEnv": request.clone_env,
                            "cloneOptions": request.clone_options,
                        },
                    },
                },
            }],
        },
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transport::testing::RecordingTransport;

    fn request() -> RestoreRequest {
        RestoreRequest {
            database_list: vec!["salesdb".to_string()],
            dest_client_name: "client1".to_string(),
            dest_instance_name: "pg1".to_string(),
            backupset_name: "defaultbackupset".to_string(),
            filesystem_backupset: false,
            copy_precedence: None,
            from_time: None,
            to_time: None,
            clone_env: false,
            clone_options: None,
            association: SubclientEntity {
                client_name: "client1".to_string(),
                instance_name: "pg1".to_string(),
                backupset_name: "defaultbackupset".to_string(),
                subclient_name: "sc_sales".to_string(),
                subclient_id: Some(42),
            },
        }
    }

    #[tokio::test]
    async fn restore_posts_to_create_task_and_returns_job() -> anyhow::Result<()> {
        let transport = Arc::new(RecordingTransport::single(
            true,
            Some(json!({ "jobIds": ["88"] })),
        ));
        let instance = PostgresInstance::new(
            ClientRef::new("client1"),
            InstanceRef::new("pg1"),
            transport.clone(),
        );

        let job = instance.restore_in_place(request()).await?;
        assert_eq!(job, Job::new("88"));

        let recorded = transport.recorded();
        assert_eq!(recorded.len(), 1);
        let (method, endpoint, body) = &recorded[0];
        assert_eq!(*method, Method::POST);
        assert_eq!(endpoint, services::CREATE_TASK);

        let options = &body.as_ref().unwrap()["taskInfo"]["subTasks"][0]["options"]["restoreOptions"];
        assert_eq!(options["fileOption"]["sourceItem"], json!(["salesdb"]));
        assert_eq!(options["destination"]["destClient"]["clientName"], "client1");
        assert_eq!(
            options["destination"]["destinationInstance"]["instanceName"],
            "pg1"
        );
        assert_eq!(options["postgresRstOption"]["fsBackupSetRestore"], false);
        Ok(())
    }

    #[tokio::test]
    async fn copy_precedence_is_marked_applicable_only_when_set() -> anyhow::Result<()> {
        let transport = Arc::new(RecordingTransport::accepting_jobs());
        let instance = PostgresInstance::new(
            ClientRef::new("client1"),
            InstanceRef::new("pg1"),
            transport.clone(),
        );

        let mut with_precedence = request();
        with_precedence.copy_precedence = Some(2);
        instance.restore_in_place(with_precedence).await?;
        instance.restore_in_place(request()).await?;

        let recorded = transport.recorded();
        let precedence = |body: &Value| {
            body["taskInfo"]["subTasks"][0]["options"]["restoreOptions"]["browseOption"]
                ["copyPrecedence"]
                .clone()
        };
        assert_eq!(
            precedence(recorded[0].2.as_ref().unwrap()),
            json!({ "copyPrecedenceApplicable": true, "copyPrecedence": 2 })
        );
        assert_eq!(
            precedence(recorded[1].2.as_ref().unwrap()),
            json!({ "copyPrecedenceApplicable": false, "copyPrecedence": 0 })
        );
        Ok(())
    }

    #[tokio::test]
    async fn clone_options_pass_through_untouched() -> anyhow::Result<()> {
        let transport = Arc::new(RecordingTransport::accepting_jobs());
        let instance = PostgresInstance::new(
            ClientRef::new("client1"),
            InstanceRef::new("pg1"),
            transport.clone(),
        );

        let mut clone_request = request();
        clone_request.clone_env = true;
        clone_request.clone_options = Some(CloneOptions {
            staging_location: "/gk_snap".to_string(),
            force_cleanup: true,
            port: "5595".to_string(),
            lib_directory: "/opt/PostgreSQL/9.6/lib".to_string(),
            is_instance_selected: true,
            reservation_period_s: 3600,
            user: "postgres".to_string(),
            binary_directory: "/opt/PostgreSQL/9.6/bin".to_string(),
        });
        instance.restore_in_place(clone_request).await?;

        let recorded = transport.recorded();
        let rst = &recorded[0].2.as_ref().unwrap()["taskInfo"]["subTasks"][0]["options"]
            ["restoreOptions"]["postgresRstOption"];
        assert_eq!(rst["cloneEnv"], true);
        assert_eq!(rst["cloneOptions"]["stagingLocation"], "/gk_snap");
        assert_eq!(rst["cloneOptions"]["reservationPeriodS"], 3600);
        Ok(())
    }
}
