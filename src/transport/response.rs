//! Shared response processing for the orchestration server's endpoints.

use serde_json::Value;

use crate::errors::{Result, SdkError};
use crate::job::Job;

/// Checks the transport `(flag, response)` pair and returns the payload.
///
/// A non-success flag becomes a `RequestFailure` carrying the server's
/// error message when one is present; a success flag without any payload
/// is an `EmptyResponse`.
pub fn require_success(flag: bool, response: Option<Value>) -> Result<Value> {
    if !flag {
        let message = response
            .as_ref()
            .and_then(|payload| payload.get("errorMessage"))
            .and_then(Value::as_str)
            .unwrap_or("server rejected the request")
            .to_string();
        return Err(SdkError::RequestFailure(message));
    }
    response.ok_or(SdkError::EmptyResponse)
}

/// Converts a task-submission response into a [`Job`] handle.
pub fn process_job_response(flag: bool, response: Option<Value>) -> Result<Job> {
    let payload = require_success(flag, response)?;
    job_id_from(&payload)
        .map(Job::new)
        .ok_or_else(|| SdkError::RequestFailure("response carried no job id".to_string()))
}

fn job_id_from(payload: &Value) -> Option<String> {
    if let Some(first) = payload
        .get("jobIds")
        .and_then(Value::as_array)
        .and_then(|ids| ids.first())
    {
        return value_as_id(first);
    }
    payload.get("jobId").and_then(value_as_id)
}

// Job ids arrive as strings from some server versions and as numbers
// from others.
fn value_as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn job_id_extracted_from_job_ids_array() -> anyhow::Result<()> {
        let job = process_job_response(true, Some(json!({ "jobIds": ["4521"] })))?;
        assert_eq!(job, Job::new("4521"));
        Ok(())
    }

    #[test]
    fn numeric_job_id_field_is_accepted() -> anyhow::Result<()> {
        let job = process_job_response(true, Some(json!({ "jobId": 4521 })))?;
        assert_eq!(job, Job::new("4521"));
        Ok(())
    }

    #[test]
    fn missing_payload_is_empty_response() {
        let err = process_job_response(true, None).unwrap_err();
        assert!(matches!(err, SdkError::EmptyResponse));
    }

    #[test]
    fn non_success_flag_is_request_failure_with_server_message() {
        let err = process_job_response(
            false,
            Some(json!({ "errorMessage": "no storage policy assigned" })),
        )
        .unwrap_err();
        match err {
            SdkError::RequestFailure(message) => {
                assert_eq!(message, "no storage policy assigned");
            }
            other => panic!("expected RequestFailure, got {other:?}"),
        }
    }

    #[test]
    fn non_success_flag_without_payload_still_fails() {
        let err = process_job_response(false, None).unwrap_err();
        assert!(matches!(err, SdkError::RequestFailure(_)));
    }

    #[test]
    fn payload_without_job_id_is_request_failure() {
        let err = process_job_response(true, Some(json!({ "taskId": 9 }))).unwrap_err();
        assert!(matches!(err, SdkError::RequestFailure(_)));
    }
}
