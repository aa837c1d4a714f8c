use serde::{Deserialize, Serialize};

/// Opaque handle to an asynchronous backup or restore task on the server.
///
/// The id is whatever the server reported for the submitted task; status
/// polling is up to the caller and not part of this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
}

impl Job {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
        }
    }
}
