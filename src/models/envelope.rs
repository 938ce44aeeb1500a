//! The uniform response wrapper returned by every jobs API endpoint.

use serde::{Deserialize, Serialize};

/// `{success, result?, error?}` as sent by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Split into the success payload or the server's error text.
    ///
    /// A failed envelope with a blank error yields `Err(None)`.
    pub fn into_outcome(self) -> Result<Option<T>, Option<String>> {
        if self.success {
            Ok(self.result)
        } else {
            Err(self.error.filter(|e| !e.trim().is_empty()))
        }
    }
}

/// Request body for the bulk-enable endpoint
#[derive(Debug, Clone, Serialize)]
pub struct BulkEnableRequest<'a> {
    pub job_ids: &'a [super::JobId],
}
