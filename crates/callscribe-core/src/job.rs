//! Inbound job descriptor.
//!
//! A [`CallJob`] is the call-detail record delivered by the upstream
//! transport when a call finishes (or when an operator uploads a recording).
//! Field names follow the transport's camelCase JSON wire format.

use serde::{Deserialize, Serialize};

use crate::leg::{AudioLeg, LegTag};

/// Where a recording came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CallSource {
    /// A call answered by the PBX.
    Inbound,
    /// A call placed through the PBX.
    Outbound,
    /// A compressed recording uploaded by an operator.
    Upload,
}

/// One unit of transcription work. Immutable once admitted.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallJob {
    /// Call-detail-record ID, echoed back to the backend on delivery.
    pub id: i64,
    /// PBX unique call identifier, e.g. `"170355.1234"`. Also the
    /// idempotency key.
    pub unique_id: String,
    /// Origin of the recording; decides the leg layout.
    #[serde(rename = "sourceKind")]
    pub source: CallSource,
    /// File name of an uploaded recording. Required for
    /// [`CallSource::Upload`] jobs, absent otherwise.
    #[serde(
        rename = "callRecordFileName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub upload_file_name: Option<String>,
    /// Deliver results to the developer backend instead of the standard one.
    #[serde(rename = "isDeveloperInstance", default)]
    pub developer_instance: bool,
}

/// A job descriptor that cannot be turned into retrievable legs.
#[derive(Debug, thiserror::Error)]
pub enum JobDescriptorError {
    /// An upload job arrived without the name of the uploaded file.
    #[error("upload job {0} has no call record file name")]
    MissingUploadFileName(i64),
}

impl CallJob {
    /// Plan the retrievable legs for this job, in transcription order.
    ///
    /// Two-party calls produce legs A and B; uploads produce exactly one
    /// [`LegTag::Single`] leg named from the supplied file name.
    pub fn legs(&self) -> Result<Vec<AudioLeg>, JobDescriptorError> {
        match self.source {
            CallSource::Inbound | CallSource::Outbound => Ok(vec![
                AudioLeg::call_leg(&self.unique_id, LegTag::A),
                AudioLeg::call_leg(&self.unique_id, LegTag::B),
            ]),
            CallSource::Upload => {
                let name = self
                    .upload_file_name
                    .as_deref()
                    .ok_or(JobDescriptorError::MissingUploadFileName(self.id))?;
                Ok(vec![AudioLeg::upload(name)])
            }
        }
    }
}
