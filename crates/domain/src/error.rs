//! Error types shared across the workspace.
//!
//! Each failure in the command pipeline has its own type so callers can match
//! on the outcome. Adapter failures cross port boundaries as
//! [`DeliveryError`] (messaging) or [`OutputError`] (hardware), carrying the
//! adapter's own error as a boxed source.

use crate::zone::{OutputHandle, ZoneId};

/// Boxed adapter error carried as a `source`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure to decode an inbound command payload.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A required field is missing, mistyped, or the payload is not a JSON object.
    #[error("malformed command payload")]
    MalformedPayload(#[source] serde_json::Error),
}

/// Failure to map a zone id to an output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("zone {0} is not registered")]
    UnknownZone(ZoneId),
}

/// A well-formed command refused by the mutual-exclusion policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyRejection {
    /// An activation arrived while another zone is energized.
    #[error("cannot start zone {requested}: a zone is already active")]
    AlreadyActive { requested: ZoneId },
}

/// A well-formed command that is not addressed to this controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("topic/accessory mismatch (topic {topic:?}, accessory {accessory:?})")]
pub struct TopicMismatch {
    pub topic: String,
    pub accessory: Option<String>,
}

/// Invalid zone table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("zone table is empty")]
    Empty,

    #[error("zone {0} is listed more than once")]
    DuplicateZone(ZoneId),

    #[error("{0} is bound to more than one zone")]
    DuplicateOutput(OutputHandle),
}

/// The messaging transport failed to subscribe or publish.
#[derive(Debug, thiserror::Error)]
#[error("failed to deliver to topic {topic}")]
pub struct DeliveryError {
    pub topic: String,
    #[source]
    pub source: BoxError,
}

impl DeliveryError {
    pub fn new(topic: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            topic: topic.into(),
            source: source.into(),
        }
    }
}

/// An output driver could not set a level.
#[derive(Debug, thiserror::Error)]
#[error("failed to drive {handle}")]
pub struct OutputError {
    pub handle: OutputHandle,
    #[source]
    pub source: BoxError,
}

impl OutputError {
    pub fn new(handle: OutputHandle, source: impl Into<BoxError>) -> Self {
        Self {
            handle,
            source: source.into(),
        }
    }
}
