//! Bulk mutation run stages and remote bulk operation status.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Progress of a bulk metafield run.
///
/// Stages advance strictly in declaration order. A failure in any stage ends
/// the run; no stage is rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum BulkStage {
    /// Variants fetched and mutation file written; nothing sent yet.
    #[default]
    Init,
    /// `stagedUploadsCreate` sent.
    TargetRequested,
    /// A staged upload target was issued.
    TargetIssued,
    /// Mutation file uploaded to the staged target.
    FileUploaded,
    /// Storage key parsed from the upload response.
    KeyExtracted,
    /// `bulkOperationRunMutation` accepted. Terminal.
    JobTriggered,
}

impl BulkStage {
    /// Stable snake-case name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::TargetRequested => "target_requested",
            Self::TargetIssued => "target_issued",
            Self::FileUploaded => "file_uploaded",
            Self::KeyExtracted => "key_extracted",
            Self::JobTriggered => "job_triggered",
        }
    }

    /// The stage that follows this one, or `None` at the terminal stage.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Init => Some(Self::TargetRequested),
            Self::TargetRequested => Some(Self::TargetIssued),
            Self::TargetIssued => Some(Self::FileUploaded),
            Self::FileUploaded => Some(Self::KeyExtracted),
            Self::KeyExtracted => Some(Self::JobTriggered),
            Self::JobTriggered => None,
        }
    }
}

impl fmt::Display for BulkStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a Shopify bulk operation as reported when it was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BulkOperationStatus {
    Created,
    Running,
    Completed,
    Canceling,
    Canceled,
    Expired,
    Failed,
    /// A status this client does not know about.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for BulkOperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "CREATED",
            Self::Running => "RUNNING",
            Self::Completed => "COMPLETED",
            Self::Canceling => "CANCELING",
            Self::Canceled => "CANCELED",
            Self::Expired => "EXPIRED",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}
