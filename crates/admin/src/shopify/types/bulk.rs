//! Staged upload and bulk operation domain types.

use serde::{Deserialize, Serialize};

use metafields_core::BulkOperationStatus;

/// Staged upload target for file uploads.
///
/// Issued by `stagedUploadsCreate` and consumed by exactly one upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagedUploadTarget {
    /// The URL to upload the file to.
    pub url: String,
    /// The resource URL after upload completes.
    pub resource_url: String,
    /// Form parameters to replay, in order, before the file part.
    pub parameters: Vec<(String, String)>,
}

/// A user error from a GraphQL mutation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    /// Path to the offending input field, if any.
    pub field: Vec<String>,
    /// Error message.
    pub message: String,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.field.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.field.join("."), self.message)
        }
    }
}

/// Join user errors into a single line.
#[must_use]
pub fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A bulk operation as observed when it was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkOperation {
    /// Bulk operation global id (`gid://shopify/BulkOperation/{id}`).
    pub id: String,
    /// Status at submission time.
    pub status: BulkOperationStatus,
}

/// Result of submitting a bulk mutation.
///
/// Submission only: the operation runs asynchronously on Shopify's side and
/// this value says nothing about whether it eventually succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSubmission {
    /// The created operation, absent when Shopify rejected the submission.
    pub bulk_operation: Option<BulkOperation>,
    /// User errors returned alongside (or instead of) the operation.
    pub user_errors: Vec<UserError>,
}

impl BulkSubmission {
    /// The submitted operation's id, if one was created.
    #[must_use]
    pub fn operation_id(&self) -> Option<&str> {
        self.bulk_operation.as_ref().map(|op| op.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_display() {
        let errors = vec![
            UserError {
                field: vec!["stagedUploadPath".to_string()],
                message: "is invalid".to_string(),
            },
            UserError {
                field: vec![],
                message: "A bulk mutation operation is already in progress".to_string(),
            },
        ];
        assert_eq!(
            format_user_errors(&errors),
            "stagedUploadPath: is invalid; A bulk mutation operation is already in progress"
        );
    }

    #[test]
    fn test_operation_id() {
        let submission = BulkSubmission {
            bulk_operation: Some(BulkOperation {
                id: "gid://shopify/BulkOperation/1".to_string(),
                status: BulkOperationStatus::Created,
            }),
            user_errors: vec![],
        };
        assert_eq!(
            submission.operation_id(),
            Some("gid://shopify/BulkOperation/1")
        );

        let rejected = BulkSubmission {
            bulk_operation: None,
            user_errors: vec![],
        };
        assert_eq!(rejected.operation_id(), None);
    }
}
