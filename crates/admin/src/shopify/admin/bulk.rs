//! Staged uploads and bulk mutation submission.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use tracing::instrument;

use metafields_core::{StagedUploadKeyError, staged_upload_key};

use super::AdminClient;
use super::queries::{
    BulkOperationRunMutation, StagedUploadsCreate, UserErrorNode, bulk_operation_run_mutation,
    staged_uploads_create,
};
use crate::shopify::AdminShopifyError;
use crate::shopify::types::{
    BulkOperation, BulkSubmission, StagedUploadTarget, UserError, format_user_errors,
};

/// Timeout for the raw file upload to the staged target.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

/// Raw response from the staged upload destination.
#[derive(Debug, Clone)]
pub struct StagedUploadResponse {
    /// HTTP status returned by the destination.
    pub status: u16,
    /// Response body (XML for S3/GCS-style destinations).
    pub body: String,
}

impl StagedUploadResponse {
    /// The storage key (`PostResponse/Key`) the bulk mutation must reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not XML or carries no key.
    pub fn key(&self) -> Result<String, StagedUploadKeyError> {
        staged_upload_key(&self.body)
    }

    /// Turn a non-2xx destination response into an error carrying its body.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::Api` with the destination's status and body.
    pub fn error_for_status(self) -> Result<Self, AdminShopifyError> {
        if (200..300).contains(&self.status) {
            Ok(self)
        } else {
            Err(AdminShopifyError::Api {
                status: self.status,
                message: self.body,
            })
        }
    }
}

fn convert_user_errors(errors: Vec<UserErrorNode>) -> Vec<UserError> {
    errors
        .into_iter()
        .map(|e| UserError {
            field: e.field.unwrap_or_default(),
            message: e.message,
        })
        .collect()
}

impl AdminClient {
    /// Request a staged upload target for a bulk mutation variables file.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::UserError` if Shopify rejects the request and
    /// `AdminShopifyError::NoStagedTarget` if it issues no target.
    #[instrument(skip(self))]
    pub async fn create_staged_upload(
        &self,
        filename: &str,
        mime_type: &str,
    ) -> Result<StagedUploadTarget, AdminShopifyError> {
        use staged_uploads_create::{
            StagedUploadHttpMethodType, StagedUploadInput,
            StagedUploadTargetGenerateUploadResource, Variables,
        };

        let variables = Variables {
            input: vec![StagedUploadInput {
                resource: StagedUploadTargetGenerateUploadResource::BULK_MUTATION_VARIABLES,
                filename: filename.to_string(),
                mime_type: mime_type.to_string(),
                http_method: Some(StagedUploadHttpMethodType::POST),
            }],
        };

        let response = self.execute::<StagedUploadsCreate>(variables).await?;

        let payload = response.staged_uploads_create.ok_or_else(|| {
            AdminShopifyError::UnexpectedResponse("missing stagedUploadsCreate payload".to_string())
        })?;

        if !payload.user_errors.is_empty() {
            let errors = convert_user_errors(payload.user_errors);
            return Err(AdminShopifyError::UserError(format_user_errors(&errors)));
        }

        let target = payload
            .staged_targets
            .and_then(|targets| targets.into_iter().next())
            .ok_or(AdminShopifyError::NoStagedTarget)?;

        let url = target.url.ok_or(AdminShopifyError::NoStagedTarget)?;

        Ok(StagedUploadTarget {
            url,
            resource_url: target.resource_url.unwrap_or_default(),
            parameters: target
                .parameters
                .into_iter()
                .map(|p| (p.name, p.value))
                .collect(),
        })
    }

    /// Upload a file to a staged target.
    ///
    /// Replays the target's form parameters in order, then attaches the file
    /// as the `file` part. The access token is not sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the upload request fails,
    /// or the destination answers with a non-2xx status.
    #[instrument(skip(self, target), fields(upload_url = %target.url, path = %path.display()))]
    pub async fn upload_staged_file(
        &self,
        target: &StagedUploadTarget,
        path: &Path,
    ) -> Result<StagedUploadResponse, AdminShopifyError> {
        let contents = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload.jsonl".to_string(), |n| n.to_string_lossy().into_owned());

        let form = target
            .parameters
            .iter()
            .fold(Form::new(), |form, (name, value)| {
                form.text(name.clone(), value.clone())
            })
            .part(
                "file",
                Part::bytes(contents)
                    .file_name(file_name)
                    .mime_str("text/jsonl")?,
            );

        let response = self
            .inner
            .client
            .post(&target.url)
            .multipart(form)
            .timeout(UPLOAD_TIMEOUT)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        StagedUploadResponse { status, body }.error_for_status()
    }

    /// Submit a bulk mutation against an uploaded variables file.
    ///
    /// Submit-only: the returned operation has just been created and its
    /// eventual outcome is not observed. User errors are passed through.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is missing.
    #[instrument(skip(self, mutation))]
    pub async fn submit_bulk_mutation(
        &self,
        mutation: &str,
        staged_upload_path: &str,
    ) -> Result<BulkSubmission, AdminShopifyError> {
        let variables = bulk_operation_run_mutation::Variables {
            mutation: mutation.to_string(),
            staged_upload_path: staged_upload_path.to_string(),
        };

        let response = self.execute::<BulkOperationRunMutation>(variables).await?;

        let payload = response.bulk_operation_run_mutation.ok_or_else(|| {
            AdminShopifyError::UnexpectedResponse(
                "missing bulkOperationRunMutation payload".to_string(),
            )
        })?;

        Ok(BulkSubmission {
            bulk_operation: payload.bulk_operation.map(|op| BulkOperation {
                id: op.id,
                status: op.status,
            }),
            user_errors: convert_user_errors(payload.user_errors),
        })
    }
}
