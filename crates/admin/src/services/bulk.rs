//! Bulk metafield run.
//!
//! Lists every variant, writes the mutation file, uploads it to a staged
//! target and submits a bulk mutation referencing the uploaded key. Stages run
//! strictly in order and the first failure aborts the run; nothing already
//! done is rolled back.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::instrument;

use metafields_core::{BulkStage, MetafieldSpec};

use crate::services::mutation_file::{MUTATION_FILE_MIME, MUTATION_FILE_NAME, write_mutation_file};
use crate::shopify::queries::METAFIELDS_SET_MUTATION;
use crate::shopify::{AdminClient, AdminShopifyError, BulkSubmission};

/// A failed bulk run, tagged with the stage it failed in.
#[derive(Debug, Error)]
pub enum BulkRunError {
    #[error("{stage}: {source}")]
    Shopify {
        stage: BulkStage,
        #[source]
        source: AdminShopifyError,
    },

    #[error("{stage}: failed to write {}: {source}", .path.display())]
    MutationFile {
        stage: BulkStage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BulkRunError {
    /// Stage the run was in when it failed.
    #[must_use]
    pub const fn stage(&self) -> BulkStage {
        match self {
            Self::Shopify { stage, .. } | Self::MutationFile { stage, .. } => *stage,
        }
    }
}

/// Outcome of a bulk run that reached submission.
#[derive(Debug, Clone)]
pub struct BulkRunReport {
    /// Number of variants written to the mutation file.
    pub variants: usize,
    /// Storage key the bulk mutation references.
    pub staged_upload_path: String,
    /// Shopify's answer to the submission.
    pub submission: BulkSubmission,
}

/// One bulk metafield run against a store.
pub struct BulkMetafieldRun<'a> {
    client: &'a AdminClient,
    spec: MetafieldSpec,
    mutation_file: PathBuf,
    stage: BulkStage,
}

impl<'a> BulkMetafieldRun<'a> {
    #[must_use]
    pub fn new(client: &'a AdminClient, spec: MetafieldSpec, mutation_file: impl AsRef<Path>) -> Self {
        Self {
            client,
            spec,
            mutation_file: mutation_file.as_ref().to_path_buf(),
            stage: BulkStage::Init,
        }
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> BulkStage {
        self.stage
    }

    fn advance(&mut self) {
        if let Some(next) = self.stage.next() {
            tracing::info!(from = %self.stage, to = %next, "Bulk run stage");
            self.stage = next;
        }
    }

    fn shopify_error(&self, source: AdminShopifyError) -> BulkRunError {
        tracing::error!(stage = %self.stage, error = %source, "Bulk run failed");
        BulkRunError::Shopify {
            stage: self.stage,
            source,
        }
    }

    /// Run every stage to submission.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure. Later stages are not attempted.
    #[instrument(skip(self), fields(store = %self.client.store(), namespace = %self.spec.namespace, key = %self.spec.key))]
    pub async fn run(mut self) -> Result<BulkRunReport, BulkRunError> {
        let variants = self
            .client
            .list_variants()
            .await
            .map_err(|e| self.shopify_error(e))?;
        tracing::info!(variants = variants.len(), "Discovered variants");

        let written = write_mutation_file(&self.mutation_file, &variants, &self.spec)
            .await
            .map_err(|source| {
                tracing::error!(stage = %self.stage, error = %source, "Bulk run failed");
                BulkRunError::MutationFile {
                    stage: self.stage,
                    path: self.mutation_file.clone(),
                    source,
                }
            })?;

        self.advance();
        let target = self
            .client
            .create_staged_upload(MUTATION_FILE_NAME, MUTATION_FILE_MIME)
            .await
            .map_err(|e| self.shopify_error(e))?;
        self.advance();

        let response = self
            .client
            .upload_staged_file(&target, &self.mutation_file)
            .await
            .map_err(|e| self.shopify_error(e))?;
        self.advance();

        let staged_upload_path = response
            .key()
            .map_err(|e| self.shopify_error(e.into()))?;
        self.advance();

        let submission = self
            .client
            .submit_bulk_mutation(METAFIELDS_SET_MUTATION, &staged_upload_path)
            .await
            .map_err(|e| self.shopify_error(e))?;
        self.advance();

        match &submission.bulk_operation {
            Some(operation) => tracing::info!(
                operation_id = %operation.id,
                status = %operation.status,
                "Bulk operation submitted"
            ),
            None => tracing::warn!(
                user_errors = submission.user_errors.len(),
                "Bulk operation not created"
            ),
        }

        Ok(BulkRunReport {
            variants: written,
            staged_upload_path,
            submission,
        })
    }
}
