//! GraphQL operation definitions for Shopify Admin API.
//!
//! Each operation is a unit struct implementing `graphql_client::GraphQLQuery`
//! over a hand-written document, with its variables and response data in a
//! snake-case module of the same name.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

/// Inner mutation run by Shopify once per line of the bulk mutation file.
///
/// Each JSONL line supplies `ownerId`, `namespace`, `key`, `type` and `value`
/// as top-level variables.
pub const METAFIELDS_SET_MUTATION: &str = "mutation metafieldsSet($ownerId: ID!, $namespace: String!, $key: String!, $type: String!, $value: String!) { metafieldsSet(metafields: [{ownerId: $ownerId, namespace: $namespace, key: $key, type: $type, value: $value}]) { metafields { id } userErrors { field message } } }";

/// A `userErrors { field message }` selection.
#[derive(Debug, Clone, Deserialize)]
pub struct UserErrorNode {
    pub field: Option<Vec<String>>,
    pub message: String,
}

// =============================================================================
// Staged uploads
// =============================================================================

pub struct StagedUploadsCreate;

pub mod staged_uploads_create {
    use super::{Deserialize, Serialize, UserErrorNode};

    pub const OPERATION_NAME: &str = "stagedUploadsCreate";
    pub const QUERY: &str = r"mutation stagedUploadsCreate($input: [StagedUploadInput!]!) {
  stagedUploadsCreate(input: $input) {
    stagedTargets {
      url
      resourceUrl
      parameters { name value }
    }
    userErrors { field message }
  }
}";

    #[derive(Debug, Clone, Copy, Serialize)]
    #[allow(clippy::upper_case_acronyms, non_camel_case_types)]
    pub enum StagedUploadTargetGenerateUploadResource {
        BULK_MUTATION_VARIABLES,
    }

    #[derive(Debug, Clone, Copy, Serialize)]
    #[allow(clippy::upper_case_acronyms)]
    pub enum StagedUploadHttpMethodType {
        POST,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StagedUploadInput {
        pub resource: StagedUploadTargetGenerateUploadResource,
        pub filename: String,
        pub mime_type: String,
        pub http_method: Option<StagedUploadHttpMethodType>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: Vec<StagedUploadInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub staged_uploads_create: Option<StagedUploadsCreatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StagedUploadsCreatePayload {
        pub staged_targets: Option<Vec<StagedTarget>>,
        #[serde(default)]
        pub user_errors: Vec<UserErrorNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StagedTarget {
        pub url: Option<String>,
        pub resource_url: Option<String>,
        #[serde(default)]
        pub parameters: Vec<StagedTargetParameter>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct StagedTargetParameter {
        pub name: String,
        pub value: String,
    }
}

impl GraphQLQuery for StagedUploadsCreate {
    type Variables = staged_uploads_create::Variables;
    type ResponseData = staged_uploads_create::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: staged_uploads_create::QUERY,
            operation_name: staged_uploads_create::OPERATION_NAME,
        }
    }
}

// =============================================================================
// Bulk operations
// =============================================================================

pub struct BulkOperationRunMutation;

pub mod bulk_operation_run_mutation {
    use super::{Deserialize, Serialize, UserErrorNode};
    use metafields_core::BulkOperationStatus;

    pub const OPERATION_NAME: &str = "bulkOperationRunMutation";
    pub const QUERY: &str = r"mutation bulkOperationRunMutation($mutation: String!, $stagedUploadPath: String!) {
  bulkOperationRunMutation(mutation: $mutation, stagedUploadPath: $stagedUploadPath) {
    bulkOperation {
      id
      status
    }
    userErrors { field message }
  }
}";

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub mutation: String,
        pub staged_upload_path: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub bulk_operation_run_mutation: Option<BulkOperationRunMutationPayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BulkOperationRunMutationPayload {
        pub bulk_operation: Option<BulkOperationNode>,
        #[serde(default)]
        pub user_errors: Vec<UserErrorNode>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct BulkOperationNode {
        pub id: String,
        pub status: BulkOperationStatus,
    }
}

impl GraphQLQuery for BulkOperationRunMutation {
    type Variables = bulk_operation_run_mutation::Variables;
    type ResponseData = bulk_operation_run_mutation::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: bulk_operation_run_mutation::QUERY,
            operation_name: bulk_operation_run_mutation::OPERATION_NAME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_upload_body() {
        use staged_uploads_create::{
            StagedUploadHttpMethodType, StagedUploadInput,
            StagedUploadTargetGenerateUploadResource, Variables,
        };

        let body = StagedUploadsCreate::build_query(Variables {
            input: vec![StagedUploadInput {
                resource: StagedUploadTargetGenerateUploadResource::BULK_MUTATION_VARIABLES,
                filename: "bulk_metafields.jsonl".to_string(),
                mime_type: "text/jsonl".to_string(),
                http_method: Some(StagedUploadHttpMethodType::POST),
            }],
        });
        let json = serde_json::to_value(&body).expect("serialize");

        assert_eq!(json["operationName"], "stagedUploadsCreate");
        assert_eq!(
            json["variables"]["input"][0],
            serde_json::json!({
                "resource": "BULK_MUTATION_VARIABLES",
                "filename": "bulk_metafields.jsonl",
                "mimeType": "text/jsonl",
                "httpMethod": "POST"
            })
        );
    }

    #[test]
    fn test_bulk_run_body() {
        let body = BulkOperationRunMutation::build_query(bulk_operation_run_mutation::Variables {
            mutation: METAFIELDS_SET_MUTATION.to_string(),
            staged_upload_path: "tmp/1/bulk.jsonl".to_string(),
        });
        let json = serde_json::to_value(&body).expect("serialize");

        assert_eq!(json["variables"]["stagedUploadPath"], "tmp/1/bulk.jsonl");
        assert!(
            json["query"]
                .as_str()
                .is_some_and(|q| q.starts_with("mutation bulkOperationRunMutation"))
        );
    }

    #[test]
    fn test_inner_mutation_variables_match_jsonl_keys() {
        for variable in ["$ownerId", "$namespace", "$key", "$type", "$value"] {
            assert!(METAFIELDS_SET_MUTATION.contains(variable), "{variable}");
        }
    }
}
