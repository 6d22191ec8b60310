//! Integration tests for the Shopify metafield tools.
//!
//! Every test runs against a [`MockShopify`], a `wiremock` server standing in
//! for both the store's Admin API and the staged upload destination.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p metafields-integration-tests
//! ```

use metafields_admin::config::{ServerConfig, ShopifyAdminConfig};
use metafields_admin::shopify::AdminClient;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Store domain used by every test.
pub const STORE: &str = "test-shop.myshopify.com";

/// Access token used by every test.
pub const TOKEN: &str = "shpat_integration_test_token";

/// API version used by every test.
pub const API_VERSION: &str = "2024-01";

/// Storage key returned by the mock upload destination.
pub const STAGED_KEY: &str = "tmp/21759409/bulk/bulk_metafields.jsonl";

/// Bulk operation id returned by the mock bulk run.
pub const OPERATION_ID: &str = "gid://shopify/BulkOperation/5713727521";

/// A mock Shopify store.
pub struct MockShopify {
    pub server: MockServer,
}

impl MockShopify {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Admin API configuration pointing at the mock.
    #[must_use]
    pub fn config(&self) -> ShopifyAdminConfig {
        ShopifyAdminConfig::new(STORE, SecretString::from(TOKEN), API_VERSION)
            .with_base_url(Some(self.server.uri()))
    }

    #[must_use]
    pub fn client(&self) -> AdminClient {
        AdminClient::new(&self.config())
    }

    /// Server configuration routing every submitted store to the mock.
    #[must_use]
    pub fn server_config(&self, mutation_file: std::path::PathBuf) -> ServerConfig {
        ServerConfig {
            shopify_base_url: Some(self.server.uri()),
            mutation_file,
            ..ServerConfig::default()
        }
    }

    fn api_path(suffix: &str) -> String {
        format!("/admin/api/{API_VERSION}/{suffix}")
    }

    /// Staged upload destination URL.
    #[must_use]
    pub fn upload_url(&self) -> String {
        format!("{}/staged-upload", self.server.uri())
    }

    /// Serve `pages` of products. Each page is a list of products, each
    /// product a list of variant ids.
    ///
    /// Page `n > 0` is served for `page_info=page{n}`; every page but the
    /// last links to the next one.
    pub async fn mount_product_pages(&self, pages: &[&[&[u64]]]) {
        for (index, page) in pages.iter().enumerate() {
            let products: Vec<Value> = page
                .iter()
                .enumerate()
                .map(|(offset, variants)| {
                    let product_id = (index as u64 + 1) * 1000 + offset as u64;
                    json!({
                        "id": product_id,
                        "title": format!("Product {product_id}"),
                        "variants": variants
                            .iter()
                            .map(|id| json!({"id": id, "product_id": product_id}))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            let mut response =
                ResponseTemplate::new(200).set_body_json(json!({ "products": products }));
            if index + 1 < pages.len() {
                let link = format!(
                    "<{}{}?limit=250&page_info=page{}>; rel=\"next\"",
                    self.server.uri(),
                    Self::api_path("products.json"),
                    index + 1
                );
                response = response.insert_header("Link", link.as_str());
            }

            let mock = Mock::given(method("GET"))
                .and(path(Self::api_path("products.json")))
                .and(query_param("limit", "250"));
            let mock = if index == 0 {
                mock.and(query_param_is_missing("page_info"))
            } else {
                mock.and(query_param("page_info", format!("page{index}")))
            };

            mock.respond_with(response)
                .expect(1)
                .mount(&self.server)
                .await;
        }
    }

    /// Answer `stagedUploadsCreate` with one target at [`Self::upload_url`].
    pub async fn mount_staged_target(&self) {
        self.mount_graphql(
            "stagedUploadsCreate",
            json!({
                "stagedUploadsCreate": {
                    "stagedTargets": [{
                        "url": self.upload_url(),
                        "resourceUrl": null,
                        "parameters": [
                            {"name": "key", "value": "tmp/21759409/bulk/bulk_metafields.jsonl"},
                            {"name": "Content-Type", "value": "text/jsonl"},
                            {"name": "success_action_status", "value": "201"},
                            {"name": "policy", "value": "eyJjb25kaXRpb25zIjpbXX0="}
                        ]
                    }],
                    "userErrors": []
                }
            }),
            1,
        )
        .await;
    }

    /// Answer `stagedUploadsCreate` with no targets.
    pub async fn mount_no_staged_target(&self) {
        self.mount_graphql(
            "stagedUploadsCreate",
            json!({"stagedUploadsCreate": {"stagedTargets": [], "userErrors": []}}),
            1,
        )
        .await;
    }

    /// Accept uploads, answering with `body`, expecting `calls` uploads.
    pub async fn mount_upload(&self, body: &str, calls: u64) {
        self.mount_upload_status(201, body, calls).await;
    }

    /// Answer staged uploads with `status` and an XML `body`.
    pub async fn mount_upload_status(&self, status: u16, body: &str, calls: u64) {
        Mock::given(method("POST"))
            .and(path("/staged-upload"))
            .respond_with(
                ResponseTemplate::new(status).set_body_raw(body.to_string(), "application/xml"),
            )
            .expect(calls)
            .mount(&self.server)
            .await;
    }

    /// Answer `bulkOperationRunMutation` for [`STAGED_KEY`], expecting `calls`
    /// submissions.
    pub async fn mount_bulk_run(&self, data: Value, calls: u64) {
        Mock::given(method("POST"))
            .and(path(Self::api_path("graphql.json")))
            .and(body_partial_json(json!({
                "operationName": "bulkOperationRunMutation",
                "variables": {"stagedUploadPath": STAGED_KEY}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
            .expect(calls)
            .mount(&self.server)
            .await;
    }

    async fn mount_graphql(&self, operation: &str, data: Value, calls: u64) {
        Mock::given(method("POST"))
            .and(path(Self::api_path("graphql.json")))
            .and(body_partial_json(json!({ "operationName": operation })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
            .expect(calls)
            .mount(&self.server)
            .await;
    }

    /// Requests received by the upload destination.
    pub async fn upload_requests(&self) -> Vec<wiremock::Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == "/staged-upload")
            .collect()
    }
}

/// Upload destination response carrying [`STAGED_KEY`].
#[must_use]
pub fn post_response_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<PostResponse><Location>https://shopify-staged-uploads.storage.googleapis.com/{STAGED_KEY}</Location><Bucket>shopify-staged-uploads</Bucket><Key>{STAGED_KEY}</Key><ETag>"0cc175b9c0f1b6a831c399e269772661"</ETag></PostResponse>"#
    )
}

/// Successful `bulkOperationRunMutation` data.
#[must_use]
pub fn created_operation() -> Value {
    json!({
        "bulkOperationRunMutation": {
            "bulkOperation": {"id": OPERATION_ID, "status": "CREATED"},
            "userErrors": []
        }
    })
}
