//! Shopify Admin API client authenticated with a static access token.
//!
//! REST calls cover product listing and variant metafields; GraphQL covers
//! staged uploads and bulk mutation submission.

use std::sync::Arc;

use graphql_client::GraphQLQuery;
use reqwest::{Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;

use crate::config::ShopifyAdminConfig;

use super::{AdminShopifyError, GraphQLError, GraphQLErrorLocation};

mod bulk;
mod metafields;
mod products;
pub mod queries;

pub use bulk::StagedUploadResponse;
pub use products::PRODUCTS_PAGE_SIZE;

/// Header carrying the Admin API access token.
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Shopify Admin API client.
///
/// Cheap to clone; all clones share one connection pool.
///
/// # Security
///
/// The access token grants write access to the store. It is attached only to
/// requests against the configured Admin API origin.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    store: String,
    /// Versioned API root without a trailing slash.
    api_url: String,
    access_token: SecretString,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorLocationResponse {
    line: i64,
    column: i64,
}

impl AdminClient {
    /// Create a new Admin API client.
    #[must_use]
    pub fn new(config: &ShopifyAdminConfig) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                store: config.store.clone(),
                api_url: config.admin_api_url(),
                access_token: SecretString::from(config.token()),
            }),
        }
    }

    /// Get the store domain.
    #[must_use]
    pub fn store(&self) -> &str {
        &self.inner.store
    }

    /// Build an Admin API URL for a path relative to the versioned root,
    /// e.g. `products.json`.
    fn endpoint(&self, path: &str) -> Result<Url, AdminShopifyError> {
        Ok(Url::parse(&format!(
            "{}/{}",
            self.inner.api_url,
            path.trim_start_matches('/')
        ))?)
    }

    // =========================================================================
    // REST Execution
    // =========================================================================

    async fn send_get(&self, url: Url) -> Result<Response, AdminShopifyError> {
        let response = self
            .inner
            .client
            .get(url)
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .send()
            .await?;

        check_status(response).await
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<Response, AdminShopifyError> {
        let response = self
            .inner
            .client
            .post(url)
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .json(body)
            .send()
            .await?;

        check_status(response).await
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, AdminShopifyError>
    where
        Q::ResponseData: DeserializeOwned,
    {
        let endpoint = self.endpoint("graphql.json")?;
        let body = Q::build_query(variables);

        let response = self.post_json(endpoint, &body).await?;
        let graphql_response: GraphQLResponse<Q::ResponseData> = response.json().await?;

        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            let converted_errors: Vec<GraphQLError> = errors
                .into_iter()
                .map(|e| GraphQLError {
                    message: e.message,
                    locations: e
                        .locations
                        .into_iter()
                        .map(|l| GraphQLErrorLocation {
                            line: l.line,
                            column: l.column,
                        })
                        .collect(),
                    path: e.path,
                })
                .collect();
            return Err(AdminShopifyError::GraphQL(converted_errors));
        }

        graphql_response
            .data
            .ok_or_else(|| AdminShopifyError::GraphQL(vec![GraphQLError::message("No data in response")]))
    }
}

/// Map non-success statuses to typed errors.
async fn check_status(response: Response) -> Result<Response, AdminShopifyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            // Shopify sends fractional seconds, e.g. "2.0"
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.split('.').next())
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(60);
            Err(AdminShopifyError::RateLimited(retry_after))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AdminShopifyError::Unauthorized(
            "Invalid or expired access token".to_string(),
        )),
        StatusCode::NOT_FOUND => Err(AdminShopifyError::NotFound(
            response.url().path().to_string(),
        )),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(AdminShopifyError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            })
        }
    }
}

/// Pull the `errors` member out of a REST error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("errors").map(ToString::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> AdminClient {
        let config = ShopifyAdminConfig::new(
            "test-shop.myshopify.com",
            SecretString::from("shpat_test"),
            "2024-01",
        )
        .with_base_url(Some(base_url.to_string()));
        AdminClient::new(&config)
    }

    #[test]
    fn test_endpoint_joins_versioned_root() {
        let client = client("http://127.0.0.1:9999");
        let url = client.endpoint("/variants/5/metafields.json").expect("url");
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9999/admin/api/2024-01/variants/5/metafields.json"
        );
        assert_eq!(client.store(), "test-shop.myshopify.com");
    }

    #[test]
    fn test_error_message_prefers_errors_member() {
        assert_eq!(
            error_message(r#"{"errors":{"value":["can't be blank"]}}"#),
            r#"{"value":["can't be blank"]}"#
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_check_status_rate_limit_parses_fractional_retry_after() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "2.0"))
            .mount(&server)
            .await;

        let client = client(&server.uri());
        let url = client.endpoint("products.json").expect("url");
        let err = client.send_get(url).await.expect_err("rate limited");
        assert!(matches!(err, AdminShopifyError::RateLimited(2)));
    }

    #[tokio::test]
    async fn test_token_header_sent_to_admin_api() {
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/api/2024-01/shop.json"))
            .and(header(ACCESS_TOKEN_HEADER, "shpat_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server.uri());
        let url = client.endpoint("shop.json").expect("url");
        client.send_get(url).await.expect("ok");
    }
}
