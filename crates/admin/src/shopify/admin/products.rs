//! Product and variant listing over the REST Admin API.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use tracing::instrument;

use metafields_core::{PageCursor, next_page_cursor};

use super::AdminClient;
use crate::shopify::AdminShopifyError;
use crate::shopify::types::{Product, VariantRef, flatten_variants};

/// Largest page the REST products endpoint serves.
pub const PRODUCTS_PAGE_SIZE: u32 = 250;

impl AdminClient {
    /// Fetch every page of a cursor-paginated REST collection.
    ///
    /// Follows `rel="next"` links from the `Link` header until none remains.
    /// A cursor that comes back a second time aborts the walk instead of
    /// looping forever.
    #[instrument(skip(self), fields(store = %self.store()))]
    async fn paginate<T: DeserializeOwned>(
        &self,
        path: &str,
        root: &str,
        page_size: u32,
    ) -> Result<Vec<T>, AdminShopifyError> {
        let mut items = Vec::new();
        let mut cursor: Option<PageCursor> = None;
        let mut seen = HashSet::new();
        let mut pages = 0_usize;

        loop {
            let mut url = self.endpoint(path)?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("limit", &page_size.to_string());
                if let Some(cursor) = &cursor {
                    query.append_pair("page_info", cursor.as_str());
                }
            }

            let response = self.send_get(url).await?;
            let link = response
                .headers()
                .get(reqwest::header::LINK)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string);

            let mut body: serde_json::Value = response.json().await?;
            let page = body
                .get_mut(root)
                .map(serde_json::Value::take)
                .ok_or_else(|| {
                    AdminShopifyError::UnexpectedResponse(format!("missing `{root}` in {path}"))
                })?;
            let page: Vec<T> = serde_json::from_value(page)?;
            pages += 1;
            tracing::debug!(page = pages, count = page.len(), "Fetched page");
            items.extend(page);

            let next = match link.as_deref() {
                Some(header) => next_page_cursor(header)?,
                None => None,
            };
            match next {
                Some(next) => {
                    if !seen.insert(next.clone()) {
                        return Err(AdminShopifyError::RepeatedCursor(next.to_string()));
                    }
                    cursor = Some(next);
                }
                None => break,
            }
        }

        tracing::info!(pages, total = items.len(), "Pagination complete");
        Ok(items)
    }

    /// List every product in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails or the `Link` header is malformed.
    pub async fn list_products(&self) -> Result<Vec<Product>, AdminShopifyError> {
        self.paginate("products.json", "products", PRODUCTS_PAGE_SIZE)
            .await
    }

    /// List every variant in the store, in product order then variant order.
    ///
    /// # Errors
    ///
    /// Returns an error if listing products fails.
    pub async fn list_variants(&self) -> Result<Vec<VariantRef>, AdminShopifyError> {
        let products = self.list_products().await?;
        Ok(flatten_variants(&products))
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::ShopifyAdminConfig;

    fn client(server: &MockServer) -> AdminClient {
        let config = ShopifyAdminConfig::new(
            "test-shop.myshopify.com",
            SecretString::from("shpat_test"),
            "2024-01",
        )
        .with_base_url(Some(server.uri()));
        AdminClient::new(&config)
    }

    #[tokio::test]
    async fn test_single_page_without_link_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/api/2024-01/products.json"))
            .and(query_param("limit", "250"))
            .and(query_param_is_missing("page_info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "products": [{"id": 1, "variants": [{"id": 11}, {"id": 12}]}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let variants = client(&server).list_variants().await.expect("variants");
        let ids: Vec<u64> = variants.iter().map(|v| v.variant_id.as_u64()).collect();
        assert_eq!(ids, [11, 12]);
    }

    #[tokio::test]
    async fn test_missing_root_is_unexpected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = client(&server).list_products().await.expect_err("missing root");
        assert!(matches!(err, AdminShopifyError::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn test_repeated_cursor_aborts() {
        let server = MockServer::start().await;
        let link = format!(
            "<{}/admin/api/2024-01/products.json?limit=250&page_info=loop>; rel=\"next\"",
            server.uri()
        );
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Link", link.as_str())
                    .set_body_json(serde_json::json!({"products": []})),
            )
            .mount(&server)
            .await;

        let err = client(&server).list_products().await.expect_err("loop");
        assert!(matches!(err, AdminShopifyError::RepeatedCursor(cursor) if cursor == "loop"));
    }
}
