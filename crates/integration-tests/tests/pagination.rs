//! Integration tests for product and variant listing.

use metafields_admin::shopify::AdminShopifyError;
use metafields_integration_tests::MockShopify;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_follows_every_page_once() {
    let shopify = MockShopify::start().await;
    shopify
        .mount_product_pages(&[&[&[1, 2], &[3]], &[&[4]], &[&[5, 6], &[], &[7]]])
        .await;

    let variants = shopify.client().list_variants().await.expect("variants");
    let ids: Vec<u64> = variants.iter().map(|v| v.variant_id.as_u64()).collect();
    assert_eq!(ids, [1, 2, 3, 4, 5, 6, 7]);
}

#[tokio::test]
async fn test_single_page_store() {
    let shopify = MockShopify::start().await;
    shopify.mount_product_pages(&[&[&[10, 11]]]).await;

    let variants = shopify.client().list_variants().await.expect("variants");
    assert_eq!(variants.len(), 2);
}

#[tokio::test]
async fn test_next_link_without_page_info_is_an_error() {
    let shopify = MockShopify::start().await;
    let link = format!(
        "<{}/admin/api/2024-01/products.json?limit=250>; rel=\"next\"",
        shopify.server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/admin/api/2024-01/products.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", link.as_str())
                .set_body_json(json!({"products": [{"id": 1, "variants": [{"id": 2}]}]})),
        )
        .expect(1)
        .mount(&shopify.server)
        .await;

    let err = shopify.client().list_products().await.expect_err("malformed link");
    assert!(matches!(err, AdminShopifyError::Pagination(_)));
}

#[tokio::test]
async fn test_unauthorized_token() {
    let shopify = MockShopify::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": "[API] Invalid API key or access token (unrecognized login or wrong password)"
        })))
        .mount(&shopify.server)
        .await;

    let err = shopify.client().list_variants().await.expect_err("401");
    assert!(matches!(err, AdminShopifyError::Unauthorized(_)));
}
