//! Integration tests for the bulk metafield run.

use metafields_admin::services::BulkMetafieldRun;
use metafields_core::{BulkOperationStatus, BulkStage, MetafieldSpec};
use metafields_integration_tests::{
    MockShopify, OPERATION_ID, STAGED_KEY, TOKEN, created_operation, post_response_xml,
};
use serde_json::json;

#[tokio::test]
async fn test_bulk_run_end_to_end() {
    let shopify = MockShopify::start().await;
    shopify
        .mount_product_pages(&[&[&[1, 2], &[3]], &[&[4, 5, 6]]])
        .await;
    shopify.mount_staged_target().await;
    shopify.mount_upload(&post_response_xml(), 1).await;
    shopify.mount_bulk_run(created_operation(), 1).await;

    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("bulk_metafields.jsonl");
    let client = shopify.client();

    let report = BulkMetafieldRun::new(&client, MetafieldSpec::default_bulk(), &file)
        .run()
        .await
        .expect("bulk run");

    assert_eq!(report.variants, 6);
    assert_eq!(report.staged_upload_path, STAGED_KEY);
    let operation = report.submission.bulk_operation.expect("operation");
    assert_eq!(operation.id, OPERATION_ID);
    assert_eq!(operation.status, BulkOperationStatus::Created);

    let contents = std::fs::read_to_string(&file).expect("mutation file");
    assert_eq!(contents.lines().count(), 6);
    assert_eq!(
        contents.lines().next(),
        Some(
            r#"{"ownerId":"gid://shopify/ProductVariant/1","namespace":"mm-google-shopping","key":"custom_label_4","type":"single_line_text_field","value":"blank"}"#
        )
    );
    assert_eq!(
        contents.lines().last(),
        Some(
            r#"{"ownerId":"gid://shopify/ProductVariant/6","namespace":"mm-google-shopping","key":"custom_label_4","type":"single_line_text_field","value":"blank"}"#
        )
    );
}

#[tokio::test]
async fn test_upload_replays_parameters_before_file_without_token() {
    let shopify = MockShopify::start().await;
    shopify.mount_product_pages(&[&[&[1]]]).await;
    shopify.mount_staged_target().await;
    shopify.mount_upload(&post_response_xml(), 1).await;
    shopify.mount_bulk_run(created_operation(), 1).await;

    let dir = tempfile::tempdir().expect("tempdir");
    let client = shopify.client();
    BulkMetafieldRun::new(
        &client,
        MetafieldSpec::default_bulk(),
        dir.path().join("bulk_metafields.jsonl"),
    )
    .run()
    .await
    .expect("bulk run");

    let uploads = shopify.upload_requests().await;
    assert_eq!(uploads.len(), 1);
    let upload = uploads.first().expect("upload");

    assert!(upload.headers.get("x-shopify-access-token").is_none());
    let body = String::from_utf8_lossy(&upload.body);
    assert!(!body.contains(TOKEN));

    let position = |needle: &str| body.find(needle).expect(needle);
    let key = position(r#"name="key""#);
    let content_type = position(r#"name="Content-Type""#);
    let status = position(r#"name="success_action_status""#);
    let policy = position(r#"name="policy""#);
    let file = position(r#"name="file""#);
    assert!(key < content_type && content_type < status && status < policy && policy < file);
    assert!(body.contains("gid://shopify/ProductVariant/1"));
}

#[tokio::test]
async fn test_zero_targets_fails_before_upload() {
    let shopify = MockShopify::start().await;
    shopify.mount_product_pages(&[&[&[1, 2]]]).await;
    shopify.mount_no_staged_target().await;
    shopify.mount_upload(&post_response_xml(), 0).await;
    shopify.mount_bulk_run(created_operation(), 0).await;

    let dir = tempfile::tempdir().expect("tempdir");
    let client = shopify.client();
    let err = BulkMetafieldRun::new(
        &client,
        MetafieldSpec::default_bulk(),
        dir.path().join("bulk_metafields.jsonl"),
    )
    .run()
    .await
    .expect_err("no target");

    assert_eq!(err.stage(), BulkStage::TargetRequested);
    assert!(err.to_string().contains("No staged upload target"));
}

#[tokio::test]
async fn test_missing_key_fails_before_trigger() {
    let shopify = MockShopify::start().await;
    shopify.mount_product_pages(&[&[&[1]]]).await;
    shopify.mount_staged_target().await;
    shopify
        .mount_upload(
            "<PostResponse><Location>x</Location><Bucket>b</Bucket></PostResponse>",
            1,
        )
        .await;
    shopify.mount_bulk_run(created_operation(), 0).await;

    let dir = tempfile::tempdir().expect("tempdir");
    let client = shopify.client();
    let err = BulkMetafieldRun::new(
        &client,
        MetafieldSpec::default_bulk(),
        dir.path().join("bulk_metafields.jsonl"),
    )
    .run()
    .await
    .expect_err("missing key");

    assert_eq!(err.stage(), BulkStage::FileUploaded);
    assert!(err.to_string().contains("PostResponse.Key"));
}

#[tokio::test]
async fn test_rejected_upload_reports_status_and_body() {
    let shopify = MockShopify::start().await;
    shopify.mount_product_pages(&[&[&[1]]]).await;
    shopify.mount_staged_target().await;
    shopify
        .mount_upload_status(
            403,
            "<Error><Code>AccessDenied</Code><Message>Policy expired</Message></Error>",
            1,
        )
        .await;
    shopify.mount_bulk_run(created_operation(), 0).await;

    let dir = tempfile::tempdir().expect("tempdir");
    let client = shopify.client();
    let err = BulkMetafieldRun::new(
        &client,
        MetafieldSpec::default_bulk(),
        dir.path().join("bulk_metafields.jsonl"),
    )
    .run()
    .await
    .expect_err("upload rejected");

    assert_eq!(err.stage(), BulkStage::TargetIssued);
    let message = err.to_string();
    assert!(message.contains("403"), "{message}");
    assert!(message.contains("Policy expired"), "{message}");
    assert!(!message.contains("PostResponse.Key"), "{message}");
}

#[tokio::test]
async fn test_user_errors_are_passed_through() {
    let shopify = MockShopify::start().await;
    shopify.mount_product_pages(&[&[&[1]]]).await;
    shopify.mount_staged_target().await;
    shopify.mount_upload(&post_response_xml(), 1).await;
    shopify
        .mount_bulk_run(
            json!({
                "bulkOperationRunMutation": {
                    "bulkOperation": null,
                    "userErrors": [{
                        "field": null,
                        "message": "A bulk mutation operation for this app and shop is already in progress"
                    }]
                }
            }),
            1,
        )
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let client = shopify.client();
    let report = BulkMetafieldRun::new(
        &client,
        MetafieldSpec::default_bulk(),
        dir.path().join("bulk_metafields.jsonl"),
    )
    .run()
    .await
    .expect("submitted");

    assert!(report.submission.bulk_operation.is_none());
    assert_eq!(report.submission.user_errors.len(), 1);
}
