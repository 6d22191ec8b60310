//! Bulk metafield routes.
//!
//! Renders the run form and triggers bulk runs for caller-supplied stores.

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
    response::Html,
    routing::{get, post},
};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use metafields_core::MetafieldSpec;

use crate::error::AppError;
use crate::services::BulkMetafieldRun;
use crate::shopify::{AdminClient, format_user_errors};
use crate::state::AppState;

// =============================================================================
// Templates
// =============================================================================

/// Bulk run form, prefilled with the bulk defaults.
#[derive(Template)]
#[template(path = "bulk/index.html")]
pub struct BulkFormTemplate {
    pub namespace: String,
    pub key: String,
    pub value: String,
    pub kind: String,
}

impl From<MetafieldSpec> for BulkFormTemplate {
    fn from(spec: MetafieldSpec) -> Self {
        Self {
            namespace: spec.namespace,
            key: spec.key,
            value: spec.value,
            kind: spec.kind,
        }
    }
}

// =============================================================================
// Request types
// =============================================================================

/// Body of `POST /run-bulk`, as JSON or a urlencoded form.
///
/// Metafield fields are written exactly as supplied. `type` is optional and
/// defaults to `single_line_text_field`.
#[derive(Debug, Deserialize)]
pub struct RunBulkRequest {
    pub store: String,
    pub token: String,
    pub namespace: String,
    pub key: String,
    pub value: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl RunBulkRequest {
    async fn from_request(request: Request) -> Result<Self, AppError> {
        let is_json = request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));

        if is_json {
            let Json(body) = Json::<Self>::from_request(request, &())
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(body)
        } else {
            let Form(body) = Form::<Self>::from_request(request, &())
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(body)
        }
    }

    /// The metafield to write.
    #[must_use]
    pub fn spec(&self) -> MetafieldSpec {
        let spec = MetafieldSpec::text(&self.namespace, &self.key, &self.value);
        match &self.kind {
            Some(kind) => spec.with_kind(kind),
            None => spec,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Build the bulk routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/run-bulk", post(run_bulk))
}

/// Bulk run form.
async fn index() -> Html<String> {
    let template = BulkFormTemplate::from(MetafieldSpec::default_bulk());

    Html(
        template
            .render()
            .unwrap_or_else(|e| format!("Template error: {e}")),
    )
}

/// Run a bulk metafield write for the submitted store.
///
/// Runs are serialized: a second request waits for the first to finish.
#[instrument(skip_all)]
async fn run_bulk(State(state): State<AppState>, request: Request) -> Result<String, AppError> {
    let input = RunBulkRequest::from_request(request).await?;
    let spec = input.spec();
    tracing::info!(store = %input.store, namespace = %spec.namespace, key = %spec.key, "Bulk run requested");

    let _guard = state.bulk_lock().lock().await;

    let config = state
        .config()
        .shopify_for(&input.store, SecretString::from(input.token));
    let client = AdminClient::new(&config);

    let report = BulkMetafieldRun::new(&client, spec, &state.config().mutation_file)
        .run()
        .await?;

    match report.submission.operation_id() {
        Some(id) => Ok(format!("Bulk operation triggered. Operation ID: {id}")),
        None if report.submission.user_errors.is_empty() => Err(AppError::BulkNotCreated(
            "no bulk operation returned".to_string(),
        )),
        None => Err(AppError::BulkNotCreated(format_user_errors(
            &report.submission.user_errors,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: &str, kind: Option<&str>) -> RunBulkRequest {
        RunBulkRequest {
            store: "shop.myshopify.com".to_string(),
            token: "shpat_x".to_string(),
            namespace: "custom".to_string(),
            key: "season".to_string(),
            value: value.to_string(),
            kind: kind.map(ToString::to_string),
        }
    }

    #[test]
    fn test_fields_pass_through_unchanged() {
        let spec = request("  two words  ", None).spec();
        assert_eq!(spec.namespace, "custom");
        assert_eq!(spec.key, "season");
        assert_eq!(spec.value, "  two words  ");
        assert_eq!(spec.kind, "single_line_text_field");
    }

    #[test]
    fn test_empty_value_is_not_replaced() {
        assert_eq!(request("", None).spec().value, "");
    }

    #[test]
    fn test_supplied_type_is_used() {
        assert_eq!(request("3", Some("number_integer")).spec().kind, "number_integer");
    }

    #[test]
    fn test_missing_metafield_fields_are_rejected() {
        let parsed = serde_json::from_str::<RunBulkRequest>(
            r#"{"store": "shop.myshopify.com", "token": "shpat_x"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_form_renders_defaults() {
        let html = BulkFormTemplate::from(MetafieldSpec::default_bulk())
            .render()
            .expect("render");
        assert!(html.contains(r#"value="custom_label_4""#));
        assert!(html.contains(r#"action="/run-bulk""#));
    }
}
