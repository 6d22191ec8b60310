//! Metafields CLI - read and write Shopify variant metafields.
//!
//! # Usage
//!
//! ```bash
//! # Show a variant's metafields
//! mf-cli get 808950810
//!
//! # Write color = multicolor to every variant, 500 ms apart
//! mf-cli set
//!
//! # Write custom_label_4 = blank to every variant in one bulk operation
//! mf-cli bulk
//! ```
//!
//! # Commands
//!
//! - `get` - List metafields on one variant
//! - `set` - Per-variant REST writes with a fixed delay
//! - `bulk` - Staged upload and bulk mutation

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use metafields_admin::config::DEFAULT_MUTATION_FILE;
use metafields_admin::services::DEFAULT_WRITE_DELAY_MS;
use metafields_core::VariantId;

mod commands;

use commands::MetafieldArgs;

#[derive(Parser)]
#[command(name = "mf-cli")]
#[command(author, version, about = "Shopify variant metafield tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the metafields on one variant
    Get {
        /// Numeric variant ID
        variant_id: VariantId,
    },
    /// Write a metafield to every variant, one request at a time
    Set {
        #[command(flatten)]
        metafield: MetafieldArgs,

        /// Pause after each write, in milliseconds
        #[arg(long, default_value_t = DEFAULT_WRITE_DELAY_MS)]
        delay_ms: u64,
    },
    /// Write a metafield to every variant through a bulk operation
    Bulk {
        #[command(flatten)]
        metafield: MetafieldArgs,

        /// Where to write the mutation file
        #[arg(long, default_value = DEFAULT_MUTATION_FILE)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "metafields_admin=info,metafields_cli=info".into());
    let is_json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = is_json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Get { variant_id } => commands::get::run(variant_id).await,
        Commands::Set {
            metafield,
            delay_ms,
        } => commands::set::run(metafield, delay_ms).await,
        Commands::Bulk { metafield, output } => commands::bulk::run(metafield, &output).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_get() {
        let cli = Cli::try_parse_from(["mf-cli", "get", "808950810"]).expect("parse");
        assert!(
            matches!(cli.command, Commands::Get { variant_id } if variant_id == VariantId::new(808_950_810))
        );
    }

    #[test]
    fn test_cli_set_defaults() {
        let cli = Cli::try_parse_from(["mf-cli", "set"]).expect("parse");
        let Commands::Set { metafield, delay_ms } = cli.command else {
            panic!("expected set");
        };
        assert_eq!(delay_ms, 500);
        assert!(metafield.key.is_none());
    }

    #[test]
    fn test_cli_bulk_overrides() {
        let cli = Cli::try_parse_from([
            "mf-cli", "bulk", "--key", "custom_label_3", "--type", "single_line_text_field",
            "--output", "/tmp/out.jsonl",
        ])
        .expect("parse");
        let Commands::Bulk { metafield, output } = cli.command else {
            panic!("expected bulk");
        };
        assert_eq!(metafield.key.as_deref(), Some("custom_label_3"));
        assert_eq!(metafield.kind.as_deref(), Some("single_line_text_field"));
        assert_eq!(output, PathBuf::from("/tmp/out.jsonl"));
    }

    #[test]
    fn test_cli_rejects_non_numeric_variant() {
        assert!(Cli::try_parse_from(["mf-cli", "get", "abc"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
