//! Tracing configuration for hosts embedding the engine.
//!
//! Supports three output formats controlled by `XAN_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` flat output
//! - `tree`: hierarchical indented output via `tracing-tree`
//! - `json`: one JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Why did a flag come out false?
//! XAN_LOG=xan_solver=debug xan capabilities program.json
//!
//! # Every handle lookup, as a tree
//! XAN_LOG=trace XAN_LOG_FORMAT=tree xan classify program.json "List<int>"
//!
//! # Query-level JSON records (start/end per engine query)
//! XAN_LOG=xan::query_json=trace XAN_LOG_FORMAT=json xan convert program.json string Guid
//! ```
//!
//! The subscriber is only initialised when `XAN_LOG` (or `RUST_LOG`) is set,
//! so there is no overhead in normal use.

use std::fmt;
use std::str::FromStr;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt as subscriber_fmt};

/// Filter variable, takes precedence over `RUST_LOG`.
pub const LOG_ENV: &str = "XAN_LOG";

/// Output format variable.
pub const LOG_FORMAT_ENV: &str = "XAN_LOG_FORMAT";

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    #[default]
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse from `XAN_LOG_FORMAT`. Unknown or missing values mean `Text`.
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "tree" => Ok(Self::Tree),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format `{other}` (expected text, tree or json)")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Tree => "tree",
            Self::Json => "json",
        })
    }
}

/// Build an `EnvFilter` from `XAN_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(value) => EnvFilter::builder().parse_lossy(value),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Whether either log variable is set.
pub fn logging_requested() -> bool {
    std::env::var_os(LOG_ENV).is_some() || std::env::var_os("RUST_LOG").is_some()
}

/// Initialise the global tracing subscriber in the format `XAN_LOG_FORMAT`
/// selects.
///
/// Does nothing when neither `XAN_LOG` nor `RUST_LOG` is set. All output goes
/// to stderr so it never mixes with reports on stdout.
pub fn init_tracing() {
    init_tracing_with(LogFormat::from_env());
}

/// [`init_tracing`] with an explicit format (the CLI's `--log-format`).
pub fn init_tracing_with(format: LogFormat) {
    if !logging_requested() {
        return;
    }

    let filter = build_filter();
    match format {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_writer(std::io::stderr)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            let _ = Registry::default().with(filter).with(tree_layer).try_init();
        }
        LogFormat::Json => {
            let json_layer = subscriber_fmt::layer().json().with_writer(std::io::stderr);

            let _ = Registry::default().with(filter).with(json_layer).try_init();
        }
        LogFormat::Text => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
