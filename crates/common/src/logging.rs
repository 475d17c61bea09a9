//! Logging and tracing initialization.
//!
//! Logs go to stderr so that stdout stays free for command output such as
//! `dnacom analyze --json`.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Environment variable that overrides the configured filter.
pub const LOG_ENV_VAR: &str = "DNACOM_LOG";

/// Crates whose events the configured level applies to.
const DNACOM_TARGETS: [&str; 5] = [
    "dnacom",
    "dnacom_common",
    "dnacom_stack_model",
    "dnacom_processing_core",
    "dnacom_render_engine",
];

/// Initialize the tracing subscriber with the given configuration.
///
/// `DNACOM_LOG`, then `RUST_LOG`, take precedence over `config.level`.
/// Calling this twice is harmless; the first subscriber stays installed.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(&config.level)));

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish()).ok();
    } else {
        let subscriber = builder
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}

/// Expand a bare level such as `debug` so it applies to dnacom crates only,
/// keeping dependencies at `warn`. Anything else is used as given.
fn filter_directives(level: &str) -> String {
    let level = level.trim();
    let is_bare_level = matches!(
        level.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error" | "off"
    );
    if !is_bare_level {
        return level.to_string();
    }

    let mut directives = vec!["warn".to_string()];
    directives.extend(DNACOM_TARGETS.iter().map(|t| format!("{t}={level}")));
    directives.join(",")
}
