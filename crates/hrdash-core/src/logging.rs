//! Tracing subscriber setup shared by the server and the CLI

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `default_directive` is used, with the
/// configured level appended as the fallback for other targets. Safe to call
/// more than once: later calls are ignored.
pub fn init_tracing(config: &LoggingConfig, default_directive: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config, default_directive)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    if config.json_format {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}

fn filter_directives(config: &LoggingConfig, default_directive: &str) -> String {
    if default_directive.is_empty() {
        config.level.clone()
    } else {
        format!("{},{}", config.level, default_directive)
    }
}
