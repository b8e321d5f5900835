//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level; `verbose` forces `debug`.
pub fn init(config: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if config.format == "json" {
        builder.json().try_init()
    } else {
        builder.pretty().try_init()
    };
    if let Err(e) = installed {
        tracing::debug!("Keeping the existing tracing subscriber: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_keeps_first_subscriber() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            format: "json".to_string(),
        };
        init(&config, false);
        init(&config, true);
        tracing::debug!("still logging after a repeated init");
    }
}
