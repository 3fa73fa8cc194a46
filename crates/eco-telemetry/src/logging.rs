//! Subscriber setup: `EnvFilter` plus an optional pretty or JSON fmt layer.

use crate::{TelemetryConfig, TelemetryError};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&config.log_level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .map_err(|e| TelemetryError::Config(e.to_string()))
}

/// Install the global tracing subscriber. Fails if one is already set.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let console = config.console_output;
    let json = console && config.json_logs;

    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_thread_ids(true)
            .with_line_number(true)
    });
    let pretty_layer = (console && !json).then(|| fmt::layer().compact().with_target(false));

    tracing_subscriber::registry()
        .with(filter(config)?)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::info!(
        service = %config.service_name,
        json,
        "Logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_level_falls_back_or_errors() {
        let config = TelemetryConfig {
            log_level: "eco_runtime=debug,[".into(),
            ..TelemetryConfig::default()
        };
        // Either RUST_LOG rescues it or the error names the filter.
        if let Err(e) = filter(&config) {
            assert!(matches!(e, TelemetryError::Config(_)));
        }
    }

    #[test]
    fn test_directive_filter_accepted() {
        let config = TelemetryConfig {
            log_level: "info,eco_02_quest_engine=debug".into(),
            ..TelemetryConfig::default()
        };
        assert!(filter(&config).is_ok());
    }
}
