//! Subscriber setup: stdout (pretty or JSON), optional rolling file, optional OTLP

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::Settings;
use crate::telemetry::{self, BoxedLayer};

const DEFAULT_FILTER: &str = "paps=info,paps_core=info,paps_api_http=info,paps_api_rpc=info,paps_server=info";

/// Install the global subscriber. Keep the returned guard alive until exit
/// or buffered file output is lost.
pub fn init(settings: &Settings) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    layers.push(match settings.log_format.as_str() {
        "json" => fmt::layer().json().boxed(),
        _ => fmt::layer().pretty().boxed(),
    });

    let guard = match &settings.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "paps.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .boxed(),
            );
            Some(guard)
        }
        None => None,
    };

    let otel = telemetry::otlp_endpoint().map(|endpoint| telemetry::layer(&endpoint));
    let otel_error = match otel {
        Some(Ok(layer)) => {
            layers.push(layer);
            None
        }
        Some(Err(e)) => Some(e),
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    if let Some(e) = otel_error {
        tracing::warn!(error = %e, "OpenTelemetry disabled");
    }
    Ok(guard)
}
