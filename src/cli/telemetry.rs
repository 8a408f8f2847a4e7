use anyhow::Result;
use opentelemetry::{trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{runtime::Tokio, trace::TracerProvider, Resource};
use std::{env::var, time::Duration};
use tracing::Level;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

/// Handle on the installed tracer provider, if OTLP export is enabled.
#[derive(Default)]
pub struct Telemetry {
    provider: Option<TracerProvider>,
}

impl Telemetry {
    /// Flush buffered spans and stop the exporter.
    ///
    /// # Errors
    /// Returns an error if the provider fails to shut down.
    pub fn shutdown(self) -> Result<()> {
        if let Some(provider) = self.provider {
            provider.shutdown()?;
        }
        Ok(())
    }
}

/// Install the global subscriber: fmt output filtered by `verbosity` (or
/// `RUST_LOG`), plus OTLP span export when an endpoint is configured.
///
/// # Errors
/// Returns an error if the exporter cannot be built or a global subscriber is
/// already set.
pub fn init(verbosity: Level) -> Result<Telemetry> {
    let fmt_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false);

    // RUST_LOG=
    let env_filter = EnvFilter::builder()
        .with_default_directive(verbosity.into())
        .from_env_lossy();

    let provider = match var(OTLP_ENDPOINT_ENV) {
        Ok(endpoint) if !endpoint.trim().is_empty() => Some(otlp_provider(endpoint)?),
        _ => None,
    };

    let otlp_layer = provider
        .as_ref()
        .map(|provider| OpenTelemetryLayer::new(provider.tracer(env!("CARGO_PKG_NAME"))));

    let subscriber = Registry::default()
        .with(fmt_layer)
        .with(otlp_layer)
        .with(env_filter);

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(Telemetry { provider })
}

fn otlp_provider(endpoint: String) -> Result<TracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .with_timeout(Duration::from_secs(3))
        .build()?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, Tokio)
        .with_resource(Resource::new(vec![
            KeyValue::new("service.name", env!("CARGO_PKG_NAME")),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ]))
        .build();

    opentelemetry::global::set_tracer_provider(provider.clone());

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shutdown_without_exporter_is_a_no_op() {
        assert!(Telemetry::default().shutdown().is_ok());
    }

    #[test]
    fn shutdown_stops_the_provider() {
        let telemetry = Telemetry {
            provider: Some(TracerProvider::builder().build()),
        };
        assert!(telemetry.shutdown().is_ok());
    }
}
