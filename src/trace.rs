use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
	runtime,
	trace::{BatchConfig, Sampler, Tracer},
	Resource,
};
use opentelemetry_semantic_conventions::{
	resource::{DEPLOYMENT_ENVIRONMENT, SERVICE_NAME, SERVICE_VERSION},
	SCHEMA_URL,
};
use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Constructs a [`Resource`] which describes the service.
fn resource() -> Resource {
	Resource::from_schema_url(
		[
			KeyValue::new(SERVICE_NAME, env!("CARGO_PKG_NAME")),
			KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
			KeyValue::new(
				DEPLOYMENT_ENVIRONMENT,
				if cfg!(debug_assertions) {
					"development"
				} else {
					"production"
				},
			),
		],
		SCHEMA_URL,
	)
}

/// Constructs a [`Tracer`] exporting spans in batches to the OTLP collector at `endpoint`.
fn init_tracer(endpoint: &str) -> Tracer {
	opentelemetry_otlp::new_pipeline()
		.tracing()
		.with_trace_config(
			opentelemetry_sdk::trace::Config::default()
				.with_sampler(Sampler::TraceIdRatioBased(1.0))
				.with_resource(resource()),
		)
		.with_batch_config(BatchConfig::default())
		.with_exporter(
			opentelemetry_otlp::new_exporter()
				.tonic()
				.with_endpoint(endpoint),
		)
		.install_batch(runtime::Tokio)
		.expect("failed to install the OTLP trace pipeline")
}

/// Initializes the tracing subscriber. Spans are exported over OTLP only when an
/// endpoint is configured; log lines always go to stdout.
///
/// The returned guard flushes the exporter when dropped.
pub fn init_tracing_subscriber(otlp_endpoint: Option<&str>) -> OtelGuard {
	let otel = otlp_endpoint.map(|endpoint| tracing_opentelemetry::layer().with_tracer(init_tracer(endpoint)));
	let exporting = otel.is_some();

	tracing_subscriber::registry()
		.with(LevelFilter::from_level(Level::INFO))
		.with(tracing_subscriber::fmt::layer().with_ansi(true))
		.with(otel)
		.init();

	OtelGuard { exporting }
}

pub struct OtelGuard {
	exporting: bool,
}

impl Drop for OtelGuard {
	fn drop(&mut self) {
		if self.exporting {
			opentelemetry::global::shutdown_tracer_provider();
		}
	}
}
