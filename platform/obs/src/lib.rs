use anyhow::{Result, anyhow};
use once_cell::sync::OnceCell;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{self as sdk, Resource};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,tower_http=warn,sqlx=warn";

static INIT: OnceCell<()> = OnceCell::new();
static PROVIDER: OnceCell<sdk::trace::SdkTracerProvider> = OnceCell::new();

/// Shape of the console log lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "full" | "pretty" => Some(Self::Full),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// Configuration for tracing initialization.
#[derive(Clone, Debug)]
pub struct ObsConfig {
    pub service_name: &'static str,
    pub env_filter: Option<String>,
    pub otlp_endpoint: Option<String>,
    pub format: LogFormat,
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self {
            service_name: "rh-server",
            env_filter: None,
            otlp_endpoint: None,
            format: LogFormat::default(),
        }
    }
}

impl ObsConfig {
    /// Defaults overlaid with `RUST_LOG`, `OTLP_ENDPOINT` and `LOG_FORMAT`.
    pub fn from_env(service_name: &'static str) -> Self {
        Self {
            service_name,
            env_filter: std::env::var("RUST_LOG").ok(),
            otlp_endpoint: std::env::var("OTLP_ENDPOINT").ok(),
            format: std::env::var("LOG_FORMAT")
                .ok()
                .and_then(|raw| LogFormat::parse(&raw))
                .unwrap_or_default(),
        }
    }

    fn filter(&self) -> &str {
        self.env_filter
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .unwrap_or(DEFAULT_FILTER)
    }
}

/// Install tracing subscribers with optional OTLP exporter.
pub fn init_tracing(config: ObsConfig) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_new(config.filter())?;
    let fmt_layer = match config.format {
        LogFormat::Full => tracing_subscriber::fmt::layer().with_target(false).boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .boxed(),
    };
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if let Some(endpoint) = config.otlp_endpoint.clone() {
        let exporter = SpanExporter::builder()
            .with_http()
            .with_protocol(Protocol::HttpBinary)
            .with_endpoint(endpoint)
            .build()?;

        let resource = Resource::builder()
            .with_service_name(config.service_name)
            .build();

        let provider = sdk::trace::SdkTracerProvider::builder()
            .with_resource(resource)
            .with_batch_exporter(exporter)
            .build();
        let tracer = provider.tracer(config.service_name);

        registry
            .with(tracing_opentelemetry::layer().with_tracer(tracer))
            .try_init()?;
        let _ = PROVIDER.set(provider);
    } else {
        registry.try_init()?;
    }

    INIT.set(())
        .map_err(|_| anyhow!("tracing already initialized"))?;
    Ok(())
}

/// Flush pending spans. No-op when OTLP export was never configured.
pub fn shutdown_tracing() {
    if let Some(provider) = PROVIDER.get() {
        if let Err(err) = provider.shutdown() {
            eprintln!("failed to flush OTLP spans: {err}");
        }
    }
}
