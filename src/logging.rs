use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where the dashboard's traces go: always stdout, optionally a Loki push endpoint.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub loki_enabled: bool,
    pub loki_url: Option<String>,
    pub service_name: String,
    pub environment: String,
    pub log_level: String,
}

fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl LoggingConfig {
    /// `debug` only changes the default level; an explicit `RUST_LOG` wins.
    pub fn from_env(debug: bool) -> Self {
        let (level, environment) = if debug {
            ("debug", "development")
        } else {
            ("info", "production")
        };

        Self {
            loki_enabled: var("LOKI_ENABLED").is_some_and(|v| v.eq_ignore_ascii_case("true")),
            loki_url: var("LOKI_URL"),
            service_name: var("SERVICE_NAME").unwrap_or_else(|| "stockviz".into()),
            environment: var("ENVIRONMENT").unwrap_or_else(|| environment.into()),
            log_level: var("RUST_LOG").unwrap_or_else(|| level.into()),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.loki_enabled && self.loki_url.is_none() {
            return Err("LOKI_ENABLED is true but LOKI_URL is not set".to_string());
        }
        Ok(())
    }

    /// Loki push URL, when shipping is switched on and the `loki` feature is built in.
    pub fn loki_target(&self) -> Option<&str> {
        if cfg!(feature = "loki") && self.loki_enabled {
            self.loki_url.as_deref()
        } else {
            None
        }
    }
}

/// Installs the global subscriber. Must run inside the tokio runtime when Loki is on.
pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new(&config.log_level))
        .with(fmt::layer());

    #[cfg(feature = "loki")]
    let subscriber = subscriber.with(loki_layer(&config)?);

    subscriber.try_init()?;

    tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        level = %config.log_level,
        loki = config.loki_target().unwrap_or("off"),
        "logging ready"
    );
    Ok(())
}

#[cfg(feature = "loki")]
fn loki_layer(config: &LoggingConfig) -> Result<Option<tracing_loki::Layer>, Box<dyn std::error::Error>> {
    let Some(target) = config.loki_target() else {
        return Ok(None);
    };

    let (layer, task) = tracing_loki::builder()
        .label("service", &config.service_name)?
        .label("environment", &config.environment)?
        .build_url(url::Url::parse(target)?)?;

    // ships batches until the process exits
    tokio::spawn(task);
    Ok(Some(layer))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(loki_enabled: bool, loki_url: Option<&str>) -> LoggingConfig {
        LoggingConfig {
            loki_enabled,
            loki_url: loki_url.map(str::to_string),
            service_name: "stockviz".into(),
            environment: "test".into(),
            log_level: "info".into(),
        }
    }

    #[test]
    fn test_loki_requires_url() {
        assert!(config(true, None).validate().is_err());
        assert!(config(true, Some("http://localhost:3100")).validate().is_ok());
        assert!(config(false, None).validate().is_ok());
    }

    #[test]
    fn test_loki_target_only_when_enabled() {
        assert_eq!(config(false, Some("http://localhost:3100")).loki_target(), None);

        let enabled = config(true, Some("http://localhost:3100"));
        let expected = cfg!(feature = "loki").then_some("http://localhost:3100");
        assert_eq!(enabled.loki_target(), expected);
    }
}
