use std::sync::Arc;

use crate::config::{DashboardConfig, ProviderKind};
use crate::external::alphavantage::AlphaVantageProvider;
use crate::external::mock::MockProvider;
use crate::external::multi_provider::MultiProvider;
use crate::external::price_provider::PriceProvider;
use crate::external::yahoofinance::YahooFinanceProvider;

#[derive(Clone)]
pub struct AppState {
    pub price_provider: Arc<dyn PriceProvider>,
    pub config: Arc<DashboardConfig>,
}

impl AppState {
    pub fn new(price_provider: Arc<dyn PriceProvider>, config: DashboardConfig) -> Self {
        Self {
            price_provider,
            config: Arc::new(config),
        }
    }

    /// Wire up the provider selected by the config.
    pub fn from_config(config: DashboardConfig) -> Result<Self, String> {
        config.validate()?;
        let provider = build_provider(&config)?;
        Ok(Self::new(provider, config))
    }
}

fn alphavantage(config: &DashboardConfig) -> Result<AlphaVantageProvider, String> {
    let key = config
        .alphavantage_api_key
        .clone()
        .ok_or_else(|| "ALPHAVANTAGE_API_KEY not set".to_string())?;
    Ok(AlphaVantageProvider::new(key, config.provider_timeout))
}

fn build_provider(config: &DashboardConfig) -> Result<Arc<dyn PriceProvider>, String> {
    let provider: Arc<dyn PriceProvider> = match config.provider {
        ProviderKind::Yahoo => {
            tracing::info!("📊 Using price provider: Yahoo Finance");
            Arc::new(YahooFinanceProvider::new(config.provider_timeout))
        }
        ProviderKind::AlphaVantage => {
            tracing::info!("📊 Using price provider: Alpha Vantage only");
            Arc::new(alphavantage(config)?)
        }
        ProviderKind::Multi => {
            tracing::info!("📊 Using price provider: Multi-provider (Yahoo Finance + Alpha Vantage fallback)");
            let primary = Box::new(YahooFinanceProvider::new(config.provider_timeout));
            let fallback = Box::new(alphavantage(config)?);
            Arc::new(MultiProvider::new(primary, fallback))
        }
        ProviderKind::Mock => {
            tracing::info!("📊 Using price provider: offline mock data");
            Arc::new(MockProvider::new())
        }
    };
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_selects_provider() {
        let state = AppState::from_config(DashboardConfig {
            provider: ProviderKind::Mock,
            ..DashboardConfig::default()
        })
        .unwrap();
        assert_eq!(state.price_provider.name(), "mock");

        let multi = AppState::from_config(DashboardConfig {
            provider: ProviderKind::Multi,
            alphavantage_api_key: Some("demo".into()),
            ..DashboardConfig::default()
        })
        .unwrap();
        assert_eq!(multi.price_provider.name(), "multi");
    }

    #[test]
    fn test_from_config_rejects_missing_key() {
        let result = AppState::from_config(DashboardConfig {
            provider: ProviderKind::AlphaVantage,
            ..DashboardConfig::default()
        });
        assert!(result.is_err());
    }
}
