pub mod price_provider;
pub mod yahoofinance;
pub mod alphavantage;
pub mod multi_provider;
pub mod mock;
