pub mod charts;
pub mod dashboard;
pub mod forecast;
pub mod health;
pub mod prices;
