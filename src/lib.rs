pub mod config;
pub mod detector;
pub mod dex;
pub mod models;
pub mod price_validator;
pub mod report;
pub mod scanner;

pub use detector::{detect_opportunities, group_by_pair};
pub use models::{ArbitrageOpportunity, Network, PriceRecord};
