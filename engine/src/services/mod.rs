// Application services built on the data sources and core computations
pub mod market_service;

pub use market_service::MarketService;
