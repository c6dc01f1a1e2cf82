// Engine main entry point
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use engine::config::EngineSettings;
use engine::data::CsvSeriesSource;
use engine::services::market_service::summarize_mover;
use engine::services::MarketService;
use serde::Serialize;
use shared::models::{AssetKind, FundamentalMetrics, Sentiment};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "engine")]
#[command(about = "Market movers, sentiment and fundamentals scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON settings file replacing the bundled defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Read price series from <DIR>/<SYMBOL>.csv instead of the market data API
    #[arg(long, global = true)]
    csv_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Biggest movers among the configured candidates
    Movers,

    /// Sentiment and fundamentals analysis for up to five assets
    Analyze {
        #[arg(required = true)]
        symbols: Vec<String>,
    },

    /// Score a set of fundamentals without any network calls
    Score {
        #[arg(long, default_value_t = 0.0)]
        pe: f64,
        #[arg(long, default_value_t = 0.0)]
        forward_pe: f64,
        #[arg(long, default_value_t = 0.0)]
        peg: f64,
        #[arg(long, default_value_t = 0.0)]
        de: f64,
        /// Return on equity, percent
        #[arg(long, default_value_t = 0.0)]
        roe: f64,
        /// Profit margin, percent
        #[arg(long, default_value_t = 0.0)]
        margin: f64,
        /// Revenue growth, percent
        #[arg(long, default_value_t = 0.0)]
        growth: f64,
        /// positive, negative or neutral (bullish/bearish also accepted)
        #[arg(long, default_value = "neutral")]
        sentiment: String,
    },

    /// List the asset catalog
    Assets {
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
        #[arg(short, long, default_value = "")]
        query: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Stock,
    Crypto,
    Etf,
    Forex,
}

impl From<KindArg> for AssetKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Stock => AssetKind::Stock,
            KindArg::Crypto => AssetKind::Crypto,
            KindArg::Etf => AssetKind::Etf,
            KindArg::Forex => AssetKind::Forex,
        }
    }
}

fn load_settings(path: Option<&PathBuf>) -> engine::Result<EngineSettings> {
    let mut settings = match path {
        Some(path) => EngineSettings::from_file(path)?,
        None => EngineSettings::load_default()?,
    };
    settings.apply_env_overrides();
    Ok(settings)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_ref())?;
    let mut service = MarketService::from_settings(settings)?;
    if let Some(dir) = &cli.csv_dir {
        info!(dir = %dir.display(), "Using CSV series source");
        service = service.with_series_source(Arc::new(CsvSeriesSource::new(dir)));
    }

    match cli.command {
        Commands::Movers => {
            let movers = service.top_movers().await;
            let summaries: Vec<_> = movers.iter().map(summarize_mover).collect();
            print_json(&summaries)?;
        }
        Commands::Analyze { symbols } => {
            let selection = service.select_symbols(&symbols)?;
            let report = service.analyze_assets(&selection).await?;
            print_json(&report)?;
        }
        Commands::Score { pe, forward_pe, peg, de, roe, margin, growth, sentiment } => {
            let metrics = FundamentalMetrics {
                pe_ratio: pe,
                forward_pe,
                peg_ratio: peg,
                debt_to_equity: de,
                return_on_equity: roe,
                profit_margin: margin,
                revenue_growth: growth,
            };
            let result = service.score_metrics(&metrics, Sentiment::from_label(&sentiment));
            print_json(&result)?;
        }
        Commands::Assets { kind, query } => {
            let assets = service.catalog().filter(kind.map(AssetKind::from), &query);
            print_json(&assets)?;
        }
    }

    Ok(())
}
