mod report;

use std::sync::Arc;

use chrono::Local;
use clap::{Parser, Subcommand};
use tgcpm_core::AppConfig;
use tgcpm_db::SqliteStore;
use tgcpm_engine::{market_rates, AnalysisOutcome, Analyzer, GENERAL_NICHE};
use tgcpm_sources::TonPriceClient;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tgcpm-cli")]
#[command(about = "Telegram channel CPM analysis")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a channel and print eligibility and CPM recommendations.
    Analyze {
        /// `@name`, `name` or a `t.me/name` link.
        handle: String,
        /// Print the raw analysis as JSON instead of the text report.
        #[arg(long)]
        json: bool,
    },
    /// Print the niche-adjusted rate card.
    Market {
        #[arg(default_value = GENERAL_NICHE)]
        niche: String,
    },
    /// List the most recently analyzed channels.
    Recent {
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..=200))]
        limit: u32,
    },
    /// Apply pending database migrations.
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = tgcpm_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze { handle, json } => run_analyze(&config, &handle, json).await,
        Commands::Market { niche } => run_market(&config, &niche).await,
        Commands::Recent { limit } => run_recent(&config, limit).await,
        Commands::Migrate => {
            let applied = SqliteStore::new(&config.database_url)?
                .run_migrations()
                .await?;
            println!("applied {applied} migrations");
            Ok(())
        }
    }
}

fn ton_price_client(config: &AppConfig) -> anyhow::Result<TonPriceClient> {
    Ok(TonPriceClient::new(
        &config.ton_price_url,
        config.ton_to_usd,
        config.secondary_timeout_secs,
        &config.user_agent,
    )?)
}

async fn run_analyze(config: &AppConfig, handle: &str, json: bool) -> anyhow::Result<()> {
    let store = SqliteStore::new(&config.database_url)?;
    store.run_migrations().await?;

    let analyzer = Analyzer::from_app_config(config, Arc::new(store.clone()))?
        .with_audit(Arc::new(store));

    let analysis = match analyzer.analyze(handle).await {
        AnalysisOutcome::Found(analysis) => analysis,
        AnalysisOutcome::NotFound => anyhow::bail!(
            "no analytics available for '{handle}'; check the handle and that the channel is public"
        ),
        AnalysisOutcome::InvalidHandle => anyhow::bail!("channel handle must not be empty"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    let ton_usd = ton_price_client(config)?.usd_or_fallback().await;
    let report = report::AnalysisReport {
        analysis: &analysis,
        ton_usd,
        now: Local::now().naive_local(),
        min_subscribers: config.min_subscribers,
    };
    print!("{report}");
    Ok(())
}

async fn run_market(config: &AppConfig, niche: &str) -> anyhow::Result<()> {
    let ton_usd = ton_price_client(config)?.usd_or_fallback().await;
    print!("{}", report::MarketReport(&market_rates(niche, ton_usd)));
    Ok(())
}

async fn run_recent(config: &AppConfig, limit: u32) -> anyhow::Result<()> {
    let rows = SqliteStore::new(&config.database_url)?
        .list_recent_analyses(limit)
        .await?;
    if rows.is_empty() {
        println!("no analyses recorded yet");
        return Ok(());
    }
    for row in &rows {
        println!("{}", report::render_recent(row));
    }
    Ok(())
}
