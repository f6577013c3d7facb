use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use intent_core::domain::{Provenance, templates};
use intent_core::impls::JsonFilePool;
use intent_core::ports::ProviderSource;
use intent_core::{CompilerBuilder, CompilerConfig, IntentCompiler, MatchFilter, NetworkStats};

/// Intent-to-deployment compiler for the compute marketplace.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Turn a task description into a job specification
    Analyze {
        /// Natural-language task description
        #[arg(required_unless_present = "template", conflicts_with = "template")]
        task: Option<String>,

        /// Use the prompt of a deployment template instead
        #[arg(long, short)]
        template: Option<String>,

        /// Also print the deployment payload
        #[arg(long)]
        payload: bool,
    },

    /// Filter a provider snapshot
    Match {
        /// JSON file holding an array of provider records
        #[arg(long)]
        pool: PathBuf,

        /// Case-sensitive substring of the hardware model
        #[arg(long)]
        hardware: Option<String>,

        #[arg(long)]
        verified_only: bool,

        /// Sort ascending by price per hour
        #[arg(long)]
        by_price: bool,
    },

    /// Check that a provider can be rented right now
    Rent {
        #[arg(long)]
        pool: PathBuf,

        /// Provider id
        id: String,
    },

    /// One-sentence network status
    Status {
        /// JSON file with network stats; last known stats when omitted
        #[arg(long)]
        stats: Option<PathBuf>,
    },

    /// List deployment templates
    Templates,
}

fn init_tracing(config: &CompilerConfig) {
    let level = config.log_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    // stdout は結果の出力に使うのでログは stderr へ
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = CompilerConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config);
    info!(model = %config.model, "configuration loaded");

    let compiler = CompilerBuilder::from_config(&config)
        .build()
        .context("Failed to build compiler")?;

    match cli.command {
        Commands::Analyze {
            task,
            template,
            payload,
        } => analyze(&compiler, task, template, payload).await,
        Commands::Match {
            pool,
            hardware,
            verified_only,
            by_price,
        } => {
            let filter = MatchFilter {
                hardware_substring: hardware,
                verified_only,
            };
            match_pool(&compiler, &pool, &filter, by_price).await
        }
        Commands::Rent { pool, id } => rent(&compiler, &pool, &id).await,
        Commands::Status { stats } => status(&compiler, stats.as_deref()).await,
        Commands::Templates => {
            for t in templates() {
                println!("{:<20} {:<6} {}", t.id, t.category, t.name);
                println!("{:<20} {}", "", t.prompt);
            }
            Ok(())
        }
    }
}

async fn analyze(
    compiler: &IntentCompiler,
    task: Option<String>,
    template: Option<String>,
    with_payload: bool,
) -> Result<()> {
    let task = match (task, template) {
        (Some(task), _) => task,
        (None, Some(id)) => intent_core::domain::template(&id)
            .map(|t| t.prompt.to_string())
            .ok_or_else(|| anyhow!("Unknown template: {id}"))?,
        (None, None) => bail!("Either a task or --template is required"),
    };

    let analysis = compiler.analyze(&task).await;
    if let Provenance::Fallback { reason } = &analysis.provenance {
        eprintln!("analysis unavailable ({reason}); showing fallback specification");
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&analysis.spec).context("Failed to render specification")?
    );

    if with_payload {
        let payload = compiler.compile(&analysis.spec);
        println!(
            "{}",
            payload.to_pretty_json().context("Failed to render payload")?
        );
    }
    Ok(())
}

async fn match_pool(
    compiler: &IntentCompiler,
    pool: &Path,
    filter: &MatchFilter,
    by_price: bool,
) -> Result<()> {
    let source = JsonFilePool::new(pool);
    let mut result = compiler
        .match_source(&source, filter)
        .await
        .with_context(|| format!("Failed to load provider snapshot: {}", pool.display()))?;
    if by_price {
        result = result.sorted_by_price();
    }

    if result.is_empty() {
        println!("no providers matched");
        return Ok(());
    }
    for r in result.records() {
        println!(
            "{:<10} {:<16} {:>6.2} $/h  {:<8} {:<12} {:<10}{}",
            r.id,
            r.hardware_model,
            r.price_per_hour,
            r.status,
            r.region,
            r.service_tier,
            if r.is_verified { "  verified" } else { "" },
        );
    }
    Ok(())
}

async fn rent(compiler: &IntentCompiler, pool: &Path, id: &str) -> Result<()> {
    let records = JsonFilePool::new(pool)
        .snapshot()
        .await
        .with_context(|| format!("Failed to load provider snapshot: {}", pool.display()))?;
    let record = compiler.select_for_rent(&records, id)?;
    println!(
        "{} ({}) is available at {:.2} $/h from {}",
        record.id, record.hardware_model, record.price_per_hour, record.owner_identity
    );
    Ok(())
}

async fn status(compiler: &IntentCompiler, stats: Option<&Path>) -> Result<()> {
    let stats = match stats {
        Some(path) => {
            let contents = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read stats file: {}", path.display()))?;
            serde_json::from_str::<NetworkStats>(&contents)
                .with_context(|| format!("Failed to parse stats file: {}", path.display()))?
        }
        None => NetworkStats::last_known(),
    };
    println!("{}", compiler.summarize(&stats).await);
    Ok(())
}
