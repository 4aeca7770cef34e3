use anyhow::{Context, Result};
use clap::Parser;
use pharma_papers::classify::AffiliationClassifier;
use pharma_papers::config::{find_config_file, load_config, Config};
use pharma_papers::export::OutputTarget;
use pharma_papers::pipeline::{self, PipelineError, RunOutcome};
use pharma_papers::sources::{GatewayError, PubMedSource};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fetch PubMed papers with pharmaceutical/biotech company authors and export them as CSV
#[derive(Parser, Debug)]
#[command(name = "get-papers-list")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Fetch research papers with pharmaceutical/biotech company authors from PubMed", long_about = None)]
struct Cli {
    /// PubMed search query (full PubMed query syntax is supported)
    query: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Output CSV file (prints to stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Email address sent to NCBI with every request
    #[arg(long)]
    email: Option<String>,

    /// NCBI API key
    #[arg(long)]
    api_key: Option<String>,

    /// Maximum number of search results to retrieve
    #[arg(long, default_value_t = 100)]
    max_results: usize,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Configuration is read before logging starts so its level can apply
    let config_path = cli.config.clone().or_else(find_config_file);
    let loaded = load_config(config_path.as_deref());

    let configured_level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_tracing(cli.debug, &configured_level);

    let config = match loaded {
        Ok(config) => {
            if let Some(path) = &config_path {
                tracing::info!("Using config file: {}", path.display());
            }
            config
        }
        Err(e) => {
            let err = anyhow::Error::new(e).context("Failed to load configuration");
            return report(&err, cli.debug);
        }
    };

    let debug = cli.debug;
    match run(cli, config).await {
        Ok(outcome) => {
            tracing::debug!("Run finished: {:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(err) => report(&err, debug),
    }
}

fn init_tracing(debug: bool, configured_level: &str) {
    let directive = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if debug {
            "pharma_papers=debug".to_string()
        } else {
            format!("pharma_papers={}", configured_level)
        }
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(directive))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(args: Cli, mut config: Config) -> Result<RunOutcome> {
    // Command-line flags win over file and environment
    if args.email.is_some() {
        config.pubmed.email = args.email;
    }
    if args.api_key.is_some() {
        config.pubmed.api_key = args.api_key;
    }

    let source =
        PubMedSource::new(config.pubmed).context("Failed to create PubMed client")?;
    let classifier = AffiliationClassifier::new(config.keywords);
    let target = OutputTarget::from_path(args.file);

    let outcome =
        pipeline::run(&source, &classifier, &args.query, args.max_results, &target).await?;
    Ok(outcome)
}

/// Log a fatal error and pick the exit code
fn report(err: &anyhow::Error, debug: bool) -> ExitCode {
    tracing::error!("{}: {:#}", error_label(err), err);

    if debug {
        tracing::debug!("Error details: {:?}", err);
    }

    ExitCode::FAILURE
}

fn error_label(err: &anyhow::Error) -> &'static str {
    if is_gateway_error(err) {
        "PubMed API error"
    } else {
        "Unexpected error"
    }
}

/// Whether the upstream API failed.
///
/// `InvalidArgument` is a caller mistake and counts as unexpected.
fn is_gateway_error(err: &anyhow::Error) -> bool {
    let upstream = |e: &GatewayError| !matches!(e, GatewayError::InvalidArgument(_));

    err.chain().any(|cause| {
        if let Some(e) = cause.downcast_ref::<GatewayError>() {
            return upstream(e);
        }
        matches!(
            cause.downcast_ref::<PipelineError>(),
            Some(PipelineError::Gateway(e)) if upstream(e)
        )
    })
}
