use anyhow::Context;
use clap::Parser;
use event_digest::{
    Config, DigestService, DryRunTransport, EmailTransport, MemoryStore, PageFetcher,
    ResendTransport,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Run the weekly event digest over a JSON file of joined subscription rows.
#[derive(Parser)]
#[command(name = "event-digest")]
struct Cli {
    /// Path to a JSON array of joined subscription rows
    #[arg(long)]
    subscriptions: PathBuf,

    /// Render and log emails without sending anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env().context("loading configuration")?;

    let raw = std::fs::read_to_string(&cli.subscriptions)
        .with_context(|| format!("reading {}", cli.subscriptions.display()))?;
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(&raw).context("parsing subscription rows")?;
    let store = Arc::new(MemoryStore::from_rows(&rows).context("validating subscription rows")?);

    let transport: Arc<dyn EmailTransport> = if cli.dry_run {
        info!("Dry run: no emails will be sent");
        Arc::new(DryRunTransport)
    } else {
        let api_key = config
            .resend_api_key
            .clone()
            .context("RESEND_API_KEY must be set for live sends")?;
        Arc::new(ResendTransport::new(api_key))
    };

    let service = DigestService::new(&config, store, Arc::new(PageFetcher::new()), transport);

    let summary = service.run_weekly(&config.cron_secret).await?;

    info!(
        "Run finished: {} subscriptions, {} emails sent, {} errors",
        summary.total_subscriptions,
        summary.emails_sent,
        summary.errors.len()
    );
    for error in &summary.errors {
        warn!("{}", error);
    }

    Ok(())
}
