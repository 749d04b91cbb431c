use std::io;

use anyhow::Result;
use clap::Parser;
use sentiment_cli::{render_json, render_report, render_status, Cli};
use sentiment_core::SentimentEnsemble;
use tracing::{info, warn};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    let texts = cli.collect_texts(io::stdin().lock())?;

    if texts.is_empty() {
        warn!("No text to analyze");
        return Ok(());
    }

    info!(
        device = %config.device,
        mental_health = %config.slots.mental_health.describe(),
        social = %config.slots.social.describe(),
        treebank = %config.slots.treebank.describe(),
        "Clinical sentiment ensemble starting"
    );

    let mut ensemble = SentimentEnsemble::from_config(&config);
    ensemble.load();

    if cli.status {
        eprintln!("{}\n", render_status(&ensemble.status()));
    }

    for (position, text) in texts.iter().enumerate() {
        let report = ensemble.analyze_report(text);
        if cli.json {
            println!("{}", render_json(&report)?);
        } else {
            println!("{}", render_report(position + 1, &report));
        }
    }

    Ok(())
}
