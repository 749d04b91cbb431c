//! Command-line front end for the clinical sentiment ensemble.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sentiment_core::{DevicePreference, EnsembleConfig, EnsembleReport, SlotStatus};

/// Interview responses covering the mood spectrum, used by `--samples`.
pub const SAMPLE_RESPONSES: &[&str] = &[
    "I've been feeling really depressed and hopeless lately",
    "Today was okay, nothing special happened",
    "I'm feeling much better and more optimistic about the future",
    "I can't stop worrying about everything, it's overwhelming",
    "My mood has been stable and I'm sleeping well",
];

#[derive(Parser, Debug)]
#[command(author, version, about = "Ensemble sentiment scores for clinical interview text", long_about = None)]
pub struct Cli {
    /// Texts to score. Read from stdin, one per line, when none are given.
    pub texts: Vec<String>,

    /// TOML configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Serve every slot with the offline lexicon classifier
    #[arg(long, default_value_t = false)]
    pub offline: bool,

    /// Never use an accelerator
    #[arg(long, default_value_t = false)]
    pub cpu: bool,

    /// Print one JSON report per line
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Score the built-in sample responses
    #[arg(long, default_value_t = false, conflicts_with = "texts")]
    pub samples: bool,

    /// Print slot load status before scoring
    #[arg(long, default_value_t = false)]
    pub status: bool,
}

impl Cli {
    /// Configuration from `--config` (or the environment), then CLI flags.
    pub fn resolve_config(&self) -> Result<EnsembleConfig> {
        let mut config = match &self.config {
            Some(path) => EnsembleConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => EnsembleConfig::from_env(),
        };

        if self.offline {
            config = EnsembleConfig {
                slots: EnsembleConfig::offline().slots,
                ..config
            };
        }
        if self.cpu {
            config.device = DevicePreference::Cpu;
        }
        Ok(config)
    }

    /// Texts to score: arguments, samples, or lines from `input`.
    pub fn collect_texts(&self, input: impl BufRead) -> Result<Vec<String>> {
        if self.samples {
            return Ok(SAMPLE_RESPONSES.iter().map(|s| s.to_string()).collect());
        }
        if !self.texts.is_empty() {
            return Ok(self.texts.clone());
        }

        let mut texts = Vec::new();
        for line in input.lines() {
            let line = line.context("Failed to read text from stdin")?;
            if !line.trim().is_empty() {
                texts.push(line);
            }
        }
        Ok(texts)
    }
}

/// Human-readable block for one report.
pub fn render_report(position: usize, report: &EnsembleReport) -> String {
    let [mental_health, social, treebank] = &report.slots;
    format!(
        "{}. \"{}\"\n   {}: {:6.3} | {}: {:6.3} | {}: {:6.3}\n   Average: {:6.3} ({}, {})\n",
        position,
        report.text,
        mental_health.slot,
        mental_health.score,
        social.slot,
        social.score,
        treebank.slot,
        treebank.score,
        report.average,
        report.mood,
        report.band,
    )
}

/// One line per slot: id, state and what is serving it.
pub fn render_status(status: &[SlotStatus]) -> String {
    status
        .iter()
        .map(|s| {
            format!(
                "{:<14} {:<12} {}",
                s.slot.to_string(),
                s.state.to_string(),
                s.served_by.as_deref().unwrap_or("-")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_json(report: &EnsembleReport) -> Result<String> {
    serde_json::to_string(report).context("Failed to serialize report")
}
