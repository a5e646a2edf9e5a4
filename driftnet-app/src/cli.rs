use anyhow::{Result, anyhow};
use clap::Parser;
use driftnet_common::ItemLimit;
use driftnet_config::DriftnetConfig;
use driftnet_social::timeline::account::normalize_handle;
use std::path::PathBuf;

/// Harvest posts from a public timeline into a text file.
///
/// Run without an account to be prompted for everything interactively.
#[derive(Debug, Parser)]
#[command(name = "driftnet", version)]
pub struct Cli {
    /// Account handle to harvest, with or without the leading @.
    pub account: Option<String>,

    /// Stop after collecting this many posts.
    #[arg(
        short = 'm',
        long,
        visible_alias = "max-tweets",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub max_items: Option<u64>,

    /// Output file name; `.txt` is appended when missing.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Show the browser window while harvesting.
    #[arg(long)]
    pub visible: bool,

    /// Configuration file (YAML). Defaults to ./driftnet.yaml when present.
    #[arg(short, long, env = "DRIFTNET_CONFIG")]
    pub config: Option<PathBuf>,

    /// WebDriver endpoint, e.g. http://localhost:9515.
    #[arg(long)]
    pub webdriver: Option<String>,

    /// Consecutive scrolls without page growth before stopping.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_stall: Option<u32>,

    /// Directory for the output file.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// Everything one harvest needs from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestRequest {
    pub account: String,
    pub limit: ItemLimit,
    pub output_name: Option<String>,
    /// `None` keeps the configured value.
    pub headless: Option<bool>,
}

impl Cli {
    /// The request described by the arguments, or `None` for interactive mode.
    pub fn request(&self) -> Result<Option<HarvestRequest>> {
        let Some(raw) = &self.account else {
            return Ok(None);
        };
        let account = normalize_handle(raw).ok_or_else(|| {
            anyhow!("invalid account handle {raw:?}: use letters, digits, and underscores")
        })?;
        let limit = match self.max_items {
            Some(n) => ItemLimit::Bounded(usize::try_from(n)?),
            None => ItemLimit::Unbounded,
        };
        Ok(Some(HarvestRequest {
            account,
            limit,
            output_name: self.output.clone(),
            headless: self.visible.then_some(false),
        }))
    }

    /// Fold command-line overrides into the loaded configuration.
    pub fn apply_overrides(&self, config: &mut DriftnetConfig) {
        if let Some(url) = &self.webdriver {
            config.browser.webdriver_url = url.clone();
        }
        if let Some(n) = self.max_stall {
            config.timeline.max_stall_iterations = n;
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = Some(dir.to_string_lossy().into_owned());
        }
    }
}

impl HarvestRequest {
    pub fn apply_overrides(&self, config: &mut DriftnetConfig) {
        if let Some(headless) = self.headless {
            config.browser.headless = headless;
        }
    }
}
