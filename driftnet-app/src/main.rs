use anyhow::Result;
use clap::Parser;
use cli::Cli;
use driftnet_common::observability::{LogConfig, init_logging};
use driftnet_config::{DriftnetConfig, DriftnetConfigLoader};
use driftnet_runtime::DriftnetRuntime;
use std::time::Duration;
use tracing::info;

mod cli;
mod harvest;
mod interactive;

const DEFAULT_CONFIG_FILE: &str = "driftnet.yaml";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LogConfig::default())?;

    // 1) Load config (env wins over file, flags win over both)
    let loader = match &cli.config {
        Some(path) => DriftnetConfigLoader::new().with_file(path),
        None => DriftnetConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    let mut config: DriftnetConfig = loader.load()?;
    cli.apply_overrides(&mut config);

    // 2) Arguments, or prompts when no account was given
    let request = match cli.request()? {
        Some(request) => request,
        None => match interactive::prompt_request(config.browser.headless) {
            Ok(request) => request,
            Err(e) if interactive::is_interrupted(&e) => {
                info!(target: "driftnet.app", "operation cancelled by user");
                return Ok(());
            }
            Err(e) => return Err(e.context("interactive prompt failed")),
        },
    };
    request.apply_overrides(&mut config);

    // 3) Harvest; Ctrl-C cancels the shared token and the browser is still closed
    let runtime = DriftnetRuntime::build("driftnet", None)?;
    let handle = runtime.handle();
    handle.cancel_on_ctrl_c();
    let result = runtime.block_on(harvest::execute(&config, &request, handle.cancellation()));
    runtime.shutdown(Duration::from_secs(2));
    result
}
