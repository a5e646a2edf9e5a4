use crate::cli::HarvestRequest;
use anyhow::Result;
use chrono::Local;
use driftnet_config::DriftnetConfig;
use driftnet_drivers::driftnet_browser::driver::DriftnetDriver;
use driftnet_social::timeline::account::profile_url;
use driftnet_social::timeline::export::{write_diagnostic_dump, write_items};
use driftnet_social::timeline::{Termination, TimelineHarvester, harvest_scoped, until_cancelled};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Connect a browser, harvest the requested timeline, and write the artifact.
///
/// Whatever was collected is saved even when the run ended early; the error
/// is returned afterwards.
pub async fn execute(
    config: &DriftnetConfig,
    request: &HarvestRequest,
    cancel: CancellationToken,
) -> Result<()> {
    let harvester = TimelineHarvester::from_config(&config.timeline)?;
    let url = profile_url(&config.timeline.base_url, &request.account)?;
    let out_dir = config.output.resolved_directory();

    // Ctrl-C no longer kills the process, so a stuck connect must yield to it.
    let Some(driver) = until_cancelled(&cancel, DriftnetDriver::connect(&config.browser)).await
    else {
        info!(target: "driftnet.app", "operation cancelled by user");
        return Ok(());
    };
    let driver = driver?;
    let report = harvest_scoped(driver, &harvester, url.as_str(), request.limit, &cancel).await;

    if let Some(markup) = &report.diagnostic_markup {
        if let Err(e) = write_diagnostic_dump(&out_dir, &request.account, markup) {
            warn!(target: "driftnet.app", error = %e, "could not save page source");
        }
    }

    if report.items.is_empty() {
        info!(target: "driftnet.app", account = %request.account, "no posts collected");
    } else {
        write_items(
            &out_dir,
            &request.account,
            request.output_name.as_deref(),
            &report.items,
            Local::now(),
        )?;
    }

    match report.termination {
        Termination::Failed(e) => {
            error!(target: "driftnet.app", error = %e, "harvest failed");
            Err(e.into())
        }
        Termination::Cancelled => {
            info!(target: "driftnet.app", "operation cancelled by user");
            Ok(())
        }
        Termination::TargetMissing => {
            info!(
                target: "driftnet.app",
                account = %request.account,
                "account doesn't seem to exist"
            );
            Ok(())
        }
        Termination::StallExhausted | Termination::LimitReached => {
            info!(
                target: "driftnet.app",
                total = report.items.len(),
                "total posts collected"
            );
            Ok(())
        }
    }
}
