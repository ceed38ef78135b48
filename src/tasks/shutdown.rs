//! What happens to the screen after the slideshow stops.

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Configuration;
use crate::render::surface::Surface;
use crate::tasks::slideshow::{Outcome, Report};

/// Wind down after a run.
///
/// `report` is `None` when the run failed. A finished run that holds its last
/// frame waits here for `cancel`; then the surface is cleared at most once,
/// whichever way the run ended. Returns whether the surface was cleared.
pub async fn wind_down<S: Surface + ?Sized>(
    surface: &mut S,
    report: Option<&Report>,
    cfg: &Configuration,
    cancel: &CancellationToken,
) -> bool {
    if let Some(report) = report
        && report.outcome == Outcome::Finished
        && cfg.holds_last_frame()
    {
        info!("holding last frame until interrupted");
        cancel.cancelled().await;
    }

    if cfg.clears_on_exit() {
        surface.clear();
        info!("surface cleared");
        true
    } else {
        false
    }
}
