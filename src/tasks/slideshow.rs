use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::buffer::ImageStream;
use crate::error::Error;
use crate::loader::Decode;
use crate::options::{Background, Position, ScaleMode};
use crate::processing::layout::target_dims;
use crate::processing::scale::{byte_budget, resize};
use crate::render::compose::render;
use crate::render::present::{Context, Presented, present};
use crate::render::surface::Surface;
use crate::types::Image;

/// Per-run drawing policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlideshowOptions {
    pub position: Position,
    pub background: Background,
    pub scale: ScaleMode,
    pub delay: Duration,
    pub repaint: bool,
}

/// How the slideshow ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every image was shown and looping is off.
    Finished,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub frames: usize,
    pub outcome: Outcome,
}

/// Drive `stream` onto `surface` until it runs dry or `ctx` is cancelled.
///
/// Each image is resized per `opts.scale` (falling back to the original on a
/// resample failure), composited against the current surface content and
/// presented. Cancellation is checked between images and inside the
/// presenter.
///
/// # Errors
/// Decode failures and invariant violations end the run.
#[instrument(skip_all, fields(images = stream.len()))]
pub fn run<D, S>(
    stream: &mut ImageStream<D>,
    surface: &mut S,
    opts: &SlideshowOptions,
    ctx: &Context,
) -> Result<Report, Error>
where
    D: Decode<Output = Image>,
    S: Surface + ?Sized,
{
    info!(
        position = %opts.position,
        background = %opts.background,
        scale = %opts.scale,
        delay = %humantime::format_duration(opts.delay),
        repaint = opts.repaint,
        "starting slideshow"
    );

    let mut frames = 0usize;
    loop {
        if ctx.is_cancelled() {
            info!(frames, "slideshow cancelled");
            return Ok(Report {
                frames,
                outcome: Outcome::Cancelled,
            });
        }

        let index = stream.position();
        let Some(image) = stream.next()? else {
            info!(frames, "slideshow finished");
            return Ok(Report {
                frames,
                outcome: Outcome::Finished,
            });
        };

        let viewport = surface.resolution();
        let target = target_dims(image.resolution(), viewport, opts.scale);
        let scaled = if target == image.resolution() {
            None
        } else {
            match resize(image, target, byte_budget(viewport)) {
                Ok(img) => Some(img),
                Err(err) => {
                    warn!(index, "drawing unscaled image: {err}");
                    None
                }
            }
        };
        let image = scaled.as_ref().unwrap_or(image);

        let frame = render(
            image,
            viewport,
            surface.bytes(),
            opts.position,
            opts.background,
        )?;
        debug!(
            index,
            width = image.resolution().x,
            height = image.resolution().y,
            "composited frame"
        );

        let presented = present(surface, &frame, opts.delay, opts.repaint, ctx)?;
        frames += 1;
        if presented == Presented::Cancelled {
            info!(frames, "slideshow cancelled during presentation");
            return Ok(Report {
                frames,
                outcome: Outcome::Cancelled,
            });
        }
    }
}
