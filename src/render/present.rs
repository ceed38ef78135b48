//! Copying composited frames to the surface under the delay/repaint policy.

use std::thread;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::error::Error;
use crate::render::surface::Surface;

/// Longest single sleep while waiting out a delay.
const WAIT_SLICE_MS: u64 = 50;

/// Monotonic millisecond clock anchored at process start.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    #[must_use]
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds since the clock was started.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::start()
    }
}

/// State threaded through the slideshow in place of process globals.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub cancel: CancellationToken,
    pub clock: Clock,
}

impl Context {
    #[must_use]
    pub fn new(cancel: CancellationToken, clock: Clock) -> Self {
        Self { cancel, clock }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// How a call to [`present`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presented {
    Completed,
    Cancelled,
}

/// Write `frame` to `surface` following the delay/repaint policy.
///
/// | delay | repaint | behavior                                       |
/// |-------|---------|------------------------------------------------|
/// | 0     | no      | copy once                                      |
/// | 0     | yes     | copy until cancelled                           |
/// | > 0   | no      | copy once, wait out the rest of the delay      |
/// | > 0   | yes     | copy until the delay has passed or cancelled   |
///
/// The token is checked after every copy and between wait slices, so a
/// cancellation is observed within one copy.
///
/// # Errors
/// Propagates [`Error::InvariantViolation`] from a wrongly sized frame.
pub fn present<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &[u8],
    delay: Duration,
    repaint: bool,
    ctx: &Context,
) -> Result<Presented, Error> {
    let entry = ctx.clock.now_ms();
    let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
    let elapsed = || ctx.clock.now_ms().saturating_sub(entry);

    match (delay_ms > 0, repaint) {
        (false, false) => {
            surface.write_frame(frame)?;
            Ok(Presented::Completed)
        }
        (false, true) => {
            let mut copies = 0u64;
            loop {
                surface.write_frame(frame)?;
                copies += 1;
                if ctx.is_cancelled() {
                    trace!(copies, "repaint loop cancelled");
                    return Ok(Presented::Cancelled);
                }
            }
        }
        (true, false) => {
            surface.write_frame(frame)?;
            loop {
                if ctx.is_cancelled() {
                    return Ok(Presented::Cancelled);
                }
                let spent = elapsed();
                if spent >= delay_ms {
                    return Ok(Presented::Completed);
                }
                let slice = (delay_ms - spent).min(WAIT_SLICE_MS);
                thread::sleep(Duration::from_millis(slice));
            }
        }
        (true, true) => {
            let mut copies = 0u64;
            loop {
                surface.write_frame(frame)?;
                copies += 1;
                if ctx.is_cancelled() {
                    trace!(copies, "timed repaint cancelled");
                    return Ok(Presented::Cancelled);
                }
                if elapsed() > delay_ms {
                    trace!(copies, "timed repaint finished");
                    return Ok(Presented::Completed);
                }
            }
        }
    }
}
