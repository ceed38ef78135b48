//! Binary entrypoint for fb-slideshow.
//!
//! Parses the CLI, wires signals into a cancellation token and hands the
//! actual drawing to the library on a blocking thread.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::{ArgAction, Parser};
use tokio_util::sync::CancellationToken;
use tracing::{Level, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

use fb_slideshow::buffer::ImageStream;
use fb_slideshow::config::Configuration;
use fb_slideshow::loader::ImageDecoder;
use fb_slideshow::options::{Background, Position, ScaleMode};
use fb_slideshow::platform::cursor::HiddenCursor;
use fb_slideshow::platform::framebuffer::{self, Framebuffer, FramebufferId};
use fb_slideshow::render::present::{Clock, Context};
use fb_slideshow::scan;
use fb_slideshow::tasks::{shutdown, slideshow};

/// Show images on the Linux framebuffer without a windowing system.
#[derive(Debug, Parser)]
#[command(name = "fb-slideshow", version, about)]
struct Cli {
    /// Image files or directories to show, in order
    #[arg(value_name = "INPUT")]
    inputs: Vec<PathBuf>,

    /// Path to YAML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Framebuffer index or device path (default: lowest index found)
    #[arg(short = 'b', long, value_name = "ID")]
    framebuffer: Option<FramebufferId>,

    /// centered | top-left | top-right | bottom-right | bottom-left (or 0-4)
    #[arg(short, long, value_name = "MODE")]
    position: Option<Position>,

    /// black | white | red | green | blue | disabled (or 0-4)
    #[arg(short = 'g', long, value_name = "COLOR")]
    background: Option<Background>,

    /// disabled | fit | fill | stretch
    #[arg(short, long, value_name = "MODE")]
    scale: Option<ScaleMode>,

    /// Seconds each image stays up (0 = none)
    #[arg(short, long, value_name = "SECONDS")]
    delay: Option<u64>,

    /// Keep repainting the image to stay on top of console output
    #[arg(short, long)]
    repaint: bool,

    /// Loop the sequence forever
    #[arg(short = 'l', long = "loop")]
    looping: bool,

    /// Hide the terminal cursor while drawing
    #[arg(short = 'c', long)]
    hide_cursor: bool,

    /// Clear the framebuffer on exit (default: when repainting or hiding the cursor)
    #[arg(long, value_name = "BOOL")]
    clear_on_exit: Option<bool>,

    /// Recurse into directory inputs
    #[arg(short = 'R', long)]
    recursive: bool,

    /// Shuffle the inputs once at startup
    #[arg(long)]
    shuffle: bool,

    /// Seed for --shuffle
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Number of decoded images held in memory at once
    #[arg(long, value_name = "COUNT")]
    batch_size: Option<usize>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Layer command-line values over the file configuration.
    fn apply(self, cfg: &mut Configuration) {
        if !self.inputs.is_empty() {
            cfg.inputs = self.inputs;
        }
        if let Some(fb) = self.framebuffer {
            cfg.framebuffer = Some(fb);
        }
        if let Some(p) = self.position {
            cfg.position = p;
        }
        if let Some(b) = self.background {
            cfg.background = b;
        }
        if let Some(s) = self.scale {
            cfg.scale = s;
        }
        if let Some(d) = self.delay {
            cfg.delay = Duration::from_secs(d);
        }
        cfg.repaint |= self.repaint;
        cfg.looping |= self.looping;
        cfg.hide_cursor |= self.hide_cursor;
        if self.clear_on_exit.is_some() {
            cfg.clear_on_exit = self.clear_on_exit;
        }
        cfg.recursive |= self.recursive;
        cfg.shuffle |= self.shuffle;
        if self.seed.is_some() {
            cfg.shuffle_seed = self.seed;
        }
        if let Some(k) = self.batch_size {
            cfg.batch_size = k;
        }
    }
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("fb_slideshow={level}").parse()?);
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn spawn_signal_watchers(cancel: &CancellationToken) {
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("ctrl-c handler failed: {err}");
                return;
            }
            info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    #[cfg(unix)]
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = cancel.cancelled() => {}
                        _ = sigterm.recv() => {
                            info!("SIGTERM received; initiating shutdown");
                            cancel.cancel();
                        }
                    }
                }
                Err(err) => warn!("failed to register SIGTERM handler: {err}"),
            }
        });
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let clock = Clock::start();
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut cfg = match &cli.config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Configuration::default(),
    };
    cli.apply(&mut cfg);
    let cfg = cfg.validated().context("invalid configuration")?;

    let mut paths = scan::expand_inputs(&cfg.inputs, &cfg.scan_options())
        .context("expanding inputs")?;
    if cfg.shuffle {
        scan::shuffle(&mut paths, cfg.shuffle_seed);
    }
    info!(count = paths.len(), "collected images");

    let device = match &cfg.framebuffer {
        Some(id) => id.device_path(),
        None => framebuffer::default_device()?,
    };
    let fb = Framebuffer::open(&device)
        .with_context(|| format!("opening framebuffer {}", device.display()))?;

    let mut stream = ImageStream::new(paths, ImageDecoder::default(), cfg.batch_size, cfg.looping)?;

    let cancel = CancellationToken::new();
    spawn_signal_watchers(&cancel);

    let cursor = if cfg.hide_cursor {
        match HiddenCursor::hide() {
            Ok(guard) => Some(guard),
            Err(err) => {
                warn!("failed to hide cursor: {err}");
                None
            }
        }
    } else {
        None
    };

    let ctx = Context::new(cancel.clone(), clock);
    let opts = cfg.slideshow_options();
    let (mut fb, result) = tokio::task::spawn_blocking(move || {
        let mut fb = fb;
        let result = slideshow::run(&mut stream, &mut fb, &opts, &ctx);
        (fb, result)
    })
    .await
    .context("slideshow thread panicked")?;

    if let Ok(report) = &result {
        info!(frames = report.frames, outcome = ?report.outcome, "slideshow stopped");
    }

    // Cleanup runs once for completion, cancellation and failure alike.
    shutdown::wind_down(&mut fb, result.as_ref().ok(), &cfg, &cancel).await;
    drop(fb);
    drop(cursor);

    if let Err(err) = &result {
        error!("slideshow failed: {err}");
    }
    result.context("slideshow failed")?;
    Ok(())
}
