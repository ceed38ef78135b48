use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::buffer::DEFAULT_BATCH_SIZE;
use crate::options::{Background, Position, ScaleMode};
use crate::platform::framebuffer::FramebufferId;
use crate::scan::ScanOptions;
use crate::tasks::slideshow::SlideshowOptions;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Configuration {
    /// Image files or directories, shown in order.
    #[serde(default)]
    pub inputs: Vec<PathBuf>,
    /// Device to draw on; the lowest-numbered one when unset.
    #[serde(default)]
    pub framebuffer: Option<FramebufferId>,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub scale: ScaleMode,
    /// Time each image stays up. Whole seconds only.
    #[serde(default, with = "humantime_serde")]
    pub delay: Duration,
    #[serde(default)]
    pub repaint: bool,
    #[serde(default, rename = "loop")]
    pub looping: bool,
    #[serde(default)]
    pub hide_cursor: bool,
    /// Zero the surface on exit. Defaults to `repaint || hide-cursor`.
    #[serde(default)]
    pub clear_on_exit: Option<bool>,
    #[serde(default)]
    pub recursive: bool,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
    #[serde(default = "Configuration::default_batch_size")]
    pub batch_size: usize,
}

impl Configuration {
    const fn default_batch_size() -> usize {
        DEFAULT_BATCH_SIZE
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let cfg: Self = serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(cfg)
    }

    pub fn validated(self) -> Result<Self> {
        ensure!(self.batch_size > 0, "batch-size must be greater than zero");
        ensure!(
            self.delay.subsec_nanos() == 0,
            "delay must be a whole number of seconds, got {}",
            humantime::format_duration(self.delay)
        );
        ensure!(!self.inputs.is_empty(), "at least one input is required");
        Ok(self)
    }

    /// Whether the surface is zeroed during cleanup.
    pub fn clears_on_exit(&self) -> bool {
        self.clear_on_exit
            .unwrap_or(self.repaint || self.hide_cursor)
    }

    /// Whether the last image is held on screen until a signal arrives.
    ///
    /// With the cursor hidden and no repaint loop keeping the frame alive,
    /// exiting straight away would hand the terminal back over the image.
    pub fn holds_last_frame(&self) -> bool {
        self.hide_cursor && !self.repaint
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            recursive: self.recursive,
        }
    }

    pub fn slideshow_options(&self) -> SlideshowOptions {
        SlideshowOptions {
            position: self.position,
            background: self.background,
            scale: self.scale,
            delay: self.delay,
            repaint: self.repaint,
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            framebuffer: None,
            position: Position::default(),
            background: Background::default(),
            scale: ScaleMode::default(),
            delay: Duration::ZERO,
            repaint: false,
            looping: false,
            hide_cursor: false,
            clear_on_exit: None,
            recursive: false,
            shuffle: false,
            shuffle_seed: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}
