use std::path::PathBuf;

use thiserror::Error;

/// Library error type for slideshow operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The display surface could not be discovered, opened or mapped.
    #[error("display surface unavailable: {0}")]
    ResourceUnavailable(String),

    /// The framebuffer reports a pixel depth other than 32 bits.
    #[error("unsupported framebuffer depth: {bits_per_pixel} bits per pixel (only 32 is supported)")]
    UnsupportedDepth { bits_per_pixel: u32 },

    /// An image could not be decoded. Fatal for the whole run.
    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// Scaling could not produce output; the caller draws the unscaled image.
    #[error("resample failed: {0}")]
    Resample(String),

    /// A state that valid input can never produce.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A mode name that is not in the lookup table.
    #[error("unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownOption {
        kind: &'static str,
        value: String,
        expected: String,
    },

    /// One or more inputs are missing or unreadable.
    #[error("invalid input: {0}")]
    BadInput(String),

    /// Input expansion completed but found no images.
    #[error("no images to display")]
    EmptyInput,
}
