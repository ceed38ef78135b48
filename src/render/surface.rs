//! The display surface seam between the renderer and the device.

use crate::error::Error;
use crate::render::compose::surface_size;
use crate::types::Point;

/// A linear BGRA pixel buffer the presenter can copy frames into.
pub trait Surface {
    fn resolution(&self) -> Point;

    /// Current content, `byte_size()` bytes long.
    fn bytes(&self) -> &[u8];

    /// Replace the whole surface content with `frame`.
    ///
    /// # Errors
    /// Returns [`Error::InvariantViolation`] if `frame` has the wrong length.
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), Error>;

    /// Zero-fill the surface.
    fn clear(&mut self);

    fn byte_size(&self) -> usize {
        surface_size(self.resolution())
    }
}

pub(crate) fn check_frame_len(frame: &[u8], expected: usize) -> Result<(), Error> {
    if frame.len() == expected {
        Ok(())
    } else {
        Err(Error::InvariantViolation(format!(
            "frame holds {} bytes, surface expects {expected}",
            frame.len()
        )))
    }
}

/// Heap-backed surface, used where no device is available.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    resolution: Point,
    data: Vec<u8>,
    writes: usize,
    clears: usize,
}

impl MemorySurface {
    #[must_use]
    pub fn new(resolution: Point) -> Self {
        Self {
            resolution,
            data: vec![0; surface_size(resolution)],
            writes: 0,
            clears: 0,
        }
    }

    /// Start from existing content instead of black.
    ///
    /// # Errors
    /// Returns [`Error::InvariantViolation`] if `data` does not match `resolution`.
    pub fn with_content(resolution: Point, data: Vec<u8>) -> Result<Self, Error> {
        check_frame_len(&data, surface_size(resolution))?;
        Ok(Self {
            resolution,
            data,
            writes: 0,
            clears: 0,
        })
    }

    /// Number of frame copies performed so far.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }

    #[must_use]
    pub const fn clears(&self) -> usize {
        self.clears
    }
}

impl Surface for MemorySurface {
    fn resolution(&self) -> Point {
        self.resolution
    }

    fn bytes(&self) -> &[u8] {
        &self.data
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<(), Error> {
        check_frame_len(frame, self.data.len())?;
        self.data.copy_from_slice(frame);
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) {
        self.data.fill(0);
        self.clears += 1;
    }
}
