//! Bounded streaming over an arbitrarily long list of image paths.
//!
//! Only one batch of at most `capacity` decoded items is resident at a time.
//! When the batch is used up it is dropped and the next window of paths is
//! decoded, wrapping to the start of the list when looping.

use std::path::PathBuf;

use tracing::debug;

use crate::error::Error;
use crate::loader::Decode;

/// Default number of images held in memory at once.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// A window of decoded items plus how far into it we are.
#[derive(Debug)]
struct Batch<T> {
    items: Vec<T>,
    cursor: usize,
    consumed: usize,
}

impl<T> Batch<T> {
    const fn empty() -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            consumed: 0,
        }
    }

    fn filled(items: Vec<T>) -> Self {
        Self {
            items,
            cursor: 0,
            consumed: 0,
        }
    }

    fn is_spent(&self) -> bool {
        self.consumed >= self.items.len()
    }
}

/// An optionally looping image sequence with bounded residency.
pub struct ImageStream<D: Decode> {
    paths: Vec<PathBuf>,
    decoder: D,
    capacity: usize,
    looping: bool,
    cursor: usize,
    batch: Batch<D::Output>,
    exhausted: bool,
}

impl<D: Decode> ImageStream<D> {
    /// # Errors
    /// Returns [`Error::EmptyInput`] if `paths` is empty and
    /// [`Error::InvariantViolation`] if `capacity` is zero.
    pub fn new(paths: Vec<PathBuf>, decoder: D, capacity: usize, looping: bool) -> Result<Self, Error> {
        if paths.is_empty() {
            return Err(Error::EmptyInput);
        }
        if capacity == 0 {
            return Err(Error::InvariantViolation("batch capacity must be positive".into()));
        }
        Ok(Self {
            paths,
            decoder,
            capacity,
            looping,
            cursor: 0,
            batch: Batch::empty(),
            exhausted: false,
        })
    }

    /// Number of input paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Decoded items currently held.
    #[must_use]
    pub fn resident(&self) -> usize {
        self.batch.items.len()
    }

    /// Position of the next path to be handed out.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.cursor
    }

    /// Borrow the path list (read-only).
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Advance and borrow the next item.
    ///
    /// Returns `Ok(None)` once every path has been shown and looping is off.
    /// The borrow lasts until the next call, which may drop the item.
    ///
    /// # Errors
    /// Any decode failure is returned as-is and aborts the sequence.
    pub fn next(&mut self) -> Result<Option<&D::Output>, Error> {
        if self.exhausted {
            return Ok(None);
        }

        if self.batch.is_spent() {
            self.reload()?;
        }

        let index = self.batch.cursor;
        self.batch.cursor += 1;
        self.batch.consumed += 1;
        self.cursor += 1;

        if self.cursor == self.paths.len() {
            // Force a reload from the start on the next call.
            self.cursor = 0;
            self.batch.consumed = self.batch.items.len();
            if !self.looping {
                self.exhausted = true;
            }
        }

        self.batch.items.get(index).map(Some).ok_or_else(|| {
            Error::InvariantViolation(format!(
                "batch cursor {index} past {} resident items",
                self.batch.items.len()
            ))
        })
    }

    fn reload(&mut self) -> Result<(), Error> {
        let released = self.batch.items.len();
        // Old items go before any new decode starts.
        self.batch = Batch::empty();
        if released > 0 {
            debug!(released, "released batch");
        }

        let remaining = self.paths.len() - self.cursor;
        let take = remaining.min(self.capacity);
        let window = &self.paths[self.cursor..self.cursor + take];
        let mut items = Vec::with_capacity(take);
        for path in window {
            items.push(self.decoder.decode(path)?);
        }
        debug!(start = self.cursor, loaded = items.len(), "loaded batch");
        self.batch = Batch::filled(items);
        Ok(())
    }
}
