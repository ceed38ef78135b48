use std::io::{self, stdout};

use crossterm::{cursor, execute};
use tracing::{debug, warn};

/// Keeps the terminal cursor hidden until dropped.
#[derive(Debug)]
pub struct HiddenCursor {
    _priv: (),
}

impl HiddenCursor {
    /// # Errors
    /// Returns the IO error if the escape sequence cannot be written.
    pub fn hide() -> io::Result<Self> {
        execute!(stdout(), cursor::Hide)?;
        debug!("terminal cursor hidden");
        Ok(Self { _priv: () })
    }
}

impl Drop for HiddenCursor {
    fn drop(&mut self) {
        match execute!(stdout(), cursor::Show) {
            Ok(()) => debug!("terminal cursor restored"),
            Err(err) => warn!("failed to restore terminal cursor: {err}"),
        }
    }
}
