use std::path::Path;

use crate::error::Result;
use crate::time::Seconds;

/// Media player operations required by the engine.
///
/// The engine never touches media bytes: it reads the playback position and
/// issues transport commands.
pub trait MediaSource {
    /// Loads media for playback, replacing any previous media.
    fn open(&mut self, path: &Path) -> Result<()>;

    /// Current playback position, or `None` when no media is loaded.
    fn position(&self) -> Option<Seconds>;

    fn seek(&mut self, offset: Seconds);

    fn play(&mut self);

    fn pause(&mut self);
}

/// Media source pinned to a fixed position.
///
/// Used by headless front-ends where the "playback position" is supplied on
/// the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedPosition {
    position: Option<Seconds>,
}

impl FixedPosition {
    pub fn at(offset: Seconds) -> Self {
        Self {
            position: Some(offset),
        }
    }

    pub fn unloaded() -> Self {
        Self { position: None }
    }
}

impl MediaSource for FixedPosition {
    fn open(&mut self, _path: &Path) -> Result<()> {
        self.position.get_or_insert(0.0);
        Ok(())
    }

    fn position(&self) -> Option<Seconds> {
        self.position
    }

    fn seek(&mut self, offset: Seconds) {
        if self.position.is_some() {
            self.position = Some(offset);
        }
    }

    fn play(&mut self) {}

    fn pause(&mut self) {}
}
