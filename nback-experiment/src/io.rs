//! Collaborators the session drives: a display sink, an audio player and a
//! blocking key source.

use nback_core::{Key, Letter, Placed};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::error::{AudioError, ExperimentError};

/// Frame sink. Drawn items accumulate until `present` shows them.
pub trait Display {
    fn draw(&mut self, item: Placed);
    fn present(&mut self) -> Result<(), ExperimentError>;
}

/// Fire-and-forget playback of a letter clip
pub trait AudioPlayer {
    fn play(&mut self, letter: Letter) -> Result<(), AudioError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    /// Time from the start of the wait to the key event
    pub rt: Duration,
}

pub trait InputSource {
    /// Blocks until one of `accepted` arrives or `bound` elapses.
    ///
    /// `Ok(None)` means the bound elapsed first; `None` as the bound waits
    /// indefinitely. The abort key (or a tripped [`AbortToken`]) yields
    /// [`ExperimentError::Aborted`] regardless of `accepted`.
    fn wait_keys(
        &mut self,
        accepted: &[Key],
        bound: Option<Duration>,
    ) -> Result<Option<KeyPress>, ExperimentError>;
}

/// Session-wide cancellation flag shared between the UI and the session
#[derive(Debug, Clone, Default)]
pub struct AbortToken(Arc<AtomicBool>);

impl AbortToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<(), ExperimentError> {
        if self.is_aborted() {
            Err(ExperimentError::Aborted)
        } else {
            Ok(())
        }
    }
}
