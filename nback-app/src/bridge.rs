//! Channels between the UI thread and the session thread.

use nback_core::{Key, Placed};
use nback_experiment::{AbortToken, Display, ExperimentError, InputSource, KeyPress};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::debug;
use winit::event_loop::EventLoopProxy;

/// How often a blocked wait re-checks the abort token
const POLL: Duration = Duration::from_millis(10);

#[derive(Debug)]
pub enum UiCommand {
    Present(Vec<Placed>),
    Exit,
}

/// A key as seen by the UI thread, stamped on arrival
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    pub key: Key,
    pub at: Instant,
}

impl KeyEvent {
    pub fn now(key: Key) -> Self {
        Self {
            key,
            at: Instant::now(),
        }
    }
}

/// Where finished frames go; `false` once the UI side is gone
pub trait FrameSink {
    fn send_frame(&self, frame: Vec<Placed>) -> bool;
}

impl FrameSink for EventLoopProxy<UiCommand> {
    fn send_frame(&self, frame: Vec<Placed>) -> bool {
        self.send_event(UiCommand::Present(frame)).is_ok()
    }
}

/// Sends frames to the UI thread and blocks until each one is on screen,
/// so timed intervals start from the visible frame.
pub struct ChannelDisplay<S = EventLoopProxy<UiCommand>> {
    sink: S,
    shown: Receiver<()>,
    token: AbortToken,
    pending: Vec<Placed>,
}

impl<S: FrameSink> ChannelDisplay<S> {
    pub fn new(sink: S, shown: Receiver<()>, token: AbortToken) -> Self {
        Self {
            sink,
            shown,
            token,
            pending: Vec::new(),
        }
    }

    /// The UI is gone; that only counts as a failure if nobody asked to stop
    fn closed(&self) -> ExperimentError {
        if self.token.is_aborted() {
            ExperimentError::Aborted
        } else {
            ExperimentError::Display("event loop closed".into())
        }
    }
}

impl<S: FrameSink> Display for ChannelDisplay<S> {
    fn draw(&mut self, item: Placed) {
        self.pending.push(item);
    }

    fn present(&mut self) -> Result<(), ExperimentError> {
        self.token.check()?;
        let frame = std::mem::take(&mut self.pending);
        if !self.sink.send_frame(frame) {
            return Err(self.closed());
        }
        loop {
            match self.shown.recv_timeout(POLL) {
                Ok(()) => return Ok(()),
                Err(RecvTimeoutError::Timeout) => self.token.check()?,
                Err(RecvTimeoutError::Disconnected) => return Err(self.closed()),
            }
        }
    }
}

pub struct ChannelInput {
    keys: Receiver<KeyEvent>,
    abort_key: Key,
    token: AbortToken,
}

impl ChannelInput {
    pub fn new(keys: Receiver<KeyEvent>, abort_key: Key, token: AbortToken) -> Self {
        Self {
            keys,
            abort_key,
            token,
        }
    }

    fn trip(&self) -> Result<Option<KeyPress>, ExperimentError> {
        self.token.abort();
        Err(ExperimentError::Aborted)
    }
}

impl InputSource for ChannelInput {
    fn wait_keys(
        &mut self,
        accepted: &[Key],
        bound: Option<Duration>,
    ) -> Result<Option<KeyPress>, ExperimentError> {
        self.token.check()?;
        while let Ok(stale) = self.keys.try_recv() {
            if stale.key == self.abort_key {
                return self.trip();
            }
            debug!(key = %stale.key, "discarding key pressed before the wait");
        }

        let start = Instant::now();
        loop {
            self.token.check()?;
            let slice = match bound {
                Some(b) => {
                    let elapsed = start.elapsed();
                    if elapsed >= b {
                        return Ok(None);
                    }
                    (b - elapsed).min(POLL)
                }
                None => POLL,
            };
            match self.keys.recv_timeout(slice) {
                Ok(ev) if ev.key == self.abort_key => return self.trip(),
                Ok(ev) if accepted.contains(&ev.key) => {
                    let rt = ev.at.saturating_duration_since(start);
                    if bound.is_some_and(|b| rt > b) {
                        return Ok(None);
                    }
                    return Ok(Some(KeyPress { key: ev.key, rt }));
                }
                Ok(_) | Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Err(ExperimentError::InputClosed),
            }
        }
    }
}
