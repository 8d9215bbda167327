//! In-memory collaborators for driving a session without a window.

use nback_core::{Key, Letter, Placed};
use nback_timing::{ManualTimer, Timer};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AudioError, ExperimentError};
use crate::io::{AbortToken, AudioPlayer, Display, InputSource, KeyPress};

/// Keeps every presented frame
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pending: Vec<Placed>,
    pub frames: Vec<Vec<Placed>>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames containing a text item with exactly this content
    pub fn frames_with_text<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a [Placed]> + 'a {
        self.frames
            .iter()
            .filter(move |f| f.iter().any(|p| p.shape.text_content() == Some(text)))
            .map(Vec::as_slice)
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.frames
            .iter()
            .flatten()
            .filter_map(|p| p.shape.text_content())
    }
}

impl Display for RecordingDisplay {
    fn draw(&mut self, item: Placed) {
        self.pending.push(item);
    }

    fn present(&mut self) -> Result<(), ExperimentError> {
        self.frames.push(std::mem::take(&mut self.pending));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scripted {
    /// Key pressed `after` the wait begins
    Press { key: Key, after: Duration },
    /// Nothing pressed during this wait
    Silence,
}

impl Scripted {
    pub fn press(key: Key, after_ms: u64) -> Self {
        Scripted::Press {
            key,
            after: Duration::from_millis(after_ms),
        }
    }
}

/// Replays a fixed list of key events, one per accepted wait.
///
/// Keys outside the accepted set are skipped, their delay still counting
/// toward the wait. Presses later than the bound count as a timeout.
#[derive(Debug)]
pub struct ScriptedInput {
    events: VecDeque<Scripted>,
    abort_key: Key,
    token: AbortToken,
    clock: Option<ManualTimer>,
    pub bounds: Vec<Option<Duration>>,
}

impl ScriptedInput {
    pub fn new(abort_key: Key, events: impl IntoIterator<Item = Scripted>) -> Self {
        Self {
            events: events.into_iter().collect(),
            abort_key,
            token: AbortToken::new(),
            clock: None,
            bounds: Vec::new(),
        }
    }

    /// Advances `clock` by the simulated waiting time
    pub fn with_clock(mut self, clock: ManualTimer) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_token(mut self, token: AbortToken) -> Self {
        self.token = token;
        self
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    fn pass(&self, d: Duration) {
        if let Some(clock) = &self.clock {
            clock.sleep(d);
        }
    }
}

impl InputSource for ScriptedInput {
    fn wait_keys(
        &mut self,
        accepted: &[Key],
        bound: Option<Duration>,
    ) -> Result<Option<KeyPress>, ExperimentError> {
        self.token.check()?;
        self.bounds.push(bound);
        let mut waited = Duration::ZERO;
        loop {
            let Some(event) = self.events.pop_front() else {
                return match bound {
                    Some(b) => {
                        self.pass(b.saturating_sub(waited));
                        Ok(None)
                    }
                    None => Err(ExperimentError::InputClosed),
                };
            };
            match event {
                Scripted::Silence => {
                    let b = bound.ok_or(ExperimentError::InputClosed)?;
                    self.pass(b.saturating_sub(waited));
                    return Ok(None);
                }
                Scripted::Press { key, after } => {
                    let at = waited + after;
                    // Abort wins over the bound
                    if key == self.abort_key {
                        self.pass(after);
                        self.token.abort();
                        return Err(ExperimentError::Aborted);
                    }
                    if let Some(b) = bound {
                        if at > b {
                            self.pass(b.saturating_sub(waited));
                            return Ok(None);
                        }
                    }
                    self.pass(after);
                    waited = at;
                    if accepted.contains(&key) {
                        return Ok(Some(KeyPress { key, rt: at }));
                    }
                }
            }
        }
    }
}

/// Records requested clips; optionally fails every request
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub played: Vec<Letter>,
    pub fail: bool,
}

impl AudioPlayer for RecordingAudio {
    fn play(&mut self, letter: Letter) -> Result<(), AudioError> {
        if self.fail {
            return Err(AudioError::Missing(PathBuf::from(format!("{letter}.wav"))));
        }
        self.played.push(letter);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const K: Key = Key::Char('k');
    const D: Key = Key::Char('d');
    const ABORT: Key = Key::Char('9');

    #[test]
    fn late_press_is_a_timeout() {
        let clock = ManualTimer::new();
        let mut input =
            ScriptedInput::new(ABORT, [Scripted::press(K, 2500)]).with_clock(clock.clone());
        let got = input
            .wait_keys(&[K, D], Some(Duration::from_secs(2)))
            .expect("no abort");
        assert_eq!(got, None);
        assert_eq!(clock.now(), 2_000_000_000);
    }

    #[test]
    fn ignored_keys_add_to_reaction_time() {
        let mut input = ScriptedInput::new(
            ABORT,
            [Scripted::press(Key::Space, 100), Scripted::press(D, 300)],
        );
        let got = input.wait_keys(&[K, D], None).expect("no abort");
        assert_eq!(
            got,
            Some(KeyPress {
                key: D,
                rt: Duration::from_millis(400)
            })
        );
    }

    #[test]
    fn abort_after_the_bound_still_aborts() {
        let token = AbortToken::new();
        let mut input = ScriptedInput::new(ABORT, [Scripted::press(ABORT, 2500)])
            .with_token(token.clone());
        assert!(matches!(
            input.wait_keys(&[K, D], Some(Duration::from_secs(2))),
            Err(ExperimentError::Aborted)
        ));
        assert!(token.is_aborted());
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn abort_key_trips_token() {
        let token = AbortToken::new();
        let mut input =
            ScriptedInput::new(ABORT, [Scripted::press(ABORT, 10)]).with_token(token.clone());
        assert!(matches!(
            input.wait_keys(&[Key::Space], None),
            Err(ExperimentError::Aborted)
        ));
        assert!(token.is_aborted());
        assert!(matches!(
            input.wait_keys(&[Key::Space], None),
            Err(ExperimentError::Aborted)
        ));
    }
}
