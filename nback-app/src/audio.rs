use nback_core::Letter;
use nback_experiment::{AudioError, AudioPlayer};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use tracing::debug;

#[cfg(target_os = "macos")]
pub const DEFAULT_PLAYER: &str = "afplay";
#[cfg(not(target_os = "macos"))]
pub const DEFAULT_PLAYER: &str = "aplay";

/// Plays `<dir>/<LETTER>.wav` through an external player without waiting
pub struct CommandAudio {
    dir: PathBuf,
    player: String,
    running: Vec<Child>,
}

impl CommandAudio {
    pub fn new(dir: impl Into<PathBuf>, player: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            player: player.into(),
            running: Vec::new(),
        }
    }

    pub fn clip_path(&self, letter: Letter) -> PathBuf {
        self.dir.join(format!("{letter}.wav"))
    }

    fn reap(&mut self) {
        self.running
            .retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }

    fn spawn(&self, clip: &Path) -> std::io::Result<Child> {
        Command::new(&self.player)
            .arg(clip)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    }
}

impl AudioPlayer for CommandAudio {
    fn play(&mut self, letter: Letter) -> Result<(), AudioError> {
        self.reap();
        let clip = self.clip_path(letter);
        if !clip.is_file() {
            return Err(AudioError::Missing(clip));
        }
        let child = self.spawn(&clip)?;
        debug!(clip = %clip.display(), pid = child.id(), "playing clip");
        self.running.push(child);
        Ok(())
    }
}

impl Drop for CommandAudio {
    fn drop(&mut self) {
        for child in &mut self.running {
            let _ = child.wait();
        }
    }
}
