//! Per-trial state machine shared by the test block and both demos.

use nback_core::{Feedback, Letter, Section, Trial, TrialState};
use nback_timing::Timer;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ExperimentConfig;
use crate::error::ExperimentError;
use crate::io::{AudioPlayer, Display, InputSource};
use crate::layout;
use crate::sequence::generate;
use crate::session::Session;

/// How much support a trial gives the participant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialMode {
    /// Blind, timed, short feedback; pre and post test
    Test,
    /// History visible, untimed, explanation on error; first demo
    FullScaffold,
    /// Timed, history only revealed after a miss; second demo
    PartialScaffold,
}

impl TrialMode {
    pub fn for_section(section: Section) -> Self {
        match section {
            Section::Train1 => TrialMode::FullScaffold,
            Section::Train2 => TrialMode::PartialScaffold,
            Section::Pre | Section::Post => TrialMode::Test,
        }
    }

    pub fn shows_history(&self) -> bool {
        matches!(self, TrialMode::FullScaffold)
    }

    pub fn shows_cues(&self) -> bool {
        !matches!(self, TrialMode::Test)
    }

    pub fn response_bound(&self, config: &ExperimentConfig) -> Option<Duration> {
        match self {
            TrialMode::FullScaffold => None,
            TrialMode::Test | TrialMode::PartialScaffold => Some(config.response_window()),
        }
    }

    /// Next state once the work of `state` is done
    pub fn transition(&self, state: TrialState, trial: &Trial) -> TrialState {
        match state {
            TrialState::Fixation => TrialState::Stimulus,
            TrialState::Stimulus => TrialState::AwaitResponse,
            TrialState::AwaitResponse => match (self, trial.is_correct()) {
                (TrialMode::Test, _) => TrialState::Feedback,
                (TrialMode::FullScaffold, Some(true)) => TrialState::Complete,
                (TrialMode::PartialScaffold, Some(true)) => TrialState::Feedback,
                (_, _) => TrialState::Explanation,
            },
            TrialState::Feedback | TrialState::Explanation | TrialState::Complete => {
                TrialState::Complete
            }
        }
    }
}

impl<D, A, I, T, R> Session<D, A, I, T, R>
where
    D: Display,
    A: AudioPlayer,
    I: InputSource,
    T: Timer,
    R: Rng,
{
    /// Generates a fresh sequence and runs it in test mode
    pub fn run_test_block(&mut self, section: Section) -> Result<usize, ExperimentError> {
        let spec = self.config.sequence_spec();
        let sequence = generate(&spec, &Letter::ALPHABET, &mut self.rng)?;
        info!(
            section = %section,
            trials = sequence.len(),
            targets = sequence.target_count(),
            "sequence generated"
        );

        let count = sequence.len();
        for mut trial in sequence.trials {
            self.run_trial(TrialMode::Test, &mut trial, &[])?;
            self.record(trial, section);
        }
        Ok(count)
    }

    /// Drives one trial from fixation to completion.
    ///
    /// `history` holds the letters of the whole run; the scaffolded modes
    /// show the prefix up to the current trial.
    pub fn run_trial(
        &mut self,
        mode: TrialMode,
        trial: &mut Trial,
        history: &[Letter],
    ) -> Result<(), ExperimentError> {
        let mut state = TrialState::Fixation;
        while state != TrialState::Complete {
            match state {
                TrialState::Fixation => self.show_fixation()?,
                TrialState::Stimulus => self.present_stimulus(mode, trial, history)?,
                TrialState::AwaitResponse => self.await_response(mode, trial)?,
                TrialState::Feedback => self.show_feedback(trial.feedback())?,
                TrialState::Explanation => self.explain(mode, trial, history)?,
                TrialState::Complete => {}
            }
            state = mode.transition(state, trial);
        }

        debug!(
            trial = trial.index + 1,
            stimulus = %trial.stimulus,
            target = trial.is_target,
            response = ?trial.observed,
            rt = ?trial.reaction_time,
            correct = ?trial.is_correct(),
            "trial complete"
        );
        Ok(())
    }

    fn show_fixation(&mut self) -> Result<(), ExperimentError> {
        self.display.draw(layout::fixation());
        self.display.present()?;
        self.timer.sleep(self.config.fixation());
        Ok(())
    }

    fn present_stimulus(
        &mut self,
        mode: TrialMode,
        trial: &Trial,
        history: &[Letter],
    ) -> Result<(), ExperimentError> {
        let visual = self.condition.is_visual();
        if visual {
            self.display.draw(layout::letter(trial.stimulus));
        } else {
            self.display.draw(layout::fixation());
        }
        if mode.shows_cues() {
            for cue in layout::cues(&self.config.keys) {
                self.display.draw(cue);
            }
        }
        if mode.shows_history() {
            for item in layout::history_row(seen(history, trial.index)) {
                self.display.draw(item);
            }
            self.display.draw(layout::slot_box(trial.index));
        }
        self.display.present()?;
        if !visual {
            self.play(trial);
        }
        Ok(())
    }

    fn await_response(&mut self, mode: TrialMode, trial: &mut Trial) -> Result<(), ExperimentError> {
        let keys = self.config.keys;
        let bound = mode.response_bound(&self.config);
        let press = self.input.wait_keys(&keys.response_keys(), bound)?;
        if let Some(press) = press {
            if let Some(response) = keys.response_for(press.key) {
                trial.respond(response, press.rt);
            }
        }
        Ok(())
    }

    fn show_feedback(&mut self, feedback: Feedback) -> Result<(), ExperimentError> {
        self.display.draw(layout::centre_label(feedback.label()));
        self.display.present()?;
        self.timer.sleep(self.config.feedback());
        Ok(())
    }
}

/// Letters up to and including `index`
pub(crate) fn seen(history: &[Letter], index: usize) -> &[Letter] {
    &history[..history.len().min(index + 1)]
}
