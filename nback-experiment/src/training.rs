//! Hand-authored demo runs with scaffolded correction.

use nback_core::{Letter, Section, Trial};
use nback_timing::Timer;
use rand::Rng;

use crate::error::{ExperimentError, SequenceError};
use crate::io::{AudioPlayer, Display, InputSource};
use crate::layout;
use crate::sequence::Sequence;
use crate::session::Session;
use crate::state::{TrialMode, seen};

/// A fixed worked example; never randomised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Demo {
    pub section: Section,
    pub letters: [Letter; 10],
    pub mask: &'static str,
}

pub const DEMO_1: Demo = {
    use Letter::*;
    Demo {
        section: Section::Train1,
        letters: [G, H, G, P, W, T, W, T, C, T],
        mask: "0010001101",
    }
};

pub const DEMO_2: Demo = {
    use Letter::*;
    Demo {
        section: Section::Train2,
        letters: [W, C, G, C, K, P, K, H, Q, H],
        mask: "0001001001",
    }
};

impl Demo {
    pub fn sequence(&self, lag: usize) -> Result<Sequence, SequenceError> {
        Sequence::from_mask(lag, &self.letters, self.mask)
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
    pub fn run_demo(&mut self, demo: &Demo) -> Result<usize, ExperimentError> {
        let mode = TrialMode::for_section(demo.section);
        let sequence = demo.sequence(self.config.n_back)?;
        let letters = sequence.stimuli();
        let count = sequence.len();
        for mut trial in sequence.trials {
            self.run_trial(mode, &mut trial, &letters)?;
            self.record(trial, demo.section);
        }
        Ok(count)
    }

    /// One correction screen per miss, then continue on the proceed key
    pub(crate) fn explain(
        &mut self,
        mode: TrialMode,
        trial: &Trial,
        history: &[Letter],
    ) -> Result<(), ExperimentError> {
        let keys = self.config.keys;
        let lag = self.config.n_back;

        for item in layout::history_row(seen(history, trial.index)) {
            self.display.draw(item);
        }
        self.display.draw(layout::slot_box(trial.index));
        for cue in layout::cues(&keys) {
            self.display.draw(cue);
        }

        match mode {
            TrialMode::FullScaffold => {
                self.display.draw(layout::letter(trial.stimulus));
                self.display.draw(layout::incorrect_notice(&keys));
            }
            _ => {
                self.display
                    .draw(layout::centre_label(trial.feedback().label()));
                self.display.draw(layout::move_on_hint(&keys));
            }
        }

        if trial.is_target {
            if let Some(back) = trial.index.checked_sub(lag) {
                self.display.draw(layout::slot_box(back));
            }
        }
        let expected = trial.expected_response();
        self.display.draw(layout::cue_box(expected));
        if trial.observed.is_some() {
            self.display.draw(layout::explanation(expected, &keys, lag));
        }

        self.display.present()?;
        self.wait_proceed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demos_satisfy_the_lag_constraint() {
        for demo in [DEMO_1, DEMO_2] {
            let seq = demo.sequence(2).expect("valid demo");
            assert_eq!(seq.len(), 10);
            assert_eq!(seq.stimuli(), demo.letters.to_vec());
        }
        assert_eq!(DEMO_1.sequence(2).unwrap().target_count(), 4);
        assert_eq!(DEMO_2.sequence(2).unwrap().target_count(), 3);
    }

    #[test]
    fn demos_only_fit_their_authored_lag() {
        assert!(DEMO_1.sequence(3).is_err());
    }
}
