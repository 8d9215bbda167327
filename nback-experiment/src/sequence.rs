//! Randomised target/non-target letter sequences under an n-back lag.

use nback_core::{Letter, Trial};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::error::SequenceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceSpec {
    pub lag: usize,
    pub blocks: usize,
    pub trials_per_block: usize,
    pub target_quota: usize,
}

impl Default for SequenceSpec {
    fn default() -> Self {
        Self {
            lag: 2,
            blocks: 1,
            trials_per_block: 10,
            target_quota: 3,
        }
    }
}

impl SequenceSpec {
    pub fn validate(&self) -> Result<(), SequenceError> {
        if self.lag == 0 {
            return Err(SequenceError::ZeroLag);
        }
        if self.target_quota > self.trials_per_block {
            return Err(SequenceError::QuotaExceedsBlock {
                quota: self.target_quota,
                trials: self.trials_per_block,
            });
        }
        Ok(())
    }

    /// Lead-in fillers plus every block
    pub fn len(&self) -> usize {
        self.lag + self.blocks * self.trials_per_block
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trials of one run, in presentation order
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub lag: usize,
    pub trials: Vec<Trial>,
}

impl Sequence {
    /// Builds a sequence from hand-authored letters and a `0`/`1` target mask.
    pub fn from_mask(lag: usize, letters: &[Letter], mask: &str) -> Result<Self, SequenceError> {
        if lag == 0 {
            return Err(SequenceError::ZeroLag);
        }
        if mask.chars().count() != letters.len() {
            return Err(SequenceError::MaskLength {
                mask: mask.chars().count(),
                letters: letters.len(),
            });
        }
        let trials = letters
            .iter()
            .zip(mask.chars())
            .enumerate()
            .map(|(i, (&letter, flag))| Trial::new(i, letter, flag == '1'))
            .collect();
        let sequence = Self { lag, trials };
        sequence.validate()?;
        Ok(sequence)
    }

    pub fn flags(&self) -> Vec<bool> {
        self.trials.iter().map(|t| t.is_target).collect()
    }

    pub fn stimuli(&self) -> Vec<Letter> {
        self.trials.iter().map(|t| t.stimulus).collect()
    }

    pub fn target_count(&self) -> usize {
        self.trials.iter().filter(|t| t.is_target).count()
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Checks the lead-in and identity constraints
    pub fn validate(&self) -> Result<(), SequenceError> {
        for (i, trial) in self.trials.iter().enumerate() {
            let ok = match i.checked_sub(self.lag) {
                None => !trial.is_target,
                Some(back) => {
                    let same = self.trials[back].stimulus == trial.stimulus;
                    same == trial.is_target
                }
            };
            if !ok {
                return Err(SequenceError::Constraint { index: i });
            }
        }
        Ok(())
    }
}

/// Generates a full sequence: `lag` random fillers followed by `blocks`
/// shuffled blocks with exactly `target_quota` targets each.
pub fn generate<R: Rng + ?Sized>(
    spec: &SequenceSpec,
    alphabet: &[Letter],
    rng: &mut R,
) -> Result<Sequence, SequenceError> {
    spec.validate()?;
    if alphabet.len() < 2 {
        return Err(SequenceError::AlphabetTooSmall(alphabet.len()));
    }

    let mut flags = vec![false; spec.lag];
    for _ in 0..spec.blocks {
        let mut block: Vec<bool> = (0..spec.trials_per_block)
            .map(|i| i < spec.target_quota)
            .collect();
        block.shuffle(rng);
        flags.extend(block);
    }

    let mut stimuli: Vec<Letter> = Vec::with_capacity(flags.len());
    for (i, &is_target) in flags.iter().enumerate() {
        let letter = match i.checked_sub(spec.lag) {
            None => pick(alphabet, rng)?,
            Some(back) if is_target => stimuli[back],
            Some(back) => {
                // terminates: at most one letter of the alphabet is excluded
                let mut letter = pick(alphabet, rng)?;
                while letter == stimuli[back] {
                    letter = pick(alphabet, rng)?;
                }
                letter
            }
        };
        stimuli.push(letter);
    }

    let trials = stimuli
        .into_iter()
        .zip(flags)
        .enumerate()
        .map(|(i, (letter, is_target))| Trial::new(i, letter, is_target))
        .collect();
    Ok(Sequence {
        lag: spec.lag,
        trials,
    })
}

fn pick<R: Rng + ?Sized>(alphabet: &[Letter], rng: &mut R) -> Result<Letter, SequenceError> {
    alphabet
        .choose(rng)
        .copied()
        .ok_or(SequenceError::AlphabetTooSmall(alphabet.len()))
}
