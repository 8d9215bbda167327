use crate::{Letter, Section};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Trial state machine stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialState {
    Fixation,
    Stimulus,
    AwaitResponse,
    Feedback,
    Explanation,
    Complete,
}

/// Physical keys the session listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Space,
    Enter,
    Escape,
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Space => f.write_str("space"),
            Key::Enter => f.write_str("return"),
            Key::Escape => f.write_str("escape"),
        }
    }
}

/// The two-alternative response of the n-back task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKey {
    Match,
    Differ,
}

/// Feedback shown after a response window closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect,
    TooSlow,
}

impl Feedback {
    pub fn label(&self) -> &'static str {
        match self {
            Feedback::Correct => "Correct",
            Feedback::Incorrect => "Incorrect",
            Feedback::TooSlow => "Too slow",
        }
    }
}

/// One n-back trial; response fields are filled in as the trial runs
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub index: usize,
    pub stimulus: Letter,
    pub is_target: bool,
    pub observed: Option<ResponseKey>,
    pub reaction_time: Option<Duration>,
}

impl Trial {
    pub fn new(index: usize, stimulus: Letter, is_target: bool) -> Self {
        Self {
            index,
            stimulus,
            is_target,
            observed: None,
            reaction_time: None,
        }
    }

    pub fn expected_response(&self) -> ResponseKey {
        if self.is_target {
            ResponseKey::Match
        } else {
            ResponseKey::Differ
        }
    }

    pub fn respond(&mut self, key: ResponseKey, reaction_time: Duration) {
        self.observed = Some(key);
        self.reaction_time = Some(reaction_time);
    }

    /// `None` when the response window closed without a key
    pub fn is_correct(&self) -> Option<bool> {
        self.observed.map(|k| k == self.expected_response())
    }

    pub fn feedback(&self) -> Feedback {
        match self.is_correct() {
            None => Feedback::TooSlow,
            Some(true) => Feedback::Correct,
            Some(false) => Feedback::Incorrect,
        }
    }

    /// Freezes the trial into its exported form
    pub fn into_record(self, participant_id: u32, condition: &str, section: Section) -> TrialRecord {
        let correct = self.is_correct();
        TrialRecord {
            participant_id,
            condition: condition.to_string(),
            section,
            trial: self.index + 1,
            stim: self.stimulus,
            is_target: self.is_target,
            response: self.observed,
            rt: self.reaction_time.map(|d| d.as_secs_f64()),
            correct,
        }
    }
}

/// Recorded result per trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    #[serde(rename = "ppt_ID")]
    pub participant_id: u32,
    pub condition: String,
    pub section: Section,
    pub trial: usize,
    pub stim: Letter,
    pub is_target: bool,
    pub response: Option<ResponseKey>,
    pub rt: Option<f64>,
    pub correct: Option<bool>,
}
