use nback_core::{Key, ResponseKey};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ExperimentError;
use crate::sequence::SequenceSpec;
use crate::training::{DEMO_1, DEMO_2};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub n_back: usize,
    pub blocks: usize,
    pub trials_per_block: usize,
    pub target_quota: usize,
    pub fixation_ms: u64,
    pub response_window_ms: u64,
    pub feedback_ms: u64,
    pub keys: KeyMap,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            n_back: 2,
            blocks: 1,
            trials_per_block: 10,
            target_quota: 3,
            fixation_ms: 1000,
            response_window_ms: 2000,
            feedback_ms: 1000,
            keys: KeyMap::default(),
        }
    }
}

impl ExperimentConfig {
    /// Parses a JSON override; missing fields keep their defaults.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Fails on clashing keys and on lags the demo sequences do not fit
    pub fn validate(&self) -> Result<(), ExperimentError> {
        let k = &self.keys;
        let keys = [k.respond_match, k.respond_differ, k.proceed, k.abort];
        for (i, a) in keys.iter().enumerate() {
            if *a == Key::Escape {
                return Err(ExperimentError::Config(
                    "escape always aborts and cannot be bound".into(),
                ));
            }
            if keys[i + 1..].contains(a) {
                return Err(ExperimentError::Config(format!("key {a} is bound twice")));
            }
        }
        self.sequence_spec().validate()?;
        DEMO_1.sequence(self.n_back)?;
        DEMO_2.sequence(self.n_back)?;
        Ok(())
    }

    pub fn sequence_spec(&self) -> SequenceSpec {
        SequenceSpec {
            lag: self.n_back,
            blocks: self.blocks,
            trials_per_block: self.trials_per_block,
            target_quota: self.target_quota,
        }
    }

    pub fn fixation(&self) -> Duration {
        Duration::from_millis(self.fixation_ms)
    }

    pub fn response_window(&self) -> Duration {
        Duration::from_millis(self.response_window_ms)
    }

    pub fn feedback(&self) -> Duration {
        Duration::from_millis(self.feedback_ms)
    }
}

/// Key bindings; `abort` ends the session from any key wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyMap {
    pub respond_match: Key,
    pub respond_differ: Key,
    pub proceed: Key,
    pub abort: Key,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            respond_match: Key::Char('k'),
            respond_differ: Key::Char('d'),
            proceed: Key::Space,
            abort: Key::Char('9'),
        }
    }
}

impl KeyMap {
    pub fn response_keys(&self) -> [Key; 2] {
        [self.respond_match, self.respond_differ]
    }

    pub fn response_for(&self, key: Key) -> Option<ResponseKey> {
        if key == self.respond_match {
            Some(ResponseKey::Match)
        } else if key == self.respond_differ {
            Some(ResponseKey::Differ)
        } else {
            None
        }
    }

    pub fn key_for(&self, response: ResponseKey) -> Key {
        match response {
            ResponseKey::Match => self.respond_match,
            ResponseKey::Differ => self.respond_differ,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SequenceError;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ExperimentConfig::from_json(r#"{ "blocks": 5, "feedback_ms": 500 }"#)
            .expect("valid json");
        assert_eq!(config.blocks, 5);
        assert_eq!(config.feedback(), Duration::from_millis(500));
        assert_eq!(config.n_back, 2);
        assert_eq!(config.keys, KeyMap::default());
    }

    #[test]
    fn rejects_duplicate_bindings() {
        let mut config = ExperimentConfig::default();
        config.keys.abort = Key::Char('k');
        assert!(matches!(config.validate(), Err(ExperimentError::Config(_))));
    }

    #[test]
    fn rejects_escape_bindings() {
        let mut config = ExperimentConfig::default();
        config.keys.proceed = Key::Escape;
        assert!(matches!(config.validate(), Err(ExperimentError::Config(_))));

        let mut config = ExperimentConfig::default();
        config.keys.respond_differ = Key::Escape;
        assert!(matches!(config.validate(), Err(ExperimentError::Config(_))));
    }

    #[test]
    fn rejects_lags_the_demos_cannot_run() {
        let config = ExperimentConfig {
            n_back: 3,
            ..ExperimentConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ExperimentError::Sequence(SequenceError::Constraint { .. }))
        ));
        assert!(ExperimentConfig::default().validate().is_ok());
    }

    #[test]
    fn maps_keys_to_responses() {
        let keys = KeyMap::default();
        assert_eq!(keys.response_for(Key::Char('k')), Some(ResponseKey::Match));
        assert_eq!(keys.response_for(Key::Space), None);
        assert_eq!(keys.key_for(ResponseKey::Differ), Key::Char('d'));
    }
}
