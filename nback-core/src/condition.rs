//! Counterbalanced condition assignment from the participant id.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// Letter drawn at the centre of the screen
    Visual,
    /// Letter played as an audio clip behind the fixation cross
    Auditory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Difficult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub participant_id: u32,
    /// `participant_id % 4`, kept as-is for file naming
    pub remainder: u32,
    pub modality: Modality,
    pub difficulty: Difficulty,
}

impl Condition {
    /// Remainders 1..=4 map onto the four cells; 0 falls into the fourth.
    pub fn assign(participant_id: u32) -> Self {
        let remainder = participant_id % 4;
        let difficulty = if matches!(remainder, 1 | 3) {
            Difficulty::Easy
        } else {
            Difficulty::Difficult
        };
        let modality = if matches!(remainder, 1 | 2) {
            Modality::Visual
        } else {
            Modality::Auditory
        };
        Self {
            participant_id,
            remainder,
            modality,
            difficulty,
        }
    }

    /// True for ids whose remainder lies outside the 1..=4 assignment scheme
    pub fn is_folded(&self) -> bool {
        self.remainder == 0
    }

    pub fn label(&self) -> &'static str {
        match (self.modality, self.difficulty) {
            (Modality::Visual, Difficulty::Easy) => "visual-easy",
            (Modality::Visual, Difficulty::Difficult) => "visual-difficult",
            (Modality::Auditory, Difficulty::Easy) => "auditory-easy",
            (Modality::Auditory, Difficulty::Difficult) => "auditory-difficult",
        }
    }

    pub fn is_visual(&self) -> bool {
        self.modality == Modality::Visual
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_four_ids_cover_every_cell() {
        let cells: Vec<_> = (1..=4)
            .map(|id| {
                let c = Condition::assign(id);
                (c.modality, c.difficulty)
            })
            .collect();
        assert_eq!(
            cells,
            vec![
                (Modality::Visual, Difficulty::Easy),
                (Modality::Visual, Difficulty::Difficult),
                (Modality::Auditory, Difficulty::Easy),
                (Modality::Auditory, Difficulty::Difficult),
            ]
        );
    }

    #[test]
    fn remainder_zero_folds_into_fourth_cell() {
        let folded = Condition::assign(8);
        assert!(folded.is_folded());
        assert_eq!(folded.label(), "auditory-difficult");
        assert!(!Condition::assign(7).is_folded());
    }

    proptest! {
        #[test]
        fn assignment_depends_only_on_remainder(id in 0u32..1_000_000) {
            let a = Condition::assign(id);
            let b = Condition::assign(id + 4);
            prop_assert_eq!(a.label(), b.label());
            prop_assert_eq!(a, Condition::assign(id));
        }
    }
}
