//! Screen geometry shared by the test and training runners.
//! Coordinates are centre-origin pixels with y pointing up.

use nback_core::stimulus::{RED, WHITE, YELLOW};
use nback_core::{Key, Letter, Placed, ResponseKey, Shape};

use crate::config::KeyMap;

const HISTORY_X0: f32 = -270.0;
const HISTORY_Y: f32 = 200.0;
const HISTORY_SPACING: f32 = 60.0;
const CUE_X: f32 = 300.0;
const CUE_Y: f32 = -250.0;
const EXPLANATION_X: f32 = 180.0;
const EXPLANATION_Y: f32 = -180.0;

pub fn fixation() -> Placed {
    Shape::text("+", 40.0, WHITE).at((0.0, 0.0))
}

pub fn letter(l: Letter) -> Placed {
    Shape::text(l.to_string(), 60.0, WHITE).at((0.0, 0.0))
}

pub fn centre_label(text: &str) -> Placed {
    Shape::text(text, 40.0, WHITE).at((0.0, 0.0))
}

pub fn history_slot(index: usize) -> (f32, f32) {
    (HISTORY_X0 + index as f32 * HISTORY_SPACING, HISTORY_Y)
}

/// Letters shown so far along the top of the screen
pub fn history_row(letters: &[Letter]) -> impl Iterator<Item = Placed> + '_ {
    letters
        .iter()
        .enumerate()
        .map(|(i, l)| Shape::text(l.to_string(), 40.0, WHITE).at(history_slot(i)))
}

pub fn slot_box(index: usize) -> Placed {
    Shape::outline(50.0, 60.0, YELLOW).at(history_slot(index))
}

fn cue_x(response: ResponseKey) -> f32 {
    match response {
        ResponseKey::Match => CUE_X,
        ResponseKey::Differ => -CUE_X,
    }
}

pub fn key_name(key: Key) -> String {
    match key {
        Key::Char(c) => c.to_ascii_uppercase().to_string(),
        other => other.to_string().to_uppercase(),
    }
}

/// Response reminders in the bottom corners
pub fn cues(keys: &KeyMap) -> [Placed; 2] {
    [ResponseKey::Differ, ResponseKey::Match].map(|r| {
        let word = match r {
            ResponseKey::Match => "Match",
            ResponseKey::Differ => "Differ",
        };
        let text = format!("{}\n{word}", key_name(keys.key_for(r)));
        Shape::text(text, 30.0, WHITE).at((cue_x(r), CUE_Y))
    })
}

pub fn cue_box(response: ResponseKey) -> Placed {
    Shape::outline(140.0, 60.0, YELLOW).at((cue_x(response), CUE_Y))
}

pub fn lag_word(lag: usize) -> String {
    match lag {
        1 => "one step".into(),
        2 => "two steps".into(),
        3 => "three steps".into(),
        n => format!("{n} steps"),
    }
}

/// Sentence naming the correct key, placed beside its cue
pub fn explanation(response: ResponseKey, keys: &KeyMap, lag: usize) -> Placed {
    let relation = match response {
        ResponseKey::Match => "the same as",
        ResponseKey::Differ => "different from",
    };
    let text = format!(
        "This letter is {relation} {} ago, so the correct answer is '{}'.",
        lag_word(lag),
        keys.key_for(response)
    );
    let x = cue_x(response).signum() * EXPLANATION_X;
    Shape::Text {
        content: text,
        size: 22.0,
        color: WHITE,
        wrap_width: Some(500.0),
        align: nback_core::Align::Center,
    }
    .at((x, EXPLANATION_Y))
}

pub fn incorrect_notice(keys: &KeyMap) -> Placed {
    let text = format!("Incorrect\nPress '{}' to move on", key_name(keys.proceed));
    Shape::text(text, 40.0, RED).at((0.0, -80.0))
}

pub fn move_on_hint(keys: &KeyMap) -> Placed {
    let text = format!("Please press [{}] to move on.", key_name(keys.proceed));
    Shape::text(text, 20.0, WHITE).at((0.0, -80.0))
}

pub fn page(text: &str) -> Placed {
    Shape::paragraph(text, 28.0, 800.0).at((0.0, 0.0))
}

pub fn prompt(text: &str) -> Placed {
    Shape::text(text, 22.0, WHITE).at((0.0, -300.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_slots_step_left_to_right() {
        assert_eq!(history_slot(0), (-270.0, 200.0));
        assert_eq!(history_slot(9), (270.0, 200.0));
    }

    #[test]
    fn explanation_sits_beside_its_cue() {
        let keys = KeyMap::default();
        let m = explanation(ResponseKey::Match, &keys, 2);
        assert_eq!(m.pos, (180.0, -180.0));
        assert_eq!(
            m.shape.text_content(),
            Some("This letter is the same as two steps ago, so the correct answer is 'k'.")
        );
        let d = explanation(ResponseKey::Differ, &keys, 2);
        assert_eq!(d.pos, (-180.0, -180.0));
    }

    #[test]
    fn cues_use_bound_keys() {
        let [differ, matching] = cues(&KeyMap::default());
        assert_eq!(differ.shape.text_content(), Some("D\nDiffer"));
        assert_eq!(matching.shape.text_content(), Some("K\nMatch"));
        assert_eq!(key_name(Key::Space), "SPACE");
    }
}
