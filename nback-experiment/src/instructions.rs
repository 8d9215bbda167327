use nback_core::{Condition, Section};

use crate::config::KeyMap;
use crate::layout::{key_name, lag_word};

/// An instruction screen; the last one of a section asks for readiness
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub text: String,
    pub ready_prompt: bool,
}

impl Page {
    fn info(text: String) -> Self {
        Self {
            text,
            ready_prompt: false,
        }
    }

    fn ready(text: String) -> Self {
        Self {
            text,
            ready_prompt: true,
        }
    }

    pub fn prompt(&self, keys: &KeyMap) -> String {
        let key = key_name(keys.proceed);
        if self.ready_prompt {
            format!("Press [{key}] when you are ready to begin.")
        } else {
            format!("Press [{key}] to move on.")
        }
    }
}

pub fn welcome() -> Page {
    Page::info(
        "Welcome! This study has three parts.\n\n\
         - First, you will see or hear a sequence of letters and determine any letters that are repeated.\n\
         - Next, you will read several passages and answer some questions about them.\n\
         - Finally, you will repeat the letter sequence task."
            .to_string(),
    )
}

pub fn closing() -> Page {
    Page::info("Thank you! This part of the study is complete.".to_string())
}

fn reminder(perceived: &str, keys: &KeyMap, lag: usize) -> String {
    format!(
        "- {} if the current letter is the SAME as the one {perceived} {} back\n\
         - {} if it is DIFFERENT",
        key_name(keys.respond_match),
        lag_word(lag),
        key_name(keys.respond_differ),
    )
}

/// Instruction pages shown before `section`
pub fn section_pages(section: Section, condition: &Condition, keys: &KeyMap, lag: usize) -> Vec<Page> {
    let (perceive, perceived) = if condition.is_visual() {
        ("see", "seen")
    } else {
        ("hear", "heard")
    };
    let remind = reminder(perceived, keys, lag);
    match section {
        Section::Train1 => vec![
            Page::info(format!(
                "Before we begin, let's practice the letter sequence task.\n\n\
                 In this task, you will {perceive} a series of letters one-by-one.\n\n\
                 Your goal is to remember the letter sequence and press:\n{remind}"
            )),
            Page::info(
                "In this practice round, you will see the letters at the top of the screen to help show you the letter sequence.\n\n\
                 The current letter will be highlighted, and if there's a match, the matching earlier letter will be highlighted too.\n\n\
                 You'll get feedback after each answer. If you're wrong, it will explain why."
                    .to_string(),
            ),
            Page::ready(format!("Remember, your goal is to press:\n{remind}")),
        ],
        Section::Train2 => vec![
            Page::info(
                "Great job! You've learned the basic setup of the task.\n\n\
                 Next, you'll have another practice round. In this round:\n\
                 - The letter sequence at the top will no longer be shown.\n\
                 - You'll have limited time to respond, so please respond as quickly and accurately as possible.\n\
                 - You'll still receive feedback, but the letter sequence, highlight boxes and explanation will only appear if your answer is incorrect."
                    .to_string(),
            ),
            Page::ready(format!("Remember, your goal is to press:\n{remind}")),
        ],
        Section::Pre => vec![
            Page::info(
                "You are ready to begin the study!\n\n\
                 The letter list and highlights will not appear in this test session."
                    .to_string(),
            ),
            Page::ready(format!(
                "Remember, press:\n{remind}\n\
                 Respond as quickly and accurately as you can. You'll receive short feedback after each response."
            )),
        ],
        Section::Post => vec![Page::ready(format!(
            "You will complete the letter task again.\nRemember, press:\n{remind}\n\
             Respond as quickly and accurately as you can. You'll receive short feedback after each response."
        ))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modality_words_follow_condition() {
        let keys = KeyMap::default();
        let visual = section_pages(Section::Train1, &Condition::assign(1), &keys, 2);
        let auditory = section_pages(Section::Train1, &Condition::assign(3), &keys, 2);
        assert!(visual[0].text.contains("you will see a series"));
        assert!(auditory[0].text.contains("you will hear a series"));
        assert!(auditory[2].text.contains("the one heard two steps back"));
    }

    #[test]
    fn each_section_ends_on_a_ready_page() {
        let keys = KeyMap::default();
        let condition = Condition::assign(2);
        let mut section = Some(Section::Train1);
        while let Some(s) = section {
            let pages = section_pages(s, &condition, &keys, 2);
            let (last, rest) = pages.split_last().expect("pages");
            assert!(last.ready_prompt);
            assert!(rest.iter().all(|p| !p.ready_prompt));
            section = s.next();
        }
        assert_eq!(
            welcome().prompt(&keys),
            "Press [SPACE] to move on."
        );
    }
}
