//! The session context and the fixed section plan.

use nback_core::{Condition, Section, Trial};
use nback_timing::Timer;
use rand::Rng;
use tracing::{info, warn};

use crate::config::{ExperimentConfig, KeyMap};
use crate::error::ExperimentError;
use crate::instructions::{self, Page};
use crate::io::{AudioPlayer, Display, InputSource};
use crate::layout;
use crate::recorder::ResponseRecorder;
use crate::training::{DEMO_1, DEMO_2};

/// Runs between the pre- and post-test, where the reading task takes place
pub trait Interlude {
    fn run(
        &mut self,
        display: &mut dyn Display,
        input: &mut dyn InputSource,
        keys: &KeyMap,
    ) -> Result<(), ExperimentError>;
}

/// Shows a pause screen until the participant continues
#[derive(Debug, Default, Clone, Copy)]
pub struct BreakScreen;

impl Interlude for BreakScreen {
    fn run(
        &mut self,
        display: &mut dyn Display,
        input: &mut dyn InputSource,
        keys: &KeyMap,
    ) -> Result<(), ExperimentError> {
        display.draw(layout::page(
            "Take a short break. The letter task will start again afterwards.",
        ));
        display.draw(layout::prompt(&format!(
            "Press [{}] to continue.",
            layout::key_name(keys.proceed)
        )));
        display.present()?;
        input.wait_keys(&[keys.proceed], None)?;
        Ok(())
    }
}

/// Everything a session needs, passed explicitly instead of living in globals
pub struct Session<D, A, I, T, R>
where
    D: Display,
    A: AudioPlayer,
    I: InputSource,
    T: Timer,
    R: Rng,
{
    pub display: D,
    pub audio: A,
    pub input: I,
    pub timer: T,
    pub rng: R,
    pub config: ExperimentConfig,
    pub condition: Condition,
    recorder: ResponseRecorder,
}

impl<D, A, I, T, R> Session<D, A, I, T, R>
where
    D: Display,
    A: AudioPlayer,
    I: InputSource,
    T: Timer,
    R: Rng,
{
    pub fn new(
        config: ExperimentConfig,
        condition: Condition,
        display: D,
        audio: A,
        input: I,
        timer: T,
        rng: R,
    ) -> Result<Self, ExperimentError> {
        config.validate()?;
        Ok(Self {
            display,
            audio,
            input,
            timer,
            rng,
            config,
            condition,
            recorder: ResponseRecorder::new(),
        })
    }

    pub fn recorder(&self) -> &ResponseRecorder {
        &self.recorder
    }

    pub fn into_recorder(self) -> ResponseRecorder {
        self.recorder
    }

    /// Welcome, both demos, pre-test, interlude, post-test, closing screen.
    ///
    /// On error the recorder keeps every trial finished so far.
    pub fn run(&mut self, interlude: &mut dyn Interlude) -> Result<(), ExperimentError> {
        info!(
            participant = self.condition.participant_id,
            condition = self.condition.label(),
            "session started"
        );
        self.show_page(&instructions::welcome())?;

        let mut section = Some(Section::default());
        while let Some(current) = section {
            if current == Section::Post {
                info!("interlude started");
                interlude.run(&mut self.display, &mut self.input, &self.config.keys)?;
            }
            self.run_section(current)?;
            section = current.next();
        }

        self.show_page(&instructions::closing())?;
        info!(records = self.recorder.len(), "session complete");
        Ok(())
    }

    /// Instruction pages followed by the section's trials
    pub fn run_section(&mut self, section: Section) -> Result<usize, ExperimentError> {
        let pages = instructions::section_pages(
            section,
            &self.condition,
            &self.config.keys,
            self.config.n_back,
        );
        for page in &pages {
            self.show_page(page)?;
        }
        let trials = match section {
            Section::Train1 => self.run_demo(&DEMO_1)?,
            Section::Train2 => self.run_demo(&DEMO_2)?,
            Section::Pre | Section::Post => self.run_test_block(section)?,
        };
        info!(section = %section, trials, "section complete");
        Ok(trials)
    }

    pub(crate) fn show_page(&mut self, page: &Page) -> Result<(), ExperimentError> {
        self.display.draw(layout::page(&page.text));
        self.display
            .draw(layout::prompt(&page.prompt(&self.config.keys)));
        self.display.present()?;
        self.wait_proceed()
    }

    pub(crate) fn wait_proceed(&mut self) -> Result<(), ExperimentError> {
        self.input.wait_keys(&[self.config.keys.proceed], None)?;
        Ok(())
    }

    pub(crate) fn record(&mut self, trial: Trial, section: Section) {
        let record = trial.into_record(
            self.condition.participant_id,
            self.condition.label(),
            section,
        );
        self.recorder.append(record);
    }

    pub(crate) fn play(&mut self, trial: &Trial) {
        if let Err(e) = self.audio.play(trial.stimulus) {
            warn!(
                letter = %trial.stimulus,
                trial = trial.index + 1,
                error = %e,
                "audio playback failed, continuing without stimulus"
            );
        }
    }
}
