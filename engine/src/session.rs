use strum::{Display, EnumIter};

use crate::{
    config::Config,
    download::Download,
    image_model::Image,
    stage::{Notice, StageOutcome, Step},
};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, clap::ValueEnum,
)]
pub enum PromptMode {
    /// Text in the user's language, translated before use
    #[default]
    #[strum(to_string = "source language")]
    #[value(name = "source")]
    SourceLanguage,
    /// Text already in the language the image model expects
    #[strum(to_string = "target language")]
    #[value(name = "target")]
    TargetLanguage,
}

impl PromptMode {
    pub fn label(&self, config: &Config) -> String {
        match self {
            PromptMode::SourceLanguage => format!("{} (auto-translate)", config.source_language),
            PromptMode::TargetLanguage => format!("{} (direct input)", config.target_language),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingPrompt,
    PromptReady,
    ReadyToGenerate,
    ImageShown,
}

/// How far a user action should push the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    Prompt,
    Image,
}

/// One network call the session is waiting for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub step: Step,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Translated(StageOutcome<String>),
    Enhanced(StageOutcome<String>),
    Generated(StageOutcome<Option<Image>>),
}

impl JobOutcome {
    pub fn step(&self) -> Step {
        match self {
            JobOutcome::Translated(_) => Step::Translate,
            JobOutcome::Enhanced(_) => Step::Enhance,
            JobOutcome::Generated(_) => Step::Generate,
        }
    }
}

/// The user inputs plus every result derived from them. Derived results are
/// dropped whenever an input they depend on changes. Inputs are locked while
/// a job is running.
#[derive(Debug, Clone, Default)]
pub struct Session {
    mode: PromptMode,
    input: String,
    enhance: bool,
    translated: Option<String>,
    enhanced: Option<String>,
    image: Option<Image>,
    running: Option<Step>,
    goal: Option<Goal>,
    notices: Vec<Notice>,
    /// Steps whose stored result is only the fallback. The next explicit
    /// start runs them again.
    fell_back: Vec<Step>,
}

impl Session {
    pub fn new(mode: PromptMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> PromptMode {
        self.mode
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn enhance(&self) -> bool {
        self.enhance
    }

    pub fn translated(&self) -> Option<&str> {
        self.translated.as_deref()
    }

    pub fn enhanced(&self) -> Option<&str> {
        self.enhanced.as_deref()
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn running(&self) -> Option<Step> {
        self.running
    }

    pub fn is_busy(&self) -> bool {
        self.running.is_some()
    }

    pub fn set_mode(&mut self, mode: PromptMode) {
        if self.is_busy() || mode == self.mode {
            return;
        }
        self.mode = mode;
        self.reset_derived();
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        let input = input.into();
        if self.is_busy() || input == self.input {
            return;
        }
        self.input = input;
        self.reset_derived();
    }

    pub fn set_enhance(&mut self, enhance: bool) {
        if self.is_busy() || enhance == self.enhance {
            return;
        }
        self.enhance = enhance;
        self.enhanced = None;
        self.image = None;
        self.fell_back.retain(|s| *s != Step::Enhance);
    }

    fn reset_derived(&mut self) {
        self.translated = None;
        self.enhanced = None;
        self.image = None;
        self.notices.clear();
        self.fell_back.clear();
    }

    /// Drops results that stand in for a failed step, and everything built
    /// on top of them.
    fn forget_fallbacks(&mut self) {
        for step in std::mem::take(&mut self.fell_back) {
            match step {
                Step::Translate => {
                    self.translated = None;
                    self.enhanced = None;
                }
                Step::Enhance => self.enhanced = None,
                Step::Generate => {}
            }
            self.image = None;
        }
    }

    /// The prompt as far as it has been processed.
    pub fn current_prompt(&self) -> Option<&str> {
        if self.input.trim().is_empty() {
            return None;
        }

        let base = match self.mode {
            PromptMode::SourceLanguage => self.translated.as_deref()?,
            PromptMode::TargetLanguage => self.input.as_str(),
        };

        if self.enhance {
            Some(self.enhanced.as_deref().unwrap_or(base))
        } else {
            Some(base)
        }
    }

    pub fn state(&self) -> SessionState {
        if self.input.trim().is_empty()
            || (self.mode == PromptMode::SourceLanguage && self.translated.is_none())
        {
            SessionState::AwaitingPrompt
        } else if self.enhance && self.enhanced.is_none() {
            SessionState::PromptReady
        } else if self.image.is_some() {
            SessionState::ImageShown
        } else {
            SessionState::ReadyToGenerate
        }
    }

    pub fn download(&self) -> Option<Download> {
        self.image.as_ref().map(|img| Download::png(img.data.clone()))
    }

    /// Starts working towards `goal`. Returns the first job to run, or None
    /// if there is nothing to do or a job is already running. Steps that
    /// fell back last time are run again.
    pub fn start(&mut self, goal: Goal) -> Option<Job> {
        if self.is_busy() {
            return None;
        }
        self.forget_fallbacks();
        self.notices.clear();
        self.goal = Some(goal);
        self.advance()
    }

    /// Applies the result of the running job and returns the next one on the
    /// way to the current goal. Outcomes for any other step are ignored.
    pub fn finish(&mut self, outcome: JobOutcome) -> Option<Job> {
        if self.running != Some(outcome.step()) {
            return None;
        }
        self.running = None;

        match outcome {
            JobOutcome::Translated(StageOutcome { value, notice }) => {
                self.translated = Some(value);
                self.note(notice);
            }
            JobOutcome::Enhanced(StageOutcome { value, notice }) => {
                self.enhanced = Some(value);
                self.note(notice);
            }
            JobOutcome::Generated(StageOutcome { value, notice }) => {
                self.image = value;
                self.notices.extend(notice);
                self.goal = None;
            }
        }

        self.advance()
    }

    fn note(&mut self, notice: Option<Notice>) {
        if let Some(notice) = notice {
            self.fell_back.push(notice.step);
            self.notices.push(notice);
        }
    }

    fn advance(&mut self) -> Option<Job> {
        let job = self.goal.and_then(|goal| self.next_job(goal));
        match &job {
            Some(job) => self.running = Some(job.step),
            None => self.goal = None,
        }
        job
    }

    fn next_job(&self, goal: Goal) -> Option<Job> {
        if self.input.trim().is_empty() {
            return None;
        }

        let base = match (self.mode, &self.translated) {
            (PromptMode::SourceLanguage, None) => {
                return Some(job(Step::Translate, &self.input));
            }
            (PromptMode::SourceLanguage, Some(translated)) => translated,
            (PromptMode::TargetLanguage, _) => &self.input,
        };

        let prompt = match (self.enhance, &self.enhanced) {
            (true, None) => return Some(job(Step::Enhance, base)),
            (true, Some(enhanced)) => enhanced,
            (false, _) => base,
        };

        match goal {
            Goal::Prompt => None,
            Goal::Image => Some(job(Step::Generate, prompt)),
        }
    }
}

fn job(step: Step, prompt: &str) -> Job {
    Job {
        step,
        prompt: prompt.to_string(),
    }
}
