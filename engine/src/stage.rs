use std::{fmt, future::Future};

use color_eyre::Result;
use log::warn;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Step {
    #[strum(to_string = "translation")]
    Translate,
    #[strum(to_string = "prompt enhancement")]
    Enhance,
    #[strum(to_string = "image generation")]
    Generate,
}

/// A failure that was recovered from, to be shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub step: Step,
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error during {}: {}", self.step, self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageOutcome<T> {
    pub value: T,
    pub notice: Option<Notice>,
}

impl<T> StageOutcome<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            notice: None,
        }
    }

    pub fn failed(&self) -> bool {
        self.notice.is_some()
    }
}

/// Awaits `fut`. An error never escapes: it becomes a notice and `fallback`
/// is returned in place of the value.
pub async fn with_fallback<T>(
    step: Step,
    fut: impl Future<Output = Result<T>>,
    fallback: T,
) -> StageOutcome<T> {
    match fut.await {
        Ok(value) => StageOutcome::ok(value),
        Err(e) => {
            warn!("{step} failed, falling back: {e:?}");
            StageOutcome {
                value: fallback,
                notice: Some(Notice {
                    step,
                    message: format!("{e:#}"),
                }),
            }
        }
    }
}
