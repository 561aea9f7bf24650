use derive_more::{From, TryInto};

#[derive(Debug, Clone, From, TryInto)]
pub enum Message {
    Composer(ui_messages::Composer),
    ErrorDialog(ui_messages::ErrorDialog),
}

pub mod ui_messages {
    use engine::session::{JobOutcome, PromptMode};
    use iced::widget::text_editor;

    #[derive(Debug, Clone)]
    pub enum Composer {
        ModeSelected(PromptMode),
        EditPrompt(text_editor::Action),
        EnhanceToggled(bool),
        Translate,
        Generate,
        JobFinished(JobOutcome),
        ToggleTranslatedPanel,
        ToggleEnhancedPanel,
        Download,
    }

    #[derive(Debug, Clone)]
    pub enum ErrorDialog {
        Dismiss,
        CopyDetails,
    }
}
