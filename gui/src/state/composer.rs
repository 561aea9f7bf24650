use std::path::PathBuf;

use color_eyre::{Result, eyre::eyre};
use engine::{
    config::Config,
    session::{Goal, Job, PromptMode, Session, SessionState},
    stage::Step,
};
use iced::{
    Color, Element, Length, Task,
    widget::{
        self, button, column, container, image, radio, row, space, text, text_editor, toggler,
    },
};
use log::debug;
use strum::IntoEnumIterator;

use crate::{
    APP_NAME, TryIntoExt, bold_text,
    context::Context,
    elem_list,
    message::{Message, ui_messages::Composer as MyMessage},
    state::{State, StateCommand, cmd},
    top_level_container,
};

/// The whole form: prompt entry, optional translation and enhancement,
/// generation and download.
#[derive(Debug, Clone)]
pub struct Composer {
    session: Session,
    editor: text_editor::Content,
    show_translated: bool,
    show_enhanced: bool,
    image: Option<image::Handle>,
    saved_to: Option<PathBuf>,
}

impl Composer {
    pub fn new() -> Self {
        Self {
            session: Session::new(PromptMode::default()),
            editor: text_editor::Content::new(),
            show_translated: false,
            show_enhanced: false,
            image: None,
            saved_to: None,
        }
    }

    fn run(&self, job: Option<Job>, ctx: &Context) -> Result<StateCommand> {
        let Some(job) = job else {
            return cmd::none();
        };
        debug!("starting {}", job.step);
        let fut = ctx.pipeline()?.run(job);
        cmd::task(Task::perform(fut, |outcome| {
            MyMessage::JobFinished(outcome).into()
        }))
    }

    /// Rebuilds the rendered image from the session after a generation.
    fn refresh_image(&mut self) {
        self.image = self
            .session
            .image()
            .map(|img| image::Handle::from_bytes(img.data.clone()));
        self.saved_to = None;
    }

    /// Forgets the rendered image once an input change dropped it.
    fn drop_stale_image(&mut self) {
        if self.session.image().is_none() {
            self.image = None;
            self.saved_to = None;
        }
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl State for Composer {
    fn update(&mut self, event: Message, ctx: &mut Context) -> Result<StateCommand> {
        use MyMessage::*;
        match event.try_into_ex()? {
            ModeSelected(mode) => {
                self.session.set_mode(mode);
                self.drop_stale_image();
                cmd::none()
            }
            EditPrompt(action) => {
                if self.session.is_busy() {
                    return cmd::none();
                }
                let is_edit = action.is_edit();
                self.editor.perform(action);
                if is_edit {
                    self.session.set_input(self.editor.text().trim_end());
                    self.drop_stale_image();
                }
                cmd::none()
            }
            EnhanceToggled(enabled) => {
                self.session.set_enhance(enabled);
                self.drop_stale_image();
                if self.session.state() == SessionState::PromptReady {
                    self.show_enhanced = true;
                    let job = self.session.start(Goal::Prompt);
                    self.drop_stale_image();
                    self.run(job, ctx)
                } else {
                    cmd::none()
                }
            }
            Translate => {
                self.show_translated = true;
                let job = self.session.start(Goal::Prompt);
                self.drop_stale_image();
                self.run(job, ctx)
            }
            Generate => {
                let job = self.session.start(Goal::Image);
                self.drop_stale_image();
                self.run(job, ctx)
            }
            JobFinished(outcome) => {
                let generated = outcome.step() == Step::Generate;
                let next = self.session.finish(outcome);
                if generated {
                    self.refresh_image();
                }
                self.run(next, ctx)
            }
            ToggleTranslatedPanel => {
                self.show_translated = !self.show_translated;
                cmd::none()
            }
            ToggleEnhancedPanel => {
                self.show_enhanced = !self.show_enhanced;
                cmd::none()
            }
            Download => {
                let download = self
                    .session
                    .download()
                    .ok_or(eyre!("There is no image to download yet"))?;
                self.saved_to = Some(download.save_to(&ctx.config.download_dir())?);
                cmd::none()
            }
        }
    }

    fn view<'a>(&'a self, ctx: &'a Context) -> Element<'a, Message> {
        let session = &self.session;
        let busy = session.is_busy();
        let mode = session.mode();

        let mut items = Vec::from(elem_list![
            bold_text(APP_NAME).size(28),
            space().height(10),
            bold_text("Prompt"),
            column(PromptMode::iter().map(|m| {
                radio(m.label(&ctx.config), m, Some(mode), |m| {
                    MyMessage::ModeSelected(m).into()
                })
                .into()
            }))
            .spacing(8),
            text(input_hint(mode, &ctx.config)),
        ]);

        let mut editor = widget::text_editor(&self.editor)
            .placeholder("A red bicycle on a beach at sunset")
            .height(100);
        // no handler means read only
        if !busy {
            editor = editor.on_action(|a| MyMessage::EditPrompt(a).into());
        }
        items.push(editor.into());

        if mode == PromptMode::SourceLanguage {
            let can_translate = !busy && !session.input().trim().is_empty();
            items.push(
                row![
                    space::horizontal(),
                    button("Translate")
                        .on_press_maybe(can_translate.then_some(MyMessage::Translate.into()))
                ]
                .into(),
            );
        }

        if let Some(translated) = session.translated() {
            items.extend(expander(
                format!("Prompt translated to {}", ctx.config.target_language),
                translated,
                self.show_translated,
                MyMessage::ToggleTranslatedPanel,
            ));
        }

        if session.state() != SessionState::AwaitingPrompt {
            let mut enhance = toggler(session.enhance()).label("Enhance the prompt with AI");
            if !busy {
                enhance = enhance.on_toggle(|on| MyMessage::EnhanceToggled(on).into());
            }
            items.push(enhance.into());
        }

        if let Some(enhanced) = session.enhanced() {
            items.extend(expander(
                "Enhanced prompt".into(),
                enhanced,
                self.show_enhanced,
                MyMessage::ToggleEnhancedPanel,
            ));
        }

        if let Some(step) = session.running() {
            items.push(
                text(progress_label(step, &ctx.config))
                    .color(Color::from_rgb(0.2, 0.4, 0.7))
                    .into(),
            );
        }

        for notice in session.notices() {
            items.push(
                container(text(notice.to_string()).color(Color::from_rgb(0.7, 0.1, 0.1)))
                    .padding(10)
                    .width(Length::Fill)
                    .style(|_theme| container::background(Color::from_rgb(1.0, 0.93, 0.93)))
                    .into(),
            );
        }

        let can_generate = !busy && session.current_prompt().is_some();
        items.push(
            row![
                space::horizontal(),
                button("Generate image")
                    .on_press_maybe(can_generate.then_some(MyMessage::Generate.into()))
            ]
            .into(),
        );

        if let Some(handle) = &self.image {
            items.extend(elem_list![
                widget::image(handle).width(Length::Fill),
                text(ctx.config.image_caption()).size(13),
                row![
                    space::horizontal(),
                    button("Download image")
                        .on_press_maybe((!busy).then_some(MyMessage::Download.into()))
                ],
            ]);
            if let Some(path) = &self.saved_to {
                items.push(text(format!("Saved to {}", path.display())).size(13).into());
            }
        }

        top_level_container(
            column(items)
                .spacing(12)
                .width(Length::Fill)
                .height(Length::Fill),
        )
        .into()
    }

    fn clone(&self) -> Box<dyn State> {
        Box::new(Clone::clone(self))
    }
}

fn input_hint(mode: PromptMode, config: &Config) -> String {
    match mode {
        PromptMode::SourceLanguage => {
            format!("Describe the image you want in {}:", config.source_language)
        }
        PromptMode::TargetLanguage => {
            format!("Describe the image in detail in {}:", config.target_language)
        }
    }
}

fn progress_label(step: Step, config: &Config) -> String {
    match step {
        Step::Translate => format!("Translating the prompt to {}...", config.target_language),
        Step::Enhance => "Enhancing the prompt...".into(),
        Step::Generate => "Generating the image...".into(),
    }
}

/// A collapsible panel with a read-only text body.
fn expander<'a>(
    title: String,
    body: &'a str,
    open: bool,
    on_toggle: MyMessage,
) -> Vec<Element<'a, Message>> {
    let marker = if open { "▾" } else { "▸" };
    let mut elems = vec![
        button(text(format!("{marker} {title}")))
            .style(button::text)
            .on_press(on_toggle.into())
            .into(),
    ];
    if open {
        elems.push(
            container(text(body))
                .padding(10)
                .width(Length::Fill)
                .style(|_theme| container::background(Color::from_rgb(0.95, 0.95, 0.95)))
                .into(),
        );
    }
    elems
}
