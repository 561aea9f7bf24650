use std::fmt;

use color_eyre::{Result, eyre::WrapErr as _};
use engine::{
    config::Config,
    credential::{Credential, MissingCredential},
    pipeline::Pipeline,
};
use iced::{
    Element, Font, Length, Task,
    font::{self},
    padding,
    widget::{container, scrollable, text},
};
use log::error;

use crate::{
    context::Context,
    message::Message,
    state::{Composer, Fatal, Modal, State, StateExt},
};

pub mod context;
pub mod message;
pub mod state;

pub const APP_NAME: &str = "Prompt Painter";

pub struct Gui {
    state: Box<dyn State>,
    ctx: Context,
}

impl Gui {
    /// Without a credential the only thing shown is the fatal error page.
    pub fn new(config: Config, credential: Result<Credential, MissingCredential>) -> Self {
        let pipeline = credential
            .map_err(color_eyre::Report::from)
            .and_then(|c| Pipeline::connect(c, &config));

        match pipeline {
            Ok(pipeline) => Gui {
                state: Composer::new().boxed(),
                ctx: Context::new(config, Some(pipeline)),
            },
            Err(e) => {
                error!("Can't start: {e:#}");
                Gui {
                    state: Fatal::new(format!("{e:#}")).boxed(),
                    ctx: Context::new(config, None),
                }
            }
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match self.try_update(message) {
            Ok(task) => task,
            Err(e) => {
                self.state = Modal::error(self.state.clone(), "Error", format!("{e:#}")).boxed();
                Task::none()
            }
        }
    }

    fn try_update(&mut self, message: Message) -> Result<Task<Message>> {
        let cmd = self.state.update(message, &mut self.ctx)?;
        if let Some(new_state) = cmd.transition {
            self.state = new_state;
        }
        Ok(cmd.task.unwrap_or(Task::none()))
    }

    pub fn view(&self) -> Element<'_, Message> {
        self.state.view(&self.ctx)
    }
}

macro_rules! elem_list {
    ($($elems:expr),+ $(,)?) => {
        [$(iced::Element::from($elems)),*]
    };
}
pub(crate) use elem_list;

fn bold_text<'a>(t: impl text::IntoFragment<'a>) -> iced::widget::Text<'a> {
    iced::widget::text(t).font(bold_default_font())
}

fn bold_default_font() -> Font {
    Font {
        weight: font::Weight::Bold,
        ..Font::DEFAULT
    }
}

fn top_level_container<'a, T: Send + 'static>(
    elem: impl Into<Element<'a, T>>,
) -> container::Container<'a, T> {
    container(
        container(scrollable(
            container(elem).padding(padding::all(10).right(20)),
        ))
        .padding(20)
        .max_width(800),
    )
    .center(Length::Fill)
}

pub trait TryIntoExt<T> {
    fn try_into_ex(self) -> color_eyre::Result<T>;
}

impl<T, Target, E> TryIntoExt<Target> for T
where
    T: TryInto<Target, Error = E>,
    T: fmt::Debug,
    T: Clone,
    E: std::error::Error + Send + Sync + 'static,
{
    fn try_into_ex(self) -> color_eyre::Result<Target> {
        self.clone()
            .try_into()
            .with_context(|| format!("{self:#?}"))
    }
}
