use color_eyre::Result;
use engine::API_KEY_VAR;
use iced::{
    Color, Element, Length,
    widget::{column, container, space, text},
};

use crate::{
    APP_NAME, bold_text,
    context::Context,
    message::Message,
    state::{State, StateCommand, cmd},
    top_level_container,
};

/// Terminal page shown when the app can't talk to the API at all.
#[derive(Debug, Clone)]
pub struct Fatal {
    message: String,
}

impl Fatal {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl State for Fatal {
    fn update(&mut self, _event: Message, _ctx: &mut Context) -> Result<StateCommand> {
        cmd::none()
    }

    fn view<'a>(&'a self, _ctx: &'a Context) -> Element<'a, Message> {
        top_level_container(
            column![
                bold_text(APP_NAME).size(28),
                space().height(20),
                container(text(&self.message).color(Color::from_rgb(0.7, 0.1, 0.1)))
                    .padding(20)
                    .style(|_theme| container::background(Color::from_rgb(1.0, 0.93, 0.93))),
                text(format!(
                    "Set {API_KEY_VAR} in the environment and restart the application."
                )),
            ]
            .spacing(12)
            .width(Length::Fill),
        )
        .into()
    }

    fn clone(&self) -> Box<dyn State> {
        Box::new(Clone::clone(self))
    }
}
