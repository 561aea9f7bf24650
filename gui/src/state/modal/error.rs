use color_eyre::Result;
use iced::{
    Border, Color, Element, Length, Task,
    widget::{button, column, container, row, scrollable, space, text},
};

use crate::{
    TryIntoExt, bold_text,
    context::Context,
    message::{Message, ui_messages::ErrorDialog as MyMessage},
};

use super::DialogResult;

/// Shows an unexpected error with its full report.
#[derive(Debug, Clone)]
pub struct ErrorDialog {
    title: String,
    details: String,
}

impl ErrorDialog {
    pub fn new(title: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            details: details.into(),
        }
    }
}

impl super::Dialog for ErrorDialog {
    fn update(&mut self, event: Message, _ctx: &mut Context) -> Result<DialogResult> {
        use MyMessage::*;

        match event.try_into_ex()? {
            Dismiss => Ok(DialogResult::Close(Task::none())),
            CopyDetails => Ok(DialogResult::Stay(iced::clipboard::write(
                self.details.clone(),
            ))),
        }
    }

    fn view<'a>(&'a self, _ctx: &'a Context) -> Element<'a, Message> {
        container(
            column![
                bold_text(&self.title).size(20),
                container(scrollable(text(&self.details).size(13)).height(Length::Fill))
                    .style(|_theme| container::background(Color::from_rgb(0.95, 0.95, 0.95)))
                    .padding(20),
                row![
                    space::horizontal(),
                    button("Copy").on_press(MyMessage::CopyDetails.into()),
                    button("Ok").on_press(MyMessage::Dismiss.into()),
                ]
                .spacing(10)
            ]
            .spacing(10),
        )
        .height(Length::Shrink)
        .padding(20)
        .max_width(700)
        .max_height(500)
        .style(|_theme| container::background(Color::WHITE).border(Border::default().rounded(10)))
        .into()
    }
}
