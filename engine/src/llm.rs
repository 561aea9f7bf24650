use std::{future::Future, pin::Pin};

use color_eyre::Result;
use serde::Serialize;

mod open_ai_chat;
pub use open_ai_chat::OpenAIChat;

use crate::ChatBox;

pub trait ChatModel {
    /// Sends one non-streaming request and returns the reply text.
    fn complete<'a>(
        &'a self,
        req: Request,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

    fn clone(&self) -> ChatBox;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub system: Option<String>,
    pub messages: Vec<InputMessage>,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputMessage {
    pub role: Role,
    pub content: String,
}

impl InputMessage {
    pub fn user(user_message: String) -> InputMessage {
        Self {
            role: Role::User,
            content: user_message,
        }
    }

    pub fn system(system_message: String) -> InputMessage {
        Self {
            role: Role::System,
            content: system_message,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
}
