use std::{future::Future, pin::Pin};

use color_eyre::{Result, eyre::eyre};
use log::debug;
use serde::{Deserialize, Serialize};

use super::{ChatModel, InputMessage, Request};
use crate::{ChatBox, openai::OpenAI};

#[derive(Debug, Clone)]
pub struct OpenAIChat {
    api: OpenAI,
    model: String,
}

impl OpenAIChat {
    pub fn new(api: OpenAI, model: impl Into<String>) -> Self {
        Self {
            api,
            model: model.into(),
        }
    }
}

impl ChatModel for OpenAIChat {
    fn complete<'a>(
        &'a self,
        req: Request,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        let body = ChatRequest::new(&self.model, req);

        Box::pin(async move {
            debug!(
                "chat request: model {}, temperature {}, {} messages",
                body.model,
                body.temperature,
                body.messages.len()
            );
            let response: ChatResponse = self.api.post("chat/completions", &body).await?;
            response.into_text()
        })
    }

    fn clone(&self) -> ChatBox {
        Box::new(Clone::clone(self))
    }
}

//
// ===== OpenAI wire types =====
//

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<InputMessage>,
    temperature: f32,
}

impl ChatRequest {
    fn new(model: &str, req: Request) -> Self {
        let Request {
            system,
            messages: rest,
            temperature,
        } = req;

        let mut messages = Vec::with_capacity(rest.len() + 1);
        if let Some(system) = system {
            messages.push(InputMessage::system(system));
        }
        messages.extend(rest);

        Self {
            model: model.to_string(),
            messages,
            temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_text(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .ok_or(eyre!("Chat response contained no choices"))?
            .message
            .content
            .ok_or(eyre!("Chat response contained no text"))
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;

    #[test]
    fn request_serialization() {
        let body = ChatRequest::new(
            "gpt-4o-mini",
            Request {
                system: Some("Be brief".into()),
                messages: vec![InputMessage::user("Some user msg".into())],
                temperature: 0.5,
            },
        );

        let expect = expect![[r#"{"model":"gpt-4o-mini","messages":[{"role":"system","content":"Be brief"},{"role":"user","content":"Some user msg"}],"temperature":0.5}"#]];
        expect.assert_eq(&serde_json::to_string(&body).unwrap());
    }

    #[test]
    fn first_choice_is_returned() -> Result<()> {
        let raw = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "a red bicycle"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
        }"#;
        let response: ChatResponse = serde_json::from_str(raw)?;
        assert_eq!(response.into_text()?, "a red bicycle");
        Ok(())
    }

    #[test]
    fn empty_replies_are_errors() -> Result<()> {
        let no_choices: ChatResponse = serde_json::from_str(r#"{"choices": []}"#)?;
        assert!(no_choices.into_text().is_err());

        let refusal: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#,
        )?;
        assert!(refusal.into_text().is_err());
        Ok(())
    }
}
