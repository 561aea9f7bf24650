//! The fixed instructions sent to the chat model.

use indoc::formatdoc;

use crate::llm::{InputMessage, Request};

/// Low, so the translation stays literal.
pub const TRANSLATION_TEMPERATURE: f32 = 0.3;
/// Higher, to get some creative variation.
pub const ENHANCEMENT_TEMPERATURE: f32 = 0.7;

pub fn translation_request(text: &str, source: &str, target: &str) -> Request {
    Request {
        system: Some(format!(
            "You are an expert at translating prompts from {source} to {target}. \
             Translate prompts for image generation accurately and naturally."
        )),
        messages: vec![InputMessage::user(format!(
            "Translate the following image generation prompt into natural {target}: '{text}'"
        ))],
        temperature: TRANSLATION_TEMPERATURE,
    }
}

pub fn enhancement_request(prompt: &str) -> Request {
    Request {
        system: Some(
            "You are an expert in writing effective image generation prompts. Your task is to \
             enhance prompts to get better results from image generation AI."
                .into(),
        ),
        messages: vec![InputMessage::user(formatdoc! {r#"
            Enhance this image generation prompt to create a more detailed and effective prompt.
            Original prompt: "{prompt}"
            Make it more descriptive and specific, adding details about composition, mood, lighting, and style where appropriate.
            Do not change the core subject or main elements of the image. Do not add any explanation, just return the enhanced prompt."#
        })],
        temperature: ENHANCEMENT_TEMPERATURE,
    }
}

/// Trims the reply and drops one pair of quotes wrapped around all of it.
pub fn clean_reply(reply: &str) -> &str {
    let trimmed = reply.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|s| s.strip_suffix(quote))
            && !inner.contains(quote)
        {
            return inner.trim();
        }
    }
    trimmed
}
