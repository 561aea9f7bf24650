use std::{future::Future, pin::Pin};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use color_eyre::{
    Result,
    eyre::{WrapErr as _, eyre},
};
use log::debug;
use serde::{Deserialize, Serialize};

use super::{Image, ImageModel};
use crate::{ImgModBox, config::Config, openai::OpenAI};

/// OpenAI image generation (`gpt-image-1` and friends), one image per call.
#[derive(Debug, Clone)]
pub struct GptImage {
    api: OpenAI,
    model: String,
    size: Option<String>,
    quality: Option<String>,
}

impl GptImage {
    pub fn new(api: OpenAI, config: &Config) -> Self {
        Self {
            api,
            model: config.image_model.clone(),
            size: config.image_size.clone(),
            quality: config.image_quality.clone(),
        }
    }

    fn request<'a>(&'a self, prompt: &'a str) -> GenerationRequest<'a> {
        GenerationRequest {
            model: &self.model,
            prompt,
            n: 1,
            size: self.size.as_deref(),
            quality: self.quality.as_deref(),
        }
    }
}

impl ImageModel for GptImage {
    fn get_image<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Image>> + Send + 'a>> {
        Box::pin(async move {
            let body = self.request(prompt);
            debug!("image request: model {}, prompt length {}", body.model, prompt.len());
            let response: GenerationResponse = self.api.post("images/generations", &body).await?;
            response.into_image()
        })
    }

    fn clone(&self) -> ImgModBox {
        Box::new(Clone::clone(self))
    }
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quality: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedItem>,
}

#[derive(Debug, Deserialize)]
struct GeneratedItem {
    #[serde(default)]
    b64_json: Option<String>,
}

impl GenerationResponse {
    fn into_image(self) -> Result<Image> {
        let payload = self
            .data
            .into_iter()
            .next()
            .ok_or(eyre!("Image response contained no results"))?
            .b64_json
            .ok_or(eyre!("Image result carried no base64 payload"))?;

        let data = BASE64
            .decode(payload.trim().as_bytes())
            .context("decoding base64 image payload")?;
        Ok(Image { data })
    }
}
