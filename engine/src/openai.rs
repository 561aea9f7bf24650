use color_eyre::{Result, eyre::WrapErr as _};
use log::debug;
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};

mod error;
pub use error::OpenAIApiError;

use crate::{config::Config, credential::Credential};

/// Shared plumbing for every call against the OpenAI HTTP API. Callers only
/// bring their payload type and the response type to decode into.
#[derive(Debug, Clone)]
pub struct OpenAI {
    client: Client,
    credential: Credential,
    base_url: String,
}

impl OpenAI {
    pub fn new(credential: Credential, config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("building http client")?;

        Ok(Self {
            client,
            credential,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let res = self
            .client
            .post(&url)
            .bearer_auth(self.credential.secret())
            .json(body)
            .send()
            .await
            .with_context(|| format!("sending request to {url}"))?;

        let status = res.status();
        let text = res.text().await.context("reading response body")?;
        debug!("{url} answered with {status} ({} bytes)", text.len());

        if !status.is_success() {
            return Err(OpenAIApiError::from_response(status.as_u16(), &text).into());
        }

        serde_json::from_str(&text).with_context(|| format!("decoding response from {url}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slashes() -> Result<()> {
        let cfg = Config {
            base_url: "http://localhost:8080/v1/".into(),
            ..Config::default()
        };
        let cred = Credential::from_value(Some("key".into()))?;
        let api = OpenAI::new(cred, &cfg)?;
        assert_eq!(
            api.endpoint("/chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
        assert_eq!(
            api.endpoint("images/generations"),
            "http://localhost:8080/v1/images/generations"
        );
        Ok(())
    }
}
