use std::{future::Future, pin::Pin};

use color_eyre::{Result, eyre::ensure};
use log::info;

use crate::{
    ChatBox, ImgModBox,
    config::Config,
    credential::Credential,
    image_model::{GptImage, Image},
    llm::{OpenAIChat, Request},
    openai::OpenAI,
    prompt,
    session::{Goal, Job, JobOutcome, Session},
    stage::{StageOutcome, Step, with_fallback},
};

/// The hosted models and the fixed settings the three stages need.
pub struct Pipeline {
    chat: ChatBox,
    imgmod: ImgModBox,
    source_language: String,
    target_language: String,
}

impl Clone for Pipeline {
    fn clone(&self) -> Self {
        Self {
            chat: self.chat.clone(),
            imgmod: self.imgmod.clone(),
            source_language: self.source_language.clone(),
            target_language: self.target_language.clone(),
        }
    }
}

impl Pipeline {
    pub fn new(chat: ChatBox, imgmod: ImgModBox, config: &Config) -> Self {
        Self {
            chat,
            imgmod,
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
        }
    }

    /// Builds the OpenAI backed pipeline. Without a credential there is no
    /// way to get here, so no client is ever built without one.
    pub fn connect(credential: Credential, config: &Config) -> Result<Self> {
        let api = OpenAI::new(credential, config)?;
        Ok(Self::new(
            Box::new(OpenAIChat::new(api.clone(), &config.chat_model)),
            Box::new(GptImage::new(api, config)),
            config,
        ))
    }

    /// Falls back to `text` itself if anything goes wrong.
    pub async fn translate(&self, text: &str) -> StageOutcome<String> {
        let req = prompt::translation_request(text, &self.source_language, &self.target_language);
        let outcome = with_fallback(Step::Translate, self.ask(req), text.to_string()).await;
        if !outcome.failed() {
            info!("Translated prompt");
        }
        outcome
    }

    /// Falls back to `prompt` itself if anything goes wrong.
    pub async fn enhance(&self, prompt: &str) -> StageOutcome<String> {
        let req = prompt::enhancement_request(prompt);
        let outcome = with_fallback(Step::Enhance, self.ask(req), prompt.to_string()).await;
        if !outcome.failed() {
            info!("Enhanced prompt");
        }
        outcome
    }

    pub async fn generate(&self, prompt: &str) -> StageOutcome<Option<Image>> {
        let fut = async { self.imgmod.get_image(prompt).await.map(Some) };
        let outcome = with_fallback(Step::Generate, fut, None).await;
        if let Some(img) = &outcome.value {
            info!("Generated image, {} bytes", img.data.len());
        }
        outcome
    }

    async fn ask(&self, req: Request) -> Result<String> {
        let reply = self.chat.complete(req).await?;
        let reply = prompt::clean_reply(&reply);
        ensure!(!reply.is_empty(), "The model returned an empty reply");
        Ok(reply.to_string())
    }

    /// Runs one job on an owned copy of the pipeline, so the future can be
    /// handed to an executor.
    pub fn run(&self, job: Job) -> Pin<Box<dyn Future<Output = JobOutcome> + Send>> {
        let this = self.clone();
        Box::pin(async move {
            let Job { step, prompt } = job;
            match step {
                Step::Translate => JobOutcome::Translated(this.translate(&prompt).await),
                Step::Enhance => JobOutcome::Enhanced(this.enhance(&prompt).await),
                Step::Generate => JobOutcome::Generated(this.generate(&prompt).await),
            }
        })
    }

    /// Runs jobs one after another until `goal` is reached.
    pub async fn drive(&self, session: &mut Session, goal: Goal) {
        let mut next = session.start(goal);
        while let Some(job) = next {
            let outcome = self.run(job).await;
            next = session.finish(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
    use color_eyre::eyre::eyre;

    use super::*;
    use crate::{
        download::IMAGE_MIME,
        image_model::ImageModel,
        llm::ChatModel,
        session::{PromptMode, SessionState},
    };

    type Calls = Arc<Mutex<Vec<String>>>;

    #[derive(Clone)]
    struct FakeChat {
        reply: Option<String>,
        calls: Calls,
    }

    impl ChatModel for FakeChat {
        fn complete<'a>(
            &'a self,
            req: Request,
        ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
            self.calls
                .lock()
                .unwrap()
                .push(req.messages[0].content.clone());
            Box::pin(async move {
                self.reply
                    .clone()
                    .ok_or(eyre!("Authentication error (401): bad key"))
            })
        }

        fn clone(&self) -> ChatBox {
            Box::new(Clone::clone(self))
        }
    }

    /// Decodes a canned base64 payload the way the real model does.
    #[derive(Clone)]
    struct FakeImages {
        payload: Option<String>,
        calls: Calls,
    }

    impl ImageModel for FakeImages {
        fn get_image<'a>(
            &'a self,
            prompt: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Image>> + Send + 'a>> {
            self.calls.lock().unwrap().push(prompt.to_string());
            Box::pin(async move {
                let payload = self.payload.as_ref().ok_or(eyre!("connection refused"))?;
                Ok(Image {
                    data: BASE64.decode(payload)?,
                })
            })
        }

        fn clone(&self) -> ImgModBox {
            Box::new(Clone::clone(self))
        }
    }

    struct Harness {
        pipeline: Pipeline,
        chat_calls: Calls,
        image_calls: Calls,
    }

    fn harness(reply: Option<&str>, payload: Option<&[u8]>) -> Harness {
        let chat_calls = Calls::default();
        let image_calls = Calls::default();
        let pipeline = Pipeline::new(
            Box::new(FakeChat {
                reply: reply.map(String::from),
                calls: chat_calls.clone(),
            }),
            Box::new(FakeImages {
                payload: payload.map(|p| BASE64.encode(p)),
                calls: image_calls.clone(),
            }),
            &Config::default(),
        );
        Harness {
            pipeline,
            chat_calls,
            image_calls,
        }
    }

    fn calls(c: &Calls) -> Vec<String> {
        c.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn direct_prompt_reaches_the_generator_unchanged() {
        let h = harness(Some("unused"), Some(b"img".as_slice()));
        let mut session = Session::new(PromptMode::TargetLanguage);
        session.set_input("a red bicycle on a beach at sunset");

        h.pipeline.drive(&mut session, Goal::Image).await;

        assert!(calls(&h.chat_calls).is_empty());
        assert_eq!(
            calls(&h.image_calls),
            vec!["a red bicycle on a beach at sunset"]
        );
        assert_eq!(session.state(), SessionState::ImageShown);
    }

    #[tokio::test]
    async fn translated_prompt_reaches_the_generator() {
        let h = harness(Some("a red bicycle on the beach"), Some(b"img".as_slice()));
        let mut session = Session::new(PromptMode::SourceLanguage);
        session.set_input("해변에 있는 빨간 자전거");

        h.pipeline.drive(&mut session, Goal::Image).await;

        let chat_calls = calls(&h.chat_calls);
        assert_eq!(chat_calls.len(), 1);
        assert!(chat_calls[0].contains("'해변에 있는 빨간 자전거'"));
        assert_eq!(calls(&h.image_calls), vec!["a red bicycle on the beach"]);
        assert_eq!(session.translated(), Some("a red bicycle on the beach"));
        assert!(session.notices().is_empty());
    }

    #[tokio::test]
    async fn failed_translation_passes_the_source_text_on() {
        let h = harness(None, Some(b"img".as_slice()));
        let mut session = Session::new(PromptMode::SourceLanguage);
        session.set_input("해변에 있는 빨간 자전거");

        h.pipeline.drive(&mut session, Goal::Image).await;

        assert_eq!(session.translated(), Some("해변에 있는 빨간 자전거"));
        assert_eq!(calls(&h.image_calls), vec!["해변에 있는 빨간 자전거"]);
        assert_eq!(session.notices().len(), 1);
        assert_eq!(session.notices()[0].step, Step::Translate);
        assert!(
            session.notices()[0]
                .to_string()
                .starts_with("Error during translation: Authentication error")
        );
    }

    #[tokio::test]
    async fn failed_enhancement_keeps_the_prompt() {
        let h = harness(None, None);
        let outcome = h.pipeline.enhance("a cat on a sofa").await;
        assert_eq!(outcome.value, "a cat on a sofa");
        assert_eq!(outcome.notice.unwrap().step, Step::Enhance);
    }

    #[tokio::test]
    async fn empty_replies_fall_back() {
        let h = harness(Some("  ''  "), None);
        let outcome = h.pipeline.translate("고양이").await;
        assert_eq!(outcome.value, "고양이");
        assert!(outcome.failed());
    }

    #[tokio::test]
    async fn enhancement_runs_between_translation_and_generation() {
        let h = harness(Some("'a detailed red bicycle'"), Some(b"img".as_slice()));
        let mut session = Session::new(PromptMode::SourceLanguage);
        session.set_input("빨간 자전거");
        session.set_enhance(true);

        h.pipeline.drive(&mut session, Goal::Prompt).await;
        assert_eq!(session.state(), SessionState::ReadyToGenerate);
        assert_eq!(calls(&h.chat_calls).len(), 2);
        assert!(calls(&h.image_calls).is_empty());

        h.pipeline.drive(&mut session, Goal::Image).await;
        assert_eq!(calls(&h.image_calls), vec!["a detailed red bicycle"]);
    }

    #[tokio::test]
    async fn failed_generation_yields_no_image() {
        let h = harness(None, None);
        let mut session = Session::new(PromptMode::TargetLanguage);
        session.set_input("a cat");

        h.pipeline.drive(&mut session, Goal::Image).await;

        assert_eq!(session.image(), None);
        assert_eq!(session.download(), None);
        assert_eq!(session.state(), SessionState::ReadyToGenerate);
        assert_eq!(session.notices()[0].step, Step::Generate);
    }

    #[tokio::test]
    async fn generated_payload_is_offered_as_png() {
        let bytes = [0u8, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        let h = harness(None, Some(bytes.as_slice()));
        let mut session = Session::new(PromptMode::TargetLanguage);
        session.set_input("a cat");

        h.pipeline.drive(&mut session, Goal::Image).await;

        let download = session.download().unwrap();
        assert_eq!(download.data, bytes);
        assert_eq!(download.mime, IMAGE_MIME);
        assert_eq!(download.file_name, "generated_image.png");
    }
}
