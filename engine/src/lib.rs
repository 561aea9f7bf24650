use crate::{image_model::ImageModel, llm::ChatModel};

pub mod config;
pub mod credential;
pub mod download;
pub mod image_model;
pub mod llm;
pub mod openai;
pub mod pipeline;
pub mod prompt;
pub mod session;
pub mod stage;

pub type ChatBox = Box<dyn ChatModel + Send + Sync>;
pub type ImgModBox = Box<dyn ImageModel + Send + Sync>;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
