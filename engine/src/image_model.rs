use std::{future::Future, pin::Pin};

use color_eyre::Result;

pub mod gpt_image;
pub use gpt_image::GptImage;

use crate::ImgModBox;

/// Decoded bytes of one generated picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub data: Vec<u8>,
}

pub trait ImageModel {
    fn get_image<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Image>> + Send + 'a>>;

    fn clone(&self) -> ImgModBox;
}
