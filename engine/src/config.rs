use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use color_eyre::{
    Result,
    eyre::{WrapErr as _, eyre},
};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "prompt_painter.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub chat_model: String,
    pub image_model: String,
    pub image_size: Option<String>,
    pub image_quality: Option<String>,
    pub source_language: String,
    pub target_language: String,
    pub download_dir: Option<PathBuf>,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            chat_model: "gpt-4o-mini".into(),
            image_model: "gpt-image-1".into(),
            image_size: Some("1024x1536".into()),
            image_quality: Some("low".into()),
            source_language: "Korean".into(),
            target_language: "English".into(),
            download_dir: None,
            request_timeout_secs: 600,
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Where downloads go: the configured dir, else the user's download dir,
    /// else the working directory.
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Caption shown under the rendered image.
    pub fn image_caption(&self) -> String {
        match (&self.image_size, &self.image_quality) {
            (Some(size), Some(quality)) => format!("Generated image ({size}, {quality})"),
            (Some(x), None) | (None, Some(x)) => format!("Generated image ({x})"),
            (None, None) => "Generated image".into(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(dirs::config_local_dir()
        .ok_or(eyre!("Couldn't get config dir"))?
        .join(CONFIG_FILE_NAME))
}

/// Loads the config file, or the defaults if there is none.
pub fn load_config() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        Ok(Config::default())
    } else {
        load_config_from(&path)
    }
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    let src = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    ron::from_str(&src).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"(chat_model: "gpt-4o", image_quality: None, download_dir: Some("/tmp/imgs"))"#
        )?;

        let cfg = load_config_from(file.path())?;
        assert_eq!(cfg.chat_model, "gpt-4o");
        assert_eq!(cfg.image_quality, None);
        assert_eq!(cfg.download_dir(), PathBuf::from("/tmp/imgs"));
        assert_eq!(cfg.image_model, "gpt-image-1");
        assert_eq!(cfg.source_language, "Korean");
        assert_eq!(cfg.request_timeout(), Duration::from_secs(600));
        Ok(())
    }

    #[test]
    fn broken_file_is_an_error() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "(chat_model: ")?;
        assert!(load_config_from(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn caption_mentions_size_and_quality() {
        assert_eq!(
            Config::default().image_caption(),
            "Generated image (1024x1536, low)"
        );
        let cfg = Config {
            image_size: None,
            image_quality: None,
            ..Config::default()
        };
        assert_eq!(cfg.image_caption(), "Generated image");
    }
}
