use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write as _},
    path::{Path, PathBuf},
};

use color_eyre::{
    Result,
    eyre::{WrapErr as _, bail},
};
use log::info;

pub const IMAGE_MIME: &str = "image/png";
pub const DEFAULT_FILE_NAME: &str = "generated_image.png";

const MAX_SUFFIX: usize = 10_000;

/// An image as it is offered to the user for saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub mime: &'static str,
    pub data: Vec<u8>,
}

impl Download {
    pub fn png(data: Vec<u8>) -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.into(),
            mime: IMAGE_MIME,
            data,
        }
    }

    /// Writes the file into `dir` and returns the path. An existing file is
    /// never overwritten, `name (1).png`, `name (2).png`, ... are tried instead.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

        for n in 0..MAX_SUFFIX {
            let path = dir.join(numbered_name(&self.file_name, n));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(&self.data)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!("Saved {} bytes to {}", self.data.len(), path.display());
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(e).with_context(|| format!("creating {}", path.display()));
                }
            }
        }

        bail!(
            "Couldn't find a free file name for {} in {}",
            self.file_name,
            dir.display()
        )
    }
}

fn numbered_name(file_name: &str, n: usize) -> String {
    if n == 0 {
        return file_name.to_string();
    }

    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({n}).{ext}"),
        _ => format!("{file_name} ({n})"),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn png_download_defaults() {
        let dl = Download::png(vec![1, 2, 3]);
        assert_eq!(dl.file_name, "generated_image.png");
        assert_eq!(dl.mime, "image/png");
    }

    #[test]
    fn saving_never_overwrites() -> Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("nested");

        let first = Download::png(vec![1]).save_to(&target)?;
        let second = Download::png(vec![2, 2]).save_to(&target)?;
        let third = Download::png(vec![3, 3, 3]).save_to(&target)?;

        assert_eq!(first, target.join("generated_image.png"));
        assert_eq!(second, target.join("generated_image (1).png"));
        assert_eq!(third, target.join("generated_image (2).png"));
        assert_eq!(fs::read(&first)?, vec![1]);
        assert_eq!(fs::read(&third)?, vec![3, 3, 3]);
        Ok(())
    }

    #[test]
    fn numbering_without_extension() {
        assert_eq!(numbered_name("image", 2), "image (2)");
        assert_eq!(numbered_name(".png", 1), ".png (1)");
        assert_eq!(numbered_name("a.b.png", 1), "a.b (1).png");
    }
}
