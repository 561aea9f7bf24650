use std::path::PathBuf;

use clap::Parser;
use color_eyre::{Result, eyre::eyre};
use engine::{
    config::load_config,
    credential::Credential,
    pipeline::Pipeline,
    session::{Goal, PromptMode, Session},
};

/// Runs the prompt pipeline once without the GUI.
#[derive(clap::Parser)]
struct Arg {
    prompt: String,

    #[arg(short, long, value_enum, default_value_t = PromptMode::TargetLanguage)]
    mode: PromptMode,

    /// Let the chat model elaborate the prompt before generating
    #[arg(short, long)]
    enhance: bool,

    /// Where to write the image. Defaults to the download directory.
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let Arg {
        prompt,
        mode,
        enhance,
        out,
    } = Arg::parse();
    pretty_env_logger::init();
    color_eyre::install()?;

    let config = load_config()?;
    let pipeline = Pipeline::connect(Credential::from_env()?, &config)?;

    let mut session = Session::new(mode);
    session.set_input(prompt);
    session.set_enhance(enhance);
    pipeline.drive(&mut session, Goal::Image).await;

    for notice in session.notices() {
        eprintln!("{notice}");
    }
    if let Some(translated) = session.translated() {
        println!("Translated: {translated}");
    }
    if let Some(enhanced) = session.enhanced() {
        println!("Enhanced: {enhanced}");
    }

    let download = session
        .download()
        .ok_or(eyre!("No image was generated"))?;
    let path = match out {
        Some(path) => {
            std::fs::write(&path, &download.data)?;
            path
        }
        None => download.save_to(&config.download_dir())?,
    };
    println!("Saved image, {} bytes, to {}", download.data.len(), path.display());

    Ok(())
}
