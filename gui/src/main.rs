use color_eyre::Result;
use engine::{config::load_config, credential::Credential};
use prompt_painter::{APP_NAME, Gui};

pub fn main() -> Result<()> {
    pretty_env_logger::init();
    color_eyre::install()?;
    let cfg = load_config()?;
    let credential = Credential::from_env();
    iced::application(
        move || Gui::new(cfg.clone(), credential.clone()),
        Gui::update,
        Gui::view,
    )
    .title(APP_NAME)
    .run()?;
    Ok(())
}
