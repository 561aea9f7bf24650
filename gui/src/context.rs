use color_eyre::{Result, eyre::eyre};
use engine::{config::Config, pipeline::Pipeline};

pub struct Context {
    pub config: Config,
    pub pipeline: Option<Pipeline>,
}

impl Context {
    pub fn new(config: Config, pipeline: Option<Pipeline>) -> Self {
        Self { config, pipeline }
    }

    pub fn pipeline(&self) -> Result<&Pipeline> {
        self.pipeline
            .as_ref()
            .ok_or(eyre!("No pipeline available, the API key is missing"))
    }
}
