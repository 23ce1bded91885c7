pub use self::config::{Config, EncoderConfig, ModelConfig, Offset, PreviewConfig};

use crate::result::Result;

pub mod config;

#[derive(Debug)]
pub struct Setting {
    pub config: Config,
}

impl Setting {
    #[tracing::instrument(name = "Loading settings", err)]
    pub fn get() -> Result<Self> {
        let config = Config::get()?;
        tracing::debug!(?config, "settings loaded");
        Ok(Self { config })
    }
}
