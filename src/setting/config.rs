use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::{error::Error, result::Result};

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub model: ModelConfig,
    pub encoder: EncoderConfig,
    pub preview: PreviewConfig,
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, PartialEq)]
pub struct ModelConfig {
    pub cuda: bool,
    pub intra_threads: usize,
    pub models_dir: PathBuf,
    pub detection: String,
    pub recognition: String,
    pub score_threshold: f32,
    pub iou_threshold: f32,
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, PartialEq)]
pub struct EncoderConfig {
    pub faces_dir: PathBuf,
    /// Stop after the first image has been encoded.
    pub first_only: bool,
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, PartialEq)]
pub struct PreviewConfig {
    pub background: PathBuf,
    pub device: i32,
    pub width: u32,
    pub height: u32,
    pub offset: Offset,
    pub wait_ms: u64,
    pub title: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            cuda: false,
            intra_threads: 4,
            models_dir: PathBuf::from("models"),
            detection: "det_10g.onnx".into(),
            recognition: "w600k_r50.onnx".into(),
            score_threshold: 0.5,
            iou_threshold: 0.4,
        }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            faces_dir: PathBuf::from("faces"),
            first_only: true,
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            background: PathBuf::from("bg.jpeg"),
            device: 0,
            width: 640,
            height: 480,
            offset: Offset { x: 180, y: 100 },
            wait_ms: 1,
            title: "image test".into(),
        }
    }
}

impl Config {
    pub fn get() -> Result<Config> {
        Self::from_path(Self::get_config_dir()?)
    }

    /// Reads the config at `config_dir`, writing the defaults back when the
    /// file is missing, malformed or doesn't deserialize.
    pub fn from_path(config_dir: impl AsRef<Path>) -> Result<Config> {
        let config_dir = config_dir.as_ref();
        let config_str = match fs::read_to_string(config_dir) {
            Ok(config) => config,
            Err(err) => {
                if err.kind() == ErrorKind::NotFound {
                    return Self::upsert_new(config_dir);
                }
                return Err(Error::IoError(err));
            }
        };

        match config::Config::builder()
            .add_source(config::File::from_str(
                &config_str,
                config::FileFormat::Json,
            ))
            .build()
            .and_then(|cfg| cfg.try_deserialize::<Config>())
        {
            Ok(cfg) => Ok(cfg),
            Err(err) => {
                tracing::warn!(error = %err, "invalid config file, restoring defaults");
                Self::upsert_new(config_dir)
            }
        }
    }

    fn get_config_dir() -> Result<PathBuf> {
        Ok(std::env::current_dir()
            .map_err(Error::as_io_error)?
            .join("config.json"))
    }

    fn upsert_new(config_dir: &Path) -> Result<Config> {
        let config = Self::default();
        Self::upsert_config_file(config_dir, &config)?;
        Ok(config)
    }

    fn upsert_config_file(config_dir: &Path, config: &Config) -> Result<()> {
        fs::File::create(config_dir)
            .map_err(Error::as_io_error)?
            .write_all(
                serde_json::to_string_pretty(config)
                    .map_err(Error::as_unknown_error)?
                    .as_bytes(),
            )
            .map_err(Error::as_io_error)
    }
}
