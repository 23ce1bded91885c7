use std::{error::Error as StdError, path::PathBuf};

use crate::cv::Region;

#[derive(Debug)]
pub enum Error {
    DecodeError(PathBuf, String),
    NoFaceFound(PathBuf),
    DeviceUnavailable(i32),
    RegionOutOfBounds { region: Region, canvas: (i32, i32) },
    IoError(std::io::Error),
    CVError(opencv::Error),
    ModelError(ort::Error),
    GuiError(eframe::Error),
    ConfigError(config::ConfigError),
    UnknownError(Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub fn as_unknown_error<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self::UnknownError(err.into())
    }

    pub fn as_io_error(err: std::io::Error) -> Self {
        Self::IoError(err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DecodeError(path, reason) => {
                write!(f, "failed to decode image {}: {}", path.display(), reason)
            }
            Error::NoFaceFound(path) => write!(f, "no face found in {}", path.display()),
            Error::DeviceUnavailable(idx) => write!(f, "capture device {} is unavailable", idx),
            Error::RegionOutOfBounds { region, canvas } => write!(
                f,
                "region {}x{} at ({}, {}) does not fit canvas {}x{}",
                region.width, region.height, region.x, region.y, canvas.0, canvas.1
            ),
            Error::IoError(err) => write!(f, "io error: {}", err),
            Error::CVError(err) => write!(f, "opencv error: {}", err),
            Error::ModelError(err) => write!(f, "model error: {}", err),
            Error::GuiError(err) => write!(f, "gui error: {}", err),
            Error::ConfigError(err) => write!(f, "configuration error: {}", err),
            Error::UnknownError(err) => write!(f, "unknown error: {}", err),
        }
    }
}

impl StdError for Error {}

impl From<opencv::Error> for Error {
    fn from(value: opencv::Error) -> Self {
        Self::CVError(value)
    }
}

impl From<ort::Error> for Error {
    fn from(value: ort::Error) -> Self {
        Self::ModelError(value)
    }
}

impl From<config::ConfigError> for Error {
    fn from(value: config::ConfigError) -> Self {
        Self::ConfigError(value)
    }
}
