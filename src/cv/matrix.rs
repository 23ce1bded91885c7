use std::path::Path;

use opencv::{core, imgcodecs, prelude::*};

use super::Region;
use crate::{Error, Result};

/// BGR frame or canvas backed by an OpenCV `Mat`.
#[derive(Debug, Clone)]
pub struct Matrix(pub core::Mat);

impl Matrix {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::DecodeError(
                path.to_path_buf(),
                "file not found".into(),
            ));
        }
        let mat = imgcodecs::imread(&path.to_string_lossy(), imgcodecs::IMREAD_COLOR)
            .map_err(Error::CVError)?;
        // imread signals undecodable input with an empty mat
        if mat.empty() {
            return Err(Error::DecodeError(
                path.to_path_buf(),
                "unsupported or corrupt image".into(),
            ));
        }
        Ok(Self(mat))
    }

    /// (width, height)
    pub fn dimensions(&self) -> (i32, i32) {
        (self.cols(), self.rows())
    }

    /// Copies `src` into this matrix with its top-left corner at `(x, y)`.
    /// Nothing is written unless the whole of `src` fits.
    pub fn paste(&mut self, src: &Matrix, (x, y): (i32, i32)) -> Result<Region> {
        let (width, height) = src.dimensions();
        let region = Region::new(x, y, width, height).fit(self.dimensions())?;
        if src.typ() != self.typ() {
            return Err(Error::as_unknown_error(format!(
                "cannot paste mat of type {} onto mat of type {}",
                src.typ(),
                self.typ()
            )));
        }
        let mut roi = core::Mat::roi_mut(&mut self.0, region.into()).map_err(Error::CVError)?;
        src.copy_to(&mut *roi).map_err(Error::CVError)?;
        Ok(region)
    }
}

impl TryFrom<&Matrix> for eframe::egui::ColorImage {
    type Error = Error;

    fn try_from(value: &Matrix) -> Result<Self> {
        use eframe::egui::{Color32, ColorImage};
        use rayon::{iter::ParallelIterator, slice::ParallelSlice};

        if value.typ() != core::CV_8UC3 {
            return Err(Error::as_unknown_error(format!(
                "expected 8 bit BGR mat, got type {}",
                value.typ()
            )));
        }
        let (width, height) = value.dimensions();
        let continuous;
        let mat = if value.is_continuous() {
            &value.0
        } else {
            continuous = value.try_clone().map_err(Error::CVError)?;
            &continuous
        };
        Ok(ColorImage {
            size: [width as usize, height as usize],
            pixels: mat
                .data_bytes()
                .map_err(Error::CVError)?
                .par_chunks_exact(3)
                // BGR -> RGB
                .map(|p| Color32::from_rgb(p[2], p[1], p[0]))
                .collect(),
        })
    }
}

impl From<core::Mat> for Matrix {
    fn from(value: core::Mat) -> Self {
        Self(value)
    }
}

impl std::ops::Deref for Matrix {
    type Target = core::Mat;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for Matrix {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[cfg(test)]
pub(crate) fn solid(width: i32, height: i32, bgr: [u8; 3]) -> Matrix {
    Matrix::from(
        core::Mat::new_rows_cols_with_default(
            height,
            width,
            core::CV_8UC3,
            core::Scalar::new(bgr[0] as f64, bgr[1] as f64, bgr[2] as f64, 0.),
        )
        .expect("Failed to create test matrix"),
    )
}
