use crate::{Error, Result};

use super::data::{Embedding, Normal, Tensor};

pub const EMBEDDING_LEN: usize = 512;

pub struct RecognitionModel {
    input_size: u32,
    session: ort::Session,
}

impl RecognitionModel {
    // w600k_r50.onnx
    #[tracing::instrument(name = "Initialize recognition model", err)]
    pub fn new(onnx_path: std::path::PathBuf, intra_threads: usize) -> Result<Self> {
        Ok(Self {
            input_size: 112,
            session: super::start_session_from_file(onnx_path, intra_threads)?,
        })
    }

    pub fn input_size(&self) -> u32 {
        self.input_size
    }

    // (1, 3, 112, 112) -> (1, 512)
    pub fn run(&self, face: &image::RgbImage) -> Result<Embedding> {
        let tensor = if face.dimensions() != (self.input_size, self.input_size) {
            let resized = image::imageops::resize(
                face,
                self.input_size,
                self.input_size,
                image::imageops::FilterType::Triangle,
            );
            Tensor::from_image(&resized, Normal::N1_TO_P1)
        } else {
            Tensor::from_image(face, Normal::N1_TO_P1)
        };

        let outputs = self
            .session
            .run(ort::inputs![tensor.data].map_err(Error::ModelError)?)
            .map_err(Error::ModelError)?;

        Ok(outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(Error::ModelError)?
            .to_shape(EMBEDDING_LEN)
            .map_err(Error::as_unknown_error)?
            .into_owned()
            .into())
    }
}
