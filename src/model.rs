use detection_model::{DetectionModel, Threshold};
use recognition_model::RecognitionModel;

use crate::{encoder::FaceEncoder, image::Image, setting::ModelConfig, Error, Result};
pub use data::{Embedding, Face, KeyPoints, Normal, Tensor, TensorData};

mod detection_model;
mod recognition_model;

pub mod data;

// https://github.com/pykeio/ort
// https://onnxruntime.ai/docs/install/
pub struct Model {
    detect: DetectionModel,
    recgn: RecognitionModel,
}

impl Model {
    #[tracing::instrument(name = "Initializing Models", skip(config), err)]
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let model_base_path = &config.models_dir;
        let threshold = Threshold {
            score: config.score_threshold,
            iou: config.iou_threshold,
        };

        Ok(Self {
            detect: DetectionModel::new(
                model_base_path.join(&config.detection),
                threshold,
                config.intra_threads,
            )?,
            recgn: RecognitionModel::new(
                model_base_path.join(&config.recognition),
                config.intra_threads,
            )?,
        })
    }

    pub fn detect(&self, image: &Image) -> Result<Vec<Face>> {
        self.detect.run(image)
    }

    /// Embedding of the best scoring face in `image`.
    #[tracing::instrument(name = "Embedding face", skip_all, fields(path = %image.path.display()), err)]
    pub fn embed(&self, image: &Image) -> Result<Embedding> {
        let faces = self.detect(image)?;
        let Some(face) = faces.first() else {
            return Err(Error::NoFaceFound(image.path.clone()));
        };
        let aligned = face.align(image, self.recgn.input_size())?;
        self.recgn.run(&aligned)
    }
}

impl FaceEncoder for Model {
    fn encode(&mut self, image: &Image) -> Result<Embedding> {
        self.embed(image)
    }
}

#[tracing::instrument(err)]
pub fn register_ort(config: &ModelConfig) -> Result<()> {
    let onnx_env = ort::init().with_name("facecam_encoder");

    let onnx_env = match config.cuda {
        true => onnx_env.with_execution_providers([ort::CUDAExecutionProvider::default()
            .build()
            .error_on_failure()]),
        false => onnx_env,
    };

    onnx_env.commit().map_err(Error::ModelError)?;
    Ok(())
}

fn start_session_from_file(
    onnx_path: std::path::PathBuf,
    intra_threads: usize,
) -> Result<ort::Session> {
    ort::Session::builder()
        .map_err(Error::ModelError)?
        .with_intra_threads(intra_threads)
        .map_err(Error::ModelError)?
        .commit_from_file(onnx_path)
        .map_err(Error::ModelError)
}
