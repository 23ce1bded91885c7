use crate::{Error, Result};

use super::data::{nms, Face, KeyPoints, Normal, Tensor};

const INPUT_SIZE: u32 = 640;
const STRIDES: [usize; 3] = [8, 16, 32];
const ANCHORS: usize = 2;
// feature map count, one per stride
const FMC: usize = STRIDES.len();

#[derive(Debug, Clone, Copy)]
pub struct Threshold {
    pub score: f32,
    pub iou: f32,
}

// 640 x 640 scrfd
pub struct DetectionModel {
    session: ort::Session,
    threshold: Threshold,
}

//https://github.com/deepinsight/insightface/blob/master/python-package/insightface/model_zoo/scrfd.py
impl DetectionModel {
    // det_10g.onnx
    #[tracing::instrument(name = "Initialize detection model", skip(threshold), err)]
    pub fn new(
        onnx_path: std::path::PathBuf,
        threshold: Threshold,
        intra_threads: usize,
    ) -> Result<Self> {
        Ok(Self {
            session: super::start_session_from_file(onnx_path, intra_threads)?,
            threshold,
        })
    }

    /// Faces in `image` coordinates, best score first.
    pub fn run(&self, image: &image::RgbImage) -> Result<Vec<Face>> {
        let (scale, letterboxed) = letterbox(image, INPUT_SIZE)?;
        let tensor = Tensor::from_image(&letterboxed, Normal::DETECTION);

        let outputs = self
            .session
            .run(ort::inputs![tensor.data].map_err(Error::ModelError)?)
            .map_err(Error::ModelError)?;
        if outputs.len() != 3 * FMC {
            return Err(Error::as_unknown_error(format!(
                "unsupported detection model with {} outputs",
                outputs.len()
            )));
        }

        let mut faces = Vec::new();
        for (idx, &stride) in STRIDES.iter().enumerate() {
            let centers = anchor_centers(INPUT_SIZE as usize, stride);
            let n = centers.len();

            let scores = outputs[idx]
                .try_extract_tensor::<f32>()
                .map_err(Error::ModelError)?;
            let scores = scores.to_shape([n, 1]).map_err(Error::as_unknown_error)?;
            let boxes = outputs[idx + FMC]
                .try_extract_tensor::<f32>()
                .map_err(Error::ModelError)?;
            let boxes = boxes.to_shape([n, 4]).map_err(Error::as_unknown_error)?;
            let kps = outputs[idx + 2 * FMC]
                .try_extract_tensor::<f32>()
                .map_err(Error::ModelError)?;
            let kps = kps.to_shape([n, 10]).map_err(Error::as_unknown_error)?;

            for (i, center) in centers.iter().enumerate() {
                let score = scores[[i, 0]];
                if score < self.threshold.score {
                    continue;
                }
                let distance: [f32; 4] = std::array::from_fn(|j| boxes[[i, j]]);
                let kps_distance: [f32; 10] = std::array::from_fn(|j| kps[[i, j]]);
                faces.push(decode_face(
                    score,
                    *center,
                    &distance,
                    &kps_distance,
                    stride as f32,
                    scale,
                ));
            }
        }

        let faces = nms(faces, self.threshold.iou);
        tracing::debug!(count = faces.len(), "faces detected");
        Ok(faces)
    }
}

/// Resizes `image` into the top left of a black `size` x `size` square,
/// keeping the aspect ratio. Returns the factor mapping square coordinates
/// back to `image` coordinates.
fn letterbox(image: &image::RgbImage, size: u32) -> Result<(f32, image::RgbImage)> {
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::as_unknown_error("cannot detect faces in empty image"));
    }
    let img_ratio = image.height() as f32 / image.width() as f32;
    let (nwidth, nheight) = if img_ratio > 1. {
        (((size as f32 / img_ratio).floor() as u32).max(1), size)
    } else {
        (size, ((size as f32 * img_ratio).floor() as u32).max(1))
    };
    let scale = image.height() as f32 / nheight as f32;

    let mut square = image::RgbImage::new(size, size);
    let resized =
        image::imageops::resize(image, nwidth, nheight, image::imageops::FilterType::Triangle);
    image::imageops::overlay(&mut square, &resized, 0, 0);
    Ok((scale, square))
}

/// Anchor centers of a feature map, row major, `ANCHORS` per cell.
fn anchor_centers(input_size: usize, stride: usize) -> Vec<[f32; 2]> {
    let cells = input_size / stride;
    (0..cells)
        .flat_map(|y| (0..cells).map(move |x| [(x * stride) as f32, (y * stride) as f32]))
        .flat_map(|center| std::iter::repeat(center).take(ANCHORS))
        .collect()
}

/// Turns raw distance predictions of one anchor into a face in image space.
fn decode_face(
    score: f32,
    [cx, cy]: [f32; 2],
    distance: &[f32; 4],
    kps_distance: &[f32; 10],
    stride: f32,
    scale: f32,
) -> Face {
    let bbox = (
        (cx - distance[0] * stride) * scale,
        (cy - distance[1] * stride) * scale,
        (cx + distance[2] * stride) * scale,
        (cy + distance[3] * stride) * scale,
    );
    let keypoints = KeyPoints(std::array::from_fn(|k| {
        [
            (cx + kps_distance[2 * k] * stride) * scale,
            (cy + kps_distance[2 * k + 1] * stride) * scale,
        ]
    }));
    Face {
        score,
        keypoints,
        bbox,
    }
}
