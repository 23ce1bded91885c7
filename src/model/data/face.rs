pub use keypoints::KeyPoints;

use crate::{Error, Result};

pub mod keypoints;

/// (x1, y1, x2, y2)
pub type BBox = (f32, f32, f32, f32);

#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub score: f32,
    pub keypoints: KeyPoints,
    pub bbox: BBox,
}

impl Face {
    // Intersection Over Union
    pub fn iou(&self, face: &Face) -> f32 {
        let (xx1, yy1, xx2, yy2) = (
            self.bbox.0.max(face.bbox.0),
            self.bbox.1.max(face.bbox.1),
            self.bbox.2.min(face.bbox.2),
            self.bbox.3.min(face.bbox.3),
        );
        let inter = 0f32.max(xx2 - xx1 + 1.) * 0f32.max(yy2 - yy1 + 1.);
        inter / (self.area() + face.area() - inter)
    }

    /// Warps the face onto a `size` x `size` crop with its landmarks on the
    /// ArcFace template. Pixels mapped from outside `src` are black.
    pub fn align(&self, src: &image::RgbImage, size: u32) -> Result<image::RgbImage> {
        let inverse = self
            .keypoints
            .umeyama_to_arc(size)
            .and_then(|m| m.try_inverse())
            .ok_or_else(|| Error::as_unknown_error("face landmarks are degenerate"))?;

        let (src_w, src_h) = src.dimensions();
        Ok(image::RgbImage::from_fn(size, size, |w, h| {
            let point = nalgebra::Vector3::<f32>::new(w as f32, h as f32, 1.);
            let in_pixel = inverse * point;
            let (in_x, in_y) = (in_pixel.x.round(), in_pixel.y.round());

            if 0. <= in_x && in_x < src_w as f32 && 0. <= in_y && in_y < src_h as f32 {
                return *src.get_pixel(in_x as u32, in_y as u32);
            }
            image::Rgb([0, 0, 0])
        }))
    }

    fn area(&self) -> f32 {
        (self.bbox.2 - self.bbox.0 + 1.) * (self.bbox.3 - self.bbox.1 + 1.)
    }
}

/// Non maximum suppression: highest scores first, dropping any face that
/// overlaps an already kept one by more than `iou_threshold`.
pub fn nms(mut faces: Vec<Face>, iou_threshold: f32) -> Vec<Face> {
    faces.sort_by(|a, b| b.score.total_cmp(&a.score));
    let mut keep: Vec<Face> = Vec::with_capacity(faces.len());
    for face in faces {
        if keep.iter().all(|kept| kept.iou(&face) <= iou_threshold) {
            keep.push(face);
        }
    }
    keep
}
