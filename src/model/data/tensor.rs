pub type TensorData = ndarray::Array<f32, ndarray::Dim<[usize; 4]>>;

/// Per-channel `(p - mean) / std` applied to 8 bit pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    pub mean: f32,
    pub std: f32,
}

impl Normal {
    /// Negative One To Plus One
    pub const N1_TO_P1: Normal = Normal {
        mean: 127.5,
        std: 127.5,
    };
    /// Detection input, slightly narrower than [-1, 1]
    pub const DETECTION: Normal = Normal {
        mean: 127.5,
        std: 128.,
    };

    pub fn apply(&self, p: u8) -> f32 {
        (p as f32 - self.mean) / self.std
    }
}

/// NCHW blob fed to the onnx sessions.
#[derive(Debug, Clone)]
pub struct Tensor {
    pub data: TensorData,
}

impl Tensor {
    // (1, 3, h, w)
    pub fn from_image(image: &image::RgbImage, normal: Normal) -> Self {
        let (w, h) = image.dimensions();
        Self {
            data: TensorData::from_shape_fn((1, 3, h as usize, w as usize), |(_, c, y, x)| {
                normal.apply(image[(x as u32, y as u32)][c])
            }),
        }
    }

    pub fn is_eq_dim(&self, cmp_dim: (usize, usize, usize, usize)) -> bool {
        self.dim() == cmp_dim
    }
}

impl std::ops::Deref for Tensor {
    type Target = TensorData;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

#[cfg(test)]
mod test {
    use rand::Rng;

    use super::{Normal, Tensor};

    #[test]
    fn lays_out_image_as_nchw() {
        let mut rand = rand::thread_rng();
        let (w, h) = (7u32, 5u32);
        let image = image::RgbImage::from_fn(w, h, |_, _| {
            image::Rgb([rand.gen(), rand.gen(), rand.gen()])
        });

        let tensor = Tensor::from_image(&image, Normal::N1_TO_P1);
        assert!(tensor.is_eq_dim((1, 3, h as usize, w as usize)));

        let (x, y, c) = (
            rand.gen_range(0..w),
            rand.gen_range(0..h),
            rand.gen_range(0..3),
        );
        assert_eq!(
            tensor[[0, c, y as usize, x as usize]],
            Normal::N1_TO_P1.apply(image[(x, y)][c])
        );
    }

    #[test]
    fn normalizes_pixel_range() {
        assert_eq!(Normal::N1_TO_P1.apply(0), -1.);
        assert_eq!(Normal::N1_TO_P1.apply(255), 1.);
        assert!(Normal::DETECTION.apply(255) < 1.);
        assert!(Normal::DETECTION.apply(0) > -1.);
    }
}
