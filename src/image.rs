use std::path::{Path, PathBuf};

use crate::{error::Error, result::Result};

/// Decoded RGB image together with the file it came from.
#[derive(Debug, Clone)]
pub struct Image {
    pub path: PathBuf,
    data: image::RgbImage,
}

impl Image {
    pub fn new(path: impl Into<PathBuf>, data: image::RgbImage) -> Self {
        Self {
            path: path.into(),
            data,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|err| Error::DecodeError(path.to_path_buf(), err.to_string()))?;
        Ok(Self::new(path, image.to_rgb8()))
    }
}

impl std::ops::Deref for Image {
    type Target = image::RgbImage;
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::Image;
    use crate::Error;

    #[test]
    fn decodes_image_to_rgb() {
        let dir = std::env::temp_dir().join("facecam_image_decode");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("gray.png");
        image::GrayImage::from_pixel(3, 2, image::Luma([7]))
            .save(&path)
            .expect("Failed to save test image");

        let image = Image::from_path(&path).expect("Failed to decode test image");
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image[(2, 1)], image::Rgb([7, 7, 7]));
        assert_eq!(image.path, path);
    }

    #[test]
    fn fails_with_decode_error_on_garbage() {
        let dir = std::env::temp_dir().join("facecam_image_garbage");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("notes.txt");
        fs::write(&path, "not an image").unwrap();

        match Image::from_path(&path) {
            Err(Error::DecodeError(p, _)) => assert_eq!(p, path),
            other => panic!("expected decode error, got {:?}", other),
        }
    }
}
