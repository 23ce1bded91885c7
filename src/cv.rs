use opencv::{core, prelude::*, videoio};

pub use matrix::Matrix;
pub use region::Region;

pub mod matrix;
pub mod region;

/// Anything that hands out camera frames one at a time.
pub trait FrameSource {
    fn get_frame(&mut self) -> crate::Result<Matrix>;
}

pub struct CV {
    device: i32,
    cam: videoio::VideoCapture,
}

impl CV {
    #[tracing::instrument(name = "Opening capture device", err)]
    pub fn new(device: i32, size: (u32, u32)) -> crate::Result<Self> {
        let (width, height) = size;
        //https://docs.opencv.org/3.4/d4/d15/group__videoio__flags__base.html
        let mut cam =
            videoio::VideoCapture::new(device, videoio::CAP_ANY).map_err(crate::Error::CVError)?;

        if !cam.is_opened().map_err(crate::Error::CVError)? {
            return Err(crate::Error::DeviceUnavailable(device));
        }

        // the driver may pick the closest supported mode
        cam.set(videoio::CAP_PROP_FRAME_WIDTH, width as f64)
            .map_err(crate::Error::CVError)?;
        cam.set(videoio::CAP_PROP_FRAME_HEIGHT, height as f64)
            .map_err(crate::Error::CVError)?;

        Ok(Self { device, cam })
    }
}

impl FrameSource for CV {
    fn get_frame(&mut self) -> crate::Result<Matrix> {
        let mut frame = core::Mat::default();
        let read = self.cam.read(&mut frame).map_err(crate::Error::CVError)?;
        if !read || frame.empty() {
            return Err(crate::Error::DeviceUnavailable(self.device));
        }
        Ok(Matrix::from(frame))
    }
}

impl std::fmt::Debug for CV {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CV").field("device", &self.device).finish()
    }
}

impl Drop for CV {
    fn drop(&mut self) {
        tracing::info!(device = self.device, "Releasing capture device");
        let _ = self.cam.release();
    }
}
