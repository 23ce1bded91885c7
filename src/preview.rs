use crate::{
    cv::{FrameSource, Matrix, CV},
    setting::PreviewConfig,
    Result,
};

/// Camera frames pasted onto a fixed background canvas.
pub struct Preview<S: FrameSource> {
    source: S,
    canvas: Matrix,
    offset: (i32, i32),
}

impl<S: FrameSource> Preview<S> {
    pub fn new(source: S, background: Matrix, offset: (i32, i32)) -> Self {
        Self {
            source,
            canvas: background,
            offset,
        }
    }

    /// Reads the next frame and pastes it onto the canvas.
    pub fn next_composite(&mut self) -> Result<&Matrix> {
        let frame = self.source.get_frame()?;
        self.canvas.paste(&frame, self.offset)?;
        Ok(&self.canvas)
    }

    pub fn canvas(&self) -> &Matrix {
        &self.canvas
    }
}

impl Preview<CV> {
    /// Loads the background before touching the camera so a bad background
    /// path never opens the device.
    #[tracing::instrument(name = "Opening preview", err)]
    pub fn open(config: &PreviewConfig) -> Result<Self> {
        let background = Matrix::from_path(&config.background)?;
        let cam = CV::new(config.device, (config.width, config.height))?;
        Ok(Self::new(
            cam,
            background,
            (config.offset.x, config.offset.y),
        ))
    }
}
