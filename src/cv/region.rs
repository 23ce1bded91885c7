/// Rectangle in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Checks that the whole region lies inside a `canvas` of (width, height).
    pub fn fit(self, canvas: (i32, i32)) -> crate::Result<Self> {
        let fits = self.x >= 0
            && self.y >= 0
            && self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some_and(|r| r <= canvas.0)
            && self.y.checked_add(self.height).is_some_and(|b| b <= canvas.1);
        if !fits {
            return Err(crate::Error::RegionOutOfBounds {
                region: self,
                canvas,
            });
        }
        Ok(self)
    }
}

impl From<Region> for opencv::core::Rect {
    fn from(value: Region) -> Self {
        opencv::core::Rect::new(value.x, value.y, value.width, value.height)
    }
}
