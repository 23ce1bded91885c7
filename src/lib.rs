pub mod cv;
pub mod encoder;
pub mod error;
pub mod gui;
pub mod image;
pub mod math;
pub mod model;
pub mod preview;
pub mod result;
pub mod setting;
pub mod telemetry;

pub use error::Error;
pub use result::Result;
