pub use embedding::Embedding;
pub use face::{nms, Face, KeyPoints};
pub use tensor::{Normal, Tensor, TensorData};

pub mod embedding;
pub mod face;
pub mod tensor;
