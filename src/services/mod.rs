mod ocr;
pub use ocr::*;

mod decoder;
pub use decoder::*;
