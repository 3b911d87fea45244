// src/constants.rs

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_OCR_LANG: &str = "eng";

// Whole multipart body, in bytes
pub const DEFAULT_UPLOAD_LIMIT: usize = 50 * 1024 * 1024;

// Multipart field that carries the image
pub const UPLOAD_FIELD: &str = "file";
