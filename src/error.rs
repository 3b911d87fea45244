use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::OcrEnvelope;

/// Everything that can go wrong between "bytes received" and "text returned".
///
/// The caller always sees HTTP 500 with a failure envelope; the variant only
/// exists so the cause can be logged and asserted on.
#[derive(Debug, Error)]
pub enum OcrFailure {
    #[error("{0}")]
    Decode(#[from] DecodeError),
    #[error("{0}")]
    Engine(#[from] OcrError),
    #[error("{0}")]
    Unknown(String),
}

impl OcrFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            OcrFailure::Decode(_) => "decode",
            OcrFailure::Engine(_) => "ocr_engine",
            OcrFailure::Unknown(_) => "unknown",
        }
    }
}

impl ResponseError for OcrFailure {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(OcrEnvelope::failure(self.to_string()))
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot identify image file: payload is empty")]
    Empty,
    #[error("cannot identify image file: {len} bytes not recognized as any of {tried}")]
    Unrecognized { len: usize, tried: String },
}

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("failed to hand image to tesseract: {0}")]
    Prepare(String),
    #[error("tesseract failed: {0}")]
    Engine(String),
    #[error("OCR did not finish within {0:?}")]
    Timeout(std::time::Duration),
}
