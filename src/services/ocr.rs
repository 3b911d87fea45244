use std::sync::Arc;
use std::time::Duration;

use actix_web::web::Bytes;
use image::DynamicImage;
use log::debug;
use rusty_tesseract::{Args, Image};

use crate::config::Config;
use crate::error::{OcrError, OcrFailure};
use crate::services::ImageDecoder;

/// Something that turns a decoded raster image into text.
///
/// Implementations are blocking; callers run them on the blocking pool.
pub trait OcrEngine: Send + Sync {
    fn extract_text(&self, image: &DynamicImage) -> Result<String, OcrError>;
    fn engine_id(&self) -> &'static str;
}

pub struct TesseractEngine {
    args: Args,
}

impl TesseractEngine {
    pub fn new(args: Args) -> Self {
        Self { args }
    }

    pub fn from_config(config: &Config) -> Self {
        // Unset flags are not passed, so tesseract picks its own defaults.
        let args = Args {
            lang: config.ocr_lang.clone(),
            dpi: config.ocr_dpi,
            psm: config.ocr_psm,
            oem: None,
            ..Args::default()
        };
        Self::new(args)
    }

    /// Version string of the installed `tesseract` binary.
    pub fn version() -> Result<String, OcrError> {
        rusty_tesseract::get_tesseract_version().map_err(|e| OcrError::Engine(e.to_string()))
    }
}

impl OcrEngine for TesseractEngine {
    fn extract_text(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let image = Image::from_dynamic_image(image).map_err(|e| OcrError::Prepare(e.to_string()))?;
        rusty_tesseract::image_to_string(&image, &self.args).map_err(|e| OcrError::Engine(e.to_string()))
    }

    fn engine_id(&self) -> &'static str {
        "tesseract"
    }
}

/// Decode + OCR pipeline shared by the HTTP handler and the CLI.
#[derive(Clone)]
pub struct OcrService {
    decoder: ImageDecoder,
    engine: Arc<dyn OcrEngine>,
    timeout: Option<Duration>,
}

impl OcrService {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            decoder: ImageDecoder::new(),
            engine,
            timeout: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(TesseractEngine::from_config(config))).with_timeout(config.ocr_timeout)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn engine_id(&self) -> &'static str {
        self.engine.engine_id()
    }

    /// Runs on the calling thread.
    pub fn recognize_blocking(&self, bytes: &[u8]) -> Result<String, OcrFailure> {
        let (image, format) = self.decoder.decode(bytes)?;
        let text = self.engine.extract_text(&image)?;
        debug!(
            "{} extracted {} chars from {:?} image",
            self.engine.engine_id(),
            text.chars().count(),
            format
        );
        Ok(text)
    }

    /// Runs decode + OCR on the blocking pool, bounded by the configured deadline if any.
    pub async fn recognize(&self, bytes: Bytes) -> Result<String, OcrFailure> {
        let service = self.clone();
        let task = tokio::task::spawn_blocking(move || service.recognize_blocking(&bytes));

        let joined = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, task)
                .await
                .map_err(|_| OcrFailure::from(OcrError::Timeout(limit)))?,
            None => task.await,
        };

        joined.map_err(|e| OcrFailure::Unknown(format!("OCR worker failed: {}", e)))?
    }
}
