use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpResponse};
use log::{debug, error};

use crate::error::OcrFailure;
use crate::models::{OcrEnvelope, UploadForm};
use crate::services::OcrService;

pub async fn perform_ocr(
    form: MultipartForm<UploadForm>,
    ocr_service: web::Data<OcrService>,
) -> Result<HttpResponse, OcrFailure> {
    let upload = form.into_inner().file;
    debug!(
        "OCR upload: {} bytes, name={:?}, content-type={:?}",
        upload.data.len(),
        upload.file_name,
        upload.content_type
    );

    match ocr_service.recognize(upload.data).await {
        Ok(text) => Ok(HttpResponse::Ok().json(OcrEnvelope::success(text))),
        Err(e) => {
            error!("OCR failed ({}): {}", e.kind(), e);
            Err(e)
        }
    }
}

pub async fn healthz() -> &'static str {
    "OK"
}
