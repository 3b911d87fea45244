use actix_multipart::form::MultipartFormConfig;
use actix_web::dev::ServiceResponse;
use actix_web::http::{header, StatusCode};
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers, Logger};
use actix_web::{error, web, App, HttpResponse, HttpServer};
use log::{info, warn};
use std::time::Instant;

use crate::config::Config;
use crate::handlers;
use crate::models::OcrEnvelope;
use crate::services::{OcrService, TesseractEngine};

pub async fn run() -> std::io::Result<()> {
    let config = Config::new();
    let host = config.host.clone();
    let port = config.port;

    print_banner(&host, port);
    info!("Server running at http://{}:{}/", host, port);

    match TesseractEngine::version() {
        Ok(version) => info!(
            "Using {} (lang={})",
            version.lines().next().unwrap_or("tesseract"),
            config.ocr_lang
        ),
        Err(e) => warn!("tesseract binary not usable, every OCR request will fail: {}", e),
    }
    if let Some(limit) = config.ocr_timeout {
        info!("OCR deadline: {:?}", limit);
    }

    let startup_time = Instant::now();
    let ocr_service = OcrService::from_config(&config);
    let upload_limit = config.upload_limit;

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(ocr_service.clone()))
            .app_data(multipart_config(upload_limit))
            .configure(configure_routes)
    })
    .bind((host, port))?
    .run()
    .await?;

    info!("Server stopped. Uptime: {:?}", startup_time.elapsed());
    Ok(())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/ocr")
            .wrap(ErrorHandlers::new().default_handler_client(envelope_client_error))
            .route(web::post().to(handlers::perform_ocr)),
    )
    .route("/healthz", web::get().to(handlers::healthz));
}

/// Rewrites plain-text client errors on `/ocr` into failure envelopes.
///
/// The multipart extractor rejects a wrong content type or a missing boundary
/// before `MultipartFormConfig::error_handler` is consulted; those rejections
/// (400/415) become 422 like every other unusable form. Other statuses are kept.
fn envelope_client_error<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let is_json = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let status = match res.status() {
        StatusCode::BAD_REQUEST | StatusCode::UNSUPPORTED_MEDIA_TYPE => StatusCode::UNPROCESSABLE_ENTITY,
        other => other,
    };
    let message = res
        .response()
        .error()
        .map(|e| e.to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| res.status().canonical_reason().unwrap_or("request rejected").to_string());
    warn!("Rejected OCR request ({}): {}", res.status(), message);

    let (req, _) = res.into_parts();
    let response = HttpResponse::build(status).json(OcrEnvelope::failure(message));
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}

/// Uploads are held in memory, so the memory limit tracks the total limit.
/// A form that cannot be extracted at all is answered with 422 and a failure envelope.
pub fn multipart_config(upload_limit: usize) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(upload_limit)
        .memory_limit(upload_limit)
        .error_handler(|err, _req| {
            warn!("Rejected OCR upload: {}", err);
            let response = HttpResponse::UnprocessableEntity().json(OcrEnvelope::failure(err.to_string()));
            error::InternalError::from_response(err, response).into()
        })
}

fn print_banner(host: &str, port: u16) {
    let banner = r#"
  ___   ____ ____
 / _ \ / ___|  _ \
| | | | |   | |_) |
| |_| | |___|  _ <
 \___/ \____|_| \_\
"#;
    println!("{}", banner);
    println!("         OCR gateway started at: http://{}:{}\n", host, port);
}
