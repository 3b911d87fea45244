use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::models::OcrEnvelope;
use crate::services::OcrService;

#[derive(Parser)]
#[command(name = "ocr-gateway")]
#[command(author, version, about = "HTTP front-end for Tesseract OCR", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve,

    /// Run OCR on a local image and print the JSON envelope
    Recognize {
        /// Image file (PNG, JPEG, GIF, WebP, BMP, TIFF, ICO, PNM)
        path: PathBuf,
    },
}

/// Prints the same envelope `POST /ocr` would return. Returns `false` on failure.
pub fn handle_recognize(path: &Path) -> Result<bool> {
    let config = Config::new();
    let service = OcrService::from_config(&config);

    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    info!("Running {} on {} ({} bytes)", service.engine_id(), path.display(), bytes.len());

    let envelope = match service.recognize_blocking(&bytes) {
        Ok(text) => OcrEnvelope::success(text),
        Err(e) => {
            error!("OCR failed ({}): {}", e.kind(), e);
            OcrEnvelope::failure(e.to_string())
        }
    };

    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(envelope.is_success())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["ocr-gateway"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_recognize_takes_path() {
        let cli = Cli::try_parse_from(["ocr-gateway", "recognize", "scan.png"]).unwrap();
        match cli.command {
            Some(Commands::Recognize { path }) => assert_eq!(path, PathBuf::from("scan.png")),
            _ => panic!("expected recognize"),
        }
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = handle_recognize(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
