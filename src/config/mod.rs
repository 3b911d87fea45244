use std::str::FromStr;
use std::time::Duration;

use crate::constants::{DEFAULT_HOST, DEFAULT_OCR_LANG, DEFAULT_PORT, DEFAULT_UPLOAD_LIMIT};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Tesseract language pack(s), e.g. `eng` or `eng+deu`.
    pub ocr_lang: String,
    pub ocr_dpi: Option<i32>,
    pub ocr_psm: Option<i32>,
    /// Deadline for decode + OCR. `None` lets a request run until the engine returns.
    pub ocr_timeout: Option<Duration>,
    pub upload_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_var(&lookup, "PORT").unwrap_or(DEFAULT_PORT),
            ocr_lang: lookup("OCR_LANG")
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_OCR_LANG.to_string()),
            ocr_dpi: parse_var(&lookup, "OCR_DPI"),
            ocr_psm: parse_var(&lookup, "OCR_PSM"),
            ocr_timeout: parse_var(&lookup, "OCR_TIMEOUT_SECS")
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs),
            upload_limit: parse_var(&lookup, "UPLOAD_LIMIT_BYTES").unwrap_or(DEFAULT_UPLOAD_LIMIT),
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.ocr_lang, "eng");
        assert_eq!(config.ocr_dpi, None);
        assert_eq!(config.ocr_timeout, None);
        assert_eq!(config.upload_limit, DEFAULT_UPLOAD_LIMIT);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9090"),
            ("OCR_LANG", "eng+deu"),
            ("OCR_PSM", "6"),
            ("OCR_TIMEOUT_SECS", "30"),
        ]);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(config.ocr_lang, "eng+deu");
        assert_eq!(config.ocr_psm, Some(6));
        assert_eq!(config.ocr_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("PORT", "not-a-port"),
            ("OCR_LANG", "  "),
            ("OCR_TIMEOUT_SECS", "0"),
        ]);
        assert_eq!(config.port, 8000);
        assert_eq!(config.ocr_lang, "eng");
        // Zero means "no deadline"
        assert_eq!(config.ocr_timeout, None);
    }
}
