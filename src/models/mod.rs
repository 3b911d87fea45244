use actix_multipart::form::MultipartForm;
use actix_multipart::form::bytes::Bytes;
use serde::Serialize;

/// Multipart body accepted by `POST /ocr`.
#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    pub file: Bytes,
}

/// JSON body returned by `POST /ocr`. Exactly one of `text` / `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcrEnvelope {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl OcrEnvelope {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            text: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let json = serde_json::to_value(OcrEnvelope::success("HELLO\n")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "text": "HELLO\n" }));
    }

    #[test]
    fn test_empty_text_is_still_present() {
        let json = serde_json::to_value(OcrEnvelope::success("")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "text": "" }));
    }

    #[test]
    fn test_failure_shape() {
        let envelope = OcrEnvelope::failure("cannot identify image file");
        assert!(!envelope.is_success());
        assert_eq!(envelope.text(), None);

        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": false, "error": "cannot identify image file" })
        );
    }
}
