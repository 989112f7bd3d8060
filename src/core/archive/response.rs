//! Downloadable payloads
//!
//! The hosting layer (web view, task runner) turns a [`DownloadPayload`]
//! into an HTTP response; this crate only guarantees the headers are exact.

/// Content types for the supported export formats
pub mod content_types {
    pub const ZIP: &str = "application/zip";
    pub const KML: &str = "application/vnd.google-earth.kml+xml";
    pub const KMZ: &str = "application/vnd.google-earth.kmz";
}

/// An assembled download: body plus the headers a hosting layer must set
#[derive(Debug)]
pub struct DownloadPayload {
    /// Full output filename, extension included
    pub file_name: String,
    /// Fixed content type for the format
    pub content_type: &'static str,
    /// Assembled archive or document bytes
    pub body: Vec<u8>,
}

impl DownloadPayload {
    pub fn new(file_name: impl Into<String>, content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            body,
        }
    }

    /// Exact byte length of the body
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// `Content-Disposition` header value
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.file_name)
    }

    /// The complete header set for an HTTP download response
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Content-Type", self.content_type.to_string()),
            ("Content-Disposition", self.content_disposition()),
            ("Content-Length", self.content_length().to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_length_is_exact_byte_count() {
        let payload = DownloadPayload::new("records.zip", content_types::ZIP, vec![0u8; 1234]);
        assert_eq!(payload.content_length(), 1234);
        let headers = payload.headers();
        assert!(headers.contains(&("Content-Length", "1234".to_string())));
    }

    #[test]
    fn test_disposition_includes_filename() {
        let payload = DownloadPayload::new("SANSA-search-Metadata.zip", content_types::ZIP, vec![]);
        assert_eq!(
            payload.content_disposition(),
            "attachment; filename=SANSA-search-Metadata.zip"
        );
    }

    #[test]
    fn test_kml_content_type() {
        let payload = DownloadPayload::new("records.kml", content_types::KML, vec![]);
        assert_eq!(
            payload.headers()[0],
            ("Content-Type", "application/vnd.google-earth.kml+xml".to_string())
        );
    }
}
