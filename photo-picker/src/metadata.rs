// Normalization of raw capture/downscale responses into asset records.

use std::path::Path;

use crate::models::{AssetOrigin, AssetRecord};
use crate::traits::RawMedia;

const FILE_SCHEME: &str = "file://";
const DEFAULT_MIME: &str = "image/jpeg";

/// How a response's mime type is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MimeStrategy {
    /// The platform reports a reliable type; use it when present
    ReportedType,
    /// Sniff the file extension
    #[default]
    Extension,
}

/// Removes a local-file scheme prefix from `uri`
pub fn strip_file_scheme(uri: &str) -> &str {
    uri.strip_prefix(FILE_SCHEME).unwrap_or(uri)
}

/// Guesses the mime type from the file extension, case-insensitively
pub fn mime_from_extension(path: &str) -> &'static str {
    match Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => DEFAULT_MIME,
    }
}

/// Mime type of a raw response under the given strategy
pub fn infer_mime_type(raw: &RawMedia, strategy: MimeStrategy) -> String {
    if strategy == MimeStrategy::ReportedType {
        if let Some(reported) = raw.mime_type.as_deref().map(str::trim) {
            if !reported.is_empty() {
                return reported.to_string();
            }
        }
        log::debug!("No reported type for {}, falling back to extension", raw.uri);
    }

    let name = raw
        .file_name
        .as_deref()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| strip_file_scheme(&raw.uri));
    mime_from_extension(name).to_string()
}

/// Last path segment of `uri`
pub fn file_name_from_uri(uri: &str) -> String {
    strip_file_scheme(uri)
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Builds the canonical asset record for a raw response
pub fn normalize(raw: &RawMedia, origin: AssetOrigin, strategy: MimeStrategy) -> AssetRecord {
    let uri = strip_file_scheme(&raw.uri).to_string();
    let filename = raw
        .file_name
        .clone()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| file_name_from_uri(&uri));

    AssetRecord {
        mime_type: infer_mime_type(raw, strategy),
        uri,
        width: raw.width,
        height: raw.height,
        filename,
        source: origin,
        is_stored: raw.is_stored,
    }
}
