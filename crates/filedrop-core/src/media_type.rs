//! Extension-driven media classification.
//!
//! Maps a display name to a MIME type and a coarse category. The category
//! decides delivery: video/image/audio render inline and advertise byte-range
//! support; documents and unknown types are forced downloads.

use std::path::Path;

/// Coarse media category driving inline-vs-attachment disposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    Video,
    Image,
    Audio,
    Document,
    Other,
}

impl MediaCategory {
    /// Whether the file is eligible for inline (browser-rendered) delivery
    /// and advertises `Accept-Ranges: bytes`.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            MediaCategory::Video | MediaCategory::Image | MediaCategory::Audio
        )
    }
}

/// Resolved content type for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentType {
    pub mime: &'static str,
    pub category: MediaCategory,
}

/// Classify a file by its extension (case-insensitive).
///
/// Unknown or missing extensions fall back to `application/octet-stream` /
/// `Other`, which still downloads fine as a whole-file transfer.
pub fn classify(display_name: &str) -> ContentType {
    use MediaCategory::*;

    let extension = Path::new(display_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let (mime, category) = match extension.as_str() {
        // Video
        "mp4" => ("video/mp4", Video),
        "m4v" => ("video/mp4", Video),
        "webm" => ("video/webm", Video),
        "mkv" => ("video/x-matroska", Video),
        "mov" => ("video/quicktime", Video),
        "avi" => ("video/x-msvideo", Video),
        // Image
        "jpg" | "jpeg" => ("image/jpeg", Image),
        "png" => ("image/png", Image),
        "gif" => ("image/gif", Image),
        "webp" => ("image/webp", Image),
        "svg" => ("image/svg+xml", Image),
        "bmp" => ("image/bmp", Image),
        "ico" => ("image/x-icon", Image),
        "avif" => ("image/avif", Image),
        // Audio
        "mp3" => ("audio/mpeg", Audio),
        "wav" => ("audio/wav", Audio),
        "ogg" => ("audio/ogg", Audio),
        "flac" => ("audio/flac", Audio),
        "m4a" => ("audio/mp4", Audio),
        "aac" => ("audio/aac", Audio),
        "opus" => ("audio/opus", Audio),
        // Document
        "pdf" => ("application/pdf", Document),
        "txt" => ("text/plain", Document),
        "md" => ("text/markdown", Document),
        "csv" => ("text/csv", Document),
        "doc" => ("application/msword", Document),
        "docx" => (
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Document,
        ),
        "xls" => ("application/vnd.ms-excel", Document),
        "xlsx" => (
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Document,
        ),
        "ppt" => ("application/vnd.ms-powerpoint", Document),
        "pptx" => (
            "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            Document,
        ),
        "zip" => ("application/zip", Document),
        _ => ("application/octet-stream", Other),
    };

    ContentType { mime, category }
}
