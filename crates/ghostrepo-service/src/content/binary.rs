//! Binary file detection by extension.
//!
//! Only the extension is inspected: a text file named with one of these
//! extensions is suppressed, and a binary file without one is served as
//! lossy UTF-8.

/// Extensions whose content is never returned to the viewer.
pub const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "mp3", "wav", "ogg", "mp4", "mov", "avi", "mkv",
    "pdf", "exe", "zip", "tar", "gz", "7z",
];

/// Whether `path` names a file the viewer treats as binary.
pub fn is_binary_path(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => BINARY_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext)),
        _ => false,
    }
}
