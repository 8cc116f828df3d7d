//! Upload validation.
//!
//! Checks a submitted filename against the fixed extension allow-list before
//! any bytes touch the disk. Pure functions, no side effects.

use std::path::Path;

use crate::error::AppError;

/// Accepted audio file extensions (compared lower-case, without the dot).
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["mp3", "wav", "m4a"];

/// The allow-list formatted for user-facing messages: `.mp3, .wav, .m4a`.
pub fn allowed_extensions_list() -> String {
    ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validate a filename against the allow-list.
///
/// Returns the lower-cased extension (without the dot) on success, so the
/// caller can tag the temp artifact with it. A filename with no extension is
/// unsupported: the empty suffix is not in the allow-set.
pub fn validate_filename(filename: &str) -> Result<String, AppError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        let suffix = if extension.is_empty() {
            String::new()
        } else {
            format!(".{extension}")
        };
        Err(AppError::UnsupportedFileType { extension: suffix })
    }
}
