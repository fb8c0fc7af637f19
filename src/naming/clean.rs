//! String helpers shared by display and export naming.

/// Raster extensions recognised when deriving an export extension.
pub const RASTER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Extension used when the filename has none of [`RASTER_EXTENSIONS`].
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Maximum length (in characters) of a cleaned title.
pub const MAX_TITLE_LEN: usize = 50;

/// Characters that are not allowed in filenames on common platforms.
pub const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Title used in export names when the AI title cleans down to nothing.
const EMPTY_EXPORT_TITLE: &str = "image";

fn collapse_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

fn truncate_chars(input: String, max: usize) -> String {
    match input.char_indices().nth(max) {
        Some((byte_idx, _)) => input[..byte_idx].to_string(),
        None => input,
    }
}

/// Clean an AI title for the interactive view: forbidden characters are removed.
pub fn clean_display_name(name: &str) -> String {
    let stripped: String = name
        .trim()
        .chars()
        .filter(|ch| !FORBIDDEN_CHARS.contains(ch))
        .collect();
    truncate_chars(collapse_whitespace(&stripped), MAX_TITLE_LEN)
}

/// Clean an AI title for export: forbidden characters become `_`.
pub fn clean_for_export(name: &str) -> String {
    let replaced: String = name
        .trim()
        .chars()
        .map(|ch| if FORBIDDEN_CHARS.contains(&ch) { '_' } else { ch })
        .collect();
    let cleaned = truncate_chars(collapse_whitespace(&replaced), MAX_TITLE_LEN);
    if cleaned.is_empty() {
        return EMPTY_EXPORT_TITLE.to_string();
    }
    cleaned
}

/// Clean a title typed into the suggestion list before it is stored as metadata.
///
/// Keeps letters, digits, `_`, whitespace and `-`.
pub fn clean_suggested_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|ch| ch.is_alphanumeric() || *ch == '_' || *ch == '-' || ch.is_whitespace())
        .collect();
    collapse_whitespace(kept.trim())
}

/// Lowercased raster extension of `filename`, or [`DEFAULT_EXTENSION`].
pub fn extract_extension(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| RASTER_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// Export name used when the image or its position is unknown.
///
/// Never empty, so an export never silently writes to an empty path.
pub fn export_fallback(section_number: Option<&str>, image_index: Option<usize>) -> String {
    let section = section_number.filter(|s| !s.is_empty()).unwrap_or("X");
    let index = image_index.filter(|&i| i > 0).unwrap_or(1);
    format!("FALLBACK-{section}_n_{index}.{DEFAULT_EXTENSION}")
}
