//! Character encoding detection
//!
//! HTML files on disk rarely declare their encoding out of band, so the
//! detection cascade works from the bytes themselves:
//!
//! 1. **Explicit label**: a caller-supplied charset (e.g. `--encoding`) wins
//! 2. **Byte-order mark**: UTF-8 / UTF-16LE / UTF-16BE BOMs
//! 3. **HTML meta tags**: `<meta charset>` or `<meta http-equiv="Content-Type">`
//! 4. **Default to UTF-8**
//!
//! # Examples
//!
//! ```rust
//! use htm2md::charset::detect_charset;
//!
//! let charset = detect_charset(Some("iso-8859-1"), b"<html>...</html>");
//! assert_eq!(charset, "ISO-8859-1");
//!
//! let html = b"<html><head><meta charset=\"windows-1252\"></head></html>";
//! assert_eq!(detect_charset(None, html), "WINDOWS-1252");
//!
//! assert_eq!(detect_charset(None, b"<p>No charset</p>"), "UTF-8");
//! ```

use encoding_rs::Encoding;
use regex::Regex;
use std::sync::OnceLock;

/// Default charset when detection fails
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// Maximum bytes to scan for meta charset tags (first 1024 bytes)
const META_SCAN_LIMIT: usize = 1024;

/// Detect the character encoding of an HTML byte stream
///
/// Always returns a charset name, normalized to uppercase, falling back to
/// `UTF-8` when nothing in the cascade matches. Blank explicit labels are
/// ignored.
pub fn detect_charset(explicit: Option<&str>, html: &[u8]) -> String {
    if let Some(label) = explicit
        && !label.trim().is_empty()
    {
        return normalize_charset(label.trim());
    }

    if let Some((encoding, _)) = Encoding::for_bom(html) {
        return normalize_charset(encoding.name());
    }

    if let Some(charset) = extract_charset_from_html(html) {
        return normalize_charset(&charset);
    }

    DEFAULT_CHARSET.to_string()
}

/// Extract charset from HTML meta tags
///
/// Supports the HTML5 form `<meta charset="UTF-8">` and the HTML4 form
/// `<meta http-equiv="Content-Type" content="text/html; charset=UTF-8">`.
/// Only the first 1024 bytes are scanned.
///
/// ```rust
/// use htm2md::charset::extract_charset_from_html;
///
/// let html = b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=GBK\">";
/// assert_eq!(extract_charset_from_html(html), Some("GBK".to_string()));
/// assert_eq!(extract_charset_from_html(b"<p>plain</p>"), None);
/// ```
pub fn extract_charset_from_html(html: &[u8]) -> Option<String> {
    let scan_limit = html.len().min(META_SCAN_LIMIT);

    // Lossy conversion is fine here, meta tags are ASCII
    let html_str = String::from_utf8_lossy(&html[..scan_limit]);

    static HTML5_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let html5_regex = HTML5_REGEX
        .get_or_init(|| Regex::new(r#"(?i)<meta\s+charset\s*=\s*["']?([^"';>\s]+)"#).ok());

    if let Some(regex) = html5_regex.as_ref()
        && let Some(m) = regex.captures(&html_str).and_then(|caps| caps.get(1))
    {
        return Some(m.as_str().to_string());
    }

    static HTML4_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    let html4_regex = HTML4_REGEX.get_or_init(|| {
        Regex::new(
            r#"(?i)<meta\s+http-equiv\s*=\s*["']?Content-Type["']?\s+content\s*=\s*["']?[^"'>]*charset\s*=\s*([^"';>\s]+)"#,
        )
        .ok()
    });

    html4_regex
        .as_ref()?
        .captures(&html_str)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Normalize charset name to uppercase
pub fn normalize_charset(charset: &str) -> String {
    charset.to_uppercase()
}
