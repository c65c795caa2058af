//! Input sanitization applied before validation and storage.

/// Escape characters that are unsafe in HTML text or attribute context.
///
/// `&`, `<`, `>`, `"` and `'` become character entities; everything else is
/// passed through unchanged. Validation always runs on the escaped value, so
/// length bounds count the entities.
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Trim surrounding whitespace, then [`sanitize`].
pub fn clean(raw: &str) -> String {
    sanitize(raw.trim())
}
