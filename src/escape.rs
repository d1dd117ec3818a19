//! HTML escaping of decoded text lines.

use quick_xml::escape::escape;

/// Escape one decoded line for an HTML text node and append `\n`.
///
/// `<`, `>`, `&`, `"` and `'` are replaced with entity references.
pub fn escape_line(line: &str) -> String {
    let escaped = escape(line);
    let mut out = String::with_capacity(escaped.len() + 1);
    out.push_str(&escaped);
    out.push('\n');
    out
}

/// Escape free text (file names, labels) for use inside markup.
pub fn escape_text(text: &str) -> String {
    escape(text).into_owned()
}
