//! Whitespace normalization for labels and display text

/// C `isspace` classification (includes vertical tab, unlike
/// [`u8::is_ascii_whitespace`]).
#[inline]
pub fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

/// Remove leading and trailing whitespace from a narrow buffer in place.
pub fn trim_edges(buf: &mut Vec<u8>) {
    let end = buf.iter().rposition(|&b| !is_space(b)).map_or(0, |p| p + 1);
    buf.truncate(end);
    let start = buf.iter().position(|&b| !is_space(b)).unwrap_or(buf.len());
    buf.drain(..start);
}

/// Collapse interior whitespace in display text.
///
/// - whitespace before the first visible character is dropped
/// - runs of spaces become a single space
/// - a space directly before a newline or tab is dropped, as are spaces
///   directly after one
/// - a trailing space is dropped
///
/// Applying this twice gives the same result as applying it once.
pub fn collapse_interior(text: &mut String) {
    let mut out = String::with_capacity(text.len());
    // Starts true so leading spaces are swallowed
    let mut after_space = true;
    let mut seen_visible = false;

    for ch in text.chars() {
        match ch {
            ' ' => {
                if after_space {
                    continue;
                }
                after_space = true;
            }
            '\n' | '\t' => {
                if !seen_visible {
                    continue;
                }
                if out.ends_with(' ') {
                    out.pop();
                }
                after_space = true;
            }
            _ => {
                seen_visible = true;
                after_space = false;
            }
        }
        out.push(ch);
    }

    if out.ends_with(' ') {
        out.pop();
    }

    *text = out;
}
