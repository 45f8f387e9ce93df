//! Terminal display width helpers.
//!
//! ANSI-aware width calculation so preview labels clip on cell boundaries.

/// Display width of `text` after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    unicode_width::UnicodeWidthStr::width(&*clean_str)
}

/// Longest prefix of `text` (ANSI stripped) that fits in `max` cells.
pub fn clip_to_width(text: &str, max: usize) -> String {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    let mut out = String::new();
    let mut used = 0;
    for ch in clean_str.chars() {
        let width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + width > max {
            break;
        }
        used += width;
        out.push(ch);
    }
    out
}
