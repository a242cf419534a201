//! Fixed-width text fitting for grid display.
//!
//! All widths are measured in chars, not bytes.

use rust_decimal::Decimal;

/// Left-align `text` in exactly `width` chars, cutting the tail if needed.
pub fn fit_left(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.chars().take(width).collect()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Right-align `text` in exactly `width` chars, dropping trailing chars on overflow.
pub fn fit_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.chars().take(width).collect()
    } else {
        format!("{}{}", " ".repeat(width - len), text)
    }
}

/// Like [`fit_right`], but an overflow keeps `width - 1` leading chars and ends in `…`.
pub fn fit_right_ellipsis(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return fit_right(text, width);
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Format a number for display: trailing zeros are dropped.
pub fn format_number(n: Decimal) -> String {
    n.normalize().to_string()
}
