//! Terminal display width helpers.
//!
//! Panel blocks carry ANSI styling, so padding and truncation must measure
//! what the terminal shows rather than the byte length.

use unicode_width::UnicodeWidthChar;

/// Compute the display width of a string after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    unicode_width::UnicodeWidthStr::width(&*clean_str)
}

/// Truncate plain text to `max` columns, ending with `…` when shortened.
pub fn truncate(text: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if unicode_width::UnicodeWidthStr::width(text) <= max {
        return text.to_string();
    }

    let budget = max - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Pad (or cut) an already styled line so it occupies exactly `width` columns.
pub fn fit_line(line: &str, width: usize) -> String {
    let current = display_width(line);
    if current <= width {
        let mut padded = line.to_string();
        padded.push_str(&" ".repeat(width - current));
        return padded;
    }

    let clean = strip_ansi_escapes::strip(line);
    let plain = String::from_utf8_lossy(&clean);
    let mut fitted = truncate(&plain, width);
    let used = unicode_width::UnicodeWidthStr::width(fitted.as_str());
    fitted.push_str(&" ".repeat(width.saturating_sub(used)));
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_ignores_ansi_sequences() {
        assert_eq!(display_width("\x1b[1mLEFT\x1b[0m"), 4);
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("RIGHT PANEL", 20), "RIGHT PANEL");
        assert_eq!(truncate("RIGHT PANEL", 6), "RIGHT…");
        assert_eq!(truncate("RIGHT PANEL", 1), "…");
        assert_eq!(truncate("RIGHT PANEL", 0), "");
    }

    #[test]
    fn fit_line_pads_and_cuts() {
        assert_eq!(fit_line("ab", 4), "ab  ");
        assert_eq!(fit_line("abcdef", 4), "abc…");
        assert_eq!(display_width(&fit_line("\x1b[31mab\x1b[0m", 5)), 5);
    }
}
