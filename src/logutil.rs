//! Helpers for putting MOTD text into logs and terminal output.
//!
//! MOTDs are multi-line and carry `§` formatting codes; neither survives a
//! single-line log record well.

use std::fmt::Write;

const MAX_PREVIEW: usize = 120;

/// Escape a message for single-line logging:
/// - backslash => `\\\\`
/// - `\n` => `\\n`, `\r` => `\\r`, `\t` => `\\t`
/// - other control characters => `\xNN`
///
/// Output is capped at `MAX_PREVIEW` characters with an ellipsis.
pub fn escape_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Remove `§x` formatting codes, leaving the visible text.
pub fn strip_formatting(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '§' {
            chars.next();
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_line_breaks() {
        assert_eq!(escape_log("Line1\nLine2\r\tEnd"), "Line1\\nLine2\\r\\tEnd");
        assert_eq!(escape_log("bell\u{7}"), "bell\\x07");
    }

    #[test]
    fn literal_escape_differs_from_real_line_break() {
        assert_eq!(escape_log("a\\nb"), "a\\\\nb");
        assert_ne!(escape_log("a\\nb"), escape_log("a\nb"));
    }

    #[test]
    fn truncates_long_messages() {
        let long = "x".repeat(500);
        let esc = escape_log(&long);
        assert_eq!(esc.chars().count(), MAX_PREVIEW + 1);
        assert!(esc.ends_with('…'));
    }

    #[test]
    fn strips_section_codes() {
        assert_eq!(strip_formatting("§aGreen §lbold§r\n§7grey"), "Green bold\ngrey");
        assert_eq!(strip_formatting("trailing §"), "trailing ");
    }
}
