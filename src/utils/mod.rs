//! Common utilities and helper functions
//!
//! Escaping helpers shared by export and the CLI.

use std::fmt::Write;

/// Escape ASCII control characters C-style
///
/// Used before echoing caller-supplied values to a terminal. `\n`, `\t`,
/// `\r` and friends keep their mnemonic; the rest become three-digit octal.
pub fn escape_control_chars(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            '\u{07}' => escaped.push_str("\\a"),
            '\u{08}' => escaped.push_str("\\b"),
            '\u{0B}' => escaped.push_str("\\v"),
            '\u{0C}' => escaped.push_str("\\f"),
            c if c.is_ascii_control() && c != '\u{7F}' => {
                let _ = write!(escaped, "\\{:03o}", c as u32);
            }
            c => escaped.push(c),
        }
    }

    escaped
}

/// Replace every non-ASCII character of serialized JSON with `\uXXXX`
///
/// Characters outside the Basic Multilingual Plane become a surrogate pair.
/// Non-ASCII characters only occur inside JSON strings, so the output stays
/// equivalent JSON.
pub fn escape_json_non_ascii(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    let mut units = [0u16; 2];

    for c in json.chars() {
        if c.is_ascii() {
            escaped.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(escaped, "\\u{unit:04x}");
            }
        }
    }

    escaped
}

/// Escape forward slashes of serialized JSON as `\/`
pub fn escape_json_slashes(json: &str) -> String {
    json.replace('/', "\\/")
}
