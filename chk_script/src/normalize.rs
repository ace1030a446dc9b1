//! Text normalization ahead of parsing.
//!
//! Outside quotes: spaces and tabs are dropped, `//` comments are removed, letters are
//! uppercased and every line ending (CR, LF, CRLF, VT, FF) becomes CRLF. Inside quotes escape
//! sequences are decoded, except that `"` and `\` stay escaped so quote boundaries survive.

use crate::CompileError;

/// The single line terminator left in normalized text.
pub const LINE_END: &[u8] = b"\r\n";

/// Normalize raw trigger text.
///
/// # Errors
/// Returns [`CompileError::OutOfMemory`] if the output buffer cannot be allocated.
pub fn normalize(text: &[u8]) -> Result<Vec<u8>, CompileError> {
    // Worst case every byte is a lone CR that expands to CRLF, plus a closing quote.
    let capacity = text.len().saturating_mul(2).saturating_add(1);
    let mut out = Vec::new();
    out.try_reserve(capacity).map_err(|_| CompileError::OutOfMemory)?;

    let mut pos = 0;
    while pos < text.len() {
        let byte = text[pos];
        pos += 1;
        match byte {
            b' ' | b'\t' => {},
            b'\r' => {
                if text.get(pos) == Some(&b'\n') {
                    pos += 1;
                }
                out.extend_from_slice(LINE_END);
            },
            b'\n' | 0x0B | 0x0C => out.extend_from_slice(LINE_END),
            b'/' if text.get(pos) == Some(&b'/') => {
                pos = text[pos..]
                    .iter()
                    .position(|b| is_line_break(*b))
                    .map_or(text.len(), |offset| pos + offset);
            },
            b'"' => pos = copy_quoted(text, pos, &mut out),
            _ => out.push(byte.to_ascii_uppercase()),
        }
    }
    Ok(out)
}

fn is_line_break(byte: u8) -> bool {
    matches!(byte, b'\r' | b'\n' | 0x0B | 0x0C)
}

/// Copy a quoted region starting just after its opening quote; returns the position after the
/// closing quote. An unterminated region runs to the end of the text and is closed.
fn copy_quoted(text: &[u8], start: usize, out: &mut Vec<u8>) -> usize {
    out.push(b'"');
    let mut pos = start;
    while pos < text.len() {
        match text[pos] {
            b'"' => {
                out.push(b'"');
                return pos + 1;
            },
            b'\\' => {
                let Some(&escaped) = text.get(pos + 1) else {
                    push_literal(out, b'\\');
                    pos += 1;
                    continue;
                };
                pos += 2;
                match escaped {
                    b'r' => out.push(b'\r'),
                    b'n' => out.push(b'\n'),
                    b't' => out.push(b'\t'),
                    b'x' | b'X' => match hex_pair(text.get(pos..pos + 2), hex_digit) {
                        Some(value) => {
                            push_literal(out, value);
                            pos += 2;
                        },
                        None => push_literal(out, escaped),
                    },
                    other => push_literal(out, other),
                }
            },
            b'<' if text.get(pos + 3) == Some(&b'>') => match hex_pair(text.get(pos + 1..pos + 3), upper_hex_digit) {
                Some(value) => {
                    push_literal(out, value);
                    pos += 4;
                },
                None => {
                    out.push(b'<');
                    pos += 1;
                },
            },
            byte => {
                out.push(byte);
                pos += 1;
            },
        }
    }
    out.push(b'"');
    text.len()
}

/// Push a decoded byte, keeping `"` and `\` escaped.
fn push_literal(out: &mut Vec<u8>, byte: u8) {
    if byte == b'"' || byte == b'\\' {
        out.push(b'\\');
    }
    out.push(byte);
}

fn hex_pair(digits: Option<&[u8]>, digit: fn(u8) -> Option<u8>) -> Option<u8> {
    match digits? {
        [high, low] => Some(digit(*high)? << 4 | digit(*low)?),
        _ => None,
    }
}

fn hex_digit(byte: u8) -> Option<u8> {
    char::from(byte).to_digit(16).and_then(|d| u8::try_from(d).ok())
}

fn upper_hex_digit(byte: u8) -> Option<u8> {
    if byte.is_ascii_lowercase() { None } else { hex_digit(byte) }
}

/// Undo the `\"` and `\\` escapes kept in normalized quoted text.
pub(crate) fn unescape_quoted(inner: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(inner.len());
    let mut bytes = inner.iter().copied().peekable();
    while let Some(byte) = bytes.next() {
        if byte == b'\\'
            && let Some(next) = bytes.next_if(|b| *b == b'"' || *b == b'\\')
        {
            out.push(next);
        } else {
            out.push(byte);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(text: &str) -> Vec<u8> {
        normalize(text.as_bytes()).expect("normalize")
    }

    #[test]
    fn unquoted_text_is_compacted_and_uppercased() {
        assert_eq!(norm("Trigger( player 1 )\t{"), b"TRIGGER(PLAYER1){".to_vec());
    }

    #[test]
    fn every_line_ending_becomes_crlf() {
        assert_eq!(norm("a\nb\r\nc\rd\x0Be\x0Cf"), b"A\r\nB\r\nC\r\nD\r\nE\r\nF".to_vec());
    }

    #[test]
    fn comments_are_removed_up_to_the_line_end() {
        assert_eq!(norm("a // note\r\nb//x"), b"A\r\nB".to_vec());
        assert_eq!(norm("\"http://x\""), b"\"http://x\"".to_vec());
    }

    #[test]
    fn quoted_text_keeps_case_and_spaces() {
        assert_eq!(norm("\"Hello World\""), b"\"Hello World\"".to_vec());
    }

    #[test]
    fn escapes_are_decoded_inside_quotes() {
        assert_eq!(norm(r#""a\r\n\tb""#), b"\"a\r\n\tb\"".to_vec());
        assert_eq!(norm(r#""\x41<42>""#), b"\"AB\"".to_vec());
        assert_eq!(norm(r#""<4a>""#), b"\"<4a>\"".to_vec());
    }

    #[test]
    fn quote_and_backslash_stay_escaped() {
        assert_eq!(norm(r#""say \"hi\" \\ <22>""#), br#""say \"hi\" \\ \"""#.to_vec());
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        assert_eq!(norm("\"open  end"), b"\"open  end\"".to_vec());
    }

    #[test]
    fn unescape_restores_quotes_and_backslashes() {
        assert_eq!(unescape_quoted(br#"say \"hi\" \\ \q"#), br#"say "hi" \ \q"#.to_vec());
    }
}
