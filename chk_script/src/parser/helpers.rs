use crate::normalize::LINE_END;

/// Position in normalized text plus the 1-based line it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    pub pos: usize,
    pub line: usize,
}

impl Cursor {
    pub fn start() -> Self {
        Self { pos: 0, line: 1 }
    }

    pub fn advance(self, count: usize) -> Self {
        Self {
            pos: self.pos + count,
            ..self
        }
    }

    /// Move to `pos` on the same line.
    pub fn at(self, pos: usize) -> Self {
        Self { pos, ..self }
    }
}

pub(crate) fn skip_line_ends(text: &[u8], mut cursor: Cursor) -> Cursor {
    while text[cursor.pos..].starts_with(LINE_END) {
        cursor.pos += LINE_END.len();
        cursor.line += 1;
    }
    cursor
}

/// Next `target` outside quotes at or after `from`. Scanning gives up at an unquoted `stop`.
pub(crate) fn find_unquoted(text: &[u8], from: usize, target: u8, stop: Option<u8>) -> Option<usize> {
    let mut quoted = false;
    let mut pos = from;
    while pos < text.len() {
        let byte = text[pos];
        if quoted {
            match byte {
                b'\\' => pos += 1,
                b'"' => quoted = false,
                _ => {},
            }
        } else if byte == target {
            return Some(pos);
        } else if Some(byte) == stop {
            return None;
        } else if byte == b'"' {
            quoted = true;
        }
        pos += 1;
    }
    None
}

/// Position of the line terminator ending the line that contains `from`, or the end of text.
pub(crate) fn line_end(text: &[u8], from: usize) -> usize {
    find_unquoted(text, from, LINE_END[0], None).unwrap_or(text.len())
}

/// An argument with surrounding line breaks removed, and how many breaks lead and trail it.
pub(crate) struct Argument<'t> {
    pub text: &'t [u8],
    pub leading_lines: usize,
    pub trailing_lines: usize,
}

pub(crate) fn argument(text: &[u8]) -> Argument<'_> {
    let mut slice = text;
    let mut leading_lines = 0;
    while let Some(rest) = slice.strip_prefix(LINE_END) {
        slice = rest;
        leading_lines += 1;
    }
    let mut trailing_lines = 0;
    while let Some(rest) = slice.strip_suffix(LINE_END) {
        slice = rest;
        trailing_lines += 1;
    }
    Argument {
        text: slice,
        leading_lines,
        trailing_lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquoted_search_skips_quoted_text() {
        let text = br#"A("x,\"y)",B)"#;
        assert_eq!(find_unquoted(text, 2, b',', None), Some(10));
        assert_eq!(find_unquoted(text, 2, b')', None), Some(12));
    }

    #[test]
    fn unquoted_search_stops_at_stop_byte() {
        assert_eq!(find_unquoted(b"P1){,", 0, b',', Some(b'{')), None);
        assert_eq!(find_unquoted(b"P1,P2)", 0, b',', Some(b'{')), Some(2));
    }

    #[test]
    fn line_breaks_are_counted_while_skipping() {
        let cursor = skip_line_ends(b"\r\n\r\nX", Cursor::start());
        assert_eq!(cursor, Cursor { pos: 4, line: 3 });
        assert_eq!(line_end(b"AB\r\nC", 0), 2);
        assert_eq!(line_end(b"ABC", 1), 3);
    }

    #[test]
    fn arguments_shed_surrounding_line_breaks() {
        let arg = argument(b"\r\nPLAYER1\r\n");
        assert_eq!(arg.text, b"PLAYER1");
        assert_eq!((arg.leading_lines, arg.trailing_lines), (1, 1));
    }
}
