//! Byte offset to line/column mapping.
//!
//! tree-sitter reports byte offsets into UTF-8 source, while ESTree consumers
//! index strings in UTF-16 code units. [`LineIndex`] converts between the two:
//! lines are 1-based, columns and range offsets count UTF-16 code units.
//!
//! Line terminators are the ECMAScript ones: `\n`, `\r\n`, `\r`, U+2028 and
//! U+2029.

use crate::estree::Position;

#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the first character of every line.
    line_starts: Vec<usize>,
    len: usize,
    ascii: bool,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push(i + 1),
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    line_starts.push(i + 2);
                    i += 1;
                }
                b'\r' => line_starts.push(i + 1),
                // U+2028 / U+2029 encode as E2 80 A8 / E2 80 A9.
                0xE2 if bytes.get(i + 1) == Some(&0x80)
                    && matches!(bytes.get(i + 2), Some(0xA8 | 0xA9)) =>
                {
                    line_starts.push(i + 3);
                    i += 2;
                }
                _ => {}
            }
            i += 1;
        }
        Self {
            line_starts,
            len: source.len(),
            ascii: source.is_ascii(),
        }
    }

    /// Number of lines, counting a trailing empty line.
    #[cfg(test)]
    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line/column of a byte offset. Offsets past the end clamp to the end.
    pub fn position(&self, source: &str, offset: usize) -> Position {
        let offset = self.clamp(source, offset);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let start = self.line_starts[line];
        let column = if self.ascii {
            offset - start
        } else {
            utf16_len(&source[start..offset])
        };
        Position {
            line: line + 1,
            column,
        }
    }

    /// UTF-16 offset of a byte offset, as used for `range`.
    pub fn offset(&self, source: &str, offset: usize) -> usize {
        let offset = self.clamp(source, offset);
        if self.ascii {
            offset
        } else {
            utf16_len(&source[..offset])
        }
    }

    /// Clamp to the buffer and back off to a char boundary.
    fn clamp(&self, source: &str, offset: usize) -> usize {
        let mut offset = offset.min(self.len);
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}

fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: usize, column: usize) -> Position {
        Position { line, column }
    }

    #[test]
    fn test_first_line_is_one() {
        let source = "let a = 1;";
        let index = LineIndex::new(source);
        assert_eq!(index.position(source, 0), pos(1, 0));
        assert_eq!(index.position(source, 4), pos(1, 4));
    }

    #[test]
    fn test_line_terminators() {
        let source = "a\nb\r\nc\rd\u{2028}e";
        let index = LineIndex::new(source);
        assert_eq!(index.line_count(), 5);
        assert_eq!(index.position(source, source.find('b').unwrap()), pos(2, 0));
        assert_eq!(index.position(source, source.find('c').unwrap()), pos(3, 0));
        assert_eq!(index.position(source, source.find('d').unwrap()), pos(4, 0));
        assert_eq!(index.position(source, source.find('e').unwrap()), pos(5, 0));
    }

    #[test]
    fn test_columns_count_utf16_units() {
        let source = "'é😀' + x";
        let index = LineIndex::new(source);
        let x = source.find('x').unwrap();
        // quote, é (1), 😀 (2), quote, space, plus, space
        assert_eq!(index.position(source, x), pos(1, 8));
        assert_eq!(index.offset(source, x), 8);
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let source = "ab\ncd";
        let index = LineIndex::new(source);
        assert_eq!(index.position(source, 100), pos(2, 2));
        assert_eq!(index.offset(source, 100), 5);
    }

    #[test]
    fn test_end_of_line_offset() {
        let source = "ab\ncd";
        let index = LineIndex::new(source);
        assert_eq!(index.position(source, 2), pos(1, 2));
        assert_eq!(index.position(source, 3), pos(2, 0));
    }
}
