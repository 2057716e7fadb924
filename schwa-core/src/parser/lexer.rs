//! Lexical pre-pass for delimiter scanning.
//!
//! Structural parsers only need to know where blocks open and close, but a
//! `{` inside a string literal or a comment must not count. [`mask`] blanks
//! those regions out with spaces so that plain byte scanning over the masked
//! text sees code only. Byte offsets and newlines are preserved, so every
//! position found in the masked text is also a position in the original.

/// Lexical region the scanner is currently in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Region {
    Code,
    LineComment,
    BlockComment,
    StringLiteral,
    CharLiteral,
    TextBlock,
}

/// Blank out comments and the contents of string, char and text-block
/// literals. Quote characters stay in place; comment markers do not.
///
/// The result is the same length as `source` and is valid UTF-8: masked
/// bytes become ASCII spaces, unmasked bytes are copied unchanged.
pub fn mask(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = bytes.to_vec();
    let mut region = Region::Code;
    let mut i = 0;

    let blank = |out: &mut Vec<u8>, at: usize| {
        if out[at] != b'\n' {
            out[at] = b' ';
        }
    };

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();

        match region {
            Region::Code => match b {
                b'/' if next == Some(b'/') => {
                    region = Region::LineComment;
                    blank(&mut out, i);
                    blank(&mut out, i + 1);
                    i += 2;
                    continue;
                }
                b'/' if next == Some(b'*') => {
                    region = Region::BlockComment;
                    blank(&mut out, i);
                    blank(&mut out, i + 1);
                    i += 2;
                    continue;
                }
                b'"' if bytes[i..].starts_with(b"\"\"\"") => {
                    region = Region::TextBlock;
                    i += 3;
                    continue;
                }
                b'"' => region = Region::StringLiteral,
                b'\'' => region = Region::CharLiteral,
                _ => {}
            },
            Region::LineComment => {
                if b == b'\n' {
                    region = Region::Code;
                } else {
                    blank(&mut out, i);
                }
            }
            Region::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    blank(&mut out, i);
                    blank(&mut out, i + 1);
                    region = Region::Code;
                    i += 2;
                    continue;
                }
                blank(&mut out, i);
            }
            Region::StringLiteral | Region::CharLiteral => {
                let quote = if region == Region::StringLiteral {
                    b'"'
                } else {
                    b'\''
                };
                match b {
                    b'\\' => {
                        blank(&mut out, i);
                        if next.is_some() {
                            blank(&mut out, i + 1);
                        }
                        i += 2;
                        continue;
                    }
                    // Unterminated literal; recover at the line end.
                    b'\n' => region = Region::Code,
                    _ if b == quote => region = Region::Code,
                    _ => blank(&mut out, i),
                }
            }
            Region::TextBlock => {
                if b == b'\\' {
                    blank(&mut out, i);
                    if next.is_some() {
                        blank(&mut out, i + 1);
                    }
                    i += 2;
                    continue;
                }
                if bytes[i..].starts_with(b"\"\"\"") {
                    region = Region::Code;
                    i += 3;
                    continue;
                }
                blank(&mut out, i);
            }
        }
        i += 1;
    }

    // Only ASCII bytes were written over whole code points, so this cannot
    // fail; fall back to a lossy copy rather than panic.
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Find the delimiter closing the one at `open` by depth counting.
///
/// `masked` must come from [`mask`]. Returns `None` when `open` is not
/// `open_ch` or the block never closes.
pub fn matching_delimiter(masked: &[u8], open: usize, open_ch: u8, close_ch: u8) -> Option<usize> {
    if masked.get(open) != Some(&open_ch) {
        return None;
    }

    let mut depth = 0usize;
    for (offset, &b) in masked[open..].iter().enumerate() {
        if b == open_ch {
            depth += 1;
        } else if b == close_ch {
            depth -= 1;
            if depth == 0 {
                return Some(open + offset);
            }
        }
    }
    None
}

/// Balanced-brace scan from the `{` at `open` to its matching `}`.
pub fn matching_brace(masked: &[u8], open: usize) -> Option<usize> {
    matching_delimiter(masked, open, b'{', b'}')
}

/// Balanced-paren scan from the `(` at `open` to its matching `)`.
pub fn matching_paren(masked: &[u8], open: usize) -> Option<usize> {
    matching_delimiter(masked, open, b'(', b')')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_preserves_length_and_lines() {
        let source = "a { // }\n\"}\" /* {\n */ b }";
        let masked = mask(source);
        assert_eq!(masked.len(), source.len());
        assert_eq!(masked.matches('\n').count(), 2);
        assert_eq!(masked.matches('{').count(), 1);
        assert_eq!(masked.matches('}').count(), 1);
    }

    #[test]
    fn test_mask_string_escapes() {
        let masked = mask(r#"x = "a\"{"; y"#);
        assert!(!masked.contains('{'));
        assert!(masked.ends_with("; y"));
    }

    #[test]
    fn test_mask_char_literals() {
        let masked = mask("if (c == '{' || c == '\\'') { }");
        assert_eq!(masked.matches('{').count(), 1);
        assert_eq!(masked.matches('}').count(), 1);
    }

    #[test]
    fn test_mask_text_block() {
        let source = "String s = \"\"\"\n  { json }\n  \"\"\"; int x;";
        let masked = mask(source);
        assert!(!masked.contains('{'));
        assert!(masked.ends_with("; int x;"));
    }

    #[test]
    fn test_mask_keeps_unicode_outside_literals() {
        let source = "class Café { String s = \"ü{\"; }";
        let masked = mask(source);
        assert!(masked.starts_with("class Café {"));
        assert_eq!(masked.matches('{').count(), 1);
    }

    #[test]
    fn test_unterminated_string_recovers_at_newline() {
        let masked = mask("s = \"oops\n{ }");
        assert!(masked.ends_with("\n{ }"));
    }

    #[test]
    fn test_matching_brace_nested() {
        let masked = mask("{ a { b } \"}\" c }");
        let bytes = masked.as_bytes();
        assert_eq!(matching_brace(bytes, 0), Some(bytes.len() - 1));
        assert_eq!(matching_brace(bytes, 4), Some(8));
    }

    #[test]
    fn test_matching_brace_unbalanced() {
        let masked = mask("{ { }");
        assert_eq!(matching_brace(masked.as_bytes(), 0), None);
        assert_eq!(matching_brace(masked.as_bytes(), 1), None);
    }

    #[test]
    fn test_matching_paren() {
        let masked = mask("f(a, g(b), \")\")");
        let bytes = masked.as_bytes();
        assert_eq!(matching_paren(bytes, 1), Some(bytes.len() - 1));
    }
}
