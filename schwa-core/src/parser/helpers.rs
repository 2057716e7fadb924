//! Helper functions for scanning masked source text.

/// Whether a byte can be part of an identifier.
///
/// Bytes of multi-byte UTF-8 sequences count, so identifiers with non-ASCII
/// letters are taken whole and slicing stays on char boundaries.
pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

/// Index of the last non-whitespace byte strictly before `end`.
pub fn prev_non_ws(bytes: &[u8], end: usize) -> Option<usize> {
    bytes[..end.min(bytes.len())]
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
}

/// Index of the first non-whitespace byte at or after `start`.
pub fn next_non_ws(bytes: &[u8], start: usize) -> Option<usize> {
    bytes
        .get(start..)?
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map(|offset| start + offset)
}

/// Identifier ending right before `end`, ignoring whitespace in between.
///
/// Returns the `start..end` byte range of the identifier.
pub fn identifier_before(bytes: &[u8], end: usize) -> Option<(usize, usize)> {
    let last = prev_non_ws(bytes, end)?;
    if !is_ident_byte(bytes[last]) {
        return None;
    }
    let start = bytes[..=last]
        .iter()
        .rposition(|b| !is_ident_byte(*b))
        .map(|i| i + 1)
        .unwrap_or(0);
    if bytes[start].is_ascii_digit() {
        return None;
    }
    Some((start, last + 1))
}

/// Identifier starting at `start`, if any. Returns its end offset.
pub fn identifier_at(bytes: &[u8], start: usize) -> Option<usize> {
    let first = *bytes.get(start)?;
    if !is_ident_byte(first) || first.is_ascii_digit() {
        return None;
    }
    let len = bytes[start..]
        .iter()
        .position(|b| !is_ident_byte(*b))
        .unwrap_or(bytes.len() - start);
    Some(start + len)
}

/// Byte offset to 1-indexed line number lookup.
#[derive(Clone, Debug)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    /// Line containing byte `offset`, 1-indexed.
    pub fn line_of(&self, offset: usize) -> u32 {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line as u32 + 1,
            Err(next) => next as u32,
        }
    }
}
