//! Rewindable cursor over formula text.

/// A position that can be restored on a [`TextCursor`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SavePoint(usize);

impl SavePoint {
    #[inline]
    pub const fn position(self) -> usize {
        self.0
    }
}

/// Byte-position cursor over a borrowed `&str`.
///
/// Every parser attempt takes a [`SavePoint`] before consuming anything and restores it when
/// the attempt does not match, which is what gives the compiled grammar its backtracking.
#[derive(Clone, Debug)]
pub struct TextCursor<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> TextCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, position: 0 }
    }

    /// The full text being parsed.
    #[inline]
    pub fn text(&self) -> &'a str {
        self.text
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.position >= self.text.len()
    }

    #[inline]
    pub fn remaining(&self) -> &'a str {
        &self.text[self.position..]
    }

    #[inline]
    pub fn save(&self) -> SavePoint {
        SavePoint(self.position)
    }

    #[inline]
    pub fn restore(&mut self, save_point: SavePoint) {
        self.position = save_point.0;
    }

    /// Text consumed since `save_point`.
    #[inline]
    pub fn text_since(&self, save_point: SavePoint) -> &'a str {
        &self.text[save_point.0..self.position]
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Advance by `len` bytes. `len` must land on a char boundary of the remaining text.
    pub fn advance(&mut self, len: usize) -> &'a str {
        let start = self.position;
        self.position = (self.position + len).min(self.text.len());
        &self.text[start..self.position]
    }

    pub fn consume_str(&mut self, expected: &str) -> bool {
        if !expected.is_empty() && self.remaining().starts_with(expected) {
            self.position += expected.len();
            true
        } else {
            false
        }
    }

    pub fn consume_str_ignore_case(&mut self, expected: &str) -> Option<&'a str> {
        let remaining = self.remaining();
        let mut matched = 0usize;
        let mut actual = remaining.chars();
        for want in expected.chars() {
            let got = actual.next()?;
            if !got.to_lowercase().eq(want.to_lowercase()) {
                return None;
            }
            matched += got.len_utf8();
        }
        if matched == 0 {
            return None;
        }
        Some(self.advance(matched))
    }

    /// Consume the longest prefix whose chars satisfy `predicate`.
    pub fn consume_while<F>(&mut self, mut predicate: F) -> &'a str
    where
        F: FnMut(char) -> bool,
    {
        let len = self
            .remaining()
            .char_indices()
            .find(|&(_, ch)| !predicate(ch))
            .map(|(idx, _)| idx)
            .unwrap_or(self.remaining().len());
        self.advance(len)
    }

    /// A short excerpt of the text at the cursor, for error messages.
    pub fn near(&self) -> String {
        self.remaining().chars().take(16).collect()
    }
}
