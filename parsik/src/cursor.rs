//! The input sequence and immutable cursors over it.

/// Input text materialised as a sequence of `char` atoms.
///
/// Positions used throughout the crate are atom indices, so a position is
/// always in `0..=len()`. The byte offset of every atom is kept so spans can
/// be turned back into `&str` slices of the original text, and so regular
/// expressions can run directly against the source.
#[derive(Debug, Clone)]
pub struct Input<'s> {
    text: &'s str,
    atoms: Vec<char>,
    // offsets[i] is the byte offset of atom i; offsets[len] == text.len()
    offsets: Vec<usize>,
}

impl<'s> Input<'s> {
    pub fn new(text: &'s str) -> Self {
        let mut atoms = Vec::with_capacity(text.len());
        let mut offsets = Vec::with_capacity(text.len() + 1);

        for (off, ch) in text.char_indices() {
            atoms.push(ch);
            offsets.push(off);
        }

        offsets.push(text.len());

        Input {
            text,
            atoms,
            offsets,
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn text(&self) -> &'s str {
        self.text
    }

    pub fn atom(&self, pos: usize) -> Option<char> {
        self.atoms.get(pos).copied()
    }

    pub fn atoms(&self) -> &[char] {
        &self.atoms
    }

    /// Byte offset of the atom at `pos`. `pos == len()` maps to the end of
    /// the text.
    pub fn byte_offset(&self, pos: usize) -> usize {
        self.offsets[pos.min(self.atoms.len())]
    }

    /// Atom position of a byte offset which lies on a char boundary.
    pub(crate) fn position_of_byte(&self, byte: usize) -> usize {
        match self.offsets.binary_search(&byte) {
            Ok(pos) => pos,
            Err(pos) => pos,
        }
    }

    /// Source text of the atom span `[start, end)`.
    pub fn slice(&self, start: usize, end: usize) -> &'s str {
        &self.text[self.byte_offset(start)..self.byte_offset(end)]
    }

    /// 1-based line and column of an atom position. A position pointing at a
    /// newline belongs to the line the newline terminates.
    pub fn line_col(&self, pos: usize) -> (usize, usize) {
        let pos = pos.min(self.atoms.len());
        let mut line_no = 1;
        let mut line_start = 0;

        for (index, ch) in self.atoms[..pos].iter().enumerate() {
            if *ch == '\n' {
                line_no += 1;
                line_start = index + 1;
            }
        }

        (line_no, pos - line_start + 1)
    }

    pub fn cursor(&self) -> Cursor<'_, 's> {
        Cursor { input: self, pos: 0 }
    }
}

/// An immutable position within an [`Input`].
///
/// Cursors are `Copy`; advancing returns a new cursor and leaves the original
/// untouched, so backtracking is just reusing an older value.
#[derive(Clone, Copy)]
pub struct Cursor<'i, 's> {
    input: &'i Input<'s>,
    pos: usize,
}

impl<'i, 's> Cursor<'i, 's> {
    /// Cursor at `pos`, clamped to the end of the input.
    pub fn at(input: &'i Input<'s>, pos: usize) -> Self {
        Cursor {
            input,
            pos: pos.min(input.len()),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn input(&self) -> &'i Input<'s> {
        self.input
    }

    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos == self.input.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.input.atom(self.pos)
    }

    /// The atoms from the cursor to the end of the input.
    pub fn rest(&self) -> &'i [char] {
        &self.input.atoms()[self.pos..]
    }

    /// Source text from the cursor to the end of the input.
    pub fn rest_str(&self) -> &'s str {
        &self.input.text()[self.input.byte_offset(self.pos)..]
    }

    /// Advance by `count` atoms. Returns `None` if that would run past the
    /// end of the input.
    pub fn advance(&self, count: usize) -> Option<Self> {
        if count > self.remaining() {
            return None;
        }

        Some(Cursor {
            input: self.input,
            pos: self.pos + count,
        })
    }

    pub(crate) fn with_position(&self, pos: usize) -> Self {
        Cursor::at(self.input, pos)
    }
}

impl std::fmt::Debug for Cursor<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("pos", &self.pos)
            .field("len", &self.input.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_does_not_mutate() {
        let input = Input::new("héllo");
        let start = input.cursor();
        let next = start.advance(2).unwrap();

        assert_eq!(start.position(), 0);
        assert_eq!(next.position(), 2);
        assert_eq!(next.peek(), Some('l'));
        assert_eq!(next.rest_str(), "llo");
        assert!(start.advance(6).is_none());
        assert!(start.advance(5).unwrap().is_at_end());
    }

    #[test]
    fn slices_follow_atoms() {
        let input = Input::new("aµb");

        assert_eq!(input.len(), 3);
        assert_eq!(input.slice(1, 2), "µ");
        assert_eq!(input.slice(0, 3), "aµb");
        assert_eq!(input.position_of_byte(3), 2);
    }

    #[test]
    fn line_col() {
        let input = Input::new("ab\ncd\n\ne");

        assert_eq!(input.line_col(0), (1, 1));
        assert_eq!(input.line_col(2), (1, 3));
        assert_eq!(input.line_col(3), (2, 1));
        assert_eq!(input.line_col(4), (2, 2));
        assert_eq!(input.line_col(7), (4, 1));
        assert_eq!(input.line_col(100), (4, 2));
    }
}
