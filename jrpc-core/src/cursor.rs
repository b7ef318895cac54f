//! Read position over a parser input buffer
//!
//! The cursor owns nothing but a borrowed byte view, the read offset and the
//! current line. It only moves forward. A NUL byte is treated as the end of
//! the buffer, the same as running out of input.

pub(crate) struct ParseCursor<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> ParseCursor<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    /// Current byte, `None` at end of input
    pub(crate) fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    /// Byte `offset` positions ahead, `None` if that is at or past the end
    pub(crate) fn peek_at(&self, offset: usize) -> Option<u8> {
        // a NUL anywhere before the target also ends the input
        for i in 0..=offset {
            match self.input.get(self.pos + i) {
                None | Some(0) => return None,
                Some(_) => {}
            }
        }
        self.input.get(self.pos + offset).copied()
    }

    pub(crate) fn at_end(&self) -> bool {
        self.peek().is_none()
    }

    /// Move past the current byte; a no-op at end of input
    pub(crate) fn advance(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    pub(crate) fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    pub(crate) fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn newline(&mut self) {
        self.line += 1;
    }

    /// Skip spaces, tabs, CR and LF; LF bumps the line counter
    pub(crate) fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b' ' | b'\t' | b'\r' => self.advance(),
                b'\n' => {
                    self.newline();
                    self.advance();
                }
                _ => break,
            }
        }
    }
}
