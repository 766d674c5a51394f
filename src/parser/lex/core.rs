// This file is part of sh-syntax, a shell script parser and printer.
// Copyright (C) 2024 sh-syntax authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Fundamental building blocks for the lexical analyzer.
//!
//! The [`Lexer`] turns the byte lines of an [`Input`] into a stream of
//! characters annotated with byte positions. Bytes are validated as UTF-8
//! while they are read, and the line start table is built on the fly.
//!
//! Characters that have been read are retained, so moving backwards is a
//! matter of restoring an [index](Lexer::index) previously saved with
//! [`Lexer::index`]. The parser relies on this for the small backtracks the
//! grammar needs, such as deciding between `$((…))` and `$( (…) )`.

use crate::input::Input;
use crate::parser::error::{Error, ErrorCause, Result, SyntaxError};
use crate::source::{Lines, Pos};

/// Returns true if the character separates tokens without being a token.
#[must_use]
pub fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Character with its source position
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SourceChar {
    /// Character value
    pub value: char,
    /// Byte offset of the first byte of the character
    pub pos: Pos,
}

/// State of the input source in a lexer
///
/// Errors are stored rather than returned eagerly so that characters
/// before the failure stay readable; the error surfaces when the reader
/// reaches it.
#[derive(Clone, Debug, PartialEq)]
enum InputState {
    Alive,
    EndOfInput,
    Failed(Error),
}

/// Lexical analyzer
///
/// A lexer reads lines from an input and hands out the characters one at a
/// time. It tracks the byte position of every character, the line start
/// table, and whether escaped newlines are currently being removed from the
/// character stream.
pub struct Lexer<'i> {
    input: Box<dyn Input + 'i>,
    state: InputState,
    name: String,
    source: Vec<SourceChar>,
    index: usize,
    next_pos: u64,
    lines: Lines,
    line_continuation: bool,
}

impl<'i> Lexer<'i> {
    /// Creates a lexer that reads from the given input.
    ///
    /// `name` is the name of the source, used in error messages; it may be
    /// empty.
    #[must_use]
    pub fn new(input: Box<dyn Input + 'i>, name: &str) -> Lexer<'i> {
        Lexer {
            input,
            state: InputState::Alive,
            name: name.to_string(),
            source: Vec::new(),
            index: 0,
            next_pos: 1,
            lines: Lines::new(),
            line_continuation: true,
        }
    }

    /// Name of the source being read.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Line start table as read so far.
    #[must_use]
    pub fn lines(&self) -> &Lines {
        &self.lines
    }

    /// Consumes the lexer, returning the completed line start table.
    #[must_use]
    pub fn into_lines(self) -> Lines {
        self.lines
    }

    /// Builds an error at the given position.
    #[must_use]
    pub fn error_at<C: Into<ErrorCause>>(&self, pos: Pos, cause: C) -> Error {
        let (line, col) = self.lines.line_col(pos);
        Error {
            name: self.name.clone(),
            pos,
            line,
            col,
            cause: cause.into(),
        }
    }

    /// Reads one more line from the input into the character buffer.
    fn fill(&mut self) {
        debug_assert_eq!(self.state, InputState::Alive);
        let bytes = match self.input.next_line() {
            Ok(bytes) => bytes,
            Err(e) => {
                let pos = Pos::new(self.next_pos);
                self.state = InputState::Failed(self.error_at(pos, ErrorCause::from(e)));
                return;
            }
        };
        if bytes.is_empty() {
            self.state = InputState::EndOfInput;
            return;
        }
        match std::str::from_utf8(&bytes) {
            Ok(line) => self.extend_chars(line),
            Err(e) => {
                let valid = std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap();
                self.extend_chars(valid);
                let pos = Pos::new(self.next_pos);
                self.state = InputState::Failed(self.error_at(pos, SyntaxError::InvalidUtf8));
            }
        }
    }

    fn extend_chars(&mut self, line: &str) {
        self.source.reserve(line.len());
        for value in line.chars() {
            let pos = Pos::new(self.next_pos);
            self.source.push(SourceChar { value, pos });
            self.next_pos += value.len_utf8() as u64;
            if value == '\n' {
                self.lines.push(self.next_pos);
            }
        }
    }

    /// Makes sure at least `n` characters are buffered past the current
    /// index, unless the input ends or fails first.
    fn ensure(&mut self, n: usize) {
        while self.state == InputState::Alive && self.source.len() < self.index + n {
            self.fill();
        }
    }

    /// The stored failure, if the reader has caught up with it.
    fn failure(&self, at: usize) -> Option<Error> {
        if at < self.source.len() {
            return None;
        }
        match &self.state {
            InputState::Failed(e) => Some(e.clone()),
            _ => None,
        }
    }

    /// Position of the next unconsumed character, or of the end of input.
    ///
    /// Taken right after a [`bump`](Self::bump) this is also the end
    /// position of what was just consumed; later [`peek`](Self::peek)s may
    /// move it past an escaped newline.
    #[must_use]
    pub fn pos(&self) -> Pos {
        match self.source.get(self.index) {
            Some(sc) => sc.pos,
            None => Pos::new(self.next_pos),
        }
    }

    /// Whether escaped newlines are currently removed from the stream.
    #[must_use]
    pub fn line_continuation(&self) -> bool {
        self.line_continuation
    }

    /// Enables or disables the removal of escaped newlines, returning the
    /// previous setting.
    ///
    /// Removal is disabled inside single quotes and heredoc bodies, where a
    /// backslash before a newline is just text.
    pub fn set_line_continuation(&mut self, enabled: bool) -> bool {
        std::mem::replace(&mut self.line_continuation, enabled)
    }

    /// Peeks the next character without consuming it.
    ///
    /// Escaped newlines are silently dropped here when
    /// [enabled](Self::set_line_continuation); the positions of following
    /// characters are unaffected since positions always count source bytes.
    ///
    /// Returns `Ok(None)` at the end of input.
    pub fn peek(&mut self) -> Result<Option<char>> {
        loop {
            self.ensure(1);
            if let Some(e) = self.failure(self.index) {
                return Err(e);
            }
            let Some(value) = self.source.get(self.index).map(|sc| sc.value) else {
                return Ok(None);
            };
            if value == '\\' && self.line_continuation {
                self.ensure(2);
                if let Some(next) = self.source.get(self.index + 1) {
                    if next.value == '\n' {
                        self.index += 2;
                        continue;
                    }
                }
            }
            return Ok(Some(value));
        }
    }

    /// Consumes the character that was just peeked.
    ///
    /// # Panics
    ///
    /// If no character has been peeked since the last consumption.
    pub fn bump(&mut self) {
        assert!(
            self.index < self.source.len(),
            "a character must be peeked before it is consumed"
        );
        self.index += 1;
    }

    /// Peeks and consumes the next character.
    pub fn next_char(&mut self) -> Result<Option<char>> {
        let c = self.peek()?;
        if c.is_some() {
            self.bump();
        }
        Ok(c)
    }

    /// Consumes the next character if `f` accepts it.
    pub fn next_char_if<F: FnOnce(char) -> bool>(&mut self, f: F) -> Result<Option<char>> {
        match self.peek()? {
            Some(c) if f(c) => {
                self.bump();
                Ok(Some(c))
            }
            _ => Ok(None),
        }
    }

    /// Consumes the next character if it equals `c`.
    pub fn skip_char(&mut self, c: char) -> Result<bool> {
        Ok(self.next_char_if(|v| v == c)?.is_some())
    }

    /// Index of the next character, for use with [`rewind`](Self::rewind).
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Moves the current position back to a previously saved index.
    ///
    /// # Panics
    ///
    /// If `index` is larger than the current index.
    pub fn rewind(&mut self, index: usize) {
        assert!(
            index <= self.index,
            "cannot rewind forwards: {index} > {}",
            self.index
        );
        self.index = index;
    }

    /// Returns the characters remaining on the current source line, without
    /// consuming anything.
    ///
    /// The terminating newline is excluded. Escaped newlines are not
    /// interpreted; heredoc delimiter matching wants the raw line.
    pub fn peek_rest_of_line(&mut self) -> Result<String> {
        let mut out = String::new();
        let mut i = self.index;
        loop {
            self.ensure(i - self.index + 1);
            match self.source.get(i) {
                None => {
                    if let Some(e) = self.failure(i) {
                        return Err(e);
                    }
                    return Ok(out);
                }
                Some(SourceChar { value: '\n', .. }) => return Ok(out),
                Some(sc) => out.push(sc.value),
            }
            i += 1;
        }
    }
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("index", &self.index)
            .field("next_pos", &self.next_pos)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Memory;
    use assert_matches::assert_matches;

    fn lexer(code: &str) -> Lexer<'_> {
        Lexer::new(Box::new(Memory::new(code)), "")
    }

    #[test]
    fn empty_source() {
        let mut lexer = lexer("");
        assert_eq!(lexer.peek().unwrap(), None);
        assert_eq!(lexer.pos(), Pos::new(1));
    }

    #[test]
    fn chars_and_positions() {
        let mut lexer = lexer("ab\nc");
        assert_eq!(lexer.peek().unwrap(), Some('a'));
        assert_eq!(lexer.pos(), Pos::new(1));
        lexer.bump();
        assert_eq!(lexer.next_char().unwrap(), Some('b'));
        assert_eq!(lexer.next_char().unwrap(), Some('\n'));
        assert_eq!(lexer.peek().unwrap(), Some('c'));
        assert_eq!(lexer.pos(), Pos::new(4));
        lexer.bump();
        assert_eq!(lexer.peek().unwrap(), None);
        assert_eq!(lexer.pos(), Pos::new(5));
    }

    #[test]
    fn multibyte_positions_count_bytes() {
        let mut lexer = lexer("éx");
        assert_eq!(lexer.next_char().unwrap(), Some('é'));
        assert_eq!(lexer.peek().unwrap(), Some('x'));
        // é is two bytes.
        assert_eq!(lexer.pos(), Pos::new(3));
    }

    #[test]
    fn line_table_tracks_newlines() {
        let mut lexer = lexer("a\nbc\n");
        while lexer.next_char().unwrap().is_some() {}
        assert_eq!(lexer.lines().starts(), [1, 3, 6]);
    }

    #[test]
    fn invalid_utf8_is_positioned() {
        let mut lexer = Lexer::new(Box::new(Memory::new(b"echo \x80x" as &[u8])), "f.sh");
        for _ in 0..5 {
            lexer.next_char().unwrap();
        }
        let e = lexer.peek().unwrap_err();
        assert_eq!(e.to_string(), "f.sh:1:6: invalid UTF-8 encoding");
        assert_matches!(e.cause, ErrorCause::Syntax(SyntaxError::InvalidUtf8));
    }

    #[test]
    fn line_continuation_is_dropped() {
        let mut lexer = lexer("a\\\nb");
        assert_eq!(lexer.next_char().unwrap(), Some('a'));
        assert_eq!(lexer.peek().unwrap(), Some('b'));
        // Positions keep counting the dropped bytes.
        assert_eq!(lexer.pos(), Pos::new(4));
        assert_eq!(lexer.lines().starts(), [1, 4]);
    }

    #[test]
    fn line_continuation_can_be_disabled() {
        let mut lexer = lexer("a\\\nb");
        assert_eq!(lexer.next_char().unwrap(), Some('a'));
        let old = lexer.set_line_continuation(false);
        assert!(old);
        assert_eq!(lexer.next_char().unwrap(), Some('\\'));
        assert_eq!(lexer.next_char().unwrap(), Some('\n'));
        lexer.set_line_continuation(true);
        assert_eq!(lexer.next_char().unwrap(), Some('b'));
    }

    #[test]
    fn rewind_rereads_characters() {
        let mut lexer = lexer("xyz");
        let start = lexer.index();
        assert_eq!(lexer.next_char().unwrap(), Some('x'));
        assert_eq!(lexer.next_char().unwrap(), Some('y'));
        lexer.rewind(start);
        assert_eq!(lexer.next_char().unwrap(), Some('x'));
    }

    #[test]
    fn peek_rest_of_line_does_not_consume() {
        let mut lexer = lexer("abc\ndef");
        assert_eq!(lexer.peek_rest_of_line().unwrap(), "abc");
        assert_eq!(lexer.next_char().unwrap(), Some('a'));
        assert_eq!(lexer.peek_rest_of_line().unwrap(), "bc");
    }

    #[test]
    fn io_error_surfaces_verbatim() {
        struct Failing(bool);
        impl Input for Failing {
            fn next_line(&mut self) -> crate::input::Result {
                if self.0 {
                    return Err(std::io::Error::other("input burned down"));
                }
                self.0 = true;
                Ok(b"ok\n".to_vec())
            }
        }
        let mut lexer = Lexer::new(Box::new(Failing(false)), "");
        assert_eq!(lexer.next_char().unwrap(), Some('o'));
        assert_eq!(lexer.next_char().unwrap(), Some('k'));
        assert_eq!(lexer.next_char().unwrap(), Some('\n'));
        let e = lexer.peek().unwrap_err();
        assert_eq!(e.to_string(), "2:1: input burned down");
        assert_matches!(e.cause, ErrorCause::Io(_));
    }
}
