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

//! Methods for passing source code bytes to the [parser](crate::parser).
//!
//! The parser pulls bytes through the [`Input`] trait one line at a time.
//! Lines are raw bytes, not strings: UTF-8 validation is performed by the
//! tokenizer so that an invalid sequence is reported with its exact line and
//! column. Use [`Memory`] for code already in memory and [`Reader`] to adapt
//! any [`std::io::Read`].

use std::io;

/// Error returned by an [`Input`].
pub type Error = std::io::Error;

/// Result of an [`Input`] read.
pub type Result = std::result::Result<Vec<u8>, Error>;

/// Line-oriented source code reader
///
/// An `Input` provides the parser with source code, one line per call.
pub trait Input {
    /// Reads the next line of the source code.
    ///
    /// The returned bytes are terminated by a newline unless the end of
    /// input is reached, in which case the remaining bytes are returned
    /// without a trailing newline. An empty buffer signals the end of input.
    ///
    /// Errors are unrecoverable: once an error or the end of input has been
    /// returned, the function must not be called again.
    fn next_line(&mut self) -> Result;
}

impl<T: Input + ?Sized> Input for &mut T {
    fn next_line(&mut self) -> Result {
        (**self).next_line()
    }
}

/// Input that reads from code in memory.
#[derive(Debug)]
pub struct Memory<'a> {
    code: &'a [u8],
}

impl<'a> Memory<'a> {
    /// Creates an input that yields the lines of `code`.
    #[must_use]
    pub fn new<B: AsRef<[u8]> + ?Sized>(code: &'a B) -> Memory<'a> {
        Memory {
            code: code.as_ref(),
        }
    }
}

impl Input for Memory<'_> {
    fn next_line(&mut self) -> Result {
        let len = match self.code.iter().position(|&b| b == b'\n') {
            Some(nl) => nl + 1,
            None => self.code.len(),
        };
        let (line, rest) = self.code.split_at(len);
        self.code = rest;
        Ok(line.to_vec())
    }
}

/// How many bytes [`Reader`] requests from the underlying reader at a time.
const CHUNK_SIZE: usize = 4096;

/// Input that reads from an arbitrary byte stream.
///
/// The underlying reader is consumed in fixed-size chunks of
/// [`CHUNK_SIZE`] bytes and reassembled into lines. A line that straddles a
/// chunk boundary, including a partial UTF-8 sequence at the boundary, is
/// carried over to the next refill.
///
/// Once the end of input has been reported, reading again returns an I/O
/// error with the message `duplicate EOF read`. Well-behaved callers (the
/// lexer included) never read past the end; the error exists to diagnose
/// drivers that do.
#[derive(Debug)]
pub struct Reader<R> {
    inner: R,
    buf: Vec<u8>,
    start: usize,
    saw_eof: bool,
    reported_eof: bool,
}

impl<R: io::Read> Reader<R> {
    /// Creates an input that reads lines from `inner`.
    #[must_use]
    pub fn new(inner: R) -> Reader<R> {
        Reader {
            inner,
            buf: Vec::new(),
            start: 0,
            saw_eof: false,
            reported_eof: false,
        }
    }

    /// Consumes the adapter, returning the underlying reader.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn refill(&mut self) -> io::Result<()> {
        self.buf.drain(..self.start);
        self.start = 0;
        let old_len = self.buf.len();
        self.buf.resize(old_len + CHUNK_SIZE, 0);
        let n = loop {
            match self.inner.read(&mut self.buf[old_len..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buf.truncate(old_len);
                    return Err(e);
                }
            }
        };
        self.buf.truncate(old_len + n);
        if n == 0 {
            self.saw_eof = true;
        }
        Ok(())
    }
}

impl<R: io::Read> Input for Reader<R> {
    fn next_line(&mut self) -> Result {
        if self.reported_eof {
            return Err(io::Error::other("duplicate EOF read"));
        }
        loop {
            if let Some(nl) = self.buf[self.start..].iter().position(|&b| b == b'\n') {
                let end = self.start + nl + 1;
                let line = self.buf[self.start..end].to_vec();
                self.start = end;
                return Ok(line);
            }
            if self.saw_eof {
                let line = self.buf[self.start..].to_vec();
                self.start = self.buf.len();
                // The contract reserves the empty line for the end of input,
                // so a final unterminated line is returned on its own first.
                if line.is_empty() {
                    self.reported_eof = true;
                }
                return Ok(line);
            }
            self.refill()?;
        }
    }
}
