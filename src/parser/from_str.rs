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

//! Implementations of [`FromStr`] for syntax types
//!
//! These parse with the default [`Config`]: the Bash variant, comments
//! dropped, and no source name.

use super::core::Config;
use super::error::{Error, SyntaxError};
use crate::source::Pos;
use crate::syntax::{File, Node, Stmt, Word};
use std::str::FromStr;

fn not_one_node(file: &File, pos: Pos, what: &'static str) -> Error {
    let (line, col) = file.lines.line_col(pos);
    Error {
        name: String::new(),
        pos,
        line,
        col,
        cause: SyntaxError::NotOneNode { what }.into(),
    }
}

impl FromStr for File {
    type Err = Error;
    fn from_str(s: &str) -> Result<File, Error> {
        Config::new().parse_str("", s)
    }
}

impl FromStr for Stmt {
    type Err = Error;
    fn from_str(s: &str) -> Result<Stmt, Error> {
        let mut file: File = s.parse()?;
        match file.stmts.len() {
            1 => Ok(file.stmts.remove(0)),
            0 => Err(not_one_node(&file, Pos::new(1), "statement")),
            _ => {
                let pos = file.stmts[1].pos();
                Err(not_one_node(&file, pos, "statement"))
            }
        }
    }
}

impl FromStr for Word {
    type Err = Error;
    fn from_str(s: &str) -> Result<Word, Error> {
        let mut file: File = s.parse()?;
        if file.stmts.len() != 1 {
            let pos = file.stmts.get(1).map_or(Pos::new(1), Node::pos);
            return Err(not_one_node(&file, pos, "word"));
        }
        let stmt = file.stmts.remove(0);
        let pos = if stmt.pos().is_valid() {
            stmt.pos()
        } else {
            Pos::new(1)
        };
        let plain = !stmt.negated && stmt.assigns.is_empty() && stmt.redirs.is_empty();
        match stmt.cmd {
            Some(crate::syntax::Command::Call(mut call)) if plain && call.args.len() == 1 => {
                Ok(call.args.remove(0))
            }
            _ => Err(not_one_node(&file, pos, "word")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Command, WordPart};
    use assert_matches::assert_matches;

    #[test]
    fn file_from_str() {
        let file: File = "a; b".parse().unwrap();
        assert_eq!(file.stmts.len(), 2);
        assert!(file.name.is_empty());
    }

    #[test]
    fn stmt_from_str() {
        let stmt: Stmt = "foo bar >log".parse().unwrap();
        assert_matches!(stmt.cmd, Some(Command::Call(_)));
        assert_eq!(stmt.redirs.len(), 1);

        assert!("".parse::<Stmt>().is_err());
        assert!("a; b".parse::<Stmt>().is_err());
    }

    #[test]
    fn word_from_str() {
        let word: Word = "${HOME}/bin".parse().unwrap();
        assert_eq!(word.parts.len(), 2);
        assert_matches!(&word.parts[0], WordPart::ParamExp(_));

        assert!("".parse::<Word>().is_err());
        assert!("two words".parse::<Word>().is_err());
    }
}
