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

//! Redirection parsing

use super::core::{Parser, Tok};
use super::error::{Result, SyntaxError};
use super::lex::heredoc::PendingHeredoc;
use super::word::WordMode;
use crate::syntax::{Lit, Redir, RedirOp};
use std::cell::OnceCell;
use std::rc::Rc;

impl Parser<'_> {
    /// The redirection operator at the current token, if any.
    pub(crate) fn peek_redir_op(&self) -> Option<RedirOp> {
        match self.tok {
            Tok::Op(op) => op.redir_op(),
            _ => None,
        }
    }

    /// Parses one redirection; the operator is the current token.
    ///
    /// `n` is the already-parsed file descriptor number, if the caller saw
    /// an adjacent digits word before the operator.
    pub(crate) fn redirect(&mut self, n: Option<Lit>) -> Result<Redir> {
        let op = self.peek_redir_op().expect("caller checked for a redirect operator");
        let op_pos = self.pos;
        if op == RedirOp::WordHdoc {
            self.bash_feature(op_pos, "herestrings", true)?;
        }
        self.next_token()?;
        match self.tok {
            Tok::Word => {}
            Tok::Newline => {
                return Err(self.err(self.pos, SyntaxError::RedirSameLine));
            }
            _ => {
                return Err(self.err(
                    self.pos,
                    SyntaxError::MustFollowOp {
                        op: op.as_str().into(),
                        what: "a word",
                    },
                ));
            }
        }
        let mode = if op.is_hdoc() {
            WordMode::HdocDelim
        } else {
            WordMode::Default
        };
        let word = self.required_word(mode, op.as_str())?;
        let hdoc = Rc::new(OnceCell::new());
        if op.is_hdoc() {
            let (delim, plain) = word.unquoted();
            self.pending_hdocs.push(PendingHeredoc {
                cell: Rc::clone(&hdoc),
                delim,
                quoted: !plain,
                strip_tabs: op == RedirOp::DashHdoc,
                op_pos,
            });
        }
        self.next_token()?;
        Ok(Redir {
            op_pos,
            op,
            n,
            word,
            hdoc,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{Config, Variant};
    use crate::source::Pos;
    use crate::syntax::{Command, RedirOp};

    #[test]
    fn plain_redirects() {
        let file = Config::new().parse_str("", "foo >out 2>>log <in").unwrap();
        let stmt = &file.stmts[0];
        let Some(Command::Call(call)) = &stmt.cmd else {
            panic!();
        };
        assert_eq!(call.args.len(), 1);
        assert_eq!(stmt.redirs.len(), 3);
        assert_eq!(stmt.redirs[0].op, RedirOp::Out);
        assert!(stmt.redirs[0].n.is_none());
        assert_eq!(stmt.redirs[1].op, RedirOp::Append);
        assert_eq!(stmt.redirs[1].n.as_ref().unwrap().value, "2");
        assert_eq!(stmt.redirs[2].op, RedirOp::In);
        assert_eq!(stmt.redirs[2].word.lit(), Some("in"));
    }

    #[test]
    fn spaced_digits_stay_arguments() {
        let file = Config::new().parse_str("", "foo 2 >out").unwrap();
        let stmt = &file.stmts[0];
        let Some(Command::Call(call)) = &stmt.cmd else {
            panic!();
        };
        assert_eq!(call.args.len(), 2);
        assert!(stmt.redirs[0].n.is_none());
    }

    #[test]
    fn redirects_before_and_between_words() {
        let file = Config::new().parse_str("", ">a foo >b bar").unwrap();
        let stmt = &file.stmts[0];
        let Some(Command::Call(call)) = &stmt.cmd else {
            panic!();
        };
        assert_eq!(call.args.len(), 2);
        assert_eq!(stmt.redirs.len(), 2);
    }

    #[test]
    fn redirect_only_statement() {
        let file = Config::new().parse_str("", ">out").unwrap();
        let stmt = &file.stmts[0];
        assert!(stmt.cmd.is_none());
        assert_eq!(stmt.redirs.len(), 1);
    }

    #[test]
    fn fd_duplication_and_clobber() {
        let file = Config::new().parse_str("", "foo 2>&1 >|f <>g").unwrap();
        let redirs = &file.stmts[0].redirs;
        assert_eq!(redirs[0].op, RedirOp::DplOut);
        assert_eq!(redirs[0].n.as_ref().unwrap().value, "2");
        assert_eq!(redirs[0].word.lit(), Some("1"));
        assert_eq!(redirs[1].op, RedirOp::ClbOut);
        assert_eq!(redirs[2].op, RedirOp::RdrInOut);
    }

    #[test]
    fn bash_only_redirects() {
        let file = Config::new().parse_str("", "foo &>all <<<word").unwrap();
        let redirs = &file.stmts[0].redirs;
        assert_eq!(redirs[0].op, RedirOp::RdrAll);
        assert_eq!(redirs[1].op, RedirOp::WordHdoc);

        // Under POSIX, `&>` splits into background plus a redirect.
        let file = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "foo &>all")
            .unwrap();
        assert_eq!(file.stmts.len(), 2);
        assert!(file.stmts[0].background);
        assert_eq!(file.stmts[1].redirs[0].op, RedirOp::Out);

        let e = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "foo <<<word")
            .unwrap_err();
        assert_eq!(e.to_string(), "1:5: herestrings are a bash feature");
    }

    #[test]
    fn redirect_word_on_next_line() {
        let e = Config::new().parse_str("", "foo >\nbar").unwrap_err();
        assert_eq!(e.to_string(), "1:6: redirect word must be on the same line");
        assert_eq!(e.pos, Pos::new(6));
    }

    #[test]
    fn missing_redirect_word() {
        let e = Config::new().parse_str("", "foo >;").unwrap_err();
        assert_eq!(e.to_string(), "1:6: > must be followed by a word");
    }
}
