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

//! Parsing of for loops, word-iterating and C-style

use super::arith::ArithCtx;
use super::core::{Parser, Stops, Tok};
use super::error::{Result, SyntaxError};
use super::lex::{Keyword, Operator};
use super::word::{WordMode, is_name};
use crate::source::Pos;
use crate::syntax::{CStyleLoop, ForClause, Loop, WordIter, WordPart};

impl Parser<'_> {
    /// Parses a `for` clause; the keyword is current.
    pub(crate) fn for_clause(&mut self) -> Result<ForClause> {
        let for_pos = self.take_keyword()?;
        let head = match self.tok {
            Tok::Op(Operator::OpenParen) => Loop::CStyle(self.c_style_loop(for_pos)?),
            Tok::Word => Loop::WordIter(self.word_iter(for_pos)?),
            _ => {
                return Err(self.err(
                    for_pos,
                    SyntaxError::MustFollowKw {
                        left: "for".into(),
                        right: "a literal".into(),
                    },
                ));
            }
        };

        // Optional separators before `do`.
        while matches!(self.tok, Tok::Newline | Tok::Op(Operator::Semicolon)) {
            self.next_token()?;
        }
        if self.peek_keyword()? != Some(Keyword::Do) {
            return Err(self.err(
                for_pos,
                SyntaxError::MustFollowKw {
                    left: "for foo [in words]".into(),
                    right: "\"do\"".into(),
                },
            ));
        }
        let do_pos = self.take_keyword()?;
        let do_stmts = self.clause_body("do", do_pos, Stops::keywords(&[Keyword::Done]))?;
        if self.peek_keyword()? != Some(Keyword::Done) {
            return Err(self.err(
                for_pos,
                SyntaxError::StmtMustEnd {
                    kw: "for",
                    end: "done",
                },
            ));
        }
        let done_pos = self.take_keyword()?;
        Ok(ForClause {
            for_pos,
            do_pos,
            done_pos,
            r#loop: head,
            do_stmts,
        })
    }

    /// Parses `name [in words…]` up to but not including the separator.
    fn word_iter(&mut self, for_pos: Pos) -> Result<WordIter> {
        let word = self.word(WordMode::Default)?;
        self.next_token()?;
        let name = match word.parts.as_slice() {
            [WordPart::Lit(lit)] if is_name(&lit.value) => lit.clone(),
            _ => {
                return Err(self.err(
                    for_pos,
                    SyntaxError::MustFollowKw {
                        left: "for".into(),
                        right: "a literal".into(),
                    },
                ));
            }
        };

        let mut in_pos = Pos::NONE;
        let mut items = Vec::new();
        // `in` may come after a newline.
        while self.tok == Tok::Newline {
            self.next_token()?;
        }
        if self.tok == Tok::Word && self.peek_lit()?.as_deref() == Some("in") {
            in_pos = self.take_keyword()?;
            while self.tok == Tok::Word {
                let item = self.word(WordMode::Default)?;
                self.next_token()?;
                items.push(item);
            }
        }
        Ok(WordIter {
            name,
            in_pos,
            items,
        })
    }

    /// Parses `((init; cond; post))`; the first `(` is the current token.
    fn c_style_loop(&mut self, for_pos: Pos) -> Result<CStyleLoop> {
        let lparen = self.pos;
        self.bash_feature(lparen, "c-style fors", true)?;
        if !self.lexer.skip_char('(')? {
            return Err(self.err(
                for_pos,
                SyntaxError::MustFollowKw {
                    left: "for".into(),
                    right: "a literal".into(),
                },
            ));
        }
        let ctx = ArithCtx {
            semi_term: true,
            ..ArithCtx::default()
        };
        let init = self.arithm_opt(ctx)?;
        self.expect_arith_semi()?;
        let cond = self.arithm_opt(ctx)?;
        self.expect_arith_semi()?;
        let post = self.arithm_opt(ctx)?;
        self.skip_arith_space()?;
        let rparen = self.lexer.pos();
        if !self.lexer.skip_char(')')? || !self.lexer.skip_char(')')? {
            let end = self.ahead_desc()?;
            return Err(self.err(
                rparen,
                SyntaxError::Unmatched {
                    end,
                    open: "((",
                    close: "))",
                },
            ));
        }
        self.next_token()?;
        Ok(CStyleLoop {
            lparen,
            rparen,
            init: init.map(Box::new),
            cond: cond.map(Box::new),
            post: post.map(Box::new),
        })
    }

    fn expect_arith_semi(&mut self) -> Result<()> {
        self.skip_arith_space()?;
        if !self.lexer.skip_char(';')? {
            let end = self.ahead_desc()?;
            let pos = self.lexer.pos();
            return Err(self.err(
                pos,
                SyntaxError::Unmatched {
                    end,
                    open: "((",
                    close: "))",
                },
            ));
        }
        Ok(())
    }
}
