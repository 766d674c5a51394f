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

//! Parsing of the if conditional construct

use super::core::{Parser, Stops};
use super::error::{Result, SyntaxError};
use super::lex::Keyword;
use crate::source::Pos;
use crate::syntax::{Elif, IfClause, Stmt};

impl Parser<'_> {
    /// Parses an `if` clause; the `if` word is current.
    pub(crate) fn if_clause(&mut self) -> Result<IfClause> {
        let if_pos = self.take_keyword()?;
        let cond = self.clause_cond(if_pos, "if")?;
        let then_pos = self.take_keyword()?;
        let then_stops = Stops::keywords(&[Keyword::Elif, Keyword::Else, Keyword::Fi]);
        let then_stmts = self.clause_body("then", then_pos, then_stops)?;

        let mut elifs = Vec::new();
        while self.peek_keyword()? == Some(Keyword::Elif) {
            let elif_pos = self.take_keyword()?;
            let cond = self.clause_cond(elif_pos, "elif")?;
            let then_pos = self.take_keyword()?;
            let then_stmts = self.clause_body("then", then_pos, then_stops)?;
            elifs.push(Elif {
                elif_pos,
                then_pos,
                cond,
                then_stmts,
            });
        }

        let mut else_pos = Pos::NONE;
        let mut else_stmts = Vec::new();
        if self.peek_keyword()? == Some(Keyword::Else) {
            else_pos = self.take_keyword()?;
            else_stmts = self.clause_body("else", else_pos, Stops::keywords(&[Keyword::Fi]))?;
        }

        if self.peek_keyword()? != Some(Keyword::Fi) {
            return Err(self.err(
                if_pos,
                SyntaxError::StmtMustEnd { kw: "if", end: "fi" },
            ));
        }
        let fi_pos = self.take_keyword()?;
        Ok(IfClause {
            if_pos,
            then_pos,
            else_pos,
            fi_pos,
            cond,
            then_stmts,
            elifs,
            else_stmts,
        })
    }

    /// Parses the condition of an `if`/`elif`/`while`/`until` and checks
    /// that the following keyword closes it.
    pub(crate) fn clause_cond(&mut self, kw_pos: Pos, kw: &str) -> Result<Vec<Stmt>> {
        let follow = match kw {
            "while" | "until" => Keyword::Do,
            _ => Keyword::Then,
        };
        let cond = match follow {
            Keyword::Do => self.stmt_list(Stops::keywords(&[Keyword::Do]))?,
            _ => self.stmt_list(Stops::keywords(&[Keyword::Then]))?,
        };
        if cond.is_empty() && self.peek_keyword()? == Some(follow) {
            return Err(self.err(
                kw_pos,
                SyntaxError::MustFollowKw {
                    left: kw.to_string().into(),
                    right: "a statement list".into(),
                },
            ));
        }
        if self.peek_keyword()? != Some(follow) {
            let left = if cond.is_empty() {
                kw.to_string()
            } else {
                format!("{kw} <cond>")
            };
            let right = if cond.is_empty() {
                "a statement list".to_string()
            } else {
                format!("{:?}", follow.as_str())
            };
            return Err(self.err(
                kw_pos,
                SyntaxError::MustFollowKw {
                    left: left.into(),
                    right: right.into(),
                },
            ));
        }
        Ok(cond)
    }

    /// Parses a non-empty statement list after `then`, `else` or `do`.
    pub(crate) fn clause_body(
        &mut self,
        kw: &str,
        kw_pos: Pos,
        stops: Stops,
    ) -> Result<Vec<Stmt>> {
        let stmts = self.stmt_list(stops)?;
        if stmts.is_empty() {
            return Err(self.err(
                kw_pos,
                SyntaxError::MustFollowKw {
                    left: kw.to_string().into(),
                    right: "a statement list".into(),
                },
            ));
        }
        Ok(stmts)
    }
}
