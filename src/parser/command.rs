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

//! Statement core: prefix, command dispatch, and trailing redirections

use super::core::{Parser, Tok};
use super::error::{Result, SyntaxError};
use super::lex::{Keyword, Operator};
use crate::syntax::{Command, Stmt};

impl Parser<'_> {
    /// Parses one statement without pipeline or and-or continuations:
    /// assignment and redirection prefix, the command, trailing
    /// redirections.
    pub(crate) fn cmd_stmt(&mut self) -> Result<Stmt> {
        let mut stmt = Stmt {
            pos: self.pos,
            ..Stmt::default()
        };

        loop {
            match self.tok {
                Tok::Word => {
                    if let Some(assign) = self.try_assign()? {
                        stmt.assigns.push(assign);
                        self.next_token()?;
                        continue;
                    }
                    break;
                }
                Tok::Op(op) if op.redir_op().is_some() => {
                    let redir = self.redirect(None)?;
                    stmt.redirs.push(redir);
                }
                _ => break,
            }
        }

        match self.tok {
            Tok::Word => {
                if stmt.assigns.is_empty() && stmt.redirs.is_empty() {
                    self.dispatch_command(&mut stmt)?;
                } else {
                    // After a prefix, reserved words are plain command
                    // names.
                    self.call_expr(&mut stmt, None)?;
                }
            }
            Tok::Op(Operator::OpenParen) => {
                if !stmt.assigns.is_empty() {
                    return Err(self.err(self.pos, SyntaxError::CmdContainsWords));
                }
                stmt.cmd = Some(self.subshell_or_arithm()?);
            }
            _ => {}
        }

        while self.peek_redir_op().is_some() {
            let redir = self.redirect(None)?;
            stmt.redirs.push(redir);
        }

        Ok(stmt)
    }

    /// Chooses the command at command position, where reserved words are
    /// live.
    fn dispatch_command(&mut self, stmt: &mut Stmt) -> Result<()> {
        use Keyword::*;
        match self.peek_keyword()? {
            Some(If) => {
                stmt.cmd = Some(Command::If(self.if_clause()?));
                return Ok(());
            }
            Some(While) | Some(Until) => {
                stmt.cmd = Some(Command::While(self.while_clause()?));
                return Ok(());
            }
            Some(For) => {
                stmt.cmd = Some(Command::For(self.for_clause()?));
                return Ok(());
            }
            Some(Case) => {
                stmt.cmd = Some(Command::Case(self.case_clause()?));
                return Ok(());
            }
            Some(OpenBrace) => {
                stmt.cmd = Some(Command::Block(self.block()?));
                return Ok(());
            }
            Some(OpenBracketBracket) => {
                self.bash_feature(self.pos, "test clauses", true)?;
                stmt.cmd = Some(Command::Test(self.test_clause()?));
                return Ok(());
            }
            Some(Function) => {
                self.bash_feature(self.pos, "function declarations", true)?;
                self.function_decl(stmt)?;
                return Ok(());
            }
            Some(In) => {
                return Err(self.err(
                    self.pos,
                    SyntaxError::UsedOnlyIn {
                        kw: "in",
                        place: "in a for or case clause",
                    },
                ));
            }
            // `]]` is an ordinary word where `[[` does not exist.
            Some(CloseBracketBracket) if !self.bash() => {}
            Some(kw) if kw.is_clause_delimiter() => {
                // Reached through pipeline recursion; statement lists
                // check the expected closers themselves.
                return Err(self.stray_delimiter(kw));
            }
            _ => {}
        }

        if let Some(lit) = self.peek_lit()? {
            match lit.as_str() {
                "declare" | "local" | "export" | "readonly" | "typeset" | "nameref"
                    if self.bash() =>
                {
                    return self.decl_clause(stmt);
                }
                "let" if self.bash() => return self.let_clause(stmt),
                "coproc" if self.bash() => return self.coproc_clause(stmt),
                "eval" => return self.eval_clause(stmt),
                _ => {}
            }
        }
        self.call_expr(stmt, None)
    }
}
