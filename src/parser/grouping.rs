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

//! Braced groups, subshells, and the `(( … ))` arithmetic command

use super::arith::ArithCtx;
use super::core::{Parser, Stops, Tok};
use super::error::{Result, SyntaxError};
use super::lex::{Keyword, Operator};
use crate::syntax::{ArithmCmd, Block, Command, Subshell};

impl Parser<'_> {
    /// Parses a `{ … }` group; the `{` word is current.
    pub(crate) fn block(&mut self) -> Result<Block> {
        let lbrace = self.take_keyword()?;
        let stmts = self.stmt_list(Stops::keywords(&[Keyword::CloseBrace]))?;
        if self.peek_keyword()? != Some(Keyword::CloseBrace) {
            let end = self.tok_desc();
            return Err(self.err(
                lbrace,
                SyntaxError::Unmatched {
                    end,
                    open: "{",
                    close: "}",
                },
            ));
        }
        let rbrace = self.take_keyword()?;
        Ok(Block {
            lbrace,
            rbrace,
            stmts,
        })
    }

    /// Parses a subshell or an arithmetic command; the `(` is current.
    ///
    /// A second `(` makes this arithmetic only when the inner sequence is
    /// balanced up to a double closing parenthesis; otherwise `( (a); b )`
    /// style input stays a subshell.
    pub(crate) fn subshell_or_arithm(&mut self) -> Result<Command> {
        let lparen = self.pos;
        if self.bash() && self.lexer.peek()? == Some('(') && self.arith_ahead()? {
            self.lexer.bump(); // second (
            let expr = self.arithm_opt(ArithCtx::default())?;
            self.skip_arith_space()?;
            let right = self.lexer.pos();
            if !self.lexer.skip_char(')')? {
                let end = self.ahead_desc()?;
                return Err(self.err(
                    right,
                    SyntaxError::Unmatched {
                        end,
                        open: "((",
                        close: "))",
                    },
                ));
            }
            let closed = self.lexer.skip_char(')')?;
            debug_assert!(closed, "the ahead scan found the `))`");
            self.next_token()?;
            return Ok(Command::Arithm(ArithmCmd {
                left: lparen,
                right,
                expr: expr.map(Box::new),
            }));
        }

        self.next_token()?;
        let stmts = self.stmt_list(Stops::SUBSHELL)?;
        if self.tok != Tok::Op(Operator::CloseParen) {
            let end = self.tok_desc();
            return Err(self.err(
                lparen,
                SyntaxError::Unmatched {
                    end,
                    open: "(",
                    close: ")",
                },
            ));
        }
        let rparen = self.pos;
        self.next_token()?;
        Ok(Command::Subshell(Subshell {
            lparen,
            rparen,
            stmts,
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{Config, Variant};
    use crate::source::Pos;
    use crate::syntax::{Command, Node};

    #[test]
    fn block() {
        let file = Config::new().parse_str("", "{ foo;bar; }").unwrap();
        let Some(Command::Block(block)) = &file.stmts[0].cmd else {
            panic!("expected block: {:?}", file.stmts[0].cmd);
        };
        assert_eq!(block.stmts.len(), 2);
        assert_eq!(block.lbrace, Pos::new(1));
        assert_eq!(block.rbrace, Pos::new(12));
        assert_eq!(block.end(), Pos::new(13));
    }

    #[test]
    fn block_requires_separator_before_closer() {
        // `}` only closes after a separator; `{ foo }` runs out of input
        // with `foo }` as arguments.
        let e = Config::new().parse_str("", "{ foo }").unwrap_err();
        assert_eq!(e.to_string(), "1:1: reached EOF without matching { with }");
    }

    #[test]
    fn subshell() {
        let file = Config::new().parse_str("", "(foo; bar)").unwrap();
        let Some(Command::Subshell(subshell)) = &file.stmts[0].cmd else {
            panic!("expected subshell: {:?}", file.stmts[0].cmd);
        };
        assert_eq!(subshell.stmts.len(), 2);
        assert_eq!(subshell.rparen, Pos::new(10));
    }

    #[test]
    fn unclosed_subshell() {
        let e = Config::new().parse_str("", "(foo; bar").unwrap_err();
        assert_eq!(e.to_string(), "1:1: reached EOF without matching ( with )");

        let e = Config::new().parse_str("", "(foo;; bar)").unwrap_err();
        assert_eq!(e.to_string(), "1:5: \";;\" can only be used in a case clause");
    }

    #[test]
    fn arithmetic_command() {
        let file = Config::new().parse_str("", "((x += 1))").unwrap();
        let Some(Command::Arithm(cmd)) = &file.stmts[0].cmd else {
            panic!("expected arithmetic: {:?}", file.stmts[0].cmd);
        };
        assert_eq!(cmd.left, Pos::new(1));
        assert_eq!(cmd.right, Pos::new(9));
        assert_eq!(cmd.end(), Pos::new(11));
        assert!(cmd.expr.is_some());
    }

    #[test]
    fn nested_subshells_are_not_arithmetic() {
        let file = Config::new().parse_str("", "( (a); (b) )").unwrap();
        let Some(Command::Subshell(outer)) = &file.stmts[0].cmd else {
            panic!("expected subshell: {:?}", file.stmts[0].cmd);
        };
        assert_eq!(outer.stmts.len(), 2);
        assert!(matches!(outer.stmts[0].cmd, Some(Command::Subshell(_))));
    }

    #[test]
    fn double_paren_subshell_without_arith_end() {
        let file = Config::new().parse_str("", "((a); (b))").unwrap();
        let Some(Command::Subshell(outer)) = &file.stmts[0].cmd else {
            panic!("expected subshell: {:?}", file.stmts[0].cmd);
        };
        assert_eq!(outer.stmts.len(), 2);
    }

    #[test]
    fn posix_parses_double_parens_as_subshells() {
        let file = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "((a))")
            .unwrap();
        let Some(Command::Subshell(outer)) = &file.stmts[0].cmd else {
            panic!("expected subshell: {:?}", file.stmts[0].cmd);
        };
        assert!(matches!(outer.stmts[0].cmd, Some(Command::Subshell(_))));
    }

    #[test]
    fn arithmetic_command_statement_context() {
        let file = Config::new().parse_str("", "((x)) && ((y))").unwrap();
        let Some(Command::Binary(binary)) = &file.stmts[0].cmd else {
            panic!();
        };
        assert!(matches!(binary.x.cmd, Some(Command::Arithm(_))));
        assert!(matches!(binary.y.cmd, Some(Command::Arithm(_))));
    }
}
