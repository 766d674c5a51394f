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

//! Function definition parsing, in both the POSIX `name()` form and the
//! Bash `function name` form

use super::core::{Parser, Tok};
use super::error::{Result, SyntaxError};
use super::lex::Operator;
use super::word::{WordMode, is_name};
use crate::syntax::{Command, FuncDecl, Lit, Stmt, Word, WordPart};

impl Parser<'_> {
    /// Finishes a `name()` function definition; the caller consumed the
    /// name word and the `(` is the current token.
    pub(crate) fn func_decl_parens(&mut self, stmt: &mut Stmt, name: Word) -> Result<()> {
        let name = self.func_name(&name)?;
        self.next_token()?;
        if self.tok != Tok::Op(Operator::CloseParen) {
            return Err(self.err(
                self.pos,
                SyntaxError::MustFollowKw {
                    left: format!("{}(", name.value).into(),
                    right: "\")\"".into(),
                },
            ));
        }
        self.next_token()?;
        let body = self.func_body(&name.value)?;
        stmt.cmd = Some(Command::FuncDecl(Box::new(FuncDecl {
            position: stmt.pos,
            rsrv_word: false,
            parens: true,
            name,
            body,
        })));
        Ok(())
    }

    /// Parses a `function name` definition; the keyword is current.
    pub(crate) fn function_decl(&mut self, stmt: &mut Stmt) -> Result<()> {
        let position = self.take_keyword()?;
        if self.tok != Tok::Word {
            return Err(self.err(
                self.pos,
                SyntaxError::MustFollowKw {
                    left: "function".into(),
                    right: "a name".into(),
                },
            ));
        }
        let word = self.word(WordMode::Default)?;
        self.next_token()?;
        let name = self.func_name(&word)?;
        let mut parens = false;
        if self.tok == Tok::Op(Operator::OpenParen) {
            self.next_token()?;
            if self.tok != Tok::Op(Operator::CloseParen) {
                return Err(self.err(
                    self.pos,
                    SyntaxError::MustFollowKw {
                        left: format!("{}(", name.value).into(),
                        right: "\")\"".into(),
                    },
                ));
            }
            self.next_token()?;
            parens = true;
        }
        let body = self.func_body(&name.value)?;
        stmt.cmd = Some(Command::FuncDecl(Box::new(FuncDecl {
            position,
            rsrv_word: true,
            parens,
            name,
            body,
        })));
        Ok(())
    }

    /// Validates the function name word.
    fn func_name(&self, word: &Word) -> Result<Lit> {
        let [WordPart::Lit(lit)] = word.parts.as_slice() else {
            return Err(self.err(word_pos(word), SyntaxError::InvalidFuncName { raw: None }));
        };
        // Bash accepts almost anything literal; POSIX restricts names.
        if !self.bash() && !is_name(&lit.value) {
            return Err(self.err(
                lit.pos,
                SyntaxError::InvalidFuncName {
                    raw: Some(lit.value.clone()),
                },
            ));
        }
        Ok(lit.clone())
    }

    /// Parses the function body, which may start on a following line.
    fn func_body(&mut self, name: &str) -> Result<Stmt> {
        self.skip_newlines()?;
        let can_start = match self.tok {
            Tok::Word | Tok::Op(Operator::OpenParen) => true,
            Tok::Op(op) => op.redir_op().is_some(),
            _ => false,
        };
        if !can_start {
            return Err(self.err(
                self.pos,
                SyntaxError::MustFollowKw {
                    left: format!("{name}()").into(),
                    right: "a statement".into(),
                },
            ));
        }
        self.cmd_stmt()
    }
}

fn word_pos(word: &Word) -> crate::source::Pos {
    use crate::syntax::Node;
    word.pos()
}

#[cfg(test)]
mod tests {
    use crate::parser::{Config, Variant};
    use crate::syntax::Command;

    fn func(code: &str) -> crate::syntax::FuncDecl {
        let file = Config::new().parse_str("", code).unwrap();
        let Some(Command::FuncDecl(decl)) = &file.stmts[0].cmd else {
            panic!("expected function: {:?}", file.stmts[0].cmd);
        };
        (**decl).clone()
    }

    #[test]
    fn parens_form() {
        let decl = func("foo() { bar; }");
        assert!(!decl.rsrv_word);
        assert!(decl.parens);
        assert_eq!(decl.name.value, "foo");
        assert!(matches!(decl.body.cmd, Some(Command::Block(_))));
    }

    #[test]
    fn body_on_next_line() {
        let decl = func("foo ()\n{\n\tbar\n}");
        assert_eq!(decl.name.value, "foo");
        assert!(matches!(decl.body.cmd, Some(Command::Block(_))));
    }

    #[test]
    fn function_keyword_form() {
        let decl = func("function foo { bar; }");
        assert!(decl.rsrv_word);
        assert!(!decl.parens);

        let decl = func("function foo() { bar; }");
        assert!(decl.rsrv_word);
        assert!(decl.parens);
    }

    #[test]
    fn function_keyword_is_gated() {
        let e = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "function foo { bar; }")
            .unwrap_err();
        assert_eq!(e.to_string(), "1:1: function declarations are a bash feature");
    }

    #[test]
    fn posix_names_are_restricted() {
        // Bash tolerates odd literal names.
        func("foo.bar() { :; }");

        let e = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "foo.bar() { :; }")
            .unwrap_err();
        assert_eq!(e.to_string(), "1:1: invalid func name: \"foo.bar\"");
    }

    #[test]
    fn non_literal_names_are_invalid() {
        let e = Config::new().parse_str("", "$x() { :; }").unwrap_err();
        assert_eq!(e.to_string(), "1:1: invalid func name");
    }

    #[test]
    fn unclosed_parens() {
        let e = Config::new().parse_str("", "foo ( bar").unwrap_err();
        assert_eq!(e.to_string(), "1:7: \"foo(\" must be followed by \")\"");
    }

    #[test]
    fn missing_body() {
        let e = Config::new().parse_str("", "foo()").unwrap_err();
        assert_eq!(e.to_string(), "1:6: \"foo()\" must be followed by a statement");
    }
}
