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

//! Parsing of the `${…}` form of parameter expansion
//!
//! The lexer modes inside the braces are tiny: first the parameter name
//! with an optional `#` length prefix and `[…]` index, then exactly one
//! modifier, then the closing brace. Which modifier characters are
//! meaningful depends on where in the expansion we are, so each step
//! reads just what it expects.

use super::arith::ArithCtx;
use super::core::Parser;
use super::error::{Result, SyntaxError};
use super::word::{WordMode, is_name_char, is_name_start, is_special_param};
use crate::source::Pos;
use crate::syntax::{
    ArithmExpr, Expansion, Lit, ParExpOp, ParamExp, Replace, Slice, Word, WordPart,
};

impl Parser<'_> {
    /// Parses a braced parameter expansion; the lexer is at the `{`.
    pub(crate) fn braced_param(&mut self, dollar_pos: Pos) -> Result<WordPart> {
        self.lexer.bump(); // {
        let mut exp = ParamExp {
            dollar: dollar_pos,
            rbrace: Pos::NONE,
            short: false,
            length: false,
            param: Lit::default(),
            index: None,
            slice: None,
            repl: None,
            exp: None,
        };

        // A `#` right after the brace is the length prefix unless it is
        // itself the parameter being expanded, as in `${#}`.
        if self.lexer.peek()? == Some('#') {
            let save = self.lexer.index();
            self.lexer.bump();
            if self.lexer.peek()? == Some('}') {
                self.lexer.rewind(save);
            } else {
                exp.length = true;
            }
        }

        exp.param = self.param_name()?;
        if self.lexer.peek()? == Some('[') {
            let pos = self.lexer.pos();
            self.bash_feature(pos, "arrays", true)?;
            exp.index = Some(Box::new(self.param_index()?));
        }

        match self.lexer.peek()? {
            None | Some('}') => {}
            Some(':') => {
                let colon_pos = self.lexer.pos();
                self.lexer.bump();
                match self.lexer.peek()? {
                    Some(c @ ('+' | '-' | '=' | '?')) => {
                        self.lexer.bump();
                        let op = match c {
                            '+' => ParExpOp::AlternateUnsetOrNull,
                            '-' => ParExpOp::DefaultUnsetOrNull,
                            '=' => ParExpOp::AssignUnsetOrNull,
                            _ => ParExpOp::ErrorUnsetOrNull,
                        };
                        exp.exp = Some(self.param_expansion(op)?);
                    }
                    _ => {
                        self.bash_feature(colon_pos, "slicing", false)?;
                        exp.slice = Some(self.param_slice()?);
                    }
                }
            }
            Some(c @ ('+' | '-' | '=' | '?')) => {
                self.lexer.bump();
                let op = match c {
                    '+' => ParExpOp::AlternateUnset,
                    '-' => ParExpOp::DefaultUnset,
                    '=' => ParExpOp::AssignUnset,
                    _ => ParExpOp::ErrorUnset,
                };
                exp.exp = Some(self.param_expansion(op)?);
            }
            Some(c @ ('#' | '%')) => {
                self.lexer.bump();
                let double = self.lexer.skip_char(c)?;
                let op = match (c, double) {
                    ('#', false) => ParExpOp::RemSmallPrefix,
                    ('#', true) => ParExpOp::RemLargePrefix,
                    ('%', false) => ParExpOp::RemSmallSuffix,
                    ('%', true) => ParExpOp::RemLargeSuffix,
                    _ => unreachable!(),
                };
                exp.exp = Some(self.param_expansion(op)?);
            }
            Some(c @ ('^' | ',')) => {
                let pos = self.lexer.pos();
                self.bash_feature(pos, "case expansions", true)?;
                self.lexer.bump();
                let double = self.lexer.skip_char(c)?;
                let op = match (c, double) {
                    ('^', false) => ParExpOp::UpperFirst,
                    ('^', true) => ParExpOp::UpperAll,
                    (_, false) => ParExpOp::LowerFirst,
                    (_, true) => ParExpOp::LowerAll,
                };
                exp.exp = Some(self.param_expansion(op)?);
            }
            Some('@') => {
                let pos = self.lexer.pos();
                self.bash_feature(pos, "this expansion operator", false)?;
                self.lexer.bump();
                exp.exp = Some(self.param_expansion(ParExpOp::OtherParamOps)?);
            }
            Some('/') => {
                let pos = self.lexer.pos();
                self.bash_feature(pos, "search and replace", false)?;
                self.lexer.bump();
                let all = self.lexer.skip_char('/')?;
                let orig = self.word(WordMode::ParamExpRepl)?;
                let with = if self.lexer.skip_char('/')? {
                    Some(self.word(WordMode::ParamExpArg)?)
                } else {
                    None
                };
                exp.repl = Some(Replace { all, orig, with });
            }
            Some(c) => {
                let pos = self.lexer.pos();
                return Err(self.err(pos, SyntaxError::NotParamOp { val: c.to_string() }));
            }
        }

        let rbrace = self.lexer.pos();
        if !self.lexer.skip_char('}')? {
            let end = self.ahead_desc()?;
            return Err(self.err(
                dollar_pos,
                SyntaxError::Unmatched {
                    end,
                    open: "${",
                    close: "}",
                },
            ));
        }
        exp.rbrace = rbrace;
        Ok(WordPart::ParamExp(Box::new(exp)))
    }

    /// Reads the parameter name inside `${…}`.
    fn param_name(&mut self) -> Result<Lit> {
        let pos = self.lexer.pos();
        let mut end = pos;
        let mut value = String::new();
        match self.lexer.peek()? {
            Some(c) if is_special_param(c) => {
                value.push(c);
                self.lexer.bump();
                end = self.lexer.pos();
            }
            Some(c) if c.is_ascii_digit() => {
                while let Some(c) = self.lexer.next_char_if(|c| c.is_ascii_digit())? {
                    value.push(c);
                    end = self.lexer.pos();
                }
            }
            Some(c) if is_name_start(c) => {
                while let Some(c) = self.lexer.next_char_if(is_name_char)? {
                    value.push(c);
                    end = self.lexer.pos();
                }
            }
            _ => {
                return Err(self.err(pos, SyntaxError::ParamExpLiteral));
            }
        }
        Ok(Lit { pos, end, value })
    }

    /// Reads the `[…]` index of an array element expansion.
    fn param_index(&mut self) -> Result<ArithmExpr> {
        self.lexer.bump(); // [
        // `${a[@]}` and `${a[*]}` index with a word, not arithmetic.
        if let Some(c @ ('@' | '*')) = self.lexer.peek()? {
            let save = self.lexer.index();
            let pos = self.lexer.pos();
            self.lexer.bump();
            if self.lexer.peek()? == Some(']') {
                self.lexer.bump();
                return Ok(ArithmExpr::Word(Word {
                    parts: vec![WordPart::Lit(Lit {
                        pos,
                        end: pos.after(1),
                        value: c.to_string(),
                    })],
                }));
            }
            self.lexer.rewind(save);
        }
        let ctx = ArithCtx {
            bracket_term: true,
            ..ArithCtx::default()
        };
        let expr = self.arithm(ctx, "[")?;
        self.skip_arith_space()?;
        if !self.lexer.skip_char(']')? {
            let end = self.ahead_desc()?;
            let pos = self.lexer.pos();
            return Err(self.err(
                pos,
                SyntaxError::Unmatched {
                    end,
                    open: "[",
                    close: "]",
                },
            ));
        }
        Ok(expr)
    }

    /// Reads the `off` and optional `len` of `${a:off:len}`.
    fn param_slice(&mut self) -> Result<Slice> {
        let ctx = ArithCtx {
            colon_term: true,
            brace_term: true,
            ..ArithCtx::default()
        };
        let offset = Box::new(self.arithm(ctx, ":")?);
        let length = if self.lexer.skip_char(':')? {
            Some(Box::new(self.arithm(ctx, ":")?))
        } else {
            None
        };
        Ok(Slice { offset, length })
    }

    /// Reads the operand word of an expansion operator.
    fn param_expansion(&mut self, op: ParExpOp) -> Result<Expansion> {
        let word = self.word(WordMode::ParamExpArg)?;
        Ok(Expansion { op, word })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Config, Variant};
    use crate::syntax::{Command, Node};
    use assert_matches::assert_matches;

    fn param(code: &str) -> ParamExp {
        let file = Config::new().parse_str("", code).unwrap();
        let Some(Command::Call(call)) = &file.stmts[0].cmd else {
            panic!("expected call: {:?}", file.stmts[0].cmd);
        };
        let WordPart::ParamExp(exp) = &call.args.last().unwrap().parts[0] else {
            panic!("expected parameter expansion");
        };
        (**exp).clone()
    }

    #[test]
    fn plain_and_length() {
        let exp = param("echo ${foo}");
        assert!(!exp.short);
        assert!(!exp.length);
        assert_eq!(exp.param.value, "foo");
        assert_eq!(exp.dollar, Pos::new(6));
        assert_eq!(exp.rbrace, Pos::new(11));
        assert_eq!(exp.end(), Pos::new(12));

        let exp = param("echo ${#foo}");
        assert!(exp.length);
        assert_eq!(exp.param.value, "foo");

        let exp = param("echo ${#}");
        assert!(!exp.length);
        assert_eq!(exp.param.value, "#");

        let exp = param("echo ${10}");
        assert_eq!(exp.param.value, "10");
    }

    #[test]
    fn expansion_operators() {
        let exp = param("echo ${a:-b}");
        let got = exp.exp.unwrap();
        assert_eq!(got.op, ParExpOp::DefaultUnsetOrNull);
        assert_eq!(got.word.lit(), Some("b"));

        let exp = param("echo ${a+}");
        let got = exp.exp.unwrap();
        assert_eq!(got.op, ParExpOp::AlternateUnset);
        assert!(got.word.is_empty());

        let exp = param("echo ${a##*/}");
        let got = exp.exp.unwrap();
        assert_eq!(got.op, ParExpOp::RemLargePrefix);
        assert_eq!(got.word.lit(), Some("*/"));

        let exp = param("echo ${a%b}");
        assert_eq!(exp.exp.unwrap().op, ParExpOp::RemSmallSuffix);

        let exp = param("echo ${a,,}");
        assert_eq!(exp.exp.unwrap().op, ParExpOp::LowerAll);

        let exp = param("echo ${a@Q}");
        let got = exp.exp.unwrap();
        assert_eq!(got.op, ParExpOp::OtherParamOps);
        assert_eq!(got.word.lit(), Some("Q"));
    }

    #[test]
    fn operand_may_contain_blanks_and_expansions() {
        let exp = param("echo ${a:-b c $d}");
        let got = exp.exp.unwrap();
        assert_eq!(got.word.parts.len(), 2);
    }

    #[test]
    fn slices() {
        let exp = param("echo ${a:1}");
        let slice = exp.slice.unwrap();
        assert!(slice.length.is_none());

        let exp = param("echo ${a:1:2}");
        let slice = exp.slice.unwrap();
        assert!(slice.length.is_some());

        let e = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "echo ${a:1}")
            .unwrap_err();
        assert_eq!(e.to_string(), "1:9: slicing is a bash feature");
    }

    #[test]
    fn replacements() {
        let exp = param("echo ${a/b/c}");
        let repl = exp.repl.unwrap();
        assert!(!repl.all);
        assert_eq!(repl.orig.lit(), Some("b"));
        assert_eq!(repl.with.unwrap().lit(), Some("c"));

        let exp = param("echo ${a//b}");
        let repl = exp.repl.unwrap();
        assert!(repl.all);
        assert!(repl.with.is_none());

        // Slashes in the replacement are literal.
        let exp = param("echo ${a/b/c/d}");
        let repl = exp.repl.unwrap();
        assert_eq!(repl.with.unwrap().lit(), Some("c/d"));

        let e = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "echo ${a/b/c}")
            .unwrap_err();
        assert_eq!(e.to_string(), "1:9: search and replace is a bash feature");
    }

    #[test]
    fn indexes() {
        let exp = param("echo ${a[1+2]}");
        assert!(exp.index.is_some());

        let exp = param("echo ${a[@]}");
        assert_matches!(exp.index.as_deref(), Some(ArithmExpr::Word(w)) => {
            assert_eq!(w.lit(), Some("@"));
        });

        let e = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "echo ${a[1]}")
            .unwrap_err();
        assert_eq!(e.to_string(), "1:9: arrays are a bash feature");
    }

    #[test]
    fn gates_under_posix() {
        let e = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "echo ${a^^}")
            .unwrap_err();
        assert_eq!(e.to_string(), "1:9: case expansions are a bash feature");

        let e = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "echo ${a@U}")
            .unwrap_err();
        assert_eq!(
            e.to_string(),
            "1:9: this expansion operator is a bash feature"
        );
    }

    #[test]
    fn bad_expansions() {
        let e = Config::new().parse_str("", "echo ${}").unwrap_err();
        assert_eq!(e.to_string(), "1:8: parameter expansion requires a literal");

        let e = Config::new().parse_str("", "echo ${a;}").unwrap_err();
        assert_eq!(
            e.to_string(),
            "1:9: not a valid parameter expansion operator: ;"
        );

        let e = Config::new().parse_str("", "echo ${a").unwrap_err();
        assert_eq!(e.to_string(), "1:6: reached EOF without matching ${ with }");
    }
}
