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

//! Parsing of `[[ … ]]` test clauses
//!
//! The expression grammar is small: `||` over `&&` over negation,
//! parentheses, unary file and string operators, and binary operators
//! whose right side is lexed in regex mode after `=~`.

use super::core::Parser;
use super::error::{Result, SyntaxError};
use super::lex::is_blank;
use super::word::WordMode;
use crate::source::Pos;
use crate::syntax::{
    BinTestOp, BinaryTest, ParenTest, TestClause, TestExpr, UnTestOp, UnaryTest,
};

impl Parser<'_> {
    /// Parses a test clause; the `[[` word is current.
    pub(crate) fn test_clause(&mut self) -> Result<TestClause> {
        let left = self.pos;
        self.take_lit()?; // [[
        let x = self.test_expr_or(left)?;
        self.skip_test_space()?;
        let right = self.lexer.pos();
        if !self.at_test_close()? {
            let end = self.ahead_desc()?;
            return Err(self.err(
                left,
                SyntaxError::Unmatched {
                    end,
                    open: "[[",
                    close: "]]",
                },
            ));
        }
        self.lexer.bump();
        self.lexer.bump();
        self.next_token()?;
        Ok(TestClause { left, right, x })
    }

    /// Whether the next characters are the closing `]]`.
    fn at_test_close(&mut self) -> Result<bool> {
        if self.lexer.peek()? != Some(']') {
            return Ok(false);
        }
        let save = self.lexer.index();
        self.lexer.bump();
        let found = self.lexer.peek()? == Some(']');
        self.lexer.rewind(save);
        Ok(found)
    }

    fn skip_test_space(&mut self) -> Result<()> {
        while let Some(c) = self.lexer.peek()? {
            if is_blank(c) || c == '\n' {
                self.lexer.bump();
            } else {
                break;
            }
        }
        Ok(())
    }

    fn test_expr_or(&mut self, left: Pos) -> Result<TestExpr> {
        let x = self.test_expr_and(left)?;
        self.skip_test_space()?;
        if self.lexer.peek()? == Some('|') && self.test_second_is('|')? {
            let op_pos = self.lexer.pos();
            self.lexer.bump();
            self.lexer.bump();
            let y = self.test_expr_or(left)?;
            return Ok(TestExpr::Binary(Box::new(BinaryTest {
                op_pos,
                op: BinTestOp::OrTest,
                x,
                y,
            })));
        }
        Ok(x)
    }

    fn test_expr_and(&mut self, left: Pos) -> Result<TestExpr> {
        let x = self.test_expr_unary(left)?;
        self.skip_test_space()?;
        if self.lexer.peek()? == Some('&') && self.test_second_is('&')? {
            let op_pos = self.lexer.pos();
            self.lexer.bump();
            self.lexer.bump();
            let y = self.test_expr_and(left)?;
            return Ok(TestExpr::Binary(Box::new(BinaryTest {
                op_pos,
                op: BinTestOp::AndTest,
                x,
                y,
            })));
        }
        Ok(x)
    }

    fn test_second_is(&mut self, c: char) -> Result<bool> {
        let save = self.lexer.index();
        self.lexer.bump();
        let found = self.lexer.peek()? == Some(c);
        self.lexer.rewind(save);
        Ok(found)
    }

    fn test_expr_unary(&mut self, left: Pos) -> Result<TestExpr> {
        let pos = self.lexer.pos();
        self.enter(pos)?;
        let result = self.test_expr_unary_inner(left);
        self.exit();
        result
    }

    fn test_expr_unary_inner(&mut self, left: Pos) -> Result<TestExpr> {
        self.skip_test_space()?;
        match self.lexer.peek()? {
            None => Err(self.err(
                left,
                SyntaxError::Unmatched {
                    end: "EOF".into(),
                    open: "[[",
                    close: "]]",
                },
            )),
            Some('(') => {
                let lparen = self.lexer.pos();
                self.lexer.bump();
                let x = self.test_expr_or(left)?;
                self.skip_test_space()?;
                let rparen = self.lexer.pos();
                if !self.lexer.skip_char(')')? {
                    let end = self.ahead_desc()?;
                    return Err(self.err(
                        lparen,
                        SyntaxError::Unmatched {
                            end,
                            open: "(",
                            close: ")",
                        },
                    ));
                }
                Ok(TestExpr::Paren(Box::new(ParenTest { lparen, rparen, x })))
            }
            _ => {
                let word_pos = self.lexer.pos();
                let word = self.word(WordMode::TestWord)?;
                if word.is_empty() {
                    let end = self.ahead_desc()?;
                    return Err(self.err(
                        left,
                        SyntaxError::Unmatched {
                            end,
                            open: "[[",
                            close: "]]",
                        },
                    ));
                }
                // `!` negates; unary operators take the next expression
                // as their operand when one follows.
                if let Some(op) = word.lit().and_then(UnTestOp::from_word) {
                    self.skip_test_space()?;
                    if !self.at_test_close()? && !self.at_test_operand_end()? {
                        let x = if op == UnTestOp::NotTest {
                            self.test_expr_unary(left)?
                        } else {
                            let operand = self.test_word_operand(left)?;
                            self.test_expr_binary_tail(operand)?
                        };
                        return Ok(TestExpr::Unary(Box::new(UnaryTest {
                            op_pos: word_pos,
                            op,
                            x,
                        })));
                    }
                }
                self.test_expr_binary_tail(TestExpr::Word(word))
            }
        }
    }

    /// Whether nothing can follow as an operand, e.g. before `&&`.
    fn at_test_operand_end(&mut self) -> Result<bool> {
        Ok(match self.lexer.peek()? {
            None | Some(')') => true,
            Some('&') | Some('|') => true,
            _ => false,
        })
    }

    /// Parses a single word operand.
    fn test_word_operand(&mut self, left: Pos) -> Result<TestExpr> {
        self.skip_test_space()?;
        let word = self.word(WordMode::TestWord)?;
        if word.is_empty() {
            let end = self.ahead_desc()?;
            return Err(self.err(
                left,
                SyntaxError::Unmatched {
                    end,
                    open: "[[",
                    close: "]]",
                },
            ));
        }
        Ok(TestExpr::Word(word))
    }

    /// Attaches a binary operator to a word operand, if one follows.
    fn test_expr_binary_tail(&mut self, x: TestExpr) -> Result<TestExpr> {
        self.skip_test_space()?;
        let op_pos = self.lexer.pos();
        let Some(op) = self.scan_test_binary_op()? else {
            return Ok(x);
        };
        self.skip_test_space()?;
        let mode = if op == BinTestOp::ReMatch {
            WordMode::TestRegexp
        } else {
            WordMode::TestWord
        };
        let y_pos = self.lexer.pos();
        let y = self.word(mode)?;
        if y.is_empty() {
            return Err(self.err(
                y_pos,
                SyntaxError::MustFollowOp {
                    op: op.as_str().into(),
                    what: "a word",
                },
            ));
        }
        Ok(TestExpr::Binary(Box::new(BinaryTest {
            op_pos,
            op,
            x,
            y: TestExpr::Word(y),
        })))
    }

    /// Consumes a binary test operator if one is next.
    ///
    /// Character operators are matched directly; `-`-style operators are
    /// matched as literal words and unknown ones are rejected.
    fn scan_test_binary_op(&mut self) -> Result<Option<BinTestOp>> {
        use BinTestOp::*;
        match self.lexer.peek()? {
            Some('=') => {
                self.lexer.bump();
                match self.lexer.peek()? {
                    Some('=') => {
                        self.lexer.bump();
                        Ok(Some(Match))
                    }
                    Some('~') => {
                        self.lexer.bump();
                        Ok(Some(ReMatch))
                    }
                    _ => Ok(Some(MatchShort)),
                }
            }
            Some('!') => {
                let save = self.lexer.index();
                self.lexer.bump();
                if self.lexer.skip_char('=')? {
                    Ok(Some(NoMatch))
                } else {
                    self.lexer.rewind(save);
                    Ok(None)
                }
            }
            Some('<') => {
                self.lexer.bump();
                Ok(Some(Before))
            }
            Some('>') => {
                self.lexer.bump();
                Ok(Some(After))
            }
            Some('-') => {
                // A word like `-nt`; reject unknown operators.
                let save = self.lexer.index();
                let pos = self.lexer.pos();
                let mut text = String::from("-");
                self.lexer.bump();
                while let Some(c) = self.lexer.next_char_if(|c| c.is_ascii_alphabetic())? {
                    text.push(c);
                }
                let boundary = match self.lexer.peek()? {
                    None => true,
                    Some(c) => is_blank(c) || matches!(c, '\n' | ')'),
                };
                match BinTestOp::from_word(&text) {
                    Some(op) if boundary => Ok(Some(op)),
                    _ if boundary && text.len() > 1 => {
                        Err(self.err(pos, SyntaxError::NotTestOp { val: text }))
                    }
                    _ => {
                        self.lexer.rewind(save);
                        Ok(None)
                    }
                }
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{Config, Variant};
    use crate::syntax::{BinTestOp, Command, TestExpr, UnTestOp};
    use assert_matches::assert_matches;

    fn test_expr(code: &str) -> TestExpr {
        let file = Config::new().parse_str("", code).unwrap();
        let Some(Command::Test(clause)) = &file.stmts[0].cmd else {
            panic!("expected test clause: {:?}", file.stmts[0].cmd);
        };
        clause.x.clone()
    }

    #[test]
    fn single_word() {
        let x = test_expr("[[ string ]]");
        assert_matches!(x, TestExpr::Word(w) => assert_eq!(w.lit(), Some("string")));
    }

    #[test]
    fn unary_operators() {
        let x = test_expr("[[ -e /etc/passwd ]]");
        assert_matches!(x, TestExpr::Unary(u) => {
            assert_eq!(u.op, UnTestOp::Exists);
            assert_matches!(&u.x, TestExpr::Word(_));
        });

        // Without an operand the operator is a plain word.
        let x = test_expr("[[ -e ]]");
        assert_matches!(x, TestExpr::Word(w) => assert_eq!(w.lit(), Some("-e")));
    }

    #[test]
    fn binary_operators() {
        let x = test_expr("[[ a == b ]]");
        assert_matches!(x, TestExpr::Binary(b) => {
            assert_eq!(b.op, BinTestOp::Match);
        });

        let x = test_expr("[[ f1 -nt f2 ]]");
        assert_matches!(x, TestExpr::Binary(b) => {
            assert_eq!(b.op, BinTestOp::Newer);
        });

        let x = test_expr("[[ 1 -eq 2 ]]");
        assert_matches!(x, TestExpr::Binary(b) => {
            assert_eq!(b.op, BinTestOp::Eql);
        });

        let x = test_expr("[[ a < b ]]");
        assert_matches!(x, TestExpr::Binary(b) => {
            assert_eq!(b.op, BinTestOp::Before);
        });
    }

    #[test]
    fn regex_match() {
        let x = test_expr("[[ $x =~ ^(a|b)+$ ]]");
        assert_matches!(x, TestExpr::Binary(b) => {
            assert_eq!(b.op, BinTestOp::ReMatch);
            assert_matches!(&b.y, TestExpr::Word(w) => {
                assert_eq!(w.lit(), Some("^(a|b)+$"));
            });
        });

        // Spaces inside regex groups do not end the word.
        let x = test_expr("[[ $x =~ (a b) ]]");
        assert_matches!(x, TestExpr::Binary(b) => {
            assert_matches!(&b.y, TestExpr::Word(w) => {
                assert_eq!(w.lit(), Some("(a b)"));
            });
        });
    }

    #[test]
    fn logic_and_parens() {
        let x = test_expr("[[ a && b || c ]]");
        // || binds last: (a && b) || c
        assert_matches!(x, TestExpr::Binary(or) => {
            assert_eq!(or.op, BinTestOp::OrTest);
            assert_matches!(&or.x, TestExpr::Binary(and) => {
                assert_eq!(and.op, BinTestOp::AndTest);
            });
        });

        let x = test_expr("[[ ( a || b ) && c ]]");
        assert_matches!(x, TestExpr::Binary(and) => {
            assert_eq!(and.op, BinTestOp::AndTest);
            assert_matches!(&and.x, TestExpr::Paren(_));
        });
    }

    #[test]
    fn negation() {
        let x = test_expr("[[ ! -f x ]]");
        assert_matches!(x, TestExpr::Unary(not) => {
            assert_eq!(not.op, UnTestOp::NotTest);
            assert_matches!(&not.x, TestExpr::Unary(inner) => {
                assert_eq!(inner.op, UnTestOp::RegFile);
            });
        });
    }

    #[test]
    fn posix_gate() {
        let e = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "[[ a ]]")
            .unwrap_err();
        assert_eq!(e.to_string(), "1:1: test clauses are a bash feature");
    }

    #[test]
    fn bad_operator() {
        let e = Config::new().parse_str("", "[[ a -foo b ]]").unwrap_err();
        assert_eq!(e.to_string(), "1:6: not a valid test operator: -foo");
    }

    #[test]
    fn unclosed_clause() {
        let e = Config::new().parse_str("", "[[ a").unwrap_err();
        assert_eq!(e.to_string(), "1:1: reached EOF without matching [[ with ]]");
    }
}
