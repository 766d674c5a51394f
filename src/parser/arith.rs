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

//! Arithmetic expression parsing
//!
//! Expressions inside `$((…))`, `((…))`, `let` arguments, array indexes
//! and parameter slices share one precedence-climbing parser. The
//! surrounding construct passes an [`ArithCtx`] that names the characters
//! that terminate the expression there.

use super::core::Parser;
use super::error::{Result, SyntaxError};
use super::lex::is_blank;
use super::word::WordMode;
use crate::source::Pos;
use crate::syntax::{
    ArithmExpr, BinAritOp, BinaryArithm, ParenArithm, UnAritOp, UnaryArithm, Word, WordPart,
};

/// Where an arithmetic expression is being parsed
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ArithCtx {
    /// `:` terminates, as in `${a:off:len}`
    pub colon_term: bool,
    /// `]` terminates, as in `$[…]` and `a[i]=`
    pub bracket_term: bool,
    /// `;` terminates, as in `for ((a; b; c))`
    pub semi_term: bool,
    /// `}` terminates, as in `${a:off}`
    pub brace_term: bool,
    /// Blanks terminate: each `let` argument is its own expression
    pub let_mode: bool,
    /// A `?` is waiting for its `:`, which ends the middle branch
    pub ternary: bool,
}

/// Precedence and associativity of a binary operator.
///
/// Higher levels bind tighter. The boolean is true for right-associative
/// levels.
fn level(op: BinAritOp) -> (u8, bool) {
    use BinAritOp::*;
    match op {
        Comma => (0, false),
        Assgn | AddAssgn | SubAssgn | MulAssgn | QuoAssgn | RemAssgn | AndAssgn | OrAssgn
        | XorAssgn | ShlAssgn | ShrAssgn => (1, true),
        Quest | Colon => (3, true),
        AndArit | OrArit => (4, false),
        And | Or | Xor => (5, false),
        Eql | Neq => (6, false),
        Lss | Gtr | Leq | Geq => (7, false),
        Shl | Shr => (8, false),
        Add | Sub => (9, false),
        Mul | Quo | Rem => (10, false),
        Pow => (11, true),
    }
}

impl Parser<'_> {
    /// Parses an optional arithmetic expression.
    ///
    /// Returns `None` when a terminator follows immediately, as in
    /// `$(( ))`.
    pub(crate) fn arithm_opt(&mut self, ctx: ArithCtx) -> Result<Option<ArithmExpr>> {
        self.skip_arith_space_in(ctx)?;
        if self.at_arith_term(ctx)? {
            return Ok(None);
        }
        self.arith_climb(ctx, 0).map(Some)
    }

    /// Parses a required arithmetic expression.
    ///
    /// `after` names the token whose operand this is, for the error when
    /// the expression is missing.
    pub(crate) fn arithm(&mut self, ctx: ArithCtx, after: &str) -> Result<ArithmExpr> {
        match self.arithm_opt(ctx)? {
            Some(expr) => Ok(expr),
            None => Err(self.err(
                self.lexer.pos(),
                SyntaxError::MustFollowOp {
                    op: after.to_string().into(),
                    what: "an expression",
                },
            )),
        }
    }

    /// Skips the whitespace allowed between arithmetic tokens.
    pub(crate) fn skip_arith_space(&mut self) -> Result<()> {
        self.skip_arith_space_in(ArithCtx::default())
    }

    fn skip_arith_space_in(&mut self, ctx: ArithCtx) -> Result<()> {
        if ctx.let_mode {
            // In a `let` argument a blank ends the expression.
            return Ok(());
        }
        while let Some(c) = self.lexer.peek()? {
            if is_blank(c) || c == '\n' {
                self.lexer.bump();
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Whether the next character terminates the expression here.
    fn at_arith_term(&mut self, ctx: ArithCtx) -> Result<bool> {
        Ok(match self.lexer.peek()? {
            None | Some(')') => true,
            Some(']') => ctx.bracket_term,
            Some(':') => ctx.colon_term,
            Some('}') => ctx.brace_term,
            Some(';') => ctx.semi_term,
            // A `let` argument is delimited like any other word, so the
            // characters that would end a word end the expression. Operator
            // characters reach arithmetic only through quoting there.
            Some(c) => ctx.let_mode && super::core::is_word_break(c),
        })
    }

    fn arith_climb(&mut self, ctx: ArithCtx, min_level: u8) -> Result<ArithmExpr> {
        let pos = self.lexer.pos();
        self.enter(pos)?;
        let result = self.arith_climb_inner(ctx, min_level);
        self.exit();
        result
    }

    fn arith_climb_inner(&mut self, ctx: ArithCtx, min_level: u8) -> Result<ArithmExpr> {
        let mut x = self.arith_unary(ctx)?;
        loop {
            self.skip_arith_space_in(ctx)?;

            // Postfix increment and decrement bind tightest.
            if let Some((op, op_pos)) = self.scan_inc_dec()? {
                x = ArithmExpr::Unary(Box::new(UnaryArithm {
                    op_pos,
                    op,
                    post: true,
                    x,
                }));
                continue;
            }

            if self.at_arith_term(ctx)? {
                return Ok(x);
            }

            let save = self.lexer.index();
            let op_pos = self.lexer.pos();
            let Some(op) = self.scan_binary_op()? else {
                let val = self.arith_atom_text()?;
                return Err(self.err(op_pos, SyntaxError::NotArithmOp { val }));
            };
            let (lvl, right_assoc) = level(op);
            if lvl < min_level {
                self.lexer.rewind(save);
                return Ok(x);
            }
            if op == BinAritOp::Colon {
                if ctx.ternary {
                    // The pending `?` owns this colon.
                    self.lexer.rewind(save);
                    return Ok(x);
                }
                return Err(self.err(op_pos, SyntaxError::TernaryMissingQuest));
            }
            if op == BinAritOp::Quest {
                let then_ctx = ArithCtx {
                    ternary: true,
                    ..ctx
                };
                let then = self.arith_climb(then_ctx, 0)?;
                self.skip_arith_space_in(ctx)?;
                let colon_pos = self.lexer.pos();
                if !self.lexer.skip_char(':')? {
                    return Err(self.err(colon_pos, SyntaxError::TernaryMissingColon));
                }
                let otherwise = self.operand_after(ctx, ":", lvl)?;
                x = ArithmExpr::Binary(Box::new(BinaryArithm {
                    op_pos,
                    op: BinAritOp::Quest,
                    x,
                    y: ArithmExpr::Binary(Box::new(BinaryArithm {
                        op_pos: colon_pos,
                        op: BinAritOp::Colon,
                        x: then,
                        y: otherwise,
                    })),
                }));
                continue;
            }
            if op.is_assign() && !is_assignable(&x) {
                return Err(self.err(op_pos, SyntaxError::AssignAfterName));
            }
            let next_min = if right_assoc { lvl } else { lvl + 1 };
            let y = self.operand_after(ctx, op.as_str(), next_min)?;
            x = ArithmExpr::Binary(Box::new(BinaryArithm { op_pos, op, x, y }));
        }
    }

    /// Parses the required right operand of `op`.
    fn operand_after(&mut self, ctx: ArithCtx, op: &str, min_level: u8) -> Result<ArithmExpr> {
        self.skip_arith_space_in(ctx)?;
        if self.at_arith_term(ctx)? {
            return Err(self.err(
                self.lexer.pos(),
                SyntaxError::MustFollowOp {
                    op: op.to_string().into(),
                    what: "an expression",
                },
            ));
        }
        self.arith_climb(ctx, min_level)
    }

    /// Parses a unary-operator chain and its operand.
    fn arith_unary(&mut self, ctx: ArithCtx) -> Result<ArithmExpr> {
        self.skip_arith_space_in(ctx)?;
        if let Some((op, op_pos)) = self.scan_inc_dec()? {
            let x = self.arith_unary(ctx)?;
            return Ok(ArithmExpr::Unary(Box::new(UnaryArithm {
                op_pos,
                op,
                post: false,
                x,
            })));
        }
        let op_pos = self.lexer.pos();
        let unary = match self.lexer.peek()? {
            Some('+') => Some(UnAritOp::Plus),
            Some('-') => Some(UnAritOp::Minus),
            Some('!') => Some(UnAritOp::Not),
            Some('~') => Some(UnAritOp::BitNegation),
            _ => None,
        };
        if let Some(op) = unary {
            // `+=` and friends are binary; never strip their first char.
            if !(matches!(op, UnAritOp::Plus | UnAritOp::Minus) && self.next_is('=')?) {
                self.lexer.bump();
                let x = self.arith_unary(ctx)?;
                return Ok(ArithmExpr::Unary(Box::new(UnaryArithm {
                    op_pos,
                    op,
                    post: false,
                    x,
                })));
            }
        }
        self.arith_primary(ctx)
    }

    /// Parses a parenthesized expression or an operand word.
    fn arith_primary(&mut self, ctx: ArithCtx) -> Result<ArithmExpr> {
        if self.lexer.peek()? == Some('(') {
            let lparen = self.lexer.pos();
            self.lexer.bump();
            // Inside parentheses the outer terminators do not apply.
            let x = self.arith_climb(ArithCtx::default(), 0)?;
            self.skip_arith_space()?;
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
            return Ok(ArithmExpr::Paren(Box::new(ParenArithm {
                lparen,
                rparen,
                x,
            })));
        }
        let pos = self.lexer.pos();
        let word = self.word(WordMode::Arithm)?;
        if word.is_empty() {
            let val = self.arith_atom_text()?;
            return Err(self.err(pos, SyntaxError::NotArithmOp { val }));
        }
        Ok(ArithmExpr::Word(word))
    }

    /// Consumes `++` or `--` if present.
    fn scan_inc_dec(&mut self) -> Result<Option<(UnAritOp, Pos)>> {
        let save = self.lexer.index();
        let pos = self.lexer.pos();
        let op = match self.lexer.peek()? {
            Some('+') => UnAritOp::Inc,
            Some('-') => UnAritOp::Dec,
            _ => return Ok(None),
        };
        let repeat = if op == UnAritOp::Inc { '+' } else { '-' };
        self.lexer.bump();
        if self.lexer.peek()? == Some(repeat) {
            self.lexer.bump();
            Ok(Some((op, pos)))
        } else {
            self.lexer.rewind(save);
            Ok(None)
        }
    }

    /// Whether the character after the current one is `c`.
    fn next_is(&mut self, c: char) -> Result<bool> {
        let save = self.lexer.index();
        self.lexer.bump();
        let found = self.lexer.peek()? == Some(c);
        self.lexer.rewind(save);
        Ok(found)
    }

    /// Consumes the longest binary operator at the current position.
    fn scan_binary_op(&mut self) -> Result<Option<BinAritOp>> {
        use BinAritOp::*;
        let Some(c) = self.lexer.peek()? else {
            return Ok(None);
        };
        let op = match c {
            ',' => self.op1(Comma)?,
            '?' => self.op1(Quest)?,
            ':' => self.op1(Colon)?,
            '=' => self.op2('=', Eql, Assgn)?,
            '+' => self.op2('=', AddAssgn, Add)?,
            '-' => self.op2('=', SubAssgn, Sub)?,
            '/' => self.op2('=', QuoAssgn, Quo)?,
            '%' => self.op2('=', RemAssgn, Rem)?,
            '^' => self.op2('=', XorAssgn, Xor)?,
            '!' => {
                if self.next_is('=')? {
                    self.lexer.bump();
                    self.lexer.bump();
                    Neq
                } else {
                    return Ok(None);
                }
            }
            '*' => {
                self.lexer.bump();
                match self.lexer.peek()? {
                    Some('*') => {
                        self.lexer.bump();
                        Pow
                    }
                    Some('=') => {
                        self.lexer.bump();
                        MulAssgn
                    }
                    _ => Mul,
                }
            }
            '&' => {
                self.lexer.bump();
                match self.lexer.peek()? {
                    Some('&') => {
                        self.lexer.bump();
                        AndArit
                    }
                    Some('=') => {
                        self.lexer.bump();
                        AndAssgn
                    }
                    _ => And,
                }
            }
            '|' => {
                self.lexer.bump();
                match self.lexer.peek()? {
                    Some('|') => {
                        self.lexer.bump();
                        OrArit
                    }
                    Some('=') => {
                        self.lexer.bump();
                        OrAssgn
                    }
                    _ => Or,
                }
            }
            '<' => {
                self.lexer.bump();
                match self.lexer.peek()? {
                    Some('<') => {
                        self.lexer.bump();
                        if self.lexer.skip_char('=')? { ShlAssgn } else { Shl }
                    }
                    Some('=') => {
                        self.lexer.bump();
                        Leq
                    }
                    _ => Lss,
                }
            }
            '>' => {
                self.lexer.bump();
                match self.lexer.peek()? {
                    Some('>') => {
                        self.lexer.bump();
                        if self.lexer.skip_char('=')? { ShrAssgn } else { Shr }
                    }
                    Some('=') => {
                        self.lexer.bump();
                        Geq
                    }
                    _ => Gtr,
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(op))
    }

    fn op1(&mut self, op: BinAritOp) -> Result<BinAritOp> {
        self.lexer.bump();
        Ok(op)
    }

    fn op2(&mut self, next: char, with: BinAritOp, without: BinAritOp) -> Result<BinAritOp> {
        self.lexer.bump();
        if self.lexer.skip_char(next)? {
            Ok(with)
        } else {
            Ok(without)
        }
    }

    /// Grabs the text of the offending token for error messages.
    fn arith_atom_text(&mut self) -> Result<String> {
        let save = self.lexer.index();
        let mut text = String::new();
        while let Some(c) = self.lexer.peek()? {
            if is_blank(c) || c == '\n' || c == ')' {
                break;
            }
            text.push(c);
            self.lexer.bump();
            if text.len() >= 8 {
                break;
            }
        }
        self.lexer.rewind(save);
        if text.is_empty() {
            text = self.ahead_desc()?.into_owned();
        }
        Ok(text)
    }
}

/// Whether an expression may be assigned to.
fn is_assignable(x: &ArithmExpr) -> bool {
    let ArithmExpr::Word(Word { parts }) = x else {
        return false;
    };
    let [WordPart::Lit(lit)] = parts.as_slice() else {
        return false;
    };
    let name = lit.value.split('[').next().unwrap_or_default();
    super::word::is_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Config;
    use crate::syntax::{Command, Node};
    use assert_matches::assert_matches;

    fn arith(code: &str) -> ArithmExpr {
        let file = Config::new().parse_str("", code).unwrap();
        let Some(Command::Call(call)) = &file.stmts[0].cmd else {
            panic!("expected call: {:?}", file.stmts[0].cmd);
        };
        let WordPart::ArithmExp(exp) = &call.args.last().unwrap().parts[0] else {
            panic!("expected arithmetic expansion");
        };
        *exp.expr.clone().expect("expression should not be empty")
    }

    fn binary(x: &ArithmExpr) -> &BinaryArithm {
        match x {
            ArithmExpr::Binary(b) => b,
            _ => panic!("expected binary expression: {x:?}"),
        }
    }

    #[test]
    fn precedence_add_mul() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let expr = arith("echo $((1 + 2 * 3))");
        let b = binary(&expr);
        assert_eq!(b.op, BinAritOp::Add);
        assert_eq!(binary(&b.y).op, BinAritOp::Mul);
    }

    #[test]
    fn left_associativity() {
        // 1 - 2 - 3 parses as (1 - 2) - 3
        let expr = arith("echo $((1 - 2 - 3))");
        let b = binary(&expr);
        assert_eq!(b.op, BinAritOp::Sub);
        assert_eq!(binary(&b.x).op, BinAritOp::Sub);
        assert_matches!(&b.y, ArithmExpr::Word(w) => assert_eq!(w.lit(), Some("3")));
    }

    #[test]
    fn power_is_right_associative() {
        // 2 ** 3 ** 2 parses as 2 ** (3 ** 2)
        let expr = arith("echo $((2 ** 3 ** 2))");
        let b = binary(&expr);
        assert_eq!(b.op, BinAritOp::Pow);
        assert_eq!(binary(&b.y).op, BinAritOp::Pow);
    }

    #[test]
    fn assignment_chains_right() {
        let expr = arith("echo $((a = b = 1))");
        let b = binary(&expr);
        assert_eq!(b.op, BinAritOp::Assgn);
        assert_eq!(binary(&b.y).op, BinAritOp::Assgn);
    }

    #[test]
    fn compound_assignments() {
        for (src, op) in [
            ("echo $((a += 1))", BinAritOp::AddAssgn),
            ("echo $((a <<= 1))", BinAritOp::ShlAssgn),
            ("echo $((a >>= 1))", BinAritOp::ShrAssgn),
            ("echo $((a %= 1))", BinAritOp::RemAssgn),
        ] {
            let expr = arith(src);
            assert_eq!(binary(&expr).op, op, "for {src}");
        }
    }

    #[test]
    fn ternary_encodes_as_quest_colon() {
        let expr = arith("echo $((a ? b : c))");
        let quest = binary(&expr);
        assert_eq!(quest.op, BinAritOp::Quest);
        let colon = binary(&quest.y);
        assert_eq!(colon.op, BinAritOp::Colon);
    }

    #[test]
    fn unary_and_postfix() {
        let expr = arith("echo $((-x))");
        assert_matches!(&expr, ArithmExpr::Unary(u) => {
            assert_eq!(u.op, UnAritOp::Minus);
            assert!(!u.post);
        });

        let expr = arith("echo $((x++))");
        assert_matches!(&expr, ArithmExpr::Unary(u) => {
            assert_eq!(u.op, UnAritOp::Inc);
            assert!(u.post);
        });

        let expr = arith("echo $((++x))");
        assert_matches!(&expr, ArithmExpr::Unary(u) => {
            assert_eq!(u.op, UnAritOp::Inc);
            assert!(!u.post);
        });

        // Unary minus binds tighter than **.
        let expr = arith("echo $((-2 ** 2))");
        let b = binary(&expr);
        assert_eq!(b.op, BinAritOp::Pow);
        assert_matches!(&b.x, ArithmExpr::Unary(_));
    }

    #[test]
    fn parens_and_words() {
        let expr = arith("echo $(((1 + 2) * $x))");
        let b = binary(&expr);
        assert_eq!(b.op, BinAritOp::Mul);
        assert_matches!(&b.x, ArithmExpr::Paren(p) => {
            assert_eq!(binary(&p.x).op, BinAritOp::Add);
        });
        assert_matches!(&b.y, ArithmExpr::Word(_));
    }

    #[test]
    fn array_element_assignment() {
        let expr = arith("echo $((a[0] = 2))");
        assert_eq!(binary(&expr).op, BinAritOp::Assgn);
    }

    #[test]
    fn positions_span_the_expression() {
        let expr = arith("echo $((1 + 2))");
        assert_eq!(expr.pos(), Pos::new(9));
        assert_eq!(expr.end(), Pos::new(14));
    }

    #[test]
    fn empty_expansion_is_allowed() {
        let file = Config::new().parse_str("", "echo $(( ))").unwrap();
        let Some(Command::Call(call)) = &file.stmts[0].cmd else {
            panic!();
        };
        assert_matches!(&call.args[1].parts[0], WordPart::ArithmExp(exp) => {
            assert!(exp.expr.is_none());
        });
    }

    #[test]
    fn assignment_requires_a_name() {
        let e = Config::new().parse_str("", "echo $((1=2))").unwrap_err();
        assert_eq!(e.to_string(), "1:10: = must follow a name");

        let e = Config::new().parse_str("", "echo $((1 += 2))").unwrap_err();
        assert_eq!(e.to_string(), "1:11: = must follow a name");
    }

    #[test]
    fn ternary_errors() {
        let e = Config::new().parse_str("", "echo $((a ? b))").unwrap_err();
        assert_eq!(e.to_string(), "1:14: ternary operator missing : after ?");

        let e = Config::new().parse_str("", "echo $((a : b))").unwrap_err();
        assert_eq!(e.to_string(), "1:11: ternary operator missing ? before :");
    }

    #[test]
    fn operator_errors() {
        let e = Config::new().parse_str("", "echo $((1 2))").unwrap_err();
        assert_eq!(e.to_string(), "1:11: not a valid arithmetic operator: 2");

        let e = Config::new().parse_str("", "echo $((1 +))").unwrap_err();
        assert_eq!(e.to_string(), "1:12: + must be followed by an expression");
    }

    #[test]
    fn newlines_are_whitespace_inside_arithmetic() {
        let expr = arith("echo $((1 +\n2))");
        assert_eq!(binary(&expr).op, BinAritOp::Add);
    }
}
