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

//! Simple commands: argument lists, assignments, and the builtin-shaped
//! clauses (`declare`, `let`, `eval`, `coproc`)

use super::arith::ArithCtx;
use super::core::{Parser, Tok};
use super::error::{Result, SyntaxError};
use super::lex::{Keyword, Operator, is_blank};
use super::word::{WordMode, is_name, is_name_char, is_name_start};
use crate::syntax::{
    ArrayExpr, Assign, CallExpr, Command, Comment, CoprocClause, DeclClause, EvalClause,
    LetClause, Lit, Node, Stmt, Word, WordPart,
};

impl Parser<'_> {
    /// Parses the argument words and redirections of a plain command.
    ///
    /// `first` seeds the argument list when the caller already consumed a
    /// word. Detects `name()` function definitions on the first word.
    pub(crate) fn call_expr(&mut self, stmt: &mut Stmt, first: Option<Word>) -> Result<()> {
        let mut args: Vec<Word> = first.into_iter().collect();
        loop {
            match self.tok {
                Tok::Word => {
                    let word = self.word(WordMode::Default)?;
                    self.next_token()?;
                    if args.is_empty()
                        && stmt.assigns.is_empty()
                        && stmt.redirs.is_empty()
                        && self.tok == Tok::Op(Operator::OpenParen)
                    {
                        return self.func_decl_parens(stmt, word);
                    }
                    args.push(word);
                }
                Tok::Op(Operator::OpenParen) => {
                    return Err(self.err(self.pos, SyntaxError::CmdContainsWords));
                }
                Tok::Op(op) if op.redir_op().is_some() => {
                    let n = if self.spaced { None } else { pop_fd_number(&mut args) };
                    let redir = self.redirect(n)?;
                    stmt.redirs.push(redir);
                }
                _ => break,
            }
        }
        if !args.is_empty() {
            stmt.cmd = Some(Command::Call(CallExpr { args }));
        }
        Ok(())
    }

    /// Tries to read an assignment word at the current position.
    ///
    /// On success the assignment characters are consumed and the caller
    /// must advance the token; otherwise nothing is consumed and the word
    /// should be parsed normally.
    pub(crate) fn try_assign(&mut self) -> Result<Option<Assign>> {
        debug_assert_eq!(self.tok, Tok::Word);
        let save = self.lexer.index();
        let name_pos = self.lexer.pos();
        let mut name = String::new();
        let mut name_end = name_pos;
        match self.lexer.peek()? {
            Some(c) if is_name_start(c) => {
                name.push(c);
                self.lexer.bump();
                name_end = self.lexer.pos();
            }
            _ => {
                self.lexer.rewind(save);
                return Ok(None);
            }
        }
        while let Some(c) = self.lexer.next_char_if(is_name_char)? {
            name.push(c);
            name_end = self.lexer.pos();
        }

        let mut index = None;
        if self.lexer.peek()? == Some('[') {
            if !self.bash() || !self.bracket_then_assign()? {
                self.lexer.rewind(save);
                return Ok(None);
            }
            self.lexer.bump(); // [
            let ctx = ArithCtx {
                bracket_term: true,
                ..ArithCtx::default()
            };
            let expr = self.arithm(ctx, "[")?;
            self.skip_arith_space()?;
            let closed = self.lexer.skip_char(']')?;
            debug_assert!(closed, "the bracket scan found the closing bracket");
            index = Some(Box::new(expr));
        }

        let append = self.lexer.peek()? == Some('+');
        if append {
            self.lexer.bump();
        }
        if !self.lexer.skip_char('=')? {
            self.lexer.rewind(save);
            return Ok(None);
        }

        let mut assign = Assign {
            name: Lit {
                pos: name_pos,
                end: name_end,
                value: name,
            },
            append,
            index,
            naked: false,
            value: None,
            array: None,
        };
        match self.lexer.peek()? {
            Some('(') => {
                let pos = self.lexer.pos();
                self.bash_feature(pos, "arrays", true)?;
                assign.array = Some(self.array_expr()?);
            }
            Some(c) if !super::core::is_word_break(c) => {
                let value = self.word(WordMode::Default)?;
                if !value.is_empty() {
                    assign.value = Some(value);
                }
            }
            _ => {}
        }
        Ok(Some(assign))
    }

    /// Scans ahead from a `[` for a balanced `]` followed by `=` or `+=`,
    /// without consuming anything.
    fn bracket_then_assign(&mut self) -> Result<bool> {
        let save = self.lexer.index();
        self.lexer.bump(); // [
        let mut depth = 1usize;
        let result = loop {
            match self.lexer.next_char()? {
                None => break false,
                Some('[') => depth += 1,
                Some(']') => {
                    depth -= 1;
                    if depth == 0 {
                        break match self.lexer.peek()? {
                            Some('=') => true,
                            Some('+') => {
                                self.lexer.bump();
                                self.lexer.peek()? == Some('=')
                            }
                            _ => false,
                        };
                    }
                }
                Some('\n') => break false,
                Some(_) => {}
            }
        };
        self.lexer.rewind(save);
        Ok(result)
    }

    /// Parses the `(…)` of an array assignment; the lexer is at the `(`.
    fn array_expr(&mut self) -> Result<ArrayExpr> {
        let lparen = self.lexer.pos();
        self.lexer.bump(); // (
        let mut elems = Vec::new();
        loop {
            // Array values may span lines and carry comments.
            loop {
                match self.lexer.peek()? {
                    Some(c) if is_blank(c) || c == '\n' => self.lexer.bump(),
                    Some('#') => {
                        let hash = self.lexer.pos();
                        self.lexer.bump();
                        let mut text = String::new();
                        while let Some(c) = self.lexer.next_char_if(|c| c != '\n')? {
                            text.push(c);
                        }
                        if self.keep_comments {
                            self.comments.push(Comment { hash, text });
                        }
                    }
                    _ => break,
                }
            }
            match self.lexer.peek()? {
                None => {
                    return Err(self.err(
                        lparen,
                        SyntaxError::Unmatched {
                            end: "EOF".into(),
                            open: "(",
                            close: ")",
                        },
                    ));
                }
                Some(')') => break,
                _ => {
                    let word = self.word(WordMode::Default)?;
                    if word.is_empty() {
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
                    elems.push(word);
                }
            }
        }
        let rparen = self.lexer.pos();
        self.lexer.bump(); // )
        Ok(ArrayExpr {
            lparen,
            rparen,
            elems,
        })
    }

    /// Parses a `declare`-family clause; the builtin name is current.
    pub(crate) fn decl_clause(&mut self, stmt: &mut Stmt) -> Result<()> {
        let variant = self.take_lit()?;
        self.next_token()?;
        let mut opts = Vec::new();
        let mut assigns = Vec::new();
        while self.tok == Tok::Word {
            if let Some(assign) = self.try_assign()? {
                assigns.push(assign);
                self.next_token()?;
                continue;
            }
            let word = self.word(WordMode::Default)?;
            self.next_token()?;
            if starts_with_dash(&word) {
                opts.push(word);
            } else if word.lit().is_some_and(is_name) {
                let WordPart::Lit(name) = &word.parts[0] else {
                    unreachable!()
                };
                assigns.push(Assign {
                    name: name.clone(),
                    append: false,
                    index: None,
                    naked: true,
                    value: None,
                    array: None,
                });
            } else {
                // Not a plain name; keep the word as a naked value, e.g.
                // `declare "$name"`.
                assigns.push(Assign {
                    name: Lit::default(),
                    append: false,
                    index: None,
                    naked: true,
                    value: Some(word),
                    array: None,
                });
            }
        }
        stmt.cmd = Some(Command::Decl(DeclClause {
            variant,
            opts,
            assigns,
        }));
        Ok(())
    }

    /// Parses a `let` clause; the `let` word is current.
    pub(crate) fn let_clause(&mut self, stmt: &mut Stmt) -> Result<()> {
        let let_pos = self.take_keyword()?;
        let mut exprs = Vec::new();
        while self.tok == Tok::Word {
            let ctx = ArithCtx {
                let_mode: true,
                ..ArithCtx::default()
            };
            exprs.push(self.arithm(ctx, "let")?);
            self.next_token()?;
        }
        if exprs.is_empty() {
            return Err(self.err(
                let_pos,
                SyntaxError::MustFollowKw {
                    left: "let".into(),
                    right: "an expression".into(),
                },
            ));
        }
        stmt.cmd = Some(Command::Let(LetClause { let_pos, exprs }));
        Ok(())
    }

    /// Parses an `eval` clause; the `eval` word is current.
    pub(crate) fn eval_clause(&mut self, stmt: &mut Stmt) -> Result<()> {
        let eval_pos = self.take_keyword()?;
        let inner = if self.starts_stmt() {
            Some(Box::new(self.cmd_stmt()?))
        } else {
            None
        };
        stmt.cmd = Some(Command::Eval(EvalClause {
            eval_pos,
            stmt: inner,
        }));
        Ok(())
    }

    /// Parses a `coproc` clause; the `coproc` word is current.
    pub(crate) fn coproc_clause(&mut self, stmt: &mut Stmt) -> Result<()> {
        let coproc_pos = self.take_keyword()?;
        match self.tok {
            Tok::Op(Operator::OpenParen) => {
                let inner = self.cmd_stmt()?;
                stmt.cmd = Some(Command::Coproc(CoprocClause {
                    coproc_pos,
                    name: None,
                    stmt: Box::new(inner),
                }));
                Ok(())
            }
            Tok::Word => {
                if self.peek_compound_start()? {
                    let inner = self.cmd_stmt()?;
                    stmt.cmd = Some(Command::Coproc(CoprocClause {
                        coproc_pos,
                        name: None,
                        stmt: Box::new(inner),
                    }));
                    return Ok(());
                }
                let word = self.word(WordMode::Default)?;
                self.next_token()?;
                let named = word.lit().is_some_and(is_name)
                    && (self.tok == Tok::Op(Operator::OpenParen) || self.peek_compound_start()?);
                if named {
                    let WordPart::Lit(name) = &word.parts[0] else {
                        unreachable!()
                    };
                    let name = name.clone();
                    let inner = self.cmd_stmt()?;
                    stmt.cmd = Some(Command::Coproc(CoprocClause {
                        coproc_pos,
                        name: Some(name),
                        stmt: Box::new(inner),
                    }));
                } else {
                    let mut inner = Stmt {
                        pos: word.pos(),
                        ..Stmt::default()
                    };
                    self.call_expr(&mut inner, Some(word))?;
                    stmt.cmd = Some(Command::Coproc(CoprocClause {
                        coproc_pos,
                        name: None,
                        stmt: Box::new(inner),
                    }));
                }
                Ok(())
            }
            _ => Err(self.err(
                coproc_pos,
                SyntaxError::MustFollowKw {
                    left: "coproc".into(),
                    right: "a statement".into(),
                },
            )),
        }
    }

    /// Whether the current word opens a compound command.
    fn peek_compound_start(&mut self) -> Result<bool> {
        Ok(matches!(
            self.peek_keyword()?,
            Some(
                Keyword::OpenBrace
                    | Keyword::If
                    | Keyword::While
                    | Keyword::Until
                    | Keyword::For
                    | Keyword::Case
                    | Keyword::OpenBracketBracket
            )
        ))
    }

    /// Whether the current token can begin a statement.
    fn starts_stmt(&self) -> bool {
        match self.tok {
            Tok::Word | Tok::Op(Operator::OpenParen) => true,
            Tok::Op(op) => op.redir_op().is_some(),
            _ => false,
        }
    }

}

/// Whether a declaration argument looks like an option word.
fn starts_with_dash(word: &Word) -> bool {
    match word.parts.first() {
        Some(WordPart::Lit(lit)) => lit.value.starts_with('-') || lit.value.starts_with('+'),
        _ => false,
    }
}

/// Pops the trailing all-digits argument to use as a redirect fd.
fn pop_fd_number(args: &mut Vec<Word>) -> Option<Lit> {
    let is_digits = args.last().and_then(Word::lit).is_some_and(|lit| {
        !lit.is_empty() && lit.chars().all(|c| c.is_ascii_digit())
    });
    if !is_digits {
        return None;
    }
    let word = args.pop().unwrap();
    match word.parts.into_iter().next() {
        Some(WordPart::Lit(lit)) => Some(lit),
        _ => unreachable!("checked to be a literal word"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Config, Variant};
    use crate::source::Pos;
    use crate::syntax::Node;
    use assert_matches::assert_matches;

    fn parse(code: &str) -> Stmt {
        let mut file = Config::new().parse_str("", code).unwrap();
        assert_eq!(file.stmts.len(), 1, "one statement in {code:?}");
        file.stmts.remove(0)
    }

    #[test]
    fn assignment_prefixes() {
        let stmt = parse("FOO=bar BAZ= cmd arg");
        assert_eq!(stmt.assigns.len(), 2);
        assert_eq!(stmt.assigns[0].name.value, "FOO");
        assert_eq!(stmt.assigns[0].value.as_ref().unwrap().lit(), Some("bar"));
        assert_eq!(stmt.assigns[1].name.value, "BAZ");
        assert!(stmt.assigns[1].value.is_none());
        let Some(Command::Call(call)) = &stmt.cmd else {
            panic!();
        };
        assert_eq!(call.args.len(), 2);
    }

    #[test]
    fn assignment_only_statement() {
        let stmt = parse("FOO=bar");
        assert!(stmt.cmd.is_none());
        assert_eq!(stmt.assigns.len(), 1);
        assert_eq!(stmt.end(), Pos::new(8));
    }

    #[test]
    fn append_and_index_assignments() {
        let stmt = parse("a+=x");
        assert!(stmt.assigns[0].append);

        let stmt = parse("a[1+2]=x");
        assert!(stmt.assigns[0].index.is_some());
        assert_eq!(stmt.assigns[0].name.value, "a");
    }

    #[test]
    fn non_assignments_are_words() {
        for code in ["1=x", "=x", "a[=x", "a =x"] {
            let stmt = parse(code);
            assert!(stmt.assigns.is_empty(), "no assignment in {code:?}");
            assert!(matches!(stmt.cmd, Some(Command::Call(_))));
        }
        // An invalid name with an index stays a word too.
        let stmt = parse("a[0]1=x");
        assert!(stmt.assigns.is_empty());
    }

    #[test]
    fn array_assignments() {
        let stmt = parse("a=(1 2 3)");
        let array = stmt.assigns[0].array.as_ref().unwrap();
        assert_eq!(array.elems.len(), 3);
        assert_eq!(array.lparen, Pos::new(3));
        assert_eq!(array.rparen, Pos::new(9));

        let stmt = parse("a=(1\n2)");
        assert_eq!(stmt.assigns[0].array.as_ref().unwrap().elems.len(), 2);

        let stmt = parse("a=()");
        assert!(stmt.assigns[0].array.as_ref().unwrap().elems.is_empty());
    }

    #[test]
    fn arrays_rejected_under_posix() {
        let e = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "foo=(1 2)")
            .unwrap_err();
        assert_eq!(e.to_string(), "1:5: arrays are a bash feature");
    }

    #[test]
    fn index_assignment_is_a_word_under_posix() {
        let file = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "a[0]=x")
            .unwrap();
        assert!(file.stmts[0].assigns.is_empty());
        assert!(matches!(file.stmts[0].cmd, Some(Command::Call(_))));
    }

    #[test]
    fn decl_clause() {
        let stmt = parse("declare -r -x FOO=1 BAR baz$x");
        let Some(Command::Decl(decl)) = &stmt.cmd else {
            panic!("expected decl: {:?}", stmt.cmd);
        };
        assert_eq!(decl.variant.value, "declare");
        assert_eq!(decl.opts.len(), 2);
        assert_eq!(decl.assigns.len(), 3);
        assert_eq!(decl.assigns[0].name.value, "FOO");
        assert!(!decl.assigns[0].naked);
        assert!(decl.assigns[1].naked);
        assert_eq!(decl.assigns[1].name.value, "BAR");
        assert!(decl.assigns[2].naked);
        assert!(decl.assigns[2].value.is_some());

        let stmt = parse("local x=1");
        assert!(matches!(stmt.cmd, Some(Command::Decl(_))));
    }

    #[test]
    fn decl_names_are_plain_commands_under_posix() {
        let file = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "export FOO=1")
            .unwrap();
        let stmt = &file.stmts[0];
        assert!(matches!(stmt.cmd, Some(Command::Call(_))));
    }

    #[test]
    fn let_clause() {
        let stmt = parse("let x=1 y+=2");
        let Some(Command::Let(letc)) = &stmt.cmd else {
            panic!("expected let: {:?}", stmt.cmd);
        };
        assert_eq!(letc.exprs.len(), 2);
        assert_eq!(letc.let_pos, Pos::new(1));

        let stmt = parse("let \"x = 1\"");
        let Some(Command::Let(letc)) = &stmt.cmd else {
            panic!();
        };
        assert_eq!(letc.exprs.len(), 1);
        assert_matches!(&letc.exprs[0], crate::syntax::ArithmExpr::Word(_));

        let e = Config::new().parse_str("", "let").unwrap_err();
        assert_eq!(e.to_string(), "1:1: \"let\" must be followed by an expression");
    }

    #[test]
    fn let_is_a_plain_command_under_posix() {
        let file = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "let x=1")
            .unwrap();
        assert!(matches!(file.stmts[0].cmd, Some(Command::Call(_))));
    }

    #[test]
    fn eval_clause() {
        let stmt = parse("eval foo bar");
        let Some(Command::Eval(eval)) = &stmt.cmd else {
            panic!("expected eval: {:?}", stmt.cmd);
        };
        let inner = eval.stmt.as_ref().unwrap();
        assert!(matches!(inner.cmd, Some(Command::Call(_))));

        let stmt = parse("eval");
        let Some(Command::Eval(eval)) = &stmt.cmd else {
            panic!();
        };
        assert!(eval.stmt.is_none());
    }

    #[test]
    fn coproc_clause() {
        let stmt = parse("coproc foo bar");
        let Some(Command::Coproc(coproc)) = &stmt.cmd else {
            panic!("expected coproc: {:?}", stmt.cmd);
        };
        assert!(coproc.name.is_none());
        assert!(matches!(coproc.stmt.cmd, Some(Command::Call(_))));

        let stmt = parse("coproc NAME { foo; }");
        let Some(Command::Coproc(coproc)) = &stmt.cmd else {
            panic!();
        };
        assert_eq!(coproc.name.as_ref().unwrap().value, "NAME");
        assert!(matches!(coproc.stmt.cmd, Some(Command::Block(_))));

        let stmt = parse("coproc { foo; }");
        let Some(Command::Coproc(coproc)) = &stmt.cmd else {
            panic!();
        };
        assert!(coproc.name.is_none());
    }

    #[test]
    fn keywords_after_prefix_are_command_names() {
        let stmt = parse("FOO=1 if");
        let Some(Command::Call(call)) = &stmt.cmd else {
            panic!("expected call: {:?}", stmt.cmd);
        };
        assert_eq!(call.args[0].lit(), Some("if"));
    }

    #[test]
    fn open_paren_in_command_errors() {
        let e = Config::new().parse_str("", "echo foo (bar)").unwrap_err();
        assert_eq!(
            e.to_string(),
            "1:10: a command can only contain words and redirects"
        );
    }
}
