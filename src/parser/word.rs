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

//! Word and word part parsing
//!
//! A word is read one [`WordPart`] at a time. What delimits a word and
//! which expansions are live depends on the surrounding construct, which
//! the parser expresses as a [`WordMode`].

use super::arith::ArithCtx;
use super::core::{Parser, Stops, Tok, is_word_break};
use super::error::{Result, SyntaxError};
use super::lex::{Operator, is_blank};
use crate::source::Pos;
use crate::syntax::{
    ArithmExp, CmdSubst, DblQuoted, ExtGlob, GlobOp, Lit, ParamExp, ProcOp, ProcSubst,
    SglQuoted, Word, WordPart,
};
use std::borrow::Cow;

/// Context a word is being read in
///
/// The mode selects which characters end the word and which expansions
/// are recognized inside it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum WordMode {
    /// Command arguments, case patterns, assignment values
    Default,
    /// Heredoc delimiter: quoting allowed, expansions rejected
    HdocDelim,
    /// Unquoted lines of a heredoc body: only `$` and backquotes expand
    HdocBody,
    /// Operand of an arithmetic expression
    Arithm,
    /// Operand inside `[[ … ]]`
    TestWord,
    /// Right-hand side of `=~`: the word runs to unquoted whitespace,
    /// with parentheses nesting
    TestRegexp,
    /// Operand of a `${name<op>word}` expansion: runs to the `}`
    ParamExpArg,
    /// Pattern or replacement of `${name/from/to}`: runs to `/` or `}`
    ParamExpRepl,
}

impl WordMode {
    /// Whether `$'…'` and `$"…"` are recognized.
    fn dollar_quotes(self) -> bool {
        self != WordMode::HdocBody
    }

    /// Whether extended globs are recognized.
    fn ext_globs(self) -> bool {
        matches!(
            self,
            WordMode::Default | WordMode::TestWord | WordMode::TestRegexp
        )
    }
}

impl Parser<'_> {
    /// Parses a word in the given mode.
    ///
    /// The returned word is empty if no word starts here; callers decide
    /// whether that is an error. The statement-level token is stale after
    /// this; callers return to token land with
    /// [`next_token`](Parser::next_token).
    pub(crate) fn word(&mut self, mode: WordMode) -> Result<Word> {
        let mut parts = Vec::new();
        let mut paren_depth = 0;
        if mode == WordMode::Default {
            if let Some(part) = self.proc_subst()? {
                parts.push(part);
            }
        }
        while let Some(part) = self.word_part(mode, &mut paren_depth)? {
            parts.push(part);
        }
        Ok(Word { parts })
    }

    /// Parses a word and requires it to be non-empty.
    pub(crate) fn required_word(&mut self, mode: WordMode, op: &str) -> Result<Word> {
        let word = self.word(mode)?;
        if word.is_empty() {
            return Err(self.err(
                self.lexer.pos(),
                SyntaxError::MustFollowOp {
                    op: op.to_string().into(),
                    what: "a word",
                },
            ));
        }
        Ok(word)
    }

    fn word_part(
        &mut self,
        mode: WordMode,
        paren_depth: &mut usize,
    ) -> Result<Option<WordPart>> {
        let pos = self.lexer.pos();
        self.enter(pos)?;
        let result = self.word_part_inner(mode, paren_depth);
        self.exit();
        result
    }

    fn word_part_inner(
        &mut self,
        mode: WordMode,
        paren_depth: &mut usize,
    ) -> Result<Option<WordPart>> {
        if self.at_backquote_close()? {
            return Ok(None);
        }
        let Some(c) = self.lexer.peek()? else {
            return Ok(None);
        };
        if is_word_stop(mode, *paren_depth, c) {
            return Ok(None);
        }
        if c == '\'' {
            return self.sgl_quoted(false).map(Some);
        }
        if c == '"' {
            return self.dbl_quoted(false).map(Some);
        }
        if c == '`' || (c == '\\' && self.bquote_depth == 1 && self.char_after_is('`')?) {
            self.reject_hdoc_expansion(mode)?;
            return self.backquote_subst().map(Some);
        }
        if c == '$' {
            self.reject_hdoc_expansion(mode)?;
            return self.dollar(mode).map(Some);
        }
        if matches!(c, '@' | '?' | '*' | '+' | '!')
            && mode.ext_globs()
            && self.char_after_is('(')?
        {
            let pos = self.lexer.pos();
            self.bash_feature(pos, "extended globs", true)?;
            return self.ext_glob().map(Some);
        }
        self.lit(mode, paren_depth).map(Some)
    }

    /// Errors out if the current character would expand in a heredoc
    /// delimiter.
    fn reject_hdoc_expansion(&mut self, mode: WordMode) -> Result<()> {
        if mode == WordMode::HdocDelim {
            let pos = self.lexer.pos();
            return Err(self.err(pos, SyntaxError::HdocWordNoExpansion));
        }
        Ok(())
    }

    /// Whether the character after the current one is `c`.
    fn char_after_is(&mut self, c: char) -> Result<bool> {
        let save = self.lexer.index();
        self.lexer.bump();
        let found = self.lexer.peek()? == Some(c);
        self.lexer.rewind(save);
        Ok(found)
    }

    /// Parses a literal run.
    fn lit(&mut self, mode: WordMode, paren_depth: &mut usize) -> Result<WordPart> {
        let pos = self.lexer.pos();
        let mut end = pos;
        let mut value = String::new();
        let mut bracket_depth = 0usize;
        loop {
            let Some(c) = self.lexer.peek()? else { break };
            if c == '\\' {
                let save = self.lexer.index();
                self.lexer.bump();
                match self.lexer.peek()? {
                    // Leave nested backquote delimiters to the caller.
                    Some('`') if self.bquote_depth >= 1 => {
                        self.lexer.rewind(save);
                        break;
                    }
                    Some(next) => {
                        value.push('\\');
                        value.push(next);
                        self.lexer.bump();
                    }
                    None => {
                        value.push('\\');
                        end = self.lexer.pos();
                        break;
                    }
                }
                end = self.lexer.pos();
                continue;
            }
            if matches!(c, '\'' | '"' | '$' | '`') {
                break;
            }
            if mode == WordMode::Arithm && c == '[' {
                bracket_depth += 1;
            } else if mode == WordMode::Arithm && c == ']' && bracket_depth > 0 {
                bracket_depth -= 1;
            } else if mode == WordMode::TestRegexp && c == '(' {
                *paren_depth += 1;
            } else if mode == WordMode::TestRegexp && c == ')' && *paren_depth > 0 {
                *paren_depth -= 1;
            } else if matches!(c, '@' | '?' | '*' | '+' | '!')
                && mode.ext_globs()
                && self.char_after_is('(')?
            {
                break;
            } else if is_word_stop(mode, *paren_depth, c) {
                break;
            }
            value.push(c);
            self.lexer.bump();
            end = self.lexer.pos();
        }
        debug_assert!(!value.is_empty());
        Ok(WordPart::Lit(Lit { pos, end, value }))
    }

    /// Parses `'…'` or, with `dollar`, `$'…'`.
    pub(crate) fn sgl_quoted(&mut self, dollar: bool) -> Result<WordPart> {
        let left = self.lexer.pos();
        if dollar {
            self.bash_feature(left, "dollar single quotes", true)?;
            self.lexer.bump(); // $
        }
        self.lexer.bump(); // '
        let prev = self.lexer.set_line_continuation(false);
        let result = self.sgl_quoted_value(dollar);
        self.lexer.set_line_continuation(prev);
        let Some(value) = result? else {
            return Err(self.err(left, SyntaxError::UnclosedQuote { quote: '\'' }));
        };
        let right = self.lexer.pos();
        self.lexer.bump(); // '
        Ok(WordPart::SglQuoted(SglQuoted {
            left,
            right,
            dollar,
            value,
        }))
    }

    /// Reads up to the closing quote, returning `None` at end of input.
    fn sgl_quoted_value(&mut self, dollar: bool) -> Result<Option<String>> {
        let mut value = String::new();
        loop {
            match self.lexer.peek()? {
                None => return Ok(None),
                Some('\'') => return Ok(Some(value)),
                Some('\\') if dollar => {
                    // In $'…' a backslash escapes the next character, so a
                    // quote after it does not close the string. The raw
                    // text is preserved.
                    value.push('\\');
                    self.lexer.bump();
                    if let Some(c) = self.lexer.peek()? {
                        value.push(c);
                        self.lexer.bump();
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.lexer.bump();
                }
            }
        }
    }

    /// Parses `"…"` or, with `dollar`, `$"…"`.
    pub(crate) fn dbl_quoted(&mut self, dollar: bool) -> Result<WordPart> {
        let left = self.lexer.pos();
        if dollar {
            self.bash_feature(left, "dollar double quotes", true)?;
            self.lexer.bump(); // $
        }
        self.lexer.bump(); // "
        let mut parts = Vec::new();
        loop {
            match self.lexer.peek()? {
                None => {
                    return Err(self.err(left, SyntaxError::UnclosedQuote { quote: '"' }));
                }
                Some('"') => break,
                Some('$') => parts.push(self.dollar_in_quotes()?),
                Some('`') => parts.push(self.backquote_subst()?),
                Some('\\') => {
                    if self.bquote_depth == 1 && self.char_after_is('`')? {
                        parts.push(self.backquote_subst()?);
                    } else {
                        parts.push(self.dbl_lit()?);
                    }
                }
                Some(_) => parts.push(self.dbl_lit()?),
            }
        }
        let right = self.lexer.pos();
        self.lexer.bump(); // "
        Ok(WordPart::DblQuoted(DblQuoted {
            left,
            right,
            dollar,
            parts,
        }))
    }

    fn dbl_lit(&mut self) -> Result<WordPart> {
        let pos = self.lexer.pos();
        let mut end = pos;
        let mut value = String::new();
        loop {
            match self.lexer.peek()? {
                None | Some('"' | '$' | '`') => break,
                Some('\\') => {
                    let save = self.lexer.index();
                    self.lexer.bump();
                    match self.lexer.peek()? {
                        Some('`') if self.bquote_depth >= 1 => {
                            self.lexer.rewind(save);
                            break;
                        }
                        Some(next) => {
                            value.push('\\');
                            value.push(next);
                            self.lexer.bump();
                        }
                        None => {
                            value.push('\\');
                            end = self.lexer.pos();
                            break;
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.lexer.bump();
                }
            }
            end = self.lexer.pos();
        }
        Ok(WordPart::Lit(Lit { pos, end, value }))
    }

    /// Dispatches on what follows a `$`.
    pub(crate) fn dollar(&mut self, mode: WordMode) -> Result<WordPart> {
        let dollar_pos = self.lexer.pos();
        let save = self.lexer.index();
        self.lexer.bump(); // $
        match self.lexer.peek()? {
            Some('\'') if mode.dollar_quotes() => {
                self.lexer.rewind(save);
                self.sgl_quoted(true)
            }
            Some('"') if mode.dollar_quotes() => {
                self.lexer.rewind(save);
                self.dbl_quoted(true)
            }
            Some('(') => self.dollar_paren(dollar_pos),
            Some('{') => self.braced_param(dollar_pos),
            Some('[') => {
                self.bash_feature(dollar_pos, "$[expr]", false)?;
                self.bracket_arithm(dollar_pos)
            }
            Some(c) if is_short_param_start(c) => self.short_param(dollar_pos),
            _ => {
                // A plain dollar is a literal in Bash; POSIX wants it
                // escaped unless a word break follows.
                let next = self.lexer.peek()?;
                if !self.bash()
                    && mode != WordMode::HdocBody
                    && next.is_some_and(|c| !is_word_break(c))
                {
                    return Err(self.err(dollar_pos, SyntaxError::DollarLiteral));
                }
                Ok(WordPart::Lit(Lit {
                    pos: dollar_pos,
                    end: dollar_pos.after(1),
                    value: "$".to_string(),
                }))
            }
        }
    }

    /// Like [`dollar`](Self::dollar) but inside double quotes, where a
    /// bare `$` is always literal and `$'…'`/`$"…"` are not special.
    fn dollar_in_quotes(&mut self) -> Result<WordPart> {
        let dollar_pos = self.lexer.pos();
        self.lexer.bump(); // $
        match self.lexer.peek()? {
            Some('(') => self.dollar_paren(dollar_pos),
            Some('{') => self.braced_param(dollar_pos),
            Some(c) if is_short_param_start(c) => self.short_param(dollar_pos),
            _ => Ok(WordPart::Lit(Lit {
                pos: dollar_pos,
                end: dollar_pos.after(1),
                value: "$".to_string(),
            })),
        }
    }

    /// Parses a brace-less parameter expansion such as `$foo` or `$?`.
    fn short_param(&mut self, dollar_pos: Pos) -> Result<WordPart> {
        let pos = self.lexer.pos();
        let mut end;
        let mut name = String::new();
        let c = self.lexer.peek()?.expect("caller checked the parameter start");
        if c.is_ascii_digit() || is_special_param(c) {
            name.push(c);
            self.lexer.bump();
            end = self.lexer.pos();
        } else {
            end = pos;
            while let Some(c) = self.lexer.next_char_if(is_name_char)? {
                name.push(c);
                end = self.lexer.pos();
            }
        }
        Ok(WordPart::ParamExp(Box::new(ParamExp {
            dollar: dollar_pos,
            rbrace: Pos::NONE,
            short: true,
            length: false,
            param: Lit {
                pos,
                end,
                value: name,
            },
            index: None,
            slice: None,
            repl: None,
            exp: None,
        })))
    }

    /// Decides between `$((…))` and `$( (…) )`, then parses it.
    fn dollar_paren(&mut self, dollar_pos: Pos) -> Result<WordPart> {
        self.lexer.bump(); // (
        if self.lexer.peek()? == Some('(') && self.arith_ahead()? {
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
                        open: "$((",
                        close: "))",
                    },
                ));
            }
            // arith_ahead guarantees the second parenthesis.
            let closed = self.lexer.skip_char(')')?;
            debug_assert!(closed);
            return Ok(WordPart::ArithmExp(ArithmExp {
                left: dollar_pos,
                right,
                bracket: false,
                expr: expr.map(Box::new),
            }));
        }
        let stmts = self.embedded_stmts(Stops::SUBSHELL, dollar_pos, "(", ")")?;
        let right = self.pos;
        Ok(WordPart::CmdSubst(CmdSubst {
            left: dollar_pos,
            right,
            backquotes: false,
            stmts,
        }))
    }

    /// Parses the deprecated `$[expr]` arithmetic expansion.
    fn bracket_arithm(&mut self, dollar_pos: Pos) -> Result<WordPart> {
        self.lexer.bump(); // [
        let ctx = ArithCtx {
            bracket_term: true,
            ..ArithCtx::default()
        };
        let expr = self.arithm_opt(ctx)?;
        self.skip_arith_space()?;
        let right = self.lexer.pos();
        if !self.lexer.skip_char(']')? {
            let end = self.ahead_desc()?;
            return Err(self.err(
                right,
                SyntaxError::Unmatched {
                    end,
                    open: "$[",
                    close: "]",
                },
            ));
        }
        Ok(WordPart::ArithmExp(ArithmExp {
            left: dollar_pos,
            right,
            bracket: true,
            expr: expr.map(Box::new),
        }))
    }

    /// Parses statements embedded in a substitution, with a scoped heredoc
    /// queue, leaving the closing `)` as the current token.
    pub(crate) fn embedded_stmts(
        &mut self,
        stops: Stops,
        open_pos: Pos,
        open: &'static str,
        close: &'static str,
    ) -> Result<Vec<crate::syntax::Stmt>> {
        let saved_hdocs = std::mem::take(&mut self.pending_hdocs);
        let result = (|| {
            self.next_token()?;
            let stmts = self.stmt_list(stops)?;
            if self.tok != Tok::Op(Operator::CloseParen) {
                let end = self.tok_desc();
                return Err(self.err(
                    open_pos,
                    SyntaxError::Unmatched { end, open, close },
                ));
            }
            // A heredoc opened inside the substitution needs its body
            // before the closing parenthesis.
            if let Some(h) = self.pending_hdocs.first() {
                let delim = h.delim.clone();
                let pos = h.op_pos;
                return Err(self.err(pos, SyntaxError::UnclosedHdoc { delim }));
            }
            Ok(stmts)
        })();
        self.pending_hdocs = saved_hdocs;
        result
    }

    /// Describes the current token for error messages.
    pub(crate) fn tok_desc(&self) -> Cow<'static, str> {
        match self.tok {
            Tok::Eof => "EOF".into(),
            Tok::Newline => "\\n".into(),
            Tok::Op(op) => op.as_str().into(),
            Tok::Word => "word".into(),
            Tok::BquoteClose => "`".into(),
        }
    }

    /// Describes the upcoming character for error messages, used where
    /// the statement token layer is not active.
    pub(crate) fn ahead_desc(&mut self) -> Result<Cow<'static, str>> {
        Ok(match self.lexer.peek()? {
            None => "EOF".into(),
            Some('\n') => "\\n".into(),
            Some(c) => c.to_string().into(),
        })
    }

    /// Parses a backquote command substitution, `` `…` `` or the nested
    /// `` \`…\` `` form.
    pub(crate) fn backquote_subst(&mut self) -> Result<WordPart> {
        let left = self.lexer.pos();
        let escaped = self.bquote_depth >= 1;
        if escaped {
            self.lexer.bump(); // backslash
        }
        self.lexer.bump(); // `
        self.bquote_depth += 1;
        let saved_hdocs = std::mem::take(&mut self.pending_hdocs);
        let result = (|| {
            self.next_token()?;
            let stmts = self.stmt_list(Stops::NONE)?;
            if let Some(h) = self.pending_hdocs.first() {
                let delim = h.delim.clone();
                let pos = h.op_pos;
                return Err(self.err(pos, SyntaxError::UnclosedHdoc { delim }));
            }
            Ok(stmts)
        })();
        self.pending_hdocs = saved_hdocs;
        self.bquote_depth -= 1;
        let stmts = result?;
        if escaped && !self.lexer.skip_char('\\')? {
            return Err(self.err(left, SyntaxError::UnclosedQuote { quote: '`' }));
        }
        let right = self.lexer.pos();
        if !self.lexer.skip_char('`')? {
            return Err(self.err(left, SyntaxError::UnclosedQuote { quote: '`' }));
        }
        Ok(WordPart::CmdSubst(CmdSubst {
            left,
            right,
            backquotes: true,
            stmts,
        }))
    }

    /// Parses a process substitution if one starts here.
    fn proc_subst(&mut self) -> Result<Option<WordPart>> {
        let op = match self.lexer.peek()? {
            Some('<') => ProcOp::CmdIn,
            Some('>') => ProcOp::CmdOut,
            _ => return Ok(None),
        };
        if !self.char_after_is('(')? {
            return Ok(None);
        }
        let op_pos = self.lexer.pos();
        self.bash_feature(op_pos, "process substitutions", true)?;
        self.lexer.bump(); // < or >
        self.lexer.bump(); // (
        let stmts = self.embedded_stmts(Stops::SUBSHELL, op_pos, op.as_str(), ")")?;
        let rparen = self.pos;
        Ok(Some(WordPart::ProcSubst(ProcSubst {
            op_pos,
            op,
            rparen,
            stmts,
        })))
    }

    /// Parses an extended glob; the operator character is current.
    fn ext_glob(&mut self) -> Result<WordPart> {
        let op_pos = self.lexer.pos();
        let op = match self.lexer.peek()?.expect("caller checked the glob operator") {
            '@' => GlobOp::GlobOne,
            '?' => GlobOp::GlobZeroOrOne,
            '*' => GlobOp::GlobZeroOrMore,
            '+' => GlobOp::GlobOneOrMore,
            '!' => GlobOp::GlobExcept,
            c => unreachable!("not a glob operator: {c}"),
        };
        self.lexer.bump();
        self.lexer.bump(); // (
        let pos = self.lexer.pos();
        let mut end = pos;
        let mut value = String::new();
        let mut depth = 0usize;
        loop {
            match self.lexer.peek()? {
                None => {
                    return Err(self.err(
                        op_pos,
                        SyntaxError::Unmatched {
                            end: "EOF".into(),
                            open: op.as_str(),
                            close: ")",
                        },
                    ));
                }
                Some(')') if depth == 0 => break,
                Some(c) => {
                    if c == '(' {
                        depth += 1;
                    } else if c == ')' {
                        depth -= 1;
                    }
                    value.push(c);
                    self.lexer.bump();
                    end = self.lexer.pos();
                }
            }
        }
        self.lexer.bump(); // )
        Ok(WordPart::ExtGlob(ExtGlob {
            op_pos,
            op,
            pattern: Lit { pos, end, value },
        }))
    }

    /// Scans ahead to decide whether `((` opens arithmetic.
    ///
    /// Expects the lexer at the inner `(`. The answer is yes when the
    /// parenthesis that balances the inner one is immediately followed by
    /// another `)`; quotes are honored during the scan. Nothing is
    /// consumed.
    pub(crate) fn arith_ahead(&mut self) -> Result<bool> {
        let save = self.lexer.index();
        self.lexer.bump(); // inner (
        let mut depth = 2usize;
        let result = loop {
            match self.lexer.next_char()? {
                None => break false,
                Some('\\') => {
                    self.lexer.next_char()?;
                }
                Some('\'') => {
                    while let Some(c) = self.lexer.next_char()? {
                        if c == '\'' {
                            break;
                        }
                    }
                }
                Some('"') => loop {
                    match self.lexer.next_char()? {
                        None | Some('"') => break,
                        Some('\\') => {
                            self.lexer.next_char()?;
                        }
                        Some(_) => {}
                    }
                },
                Some('(') => depth += 1,
                Some(')') => {
                    depth -= 1;
                    if depth == 1 {
                        break self.lexer.peek()? == Some(')');
                    }
                }
                Some(_) => {}
            }
        };
        self.lexer.rewind(save);
        Ok(result)
    }
}

/// Returns true if the character ends a word in the given mode.
fn is_word_stop(mode: WordMode, paren_depth: usize, c: char) -> bool {
    match mode {
        WordMode::Default | WordMode::HdocDelim => is_word_break(c),
        WordMode::HdocBody => false,
        WordMode::Arithm => {
            is_blank(c)
                || matches!(
                    c,
                    '\n' | '(' | ')' | '+' | '-' | '*' | '/' | '%' | '<' | '>' | '=' | '!'
                        | '&' | '|' | '^' | '~' | '?' | ',' | ':' | ';' | ']' | '}'
                )
        }
        WordMode::TestWord => {
            is_blank(c) || matches!(c, '\n' | '(' | ')' | '&' | '|' | '<' | '>' | ';')
        }
        WordMode::TestRegexp => {
            c == '\n' || (paren_depth == 0 && (is_blank(c) || c == ')'))
        }
        WordMode::ParamExpArg => c == '}',
        WordMode::ParamExpRepl => c == '}' || c == '/',
    }
}

/// Returns true if the character can start a brace-less parameter name.
fn is_short_param_start(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || is_special_param(c)
}

/// Returns true if the character is a special single-character parameter.
pub(crate) fn is_special_param(c: char) -> bool {
    matches!(c, '@' | '*' | '#' | '?' | '-' | '$' | '!')
}

/// Returns true if the character can start a variable name.
pub(crate) fn is_name_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

/// Returns true if the character can continue a variable name.
pub(crate) fn is_name_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

/// Returns true if the whole string is a valid variable name.
pub(crate) fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(is_name_start) && chars.all(is_name_char)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Config, Variant};
    use crate::syntax::{Command, Node};
    use assert_matches::assert_matches;

    fn first_word(code: &str) -> Word {
        let file = Config::new().parse_str("", code).unwrap();
        let Some(Command::Call(call)) = &file.stmts[0].cmd else {
            panic!("expected call: {:?}", file.stmts[0].cmd);
        };
        call.args[0].clone()
    }

    #[test]
    fn lit_words_keep_escapes() {
        let word = first_word("a\\ b");
        assert_matches!(&word.parts[..], [WordPart::Lit(lit)] => {
            assert_eq!(lit.value, "a\\ b");
            assert_eq!(lit.pos, Pos::new(1));
            assert_eq!(lit.end, Pos::new(5));
        });
    }

    #[test]
    fn line_continuation_joins_literals() {
        let word = first_word("ab\\\ncd");
        assert_matches!(&word.parts[..], [WordPart::Lit(lit)] => {
            assert_eq!(lit.value, "abcd");
            assert_eq!(lit.pos, Pos::new(1));
            assert_eq!(lit.end, Pos::new(7));
        });
    }

    #[test]
    fn quoted_parts() {
        let word = first_word("a'b c'\"d $e\"");
        assert_eq!(word.parts.len(), 3);
        assert_matches!(&word.parts[1], WordPart::SglQuoted(sq) => {
            assert_eq!(sq.value, "b c");
            assert!(!sq.dollar);
            assert_eq!(sq.left, Pos::new(2));
            assert_eq!(sq.right, Pos::new(6));
        });
        assert_matches!(&word.parts[2], WordPart::DblQuoted(dq) => {
            assert_eq!(dq.parts.len(), 2);
            assert_matches!(&dq.parts[1], WordPart::ParamExp(p) => {
                assert!(p.short);
                assert_eq!(p.param.value, "e");
            });
        });
    }

    #[test]
    fn dollar_quotes() {
        let word = first_word(r"$'a\'b'");
        assert_matches!(&word.parts[..], [WordPart::SglQuoted(sq)] => {
            assert!(sq.dollar);
            assert_eq!(sq.value, r"a\'b");
        });

        let e = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "echo $'x'")
            .unwrap_err();
        assert_eq!(e.to_string(), "1:6: dollar single quotes are a bash feature");
        let e = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "echo $\"x\"")
            .unwrap_err();
        assert_eq!(e.to_string(), "1:6: dollar double quotes are a bash feature");
    }

    #[test]
    fn unclosed_quote_errors() {
        let e = Config::new().parse_str("", "echo 'oops").unwrap_err();
        assert_eq!(e.to_string(), "1:6: reached EOF without closing quote '");
        let e = Config::new().parse_str("", "echo \"oops").unwrap_err();
        assert_eq!(e.to_string(), "1:6: reached EOF without closing quote \"");
        let e = Config::new().parse_str("", "echo `oops").unwrap_err();
        assert_eq!(e.to_string(), "1:6: reached EOF without closing quote `");
    }

    #[test]
    fn short_params() {
        let word = first_word("$foo$1$?x");
        assert_eq!(word.parts.len(), 4);
        assert_matches!(&word.parts[0], WordPart::ParamExp(p) => {
            assert_eq!(p.param.value, "foo");
            assert_eq!(p.dollar, Pos::new(1));
            assert_eq!(p.end(), Pos::new(5));
        });
        assert_matches!(&word.parts[1], WordPart::ParamExp(p) => {
            assert_eq!(p.param.value, "1");
        });
        assert_matches!(&word.parts[2], WordPart::ParamExp(p) => {
            assert_eq!(p.param.value, "?");
        });
        assert_matches!(&word.parts[3], WordPart::Lit(lit) => {
            assert_eq!(lit.value, "x");
        });
    }

    #[test]
    fn command_substitution() {
        let word = first_word("$(echo hi)");
        assert_matches!(&word.parts[..], [WordPart::CmdSubst(cs)] => {
            assert!(!cs.backquotes);
            assert_eq!(cs.left, Pos::new(1));
            assert_eq!(cs.right, Pos::new(10));
            assert_eq!(cs.stmts.len(), 1);
        });
    }

    #[test]
    fn backquote_substitution() {
        let word = first_word("`echo hi`");
        assert_matches!(&word.parts[..], [WordPart::CmdSubst(cs)] => {
            assert!(cs.backquotes);
            assert_eq!(cs.stmts.len(), 1);
        });
    }

    #[test]
    fn nested_backquotes() {
        let word = first_word(r"`echo \`date\``");
        assert_matches!(&word.parts[..], [WordPart::CmdSubst(outer)] => {
            assert!(outer.backquotes);
            let Some(Command::Call(call)) = &outer.stmts[0].cmd else { panic!() };
            assert_matches!(&call.args[1].parts[..], [WordPart::CmdSubst(inner)] => {
                assert!(inner.backquotes);
                assert_eq!(inner.stmts.len(), 1);
            });
        });
    }

    #[test]
    fn arith_expansion_vs_nested_subshell() {
        let word = first_word("$((1 + 2))");
        assert_matches!(&word.parts[..], [WordPart::ArithmExp(exp)] => {
            assert!(!exp.bracket);
            assert!(exp.expr.is_some());
        });

        // Balanced `)` not followed by `)` makes it a command substitution
        // holding a subshell.
        let word = first_word("$((a); (b))");
        assert_matches!(&word.parts[..], [WordPart::CmdSubst(cs)] => {
            assert_eq!(cs.stmts.len(), 2);
            assert_matches!(&cs.stmts[0].cmd, Some(Command::Subshell(_)));
        });
    }

    #[test]
    fn bracket_arith_expansion() {
        let word = first_word("$[1+2]");
        assert_matches!(&word.parts[..], [WordPart::ArithmExp(exp)] => {
            assert!(exp.bracket);
        });
        let e = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "echo $[1]")
            .unwrap_err();
        assert_eq!(e.to_string(), "1:6: $[expr] is a bash feature");
    }

    #[test]
    fn process_substitution() {
        let file = Config::new().parse_str("", "diff <(a) >(b)").unwrap();
        let Some(Command::Call(call)) = &file.stmts[0].cmd else {
            panic!();
        };
        assert_eq!(call.args.len(), 3);
        assert_matches!(&call.args[1].parts[..], [WordPart::ProcSubst(ps)] => {
            assert_eq!(ps.op, ProcOp::CmdIn);
        });
        assert_matches!(&call.args[2].parts[..], [WordPart::ProcSubst(ps)] => {
            assert_eq!(ps.op, ProcOp::CmdOut);
        });

        let e = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "diff <(a)")
            .unwrap_err();
        assert_eq!(e.to_string(), "1:6: process substitutions are a bash feature");
    }

    #[test]
    fn extended_globs() {
        let word = first_word("foo@(a|b)");
        assert_eq!(word.parts.len(), 2);
        assert_matches!(&word.parts[1], WordPart::ExtGlob(glob) => {
            assert_eq!(glob.op, GlobOp::GlobOne);
            assert_eq!(glob.pattern.value, "a|b");
        });

        let word = first_word("!(x)");
        assert_matches!(&word.parts[..], [WordPart::ExtGlob(glob)] => {
            assert_eq!(glob.op, GlobOp::GlobExcept);
        });

        let e = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "echo @(a)")
            .unwrap_err();
        assert_eq!(e.to_string(), "1:6: extended globs are a bash feature");
    }

    #[test]
    fn plain_dollar_is_literal_in_bash() {
        let word = first_word("$");
        assert_matches!(&word.parts[..], [WordPart::Lit(lit)] => {
            assert_eq!(lit.value, "$");
        });
        let e = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "echo $%x")
            .unwrap_err();
        assert_eq!(e.to_string(), "1:6: $ must be escaped or followed by a literal");
    }
}
