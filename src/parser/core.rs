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

//! Fundamentals for implementing the parser
//!
//! This module holds the [`Parser`] itself: the statement-level token
//! layer, the statement list machinery shared by all compound commands,
//! and the pipeline and and-or list grammar. The individual constructs
//! live in the sibling modules.

use super::error::{Error, ErrorCause, Result, SyntaxError};
use super::lex::heredoc::PendingHeredoc;
use super::lex::{Keyword, Lexer, Operator, is_blank, lex_operator};
use crate::input::{Input, Memory};
use crate::source::Pos;
use crate::syntax::{BinaryCmd, Command, Comment, File, Stmt};

/// How deep statements, words and expressions may nest.
///
/// Pathological input could otherwise overflow the stack; crossing the
/// limit reports a [`SyntaxError::NestingTooDeep`] instead.
const MAX_NESTING: usize = 1000;

/// Shell language variant to parse
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Variant {
    /// Bash, the default
    #[default]
    Bash,
    /// POSIX shell command language; Bash extensions are rejected
    Posix,
    /// MirBSD Korn shell; accepts the Bash extensions
    MirBsdKorn,
}

impl Variant {
    /// Whether the Bash extensions are available.
    #[must_use]
    pub fn is_bash(self) -> bool {
        self != Variant::Posix
    }
}

/// Set of parameters for constructing a [parser](Parser)
///
/// A new configuration starts with default settings, which can be
/// customized with chainable methods; the configuration is then used for
/// any number of parse calls.
#[derive(Clone, Debug, Default)]
#[must_use = "a Config must be used to parse something"]
pub struct Config {
    pub(crate) variant: Variant,
    pub(crate) keep_comments: bool,
}

impl Config {
    /// Creates a configuration with default settings.
    pub fn new() -> Config {
        Config::default()
    }

    /// Sets the language variant to parse.
    pub fn variant(&mut self, variant: Variant) -> &mut Config {
        self.variant = variant;
        self
    }

    /// Sets whether comments are collected into the parsed file.
    pub fn keep_comments(&mut self, keep: bool) -> &mut Config {
        self.keep_comments = keep;
        self
    }

    /// Parses a whole source file from a byte source.
    ///
    /// `name` is used in error messages and recorded in the returned
    /// [`File`]; it may be empty.
    pub fn parse(&self, input: &mut dyn Input, name: &str) -> Result<File> {
        let lexer = Lexer::new(Box::new(input), name);
        Parser::new(lexer, self).file()
    }

    /// Parses a whole source file from a string.
    pub fn parse_str(&self, name: &str, code: &str) -> Result<File> {
        self.parse(&mut Memory::new(code), name)
    }
}

/// Current statement-level token
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Tok {
    /// End of input
    Eof,
    /// Newline, a statement separator
    Newline,
    /// Control or redirection operator
    Op(Operator),
    /// A word starts at the current position; its characters have not been
    /// consumed yet
    Word,
    /// The delimiter closing the current backquote substitution; not
    /// consumed either
    BquoteClose,
}

/// What ends the statement list currently being parsed
///
/// A closing backquote always ends the list; the enclosing substitution
/// checks that it was the expected terminator.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Stops {
    /// Closing keywords accepted at command position
    pub lits: &'static [Keyword],
    /// Whether `)` ends the list
    pub close_paren: bool,
    /// Whether `;;`, `;&` and `;;&` end the list
    pub case_delims: bool,
}

impl Stops {
    pub const NONE: Stops = Stops {
        lits: &[],
        close_paren: false,
        case_delims: false,
    };

    pub const SUBSHELL: Stops = Stops {
        close_paren: true,
        ..Stops::NONE
    };

    pub const fn keywords(lits: &'static [Keyword]) -> Stops {
        Stops {
            lits,
            ..Stops::NONE
        }
    }

    pub const CASE_ITEM: Stops = Stops {
        lits: &[Keyword::Esac],
        case_delims: true,
        close_paren: false,
    };
}

/// The shell syntax parser
///
/// A parser wraps a [`Lexer`] and keeps the statement-level state: the
/// current token, the adjacency flags, the queue of heredoc bodies still
/// to be read, and the nesting depth. It is single pass and returns on
/// the first error.
#[derive(Debug)]
#[must_use = "a Parser must be used to parse syntax"]
pub struct Parser<'i> {
    pub(crate) lexer: Lexer<'i>,
    pub(crate) lang: Variant,
    pub(crate) keep_comments: bool,
    pub(crate) comments: Vec<Comment>,
    /// Token to parse next
    pub(crate) tok: Tok,
    /// Position of the current token
    pub(crate) pos: Pos,
    /// Whether a blank preceded the current token
    pub(crate) spaced: bool,
    /// Heredoc bodies not yet read, in operator order
    pub(crate) pending_hdocs: Vec<PendingHeredoc>,
    /// Nesting level of backquote substitutions
    pub(crate) bquote_depth: usize,
    depth: usize,
}

impl<'i> Parser<'i> {
    /// Creates a parser reading from the given lexer.
    pub fn new(lexer: Lexer<'i>, config: &Config) -> Parser<'i> {
        Parser {
            lexer,
            lang: config.variant,
            keep_comments: config.keep_comments,
            comments: Vec::new(),
            tok: Tok::Eof,
            pos: Pos::NONE,
            spaced: false,
            pending_hdocs: Vec::new(),
            bquote_depth: 0,
            depth: 0,
        }
    }

    /// Parses the whole source into a file, consuming the parser.
    pub fn file(mut self) -> Result<File> {
        self.next_token()?;
        let stmts = self.stmt_list(Stops::NONE)?;
        debug_assert!(matches!(self.tok, Tok::Eof));
        Ok(File {
            name: self.lexer.name().to_string(),
            stmts,
            comments: self.comments,
            lines: self.lexer.into_lines(),
        })
    }

    /// Whether the Bash extensions are enabled.
    #[must_use]
    pub(crate) fn bash(&self) -> bool {
        self.lang.is_bash()
    }

    /// Builds an error at the given position.
    #[must_use]
    pub(crate) fn err<C: Into<ErrorCause>>(&self, pos: Pos, cause: C) -> Error {
        self.lexer.error_at(pos, cause)
    }

    /// Reports a Bash-only construct under the POSIX variant.
    pub(crate) fn bash_feature(
        &self,
        pos: Pos,
        feat: &'static str,
        plural: bool,
    ) -> Result<()> {
        if self.bash() {
            Ok(())
        } else {
            Err(self.err(
                pos,
                SyntaxError::BashFeature {
                    feat: feat.into(),
                    plural,
                },
            ))
        }
    }

    /// Guards a recursive descent step against unbounded nesting.
    pub(crate) fn enter(&mut self, pos: Pos) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(self.err(pos, SyntaxError::NestingTooDeep));
        }
        Ok(())
    }

    pub(crate) fn exit(&mut self) {
        debug_assert!(self.depth > 0);
        self.depth -= 1;
    }

    /// Advances to the next statement-level token.
    ///
    /// Blanks are skipped and comments collected on the way. Consuming a
    /// newline first reads the bodies of any pending heredocs. A `Word`
    /// token only marks where a word starts; its characters are consumed
    /// by the word parser.
    pub(crate) fn next_token(&mut self) -> Result<()> {
        self.spaced = false;
        loop {
            let c = self.lexer.peek()?;
            self.pos = self.lexer.pos();
            match c {
                None => {
                    if let Some(h) = self.pending_hdocs.first() {
                        let delim = h.delim.clone();
                        let pos = h.op_pos;
                        return Err(self.err(pos, SyntaxError::UnclosedHdoc { delim }));
                    }
                    self.tok = Tok::Eof;
                    return Ok(());
                }
                Some(c) if is_blank(c) => {
                    self.spaced = true;
                    self.lexer.bump();
                }
                Some('\n') => {
                    self.lexer.bump();
                    if !self.pending_hdocs.is_empty() {
                        self.collect_pending_heredocs()?;
                    }
                    self.tok = Tok::Newline;
                    return Ok(());
                }
                Some('#') => {
                    let hash = self.pos;
                    let mut text = String::new();
                    self.lexer.bump();
                    while let Some(c) = self.lexer.next_char_if(|c| c != '\n')? {
                        text.push(c);
                    }
                    if self.keep_comments {
                        self.comments.push(Comment { hash, text });
                    }
                }
                Some('`') if self.bquote_depth > 0 => {
                    self.tok = Tok::BquoteClose;
                    return Ok(());
                }
                Some('\\') if self.bquote_depth >= 2 => {
                    if self.at_backquote_close()? {
                        self.tok = Tok::BquoteClose;
                    } else {
                        self.tok = Tok::Word;
                    }
                    return Ok(());
                }
                Some(c) if super::lex::is_operator_start(c) => {
                    let save = self.lexer.index();
                    let bash = self.bash();
                    let op = lex_operator(&mut self.lexer, bash)?
                        .expect("an operator char must lex as an operator");
                    // Process substitutions begin words, so hand them to
                    // the word parser unconsumed.
                    if matches!(op, Operator::LessParen | Operator::GreatParen) {
                        self.lexer.rewind(save);
                        self.tok = Tok::Word;
                    } else {
                        self.tok = Tok::Op(op);
                    }
                    return Ok(());
                }
                Some(_) => {
                    self.tok = Tok::Word;
                    return Ok(());
                }
            }
        }
    }

    /// Skips newline tokens, reading heredoc bodies as usual.
    pub(crate) fn skip_newlines(&mut self) -> Result<()> {
        while self.tok == Tok::Newline {
            self.next_token()?;
        }
        Ok(())
    }

    /// Returns the value of the current word if it is purely a literal.
    ///
    /// Nothing is consumed. Words that continue with quotes or expansions
    /// return `None`; reserved words are never recognized in them.
    pub(crate) fn peek_lit(&mut self) -> Result<Option<String>> {
        debug_assert_eq!(self.tok, Tok::Word);
        let save = self.lexer.index();
        let mut value = String::new();
        let result = loop {
            match self.lexer.peek()? {
                Some(c) if is_lit_char(c) => {
                    value.push(c);
                    self.lexer.bump();
                }
                // The word goes on beyond the literal run.
                Some(c) if !is_word_break(c) => break None,
                _ => break if value.is_empty() { None } else { Some(value) },
            }
        };
        self.lexer.rewind(save);
        Ok(result)
    }

    /// Whether the character right after the current literal run is `c`.
    pub(crate) fn lit_followed_by(&mut self, c: char) -> Result<bool> {
        let save = self.lexer.index();
        while self.lexer.next_char_if(is_lit_char)?.is_some() {}
        let found = self.lexer.peek()? == Some(c);
        self.lexer.rewind(save);
        Ok(found)
    }

    /// Returns the current word's keyword, if it is one.
    pub(crate) fn peek_keyword(&mut self) -> Result<Option<Keyword>> {
        if self.tok != Tok::Word {
            return Ok(None);
        }
        Ok(self.peek_lit()?.and_then(|lit| lit.parse().ok()))
    }

    /// Consumes the current purely-literal word.
    ///
    /// Must only be called after [`peek_lit`](Self::peek_lit) returned a
    /// value; the following token is not read yet.
    pub(crate) fn take_lit(&mut self) -> Result<crate::syntax::Lit> {
        debug_assert_eq!(self.tok, Tok::Word);
        let pos = self.lexer.pos();
        let mut value = String::new();
        while let Some(c) = self.lexer.next_char_if(is_lit_char)? {
            value.push(c);
        }
        debug_assert!(!value.is_empty());
        let end = self.lexer.pos();
        Ok(crate::syntax::Lit { pos, end, value })
    }

    /// Consumes a keyword word and moves to the next token.
    pub(crate) fn take_keyword(&mut self) -> Result<Pos> {
        let pos = self.pos;
        self.take_lit()?;
        self.next_token()?;
        Ok(pos)
    }

    /// Parses statements until a stop or the end of input.
    ///
    /// The terminating token is left current for the caller to check.
    pub(crate) fn stmt_list(&mut self, stops: Stops) -> Result<Vec<Stmt>> {
        let mut stmts = Vec::new();
        loop {
            match self.tok {
                Tok::Eof => return Ok(stmts),
                Tok::Newline => self.next_token()?,
                Tok::Op(Operator::CloseParen) if stops.close_paren => return Ok(stmts),
                Tok::Op(op) if op.case_op().is_some() && stops.case_delims => {
                    return Ok(stmts);
                }
                Tok::Op(
                    op @ (Operator::Semicolon
                    | Operator::And
                    | Operator::AndAnd
                    | Operator::OrOr
                    | Operator::Or
                    | Operator::OrAnd),
                ) => {
                    return Err(
                        self.err(self.pos, SyntaxError::FollowStmt { tok: op.as_str() })
                    );
                }
                Tok::Op(Operator::CloseParen) => {
                    return Err(self.err(
                        self.pos,
                        SyntaxError::UsedOnlyIn {
                            kw: ")",
                            place: "to close a subshell",
                        },
                    ));
                }
                Tok::Op(op) if op.case_op().is_some() => {
                    return Err(self.err(
                        self.pos,
                        SyntaxError::UsedOnlyIn {
                            kw: op.as_str(),
                            place: "in a case clause",
                        },
                    ));
                }
                Tok::BquoteClose => return Ok(stmts),
                _ => {
                    if let Some(kw) = self.peek_keyword()? {
                        if kw.is_clause_delimiter() && !keyword_is_plain_word(kw, self.bash())
                        {
                            if stops.lits.contains(&kw) {
                                return Ok(stmts);
                            }
                            return Err(self.stray_delimiter(kw));
                        }
                    }
                    let stmt = self.stmt_and_or()?;
                    stmts.push(stmt);
                    match self.tok {
                        Tok::Op(Operator::Semicolon) => {
                            stmts.last_mut().unwrap().semicolon = self.pos;
                            self.next_token()?;
                        }
                        Tok::Op(Operator::And) => {
                            let last = stmts.last_mut().unwrap();
                            last.semicolon = self.pos;
                            last.background = true;
                            self.next_token()?;
                        }
                        Tok::Newline | Tok::Eof | Tok::BquoteClose => {}
                        Tok::Op(Operator::CloseParen) if stops.close_paren => {}
                        Tok::Op(op) if op.case_op().is_some() && stops.case_delims => {}
                        Tok::Op(op) if op.case_op().is_some() => {
                            return Err(self.err(
                                self.pos,
                                SyntaxError::UsedOnlyIn {
                                    kw: op.as_str(),
                                    place: "in a case clause",
                                },
                            ));
                        }
                        Tok::Word => {
                            let closes = self.peek_keyword()?.is_some_and(|kw| {
                                kw.is_clause_delimiter() && stops.lits.contains(&kw)
                            });
                            if !closes {
                                return Err(
                                    self.err(self.pos, SyntaxError::MissingSeparator)
                                );
                            }
                        }
                        _ => {
                            return Err(self.err(self.pos, SyntaxError::MissingSeparator));
                        }
                    }
                }
            }
        }
    }

    pub(crate) fn stray_delimiter(&self, kw: Keyword) -> Error {
        use Keyword::*;
        let place = match kw {
            Then | Elif | Else => "in an if",
            Fi => "to end an if",
            Do => "in a loop",
            Done => "to end a loop",
            Esac => "to end a case",
            CloseBrace => "to end a block",
            CloseBracketBracket => "to end a test clause",
            _ => unreachable!("not a clause delimiter: {kw:?}"),
        };
        self.err(
            self.pos,
            SyntaxError::UsedOnlyIn {
                kw: kw.as_str(),
                place,
            },
        )
    }

    /// Whether the next characters close the current backquote
    /// substitution.
    pub(crate) fn at_backquote_close(&mut self) -> Result<bool> {
        match self.bquote_depth {
            0 => Ok(false),
            1 => Ok(self.lexer.peek()? == Some('`')),
            _ => {
                // Depth two and deeper close with an escaped backquote.
                let save = self.lexer.index();
                let found = self.lexer.peek()? == Some('\\') && {
                    self.lexer.bump();
                    self.lexer.peek()? == Some('`')
                };
                self.lexer.rewind(save);
                Ok(found)
            }
        }
    }

    /// Parses one statement, including any `&&`/`||` continuation.
    ///
    /// The and-or list parses right-recursively: `a && b || c` nests as
    /// `a && (b || c)`.
    pub(crate) fn stmt_and_or(&mut self) -> Result<Stmt> {
        self.enter(self.pos)?;
        let result = self.stmt_and_or_inner();
        self.exit();
        result
    }

    fn stmt_and_or_inner(&mut self) -> Result<Stmt> {
        let stmt = self.pipeline()?;
        let (Tok::Op(op @ (Operator::AndAnd | Operator::OrOr)), op_pos) = (self.tok, self.pos)
        else {
            return Ok(stmt);
        };
        self.next_token()?;
        self.skip_newlines()?;
        self.expect_stmt_start(op.as_str())?;
        let y = self.stmt_and_or()?;
        Ok(Stmt {
            pos: stmt.pos,
            cmd: Some(Command::Binary(Box::new(BinaryCmd {
                op_pos,
                op: op.bin_cmd_op().unwrap(),
                x: stmt,
                y,
            }))),
            ..Stmt::default()
        })
    }

    /// Parses a pipeline, handling leading negation.
    fn pipeline(&mut self) -> Result<Stmt> {
        let mut negated = false;
        let mut bang_pos = Pos::NONE;
        while self.tok == Tok::Word && self.peek_lit()?.as_deref() == Some("!") {
            if self.bash() && self.lit_followed_by('(')? {
                // `!(` begins an extended glob word, not a negation.
                break;
            }
            if !negated {
                bang_pos = self.pos;
            }
            negated = !negated;
            self.take_lit()?;
            self.next_token()?;
            if !matches!(self.tok, Tok::Word | Tok::Op(_)) {
                return Err(self.err(
                    self.pos,
                    SyntaxError::MustFollowOp {
                        op: "!".into(),
                        what: "a statement",
                    },
                ));
            }
        }
        let mut stmt = self.pipe_sequence()?;
        if negated {
            stmt.negated = true;
            stmt.pos = bang_pos;
        }
        Ok(stmt)
    }

    /// Parses `cmd | cmd | …`, nesting to the right.
    fn pipe_sequence(&mut self) -> Result<Stmt> {
        let x = self.cmd_stmt()?;
        let (Tok::Op(op @ (Operator::Or | Operator::OrAnd)), op_pos) = (self.tok, self.pos)
        else {
            return Ok(x);
        };
        if op == Operator::OrAnd {
            self.bash_feature(op_pos, "|&", false)?;
        }
        self.next_token()?;
        self.skip_newlines()?;
        self.expect_stmt_start(op.as_str())?;
        let y = self.pipe_sequence()?;
        Ok(Stmt {
            pos: x.pos,
            cmd: Some(Command::Binary(Box::new(BinaryCmd {
                op_pos,
                op: op.bin_cmd_op().unwrap(),
                x,
                y,
            }))),
            ..Stmt::default()
        })
    }

    /// Checks that the current token can begin a statement.
    fn expect_stmt_start(&mut self, after: &str) -> Result<()> {
        let ok = match self.tok {
            Tok::Word | Tok::Op(Operator::OpenParen) => true,
            Tok::Op(op) => op.redir_op().is_some(),
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(self.err(
                self.pos,
                SyntaxError::MustFollowOp {
                    op: after.to_string().into(),
                    what: "a statement",
                },
            ))
        }
    }
}

/// Returns true if the character can be part of an unquoted literal.
pub(crate) fn is_lit_char(c: char) -> bool {
    !is_word_break(c) && !matches!(c, '$' | '`' | '"' | '\'' | '\\')
}

/// Returns true if the character ends a word in command position.
pub(crate) fn is_word_break(c: char) -> bool {
    is_blank(c) || c == '\n' || super::lex::is_operator_start(c)
}

/// Whether a would-be keyword is just an ordinary word in this variant.
///
/// `]]` is reserved only where `[[` exists; `[[` itself is still
/// dispatched under POSIX so that the gate error is reported.
fn keyword_is_plain_word(kw: Keyword, bash: bool) -> bool {
    kw == Keyword::CloseBracketBracket && !bash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Node;

    #[test]
    fn empty_and_blank_sources() {
        let file = Config::new().parse_str("", "").unwrap();
        assert!(file.stmts.is_empty());
        let file = Config::new().parse_str("", "\n\n  \n").unwrap();
        assert!(file.stmts.is_empty());
        let file = Config::new().parse_str("", "# nothing\n").unwrap();
        assert!(file.stmts.is_empty());
    }

    #[test]
    fn statements_are_separated() {
        let file = Config::new().parse_str("", "foo;bar\nbaz &").unwrap();
        assert_eq!(file.stmts.len(), 3);
        assert_eq!(file.stmts[0].semicolon, Pos::new(4));
        assert!(!file.stmts[0].background);
        assert!(file.stmts[2].background);
        assert_eq!(file.stmts[2].semicolon, Pos::new(13));
    }

    #[test]
    fn comments_are_kept_only_on_request() {
        let file = Config::new().parse_str("", "foo # hi\n").unwrap();
        assert!(file.comments.is_empty());

        let file = Config::new()
            .keep_comments(true)
            .parse_str("", "foo # hi\n")
            .unwrap();
        assert_eq!(file.comments.len(), 1);
        assert_eq!(file.comments[0].hash, Pos::new(5));
        assert_eq!(file.comments[0].text, " hi");
    }

    #[test]
    fn pipeline_nests_to_the_right() {
        let file = Config::new().parse_str("", "a | b | c").unwrap();
        let Some(Command::Binary(outer)) = &file.stmts[0].cmd else {
            panic!("expected binary command: {:?}", file.stmts[0].cmd);
        };
        assert_eq!(outer.op, crate::syntax::BinCmdOp::Pipe);
        assert_eq!(outer.op_pos, Pos::new(3));
        let Some(Command::Binary(inner)) = &outer.y.cmd else {
            panic!("expected nested pipe: {:?}", outer.y.cmd);
        };
        assert_eq!(inner.op_pos, Pos::new(7));
        assert_eq!(file.stmts[0].end(), Pos::new(10));
    }

    #[test]
    fn negation_applies_to_whole_pipeline() {
        let file = Config::new().parse_str("", "! a | b").unwrap();
        let stmt = &file.stmts[0];
        assert!(stmt.negated);
        assert_eq!(stmt.pos, Pos::new(1));
        assert!(matches!(stmt.cmd, Some(Command::Binary(_))));
    }

    #[test]
    fn and_or_after_newline_continues() {
        let file = Config::new().parse_str("", "a &&\nb").unwrap();
        assert_eq!(file.stmts.len(), 1);
        let Some(Command::Binary(cmd)) = &file.stmts[0].cmd else {
            panic!();
        };
        assert_eq!(cmd.op, crate::syntax::BinCmdOp::AndStmt);
    }

    #[test]
    fn separator_must_exist() {
        let e = Config::new().parse_str("", "{ a; } b").unwrap_err();
        assert_eq!(
            e.to_string(),
            "1:8: statements must be separated by &, ; or a newline"
        );
    }

    #[test]
    fn stray_separators_and_delimiters() {
        let e = Config::new().parse_str("", "; foo").unwrap_err();
        assert_eq!(e.to_string(), "1:1: ; can only immediately follow a statement");

        let e = Config::new().parse_str("", "foo\nfi").unwrap_err();
        assert_eq!(e.to_string(), "2:1: \"fi\" can only be used to end an if");

        let e = Config::new().parse_str("", ")").unwrap_err();
        assert_eq!(e.to_string(), "1:1: \")\" can only be used to close a subshell");

        let e = Config::new().parse_str("", "a ;; b").unwrap_err();
        assert_eq!(e.to_string(), "1:3: \";;\" can only be used in a case clause");
    }

    #[test]
    fn missing_pipe_operand() {
        let e = Config::new().parse_str("", "a | ;").unwrap_err();
        assert_eq!(e.to_string(), "1:5: | must be followed by a statement");
        let e = Config::new().parse_str("", "a &&").unwrap_err();
        assert_eq!(e.to_string(), "1:5: && must be followed by a statement");
    }

    #[test]
    fn pipe_all_is_gated() {
        let e = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "a |& b")
            .unwrap_err();
        assert_eq!(e.to_string(), "1:3: |& is a bash feature");
        Config::new().parse_str("", "a |& b").unwrap();
    }

    #[test]
    fn nesting_limit_is_enforced() {
        let source = "$(".repeat(600);
        let e = Config::new().parse_str("", &source).unwrap_err();
        assert_eq!(
            e.cause,
            ErrorCause::Syntax(SyntaxError::NestingTooDeep),
            "wrong error: {e}"
        );
    }
}
