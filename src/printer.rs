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

//! Pretty-printer for shell syntax trees
//!
//! The printer walks an AST and writes canonical shell source: statements
//! one per line at the proper indentation, comments interleaved and
//! column-aligned, heredoc bodies attached at the following newline, and
//! blank lines between statements preserved one deep. Output re-parses to
//! an equal tree, and printing what was just printed reproduces it byte
//! for byte.
//!
//! ```
//! # use sh_syntax::{parser, printer, syntax::NodeRef};
//! let file = parser::Config::new()
//!     .parse_str("", "if a\nthen\n\tb\nfi")
//!     .unwrap();
//! let out = printer::Config::new()
//!     .print_to_string(NodeRef::File(&file))
//!     .unwrap();
//! assert_eq!(out, "if a; then\n\tb\nfi\n");
//! ```

use crate::source::{Lines, Pos};
use crate::syntax::{
    ArithmExpr, Assign, BinAritOp, CaseClause, CaseItem, Command, Comment, File, Loop, Node,
    NodeRef, ParamExp, Redir, RedirOp, Stmt, TestExpr, Word, WordPart,
};
use std::io;
use thiserror::Error;

/// Error from a print operation
#[derive(Debug, Error)]
pub enum Error {
    /// The byte sink failed; partial output may have been written.
    #[error("{0}")]
    Io(#[from] io::Error),
    /// The node cannot be printed on its own.
    #[error("cannot print a standalone {0}")]
    Unsupported(&'static str),
}

/// Set of options for printing syntax trees
///
/// A new configuration starts with default settings, customizable through
/// chainable methods, and is then used for any number of print calls.
#[derive(Clone, Debug, Default)]
#[must_use = "a Config must be used to print something"]
pub struct Config {
    indent: u32,
    binary_next_line: bool,
    switch_case_indent: bool,
    function_next_line: bool,
    space_redirects: bool,
    keep_padding: bool,
    minify: bool,
}

impl Config {
    /// Creates a configuration with default settings.
    pub fn new() -> Config {
        Config::default()
    }

    /// Indents with `n` spaces per level, or with one tab when `n` is 0,
    /// the default.
    pub fn indent(&mut self, n: u32) -> &mut Config {
        self.indent = n;
        self
    }

    /// Starts continuation lines with `&&`, `||` and `|` instead of
    /// ending the previous line with them.
    pub fn binary_next_line(&mut self, on: bool) -> &mut Config {
        self.binary_next_line = on;
        self
    }

    /// Indents case patterns one extra level.
    pub fn switch_case_indent(&mut self, on: bool) -> &mut Config {
        self.switch_case_indent = on;
        self
    }

    /// Puts the body of a function on the line after its name.
    pub fn function_next_line(&mut self, on: bool) -> &mut Config {
        self.function_next_line = on;
        self
    }

    /// Writes a space between redirection operators and their word.
    pub fn space_redirects(&mut self, on: bool) -> &mut Config {
        self.space_redirects = on;
        self
    }

    /// Keeps the column offsets of words as they were in the source.
    pub fn keep_padding(&mut self, on: bool) -> &mut Config {
        self.keep_padding = on;
        self
    }

    /// Drops all optional whitespace, newlines and comments.
    pub fn minify(&mut self, on: bool) -> &mut Config {
        self.minify = on;
        self
    }

    /// Prints a node to the byte sink.
    ///
    /// [`File`], [`Stmt`], [`Command`], [`Word`] and [`WordPart`] nodes
    /// can be printed; a [`Comment`] cannot stand alone and is rejected,
    /// as is any other node kind.
    pub fn print(&self, w: &mut dyn io::Write, node: NodeRef<'_>) -> Result<(), Error> {
        let empty = Lines::new();
        match node {
            NodeRef::File(file) => {
                Printer::new(self, w, &file.lines, &file.comments).file(file)?;
            }
            NodeRef::Stmt(stmt) => {
                let mut p = Printer::new(self, w, &empty, &[]);
                p.stmt(stmt)?;
                p.finish_pending()?;
            }
            NodeRef::Command(cmd) => {
                let mut p = Printer::new(self, w, &empty, &[]);
                p.command(cmd)?;
                p.finish_pending()?;
            }
            NodeRef::Word(word) => Printer::new(self, w, &empty, &[]).word(word)?,
            NodeRef::WordPart(part) => Printer::new(self, w, &empty, &[]).word_part(part)?,
            NodeRef::Comment(_) => return Err(Error::Unsupported("comment")),
            _ => return Err(Error::Unsupported("node")),
        }
        Ok(())
    }

    /// Prints a node into a string.
    pub fn print_to_string(&self, node: NodeRef<'_>) -> Result<String, Error> {
        let mut out = Vec::new();
        self.print(&mut out, node)?;
        Ok(String::from_utf8(out).expect("the printer writes UTF-8"))
    }
}

type R = io::Result<()>;

/// One printing run
struct Printer<'a> {
    w: &'a mut dyn io::Write,
    cfg: &'a Config,
    lines: &'a Lines,
    comments: &'a [Comment],
    next_comment: usize,
    /// Bytes written since the last newline
    col: usize,
    /// Source line the output is currently at
    line: u64,
    /// Whether anything has been written yet
    started: bool,
    level: usize,
    last_level: usize,
    level_incs: Vec<bool>,
    /// Queued heredoc redirects with the level they were printed at
    pending_hdocs: Vec<(usize, &'a Redir)>,
    /// Backquote nesting, for escaping nested substitution delimiters
    bquotes: usize,
}

impl<'a> Printer<'a> {
    fn new(
        cfg: &'a Config,
        w: &'a mut dyn io::Write,
        lines: &'a Lines,
        comments: &'a [Comment],
    ) -> Printer<'a> {
        Printer {
            w,
            cfg,
            lines,
            comments,
            next_comment: 0,
            col: 0,
            line: 1,
            started: false,
            level: 0,
            last_level: 0,
            level_incs: Vec::new(),
            pending_hdocs: Vec::new(),
            bquotes: 0,
        }
    }

    fn out(&mut self, s: &str) -> R {
        self.w.write_all(s.as_bytes())?;
        match s.rfind('\n') {
            Some(i) => self.col = s.len() - i - 1,
            None => self.col += s.len(),
        }
        Ok(())
    }

    fn space(&mut self) -> R {
        self.out(" ")
    }

    /// A space, unless minifying removed it.
    fn opt_space(&mut self) -> R {
        if self.cfg.minify { Ok(()) } else { self.space() }
    }

    fn line_of(&self, pos: Pos) -> u64 {
        self.lines.line(pos)
    }

    fn sync_line(&mut self, pos: Pos) {
        let l = self.line_of(pos);
        if l > self.line {
            self.line = l;
        }
    }

    /// Whether the node spans more than one source line.
    fn multiline<N: Node>(&self, node: &N) -> bool {
        if self.cfg.minify {
            return false;
        }
        let start = self.line_of(node.pos());
        let end = self.line_of(node.end());
        start != 0 && end > start
    }

    /// Whether an unflushed comment sits before `closing`.
    fn comment_before(&self, closing: Pos) -> bool {
        self.comments[self.next_comment..]
            .iter()
            .any(|c| !closing.is_valid() || c.hash < closing)
    }

    /// Whether a construct spanning up to `end` can print on one line.
    fn fits_inline<N: Node>(&self, node: &N, end: Pos) -> bool {
        self.cfg.minify || (!self.multiline(node) && !self.comment_before(end))
    }

    /// Whether a nested statement list prints inline.
    ///
    /// Lists stay on one line only with a single statement that the
    /// source kept on the opening line; anything longer goes one
    /// statement per line.
    fn list_inline(&self, stmts: &[Stmt], closing: Pos) -> bool {
        if self.cfg.minify {
            return true;
        }
        match stmts {
            [] => !self.comment_before(closing),
            [s] => {
                !self.multiline(s)
                    && self.line_of(s.pos()) <= self.line
                    && !self.comment_before(closing)
            }
            _ => false,
        }
    }

    fn indent_unit(&self) -> String {
        if self.cfg.indent == 0 {
            "\t".to_string()
        } else {
            " ".repeat(self.cfg.indent as usize)
        }
    }

    fn indent_width(&self) -> usize {
        if self.cfg.indent == 0 {
            1
        } else {
            self.cfg.indent as usize
        }
    }

    fn indent(&mut self) -> R {
        self.last_level = self.level;
        if self.cfg.minify {
            return Ok(());
        }
        let unit = self.indent_unit();
        for _ in 0..self.level {
            self.out(&unit)?;
        }
        Ok(())
    }

    /// Deepens the indentation unless the current level is already deeper
    /// than where the enclosing construct last indented.
    fn inc_level(&mut self) {
        let inc = if self.level <= self.last_level || self.level_incs.is_empty() {
            self.level += 1;
            true
        } else if let Some(last) = self.level_incs.last_mut() {
            if *last {
                *last = false;
                true
            } else {
                false
            }
        } else {
            false
        };
        self.level_incs.push(inc);
    }

    fn dec_level(&mut self) {
        if self.level_incs.pop().unwrap_or(false) {
            self.level -= 1;
        }
    }

    /// Ends the current output line, appending any queued heredoc bodies.
    fn end_line(&mut self) -> R {
        self.out("\n")?;
        if !self.pending_hdocs.is_empty() {
            self.flush_heredocs()?;
            self.out("\n")?;
        }
        Ok(())
    }

    /// Ends the line once if heredoc bodies are still queued, as when a
    /// statement is printed standalone.
    fn finish_pending(&mut self) -> R {
        if !self.pending_hdocs.is_empty() {
            self.out("\n")?;
            self.flush_heredocs()?;
            self.out("\n")?;
        }
        Ok(())
    }

    fn flush_heredocs(&mut self) -> R {
        let pending = std::mem::take(&mut self.pending_hdocs);
        self.flush_heredoc_list(pending)
    }

    fn flush_heredoc_list(&mut self, pending: Vec<(usize, &'a Redir)>) -> R {
        let mut first = true;
        for (level, redir) in pending {
            if !first {
                self.out("\n")?;
            }
            first = false;
            let strip = redir.op == RedirOp::DashHdoc;
            let body = redir.hdoc.get();
            if let Some(body) = body {
                // Stripped bodies sit one level deeper than their
                // statement.
                self.heredoc_body(body, strip, level + 1)?;
                self.line = match body.end() {
                    end if end.is_valid() => self.line_of(end),
                    _ => self.line_of(redir.word.end()) + 1,
                };
            }
            if strip {
                let unit = self.indent_unit();
                for _ in 0..level {
                    self.out(&unit)?;
                }
            }
            let (delim, _) = redir.word.unquoted();
            self.out(&delim)?;
        }
        Ok(())
    }

    /// Writes a heredoc body, re-indenting each line for `<<-`.
    fn heredoc_body(&mut self, body: &'a Word, strip: bool, level: usize) -> R {
        let unit = self.indent_unit();
        let mut at_line_start = true;
        for part in &body.parts {
            if let WordPart::Lit(lit) = part {
                for piece in lit.value.split_inclusive('\n') {
                    if at_line_start && strip && piece != "\n" {
                        for _ in 0..level {
                            self.out(&unit)?;
                        }
                    }
                    self.out(piece)?;
                    at_line_start = piece.ends_with('\n');
                }
            } else {
                if at_line_start && strip {
                    for _ in 0..level {
                        self.out(&unit)?;
                    }
                }
                self.word_part(part)?;
                at_line_start = false;
            }
        }
        Ok(())
    }

    /// Flushes comments positioned before `pos`; `NONE` flushes the rest.
    fn flush_comments_before(&mut self, pos: Pos) -> R {
        while let Some(c) = self.comments.get(self.next_comment) {
            if pos.is_valid() && c.hash >= pos {
                break;
            }
            let hash = c.hash;
            let text = c.text.clone();
            self.next_comment += 1;
            let cl = self.line_of(hash);
            if self.started && cl <= self.line && self.col > 0 {
                self.space()?;
                self.out("#")?;
                self.out(&text)?;
            } else {
                if self.started {
                    self.end_line()?;
                    if cl > self.line + 1 {
                        self.out("\n")?;
                    }
                    self.indent()?;
                } else {
                    self.started = true;
                    self.indent()?;
                }
                self.out("#")?;
                self.out(&text)?;
            }
            if cl > self.line {
                self.line = cl;
            }
        }
        Ok(())
    }

    /// Flushes comments that sit on the output's current source line,
    /// padding the `#` out to `pad` when aligning a run.
    fn flush_trailing_comments(&mut self, pad: usize) -> R {
        while let Some(c) = self.comments.get(self.next_comment) {
            if self.line_of(c.hash) != self.line {
                break;
            }
            let text = c.text.clone();
            self.next_comment += 1;
            let target = pad.max(self.col + 1);
            while self.col < target {
                self.space()?;
            }
            self.out("#")?;
            self.out(&text)?;
        }
        Ok(())
    }

    /// Moves output to a new line for content from source line `l`.
    fn advance_to_line(&mut self, l: u64) -> R {
        if !self.started {
            self.started = true;
            if l > self.line {
                self.line = l;
            }
            return self.indent();
        }
        self.end_line()?;
        if l > self.line + 1 {
            // Runs of blank lines collapse to a single one.
            self.out("\n")?;
        }
        if l > self.line {
            self.line = l;
        }
        self.indent()
    }

    // ------------------------------------------------------------------
    // Statement lists

    fn file(&mut self, file: &'a File) -> R {
        self.stmts_lines(&file.stmts)?;
        if !self.cfg.minify {
            self.flush_comments_before(Pos::NONE)?;
        }
        if self.started && (!self.cfg.minify || !self.pending_hdocs.is_empty()) {
            self.end_line()?;
        }
        Ok(())
    }

    /// Prints statements one per line, with comments and alignment.
    fn stmts_lines(&mut self, stmts: &'a [Stmt]) -> R {
        if self.cfg.minify {
            for (i, s) in stmts.iter().enumerate() {
                if i > 0 {
                    if self.pending_hdocs.is_empty() {
                        self.out(";")?;
                    } else {
                        self.end_line()?;
                    }
                }
                self.started = true;
                self.stmt(s)?;
                if s.background {
                    self.out("&")?;
                }
            }
            return Ok(());
        }
        let pads = self.alignment_pads(stmts);
        for (i, s) in stmts.iter().enumerate() {
            self.flush_comments_before(s.pos())?;
            self.advance_to_line(self.line_of(s.pos()))?;
            self.stmt(s)?;
            if s.background {
                self.out(" &")?;
            }
            self.sync_line(s.end());
            self.flush_trailing_comments(pads[i])?;
        }
        Ok(())
    }

    /// Computes the `#` column for each statement of a contiguous
    /// trailing-comment run, using a byte-counting dry run.
    fn alignment_pads(&self, stmts: &[Stmt]) -> Vec<usize> {
        let mut pads = vec![0usize; stmts.len()];
        let mut i = 0;
        while i < stmts.len() {
            if !self.has_trailing_comment(&stmts[i]) {
                i += 1;
                continue;
            }
            let start = i;
            while i + 1 < stmts.len()
                && self.has_trailing_comment(&stmts[i + 1])
                && self.line_of(stmts[i + 1].pos()) == self.line_of(stmts[i].end()) + 1
            {
                i += 1;
            }
            if i > start {
                let widest = stmts[start..=i]
                    .iter()
                    .map(|s| self.measure(s))
                    .max()
                    .unwrap_or(0);
                for pad in &mut pads[start..=i] {
                    *pad = widest + 1;
                }
            }
            i += 1;
        }
        pads
    }

    fn has_trailing_comment(&self, stmt: &Stmt) -> bool {
        let end_line = self.line_of(stmt.end());
        self.comments[self.next_comment..]
            .iter()
            .any(|c| self.line_of(c.hash) == end_line && c.hash >= stmt.pos())
    }

    /// Renders the statement into a byte-counting sink and reports the
    /// width of its last output line.
    fn measure(&self, stmt: &Stmt) -> usize {
        let mut buf = Vec::new();
        let mut sub = Printer::new(self.cfg, &mut buf, self.lines, &[]);
        sub.level = self.level;
        sub.last_level = self.last_level;
        sub.line = self.line_of(stmt.pos());
        sub.started = true;
        if sub.stmt(stmt).is_err() {
            return 0;
        }
        let width = match buf.iter().rposition(|&b| b == b'\n') {
            Some(i) => buf.len() - i - 1,
            None => buf.len() + self.level * self.indent_width(),
        };
        width
    }

    /// Prints statements joined on one line, as inside `{ …; }`.
    fn stmts_inline(&mut self, stmts: &'a [Stmt], trailing_semi: bool) -> R {
        for (i, s) in stmts.iter().enumerate() {
            if i > 0 {
                self.opt_space()?;
            }
            self.stmt(s)?;
            let last = i + 1 == stmts.len();
            if s.background {
                self.out(if self.cfg.minify { "&" } else { " &" })?;
            } else if !last || trailing_semi {
                self.out(";")?;
            }
        }
        Ok(())
    }

    /// Prints a nested statement list one per line, one level deeper.
    fn nested_lines(&mut self, stmts: &'a [Stmt]) -> R {
        self.inc_level();
        self.stmts_lines(stmts)?;
        self.dec_level();
        Ok(())
    }

    /// Flushes comments and moves to the line of a closing token.
    fn close_on_line(&mut self, pos: Pos) -> R {
        self.flush_comments_before(pos)?;
        self.advance_to_line(self.line_of(pos))
    }

    // ------------------------------------------------------------------
    // Statements

    fn stmt(&mut self, s: &'a Stmt) -> R {
        if s.negated {
            self.out("! ")?;
        }
        let mut first = true;
        for assign in &s.assigns {
            self.sep_word(first, assign.pos())?;
            first = false;
            self.assign(assign)?;
        }
        if let Some(cmd) = &s.cmd {
            self.sep_word(first, cmd.pos())?;
            first = false;
            self.command(cmd)?;
        }
        for redir in &s.redirs {
            self.sep_word(first, redir.pos())?;
            first = false;
            self.redirect(redir)?;
        }
        Ok(())
    }

    /// Writes the separator before a word-like element of a statement,
    /// preserving escaped-newline continuations and source padding.
    fn sep_word(&mut self, first: bool, pos: Pos) -> R {
        if first {
            return Ok(());
        }
        if !self.cfg.minify {
            let l = self.line_of(pos);
            if l > self.line && l != 0 {
                // The source broke the line here with an escaped newline,
                // which is not a newline token, so queued heredoc bodies
                // stay queued.
                self.out(" \\\n")?;
                self.line = l;
                self.inc_level();
                self.indent()?;
                self.dec_level();
                return Ok(());
            }
            if self.cfg.keep_padding && pos.is_valid() {
                let (pl, pc) = self.lines.line_col(pos);
                if pl == self.line && pc as usize > self.col + 1 {
                    while self.col + 1 < pc as usize {
                        self.space()?;
                    }
                    return Ok(());
                }
            }
        }
        self.space()
    }

    fn assign(&mut self, a: &'a Assign) -> R {
        self.out(&a.name.value)?;
        if let Some(index) = &a.index {
            self.out("[")?;
            self.arithm(index, true)?;
            self.out("]")?;
        }
        if a.naked {
            if let Some(value) = &a.value {
                self.word(value)?;
            }
            return Ok(());
        }
        if a.append {
            self.out("+")?;
        }
        self.out("=")?;
        if let Some(array) = &a.array {
            self.out("(")?;
            for (i, elem) in array.elems.iter().enumerate() {
                if i > 0 {
                    self.space()?;
                }
                self.word(elem)?;
            }
            self.out(")")?;
        } else if let Some(value) = &a.value {
            self.word(value)?;
        }
        Ok(())
    }

    fn redirect(&mut self, r: &'a Redir) -> R {
        if let Some(n) = &r.n {
            self.out(&n.value)?;
        }
        self.out(r.op.as_str())?;
        let spaced = self.cfg.space_redirects
            && !matches!(r.op, RedirOp::DplIn | RedirOp::DplOut)
            && !r.op.is_hdoc();
        if spaced {
            self.space()?;
        }
        self.word(&r.word)?;
        if r.op.is_hdoc() && r.hdoc.get().is_some() {
            self.pending_hdocs.push((self.level, r));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Commands

    fn command(&mut self, cmd: &'a Command) -> R {
        match cmd {
            Command::Call(call) => {
                let mut first = true;
                for arg in &call.args {
                    self.sep_word(first, arg.pos())?;
                    first = false;
                    self.word(arg)?;
                }
                Ok(())
            }
            Command::Block(block) => {
                if self.list_inline(&block.stmts, block.rbrace) {
                    self.out("{")?;
                    self.space()?;
                    self.stmts_inline(&block.stmts, true)?;
                    self.opt_space()?;
                } else {
                    self.out("{")?;
                    self.nested_lines(&block.stmts)?;
                    self.close_on_line(block.rbrace)?;
                }
                self.out("}")
            }
            Command::Subshell(subshell) => {
                self.out("(")?;
                if self.list_inline(&subshell.stmts, subshell.rparen) {
                    self.stmts_inline(&subshell.stmts, false)?;
                } else {
                    self.nested_lines(&subshell.stmts)?;
                    self.close_on_line(subshell.rparen)?;
                }
                self.out(")")
            }
            Command::If(clause) => self.if_clause(clause),
            Command::While(clause) => {
                self.out(if clause.until { "until" } else { "while" })?;
                self.space()?;
                self.stmts_inline(&clause.cond, false)?;
                self.out(";")?;
                self.opt_space()?;
                self.out("do")?;
                self.sync_line(clause.do_pos);
                self.do_body(&clause.do_stmts, clause.done_pos)?;
                self.out("done")
            }
            Command::For(clause) => {
                self.out("for ")?;
                match &clause.r#loop {
                    Loop::WordIter(iter) => {
                        self.out(&iter.name.value)?;
                        if iter.in_pos.is_valid() {
                            self.out(" in")?;
                            for item in &iter.items {
                                self.space()?;
                                self.word(item)?;
                            }
                        }
                    }
                    Loop::CStyle(c) => {
                        self.out("((")?;
                        if let Some(init) = &c.init {
                            self.arithm(init, false)?;
                        }
                        self.out("; ")?;
                        if let Some(cond) = &c.cond {
                            self.arithm(cond, false)?;
                        }
                        self.out("; ")?;
                        if let Some(post) = &c.post {
                            self.arithm(post, false)?;
                        }
                        self.out("))")?;
                    }
                }
                self.out(";")?;
                self.opt_space()?;
                self.out("do")?;
                self.sync_line(clause.do_pos);
                self.do_body(&clause.do_stmts, clause.done_pos)?;
                self.out("done")
            }
            Command::Case(clause) => self.case_clause(clause),
            Command::Test(clause) => {
                self.out("[[ ")?;
                self.test_expr(&clause.x)?;
                self.out(" ]]")
            }
            Command::Arithm(cmd) => {
                self.out("((")?;
                if let Some(expr) = &cmd.expr {
                    self.arithm(expr, false)?;
                }
                self.out("))")
            }
            Command::Binary(binary) => self.binary_cmd(binary),
            Command::FuncDecl(decl) => {
                if decl.rsrv_word {
                    self.out("function ")?;
                }
                self.out(&decl.name.value)?;
                if decl.parens || !decl.rsrv_word {
                    self.out("()")?;
                }
                if self.cfg.function_next_line && !self.cfg.minify {
                    self.end_line()?;
                    self.sync_line(decl.body.pos());
                    self.indent()?;
                } else {
                    self.space()?;
                }
                self.stmt(&decl.body)
            }
            Command::Decl(decl) => {
                self.out(&decl.variant.value)?;
                for opt in &decl.opts {
                    self.space()?;
                    self.word(opt)?;
                }
                for assign in &decl.assigns {
                    self.space()?;
                    self.assign(assign)?;
                }
                Ok(())
            }
            Command::Eval(eval) => {
                self.out("eval")?;
                if let Some(stmt) = &eval.stmt {
                    self.space()?;
                    self.stmt(stmt)?;
                }
                Ok(())
            }
            Command::Coproc(coproc) => {
                self.out("coproc ")?;
                if let Some(name) = &coproc.name {
                    self.out(&name.value)?;
                    self.space()?;
                }
                self.stmt(&coproc.stmt)
            }
            Command::Let(clause) => {
                self.out("let")?;
                for expr in &clause.exprs {
                    self.space()?;
                    self.arithm(expr, true)?;
                }
                Ok(())
            }
        }
    }

    fn if_clause(&mut self, clause: &'a crate::syntax::IfClause) -> R {
        let inline = self.fits_inline(clause, clause.fi_pos);
        self.out("if ")?;
        self.stmts_inline(&clause.cond, false)?;
        self.out(";")?;
        self.opt_space()?;
        self.out("then")?;
        self.sync_line(clause.then_pos);
        let mut next_kw = clause
            .elifs
            .first()
            .map(|e| e.elif_pos)
            .unwrap_or(if clause.else_pos.is_valid() {
                clause.else_pos
            } else {
                clause.fi_pos
            });
        self.branch(&clause.then_stmts, inline, next_kw)?;
        for (i, elif) in clause.elifs.iter().enumerate() {
            self.out("elif ")?;
            self.stmts_inline(&elif.cond, false)?;
            self.out(";")?;
            self.opt_space()?;
            self.out("then")?;
            self.sync_line(elif.then_pos);
            next_kw = clause
                .elifs
                .get(i + 1)
                .map(|e| e.elif_pos)
                .unwrap_or(if clause.else_pos.is_valid() {
                    clause.else_pos
                } else {
                    clause.fi_pos
                });
            self.branch(&elif.then_stmts, inline, next_kw)?;
        }
        if clause.else_pos.is_valid() {
            self.out("else")?;
            self.sync_line(clause.else_pos);
            self.branch(&clause.else_stmts, inline, clause.fi_pos)?;
        }
        self.out("fi")
    }

    /// Prints a branch body followed by the move to the next keyword.
    fn branch(&mut self, stmts: &'a [Stmt], inline: bool, next_kw: Pos) -> R {
        if inline {
            // The space after `then` separates words even when minified.
            self.space()?;
            self.stmts_inline(stmts, true)?;
            self.opt_space()?;
        } else {
            self.nested_lines(stmts)?;
            self.close_on_line(next_kw)?;
        }
        Ok(())
    }

    /// Prints a loop body between `do` and `done`.
    fn do_body(&mut self, stmts: &'a [Stmt], done_pos: Pos) -> R {
        if self.list_inline(stmts, done_pos) {
            self.space()?;
            self.stmts_inline(stmts, true)?;
            self.opt_space()?;
        } else {
            self.nested_lines(stmts)?;
            self.close_on_line(done_pos)?;
        }
        Ok(())
    }

    fn case_clause(&mut self, clause: &'a CaseClause) -> R {
        let inline = self.fits_inline(clause, clause.esac_pos);
        self.out("case ")?;
        self.word(&clause.word)?;
        self.out(" in")?;
        if self.cfg.switch_case_indent {
            self.inc_level();
        }
        for (i, item) in clause.items.iter().enumerate() {
            if inline {
                // `in` and the first pattern must stay separate words.
                if i == 0 {
                    self.space()?;
                } else {
                    self.opt_space()?;
                }
            } else {
                self.flush_comments_before(item.patterns[0].pos())?;
                self.advance_to_line(self.line_of(item.patterns[0].pos()))?;
            }
            self.case_item(item, inline)?;
        }
        if self.cfg.switch_case_indent {
            self.dec_level();
        }
        if inline {
            if clause.items.is_empty() {
                self.space()?;
            } else {
                self.opt_space()?;
            }
        } else {
            self.close_on_line(clause.esac_pos)?;
        }
        self.out("esac")
    }

    fn case_item(&mut self, item: &'a CaseItem, inline: bool) -> R {
        for (i, pattern) in item.patterns.iter().enumerate() {
            if i > 0 {
                self.out(if self.cfg.minify { "|" } else { " | " })?;
            }
            self.word(pattern)?;
        }
        self.out(")")?;
        if item.stmts.is_empty() {
            self.opt_space()?;
            return self.out(item.op.as_str());
        }
        let pattern_line = self.line_of(item.patterns[0].pos());
        let body_inline = inline
            || (item.stmts.len() == 1
                && !self.multiline(&item.stmts[0])
                && self.line_of(item.stmts[0].pos()) == pattern_line
                && self.line_of(item.op_pos) == pattern_line
                && !self.comment_before(item.op_pos));
        if body_inline {
            self.opt_space()?;
            self.stmts_inline(&item.stmts, false)?;
            self.opt_space()?;
            self.out(item.op.as_str())?;
        } else {
            self.nested_lines(&item.stmts)?;
            self.inc_level();
            self.close_on_line(item.op_pos)?;
            self.out(item.op.as_str())?;
            self.dec_level();
        }
        Ok(())
    }

    fn binary_cmd(&mut self, binary: &'a crate::syntax::BinaryCmd) -> R {
        self.stmt(&binary.x)?;
        let y_line = self.line_of(binary.y.pos());
        let breaks = !self.cfg.minify && y_line != 0 && y_line > self.line;
        if breaks {
            if self.cfg.binary_next_line {
                // An escaped newline keeps queued heredocs queued.
                self.out(" \\\n")?;
                self.line = y_line;
                self.inc_level();
                self.indent()?;
                self.dec_level();
                self.out(binary.op.as_str())?;
                self.space()?;
            } else {
                self.space()?;
                self.out(binary.op.as_str())?;
                self.end_line()?;
                self.line = y_line;
                self.inc_level();
                self.indent()?;
                self.dec_level();
            }
        } else if self.cfg.minify {
            self.out(binary.op.as_str())?;
        } else {
            self.space()?;
            self.out(binary.op.as_str())?;
            self.space()?;
        }
        self.stmt(&binary.y)
    }

    // ------------------------------------------------------------------
    // Words

    fn word(&mut self, word: &'a Word) -> R {
        for part in &word.parts {
            self.word_part(part)?;
        }
        Ok(())
    }

    fn word_part(&mut self, part: &'a WordPart) -> R {
        match part {
            WordPart::Lit(lit) => self.out(&lit.value),
            WordPart::SglQuoted(sq) => {
                if sq.dollar {
                    self.out("$")?;
                }
                self.out("'")?;
                self.out(&sq.value)?;
                self.out("'")
            }
            WordPart::DblQuoted(dq) => {
                if dq.dollar {
                    self.out("$")?;
                }
                self.out("\"")?;
                for part in &dq.parts {
                    self.word_part(part)?;
                }
                self.out("\"")
            }
            WordPart::ParamExp(exp) => self.param_exp(exp),
            WordPart::CmdSubst(subst) => {
                if subst.backquotes {
                    self.backquote_delim()?;
                    self.bquotes += 1;
                    self.subst_inline(&subst.stmts)?;
                    self.bquotes -= 1;
                    self.backquote_delim()
                } else {
                    self.out("$(")?;
                    if self.list_inline(&subst.stmts, subst.right) {
                        self.subst_inline(&subst.stmts)?;
                    } else {
                        self.nested_lines(&subst.stmts)?;
                        self.close_on_line(subst.right)?;
                    }
                    self.out(")")
                }
            }
            WordPart::ArithmExp(exp) => {
                self.out(if exp.bracket { "$[" } else { "$((" })?;
                if let Some(expr) = &exp.expr {
                    self.arithm(expr, false)?;
                }
                self.out(if exp.bracket { "]" } else { "))" })
            }
            WordPart::ProcSubst(subst) => {
                self.out(subst.op.as_str())?;
                self.subst_inline(&subst.stmts)?;
                self.out(")")
            }
            WordPart::ExtGlob(glob) => {
                self.out(glob.op.as_str())?;
                self.out(&glob.pattern.value)?;
                self.out(")")
            }
        }
    }

    fn backquote_delim(&mut self) -> R {
        if self.bquotes > 0 {
            self.out("\\`")
        } else {
            self.out("`")
        }
    }

    /// Prints substitution statements on one line, emitting any heredoc
    /// bodies they queued before the substitution closes.
    ///
    /// Only the bodies queued inside the substitution are flushed;
    /// heredocs of the enclosing statement wait for its newline.
    fn subst_inline(&mut self, stmts: &'a [Stmt]) -> R {
        let before = self.pending_hdocs.len();
        self.stmts_inline(stmts, false)?;
        if self.pending_hdocs.len() > before {
            let tail = self.pending_hdocs.split_off(before);
            self.out("\n")?;
            self.flush_heredoc_list(tail)?;
            self.out("\n")?;
        }
        Ok(())
    }

    fn param_exp(&mut self, exp: &'a ParamExp) -> R {
        if exp.short {
            self.out("$")?;
            return self.out(&exp.param.value);
        }
        self.out("${")?;
        if exp.length {
            self.out("#")?;
        }
        self.out(&exp.param.value)?;
        if let Some(index) = &exp.index {
            self.out("[")?;
            self.arithm(index, true)?;
            self.out("]")?;
        }
        if let Some(slice) = &exp.slice {
            self.out(":")?;
            // A leading minus would read back as a `:-` operator.
            self.slice_expr(&slice.offset)?;
            if let Some(length) = &slice.length {
                self.out(":")?;
                self.slice_expr(length)?;
            }
        }
        if let Some(repl) = &exp.repl {
            self.out("/")?;
            if repl.all {
                self.out("/")?;
            }
            self.word(&repl.orig)?;
            if let Some(with) = &repl.with {
                self.out("/")?;
                self.word(with)?;
            }
        }
        if let Some(op_exp) = &exp.exp {
            self.out(op_exp.op.as_str())?;
            self.word(&op_exp.word)?;
        }
        self.out("}")
    }

    fn slice_expr(&mut self, expr: &'a ArithmExpr) -> R {
        let rendered = {
            let mut buf = Vec::new();
            let mut sub = Printer::new(self.cfg, &mut buf, self.lines, &[]);
            sub.started = true;
            sub.arithm(expr, true)?;
            String::from_utf8(buf).expect("the printer writes UTF-8")
        };
        if rendered.starts_with('-') {
            self.space()?;
        }
        self.out(&rendered)
    }

    // ------------------------------------------------------------------
    // Expressions

    fn arithm(&mut self, expr: &'a ArithmExpr, compact: bool) -> R {
        match expr {
            ArithmExpr::Word(word) => self.word(word),
            ArithmExpr::Binary(binary) => {
                self.arithm(&binary.x, compact)?;
                if compact {
                    self.out(binary.op.as_str())?;
                } else if binary.op == BinAritOp::Comma {
                    self.out(", ")?;
                } else {
                    self.space()?;
                    self.out(binary.op.as_str())?;
                    self.space()?;
                }
                self.arithm(&binary.y, compact)
            }
            ArithmExpr::Unary(unary) => {
                if unary.post {
                    self.arithm(&unary.x, compact)?;
                    self.out(unary.op.as_str())
                } else {
                    self.out(unary.op.as_str())?;
                    self.arithm(&unary.x, compact)
                }
            }
            ArithmExpr::Paren(paren) => {
                self.out("(")?;
                self.arithm(&paren.x, compact)?;
                self.out(")")
            }
        }
    }

    fn test_expr(&mut self, expr: &'a TestExpr) -> R {
        match expr {
            TestExpr::Word(word) => self.word(word),
            TestExpr::Binary(binary) => {
                self.test_expr(&binary.x)?;
                self.space()?;
                self.out(binary.op.as_str())?;
                self.space()?;
                self.test_expr(&binary.y)
            }
            TestExpr::Unary(unary) => {
                self.out(unary.op.as_str())?;
                self.space()?;
                self.test_expr(&unary.x)
            }
            TestExpr::Paren(paren) => {
                self.out("(")?;
                self.test_expr(&paren.x)?;
                self.out(")")
            }
        }
    }
}
