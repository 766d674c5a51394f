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

//! Shell command language syntax
//!
//! This module contains the types that represent abstract syntax trees
//! (ASTs) of the shell language.
//!
//! ## Syntactic elements
//!
//! A parsed script is a [`File`], which owns a list of [`Stmt`]s along with
//! the comments and the [line table](crate::source::Lines) of the source it
//! was parsed from. A statement wraps a [`Command`], which comes in many
//! variants: the ordinary argument list ([`CallExpr`]), compound commands
//! such as [`IfClause`] and [`CaseClause`], pipelines and logical lists
//! ([`BinaryCmd`]), function definitions, and the Bash extensions
//! ([`TestClause`], [`ArithmCmd`], [`DeclClause`], [`LetClause`],
//! [`CoprocClause`]).
//!
//! ## Lexical elements
//!
//! Tokens that may expand into command arguments are [`Word`]s, non-empty
//! sequences of [`WordPart`]s. Parts cover quoting and all expansion forms;
//! see [`ParamExp`] for the parameter expansion modifiers.
//!
//! ## Positions
//!
//! Every node implements [`Node`], reporting the 1-based byte offsets of
//! its first byte ([`Node::pos`]) and one past its last byte
//! ([`Node::end`]). Nodes built by hand rather than by the parser report
//! [`Pos::NONE`].
//!
//! ## Parsing and displaying
//!
//! [`File`], [`Stmt`] and [`Word`] implement [`FromStr`](std::str::FromStr)
//! with the default [parser configuration](crate::parser::Config), and the
//! printable node families implement [`Display`](std::fmt::Display) by
//! rendering through the [printer](crate::printer) with default options:
//!
//! ```
//! # use sh_syntax::syntax::File;
//! let file: File = "if a\nthen\n\tb\nfi".parse().unwrap();
//! assert_eq!(file.to_string(), "if a; then\n\tb\nfi\n");
//! ```

use crate::source::{Lines, Pos};
use std::cell::OnceCell;
use std::rc::Rc;

mod impl_display;
pub mod walk;

pub use walk::{NodeRef, walk};

/// Syntax node with a source position
///
/// `pos` is the position of the node's first byte and `end` the position
/// one past its last byte, so `end` is strictly greater than `pos` for any
/// non-empty node. Both are [`Pos::NONE`] for nodes that were not produced
/// by the parser.
pub trait Node {
    /// Position of the first byte of this node.
    fn pos(&self) -> Pos;
    /// Position just after the last byte of this node.
    fn end(&self) -> Pos;
}

fn first_pos<'a, N: Node + 'a, I: IntoIterator<Item = &'a N>>(nodes: I) -> Pos {
    nodes.into_iter().next().map_or(Pos::NONE, Node::pos)
}

fn last_end<'a, N: Node + 'a, I: IntoIterator<Item = &'a N>>(nodes: I) -> Pos
where
    I::IntoIter: DoubleEndedIterator,
{
    nodes.into_iter().next_back().map_or(Pos::NONE, Node::end)
}

/// Parsed shell source file
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct File {
    /// Name of the source, possibly empty
    pub name: String,
    /// Line start table of the source the file was parsed from
    pub lines: Lines,
    /// Top-level statements
    pub stmts: Vec<Stmt>,
    /// Comments in source order, collected only when the parser is
    /// configured to keep them
    pub comments: Vec<Comment>,
}

impl Node for File {
    fn pos(&self) -> Pos {
        first_pos(&self.stmts)
    }
    fn end(&self) -> Pos {
        last_end(&self.stmts)
    }
}

/// Single `#` comment
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Comment {
    /// Position of the `#`
    pub hash: Pos,
    /// Text following the `#`, up to but not including the newline
    pub text: String,
}

impl Node for Comment {
    fn pos(&self) -> Pos {
        self.hash
    }
    fn end(&self) -> Pos {
        self.hash.after(1 + self.text.len() as u64)
    }
}

/// Statement, the unit of execution
///
/// A statement wraps a [`Command`] with its assignment prefix, redirections
/// and separator flags. A statement without a command is valid as long as
/// it has at least one assignment or redirection.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stmt {
    /// Position of the first byte of the statement
    pub pos: Pos,
    /// Whether the statement begins with `!`
    pub negated: bool,
    /// `name=value` assignments preceding the command
    pub assigns: Vec<Assign>,
    /// The command itself, if any
    pub cmd: Option<Command>,
    /// Redirections, in source order
    pub redirs: Vec<Redir>,
    /// Position of the trailing `;` or `&`, if any
    pub semicolon: Pos,
    /// Whether the statement is terminated by `&`
    pub background: bool,
}

impl Node for Stmt {
    fn pos(&self) -> Pos {
        self.pos
    }
    fn end(&self) -> Pos {
        if self.semicolon.is_valid() {
            return self.semicolon.after(1);
        }
        let end = self.cmd.as_ref().map_or(Pos::NONE, Node::end);
        let end = end.max(last_end(&self.assigns));
        end.max(last_end(&self.redirs))
    }
}

/// Assignment word, e.g. `FOO=bar` or `a[i]+=(x y)`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assign {
    /// Variable name
    pub name: Lit,
    /// Whether the assignment uses `+=`
    pub append: bool,
    /// Index expression for `a[i]=v`, a Bash extension
    pub index: Option<Box<ArithmExpr>>,
    /// Whether the assignment has no `=` at all, as in the arguments of a
    /// declaration builtin
    pub naked: bool,
    /// Assigned scalar value; `None` when the value is empty or the
    /// assignment is an array or naked
    pub value: Option<Word>,
    /// Assigned array value, a Bash extension
    pub array: Option<ArrayExpr>,
}

impl Node for Assign {
    fn pos(&self) -> Pos {
        self.name.pos()
    }
    fn end(&self) -> Pos {
        if let Some(array) = &self.array {
            return array.end();
        }
        if let Some(value) = &self.value {
            return value.end();
        }
        let end = self.name.end();
        let end = match &self.index {
            // name[index]= has the brackets around the index
            Some(index) => index.end().after(1),
            None => end,
        };
        if self.naked {
            end
        } else if self.append {
            end.after(2)
        } else {
            end.after(1)
        }
    }
}

/// Parenthesized list of words, the value of an array assignment
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArrayExpr {
    /// Position of the `(`
    pub lparen: Pos,
    /// Position of the `)`
    pub rparen: Pos,
    /// Array elements
    pub elems: Vec<Word>,
}

impl Node for ArrayExpr {
    fn pos(&self) -> Pos {
        self.lparen
    }
    fn end(&self) -> Pos {
        self.rparen.after(1)
    }
}

/// Shell word, a non-empty sequence of word parts
///
/// Words appearing as command arguments are never empty; words inside
/// parameter expansion modifiers (for example the replacement in
/// `${a/b/}`) may be.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Word {
    /// Parts that concatenate into the word
    pub parts: Vec<WordPart>,
}

impl Word {
    /// Returns the value of the word if it consists of a single literal
    /// part.
    #[must_use]
    pub fn lit(&self) -> Option<&str> {
        match self.parts.as_slice() {
            [WordPart::Lit(lit)] => Some(&lit.value),
            _ => None,
        }
    }

    /// Whether the word has no parts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Returns the word with all quoting removed, as long as every part is
    /// a literal or a quoted string without expansions.
    ///
    /// Heredoc delimiters are matched against body lines with this value.
    /// The second return value is false if any part was quoted.
    #[must_use]
    pub fn unquoted(&self) -> (String, bool) {
        let mut out = String::new();
        let mut plain = true;
        for part in &self.parts {
            match part {
                WordPart::Lit(lit) => {
                    // A backslash quotes the next character in a delimiter.
                    let mut chars = lit.value.chars();
                    while let Some(c) = chars.next() {
                        if c == '\\' {
                            plain = false;
                            if let Some(c) = chars.next() {
                                out.push(c);
                            }
                        } else {
                            out.push(c);
                        }
                    }
                }
                WordPart::SglQuoted(sq) => {
                    plain = false;
                    out.push_str(&sq.value);
                }
                WordPart::DblQuoted(dq) => {
                    plain = false;
                    for part in &dq.parts {
                        if let WordPart::Lit(lit) = part {
                            out.push_str(&lit.value);
                        }
                    }
                }
                _ => {}
            }
        }
        (out, plain)
    }
}

impl Node for Word {
    fn pos(&self) -> Pos {
        first_pos(&self.parts)
    }
    fn end(&self) -> Pos {
        last_end(&self.parts)
    }
}

/// Element of a [`Word`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WordPart {
    /// Unquoted literal text
    Lit(Lit),
    /// Single-quoted string, `'…'` or `$'…'`
    SglQuoted(SglQuoted),
    /// Double-quoted sequence, `"…"` or `$"…"`
    DblQuoted(DblQuoted),
    /// Parameter expansion, `$NAME` or `${…}`
    ParamExp(Box<ParamExp>),
    /// Command substitution, `$(…)` or `` `…` ``
    CmdSubst(CmdSubst),
    /// Arithmetic expansion, `$((…))` or `$[…]`
    ArithmExp(ArithmExp),
    /// Process substitution, `<(…)` or `>(…)`
    ProcSubst(ProcSubst),
    /// Extended glob, e.g. `@(…)`
    ExtGlob(ExtGlob),
}

impl Node for WordPart {
    fn pos(&self) -> Pos {
        match self {
            WordPart::Lit(x) => x.pos(),
            WordPart::SglQuoted(x) => x.pos(),
            WordPart::DblQuoted(x) => x.pos(),
            WordPart::ParamExp(x) => x.pos(),
            WordPart::CmdSubst(x) => x.pos(),
            WordPart::ArithmExp(x) => x.pos(),
            WordPart::ProcSubst(x) => x.pos(),
            WordPart::ExtGlob(x) => x.pos(),
        }
    }
    fn end(&self) -> Pos {
        match self {
            WordPart::Lit(x) => x.end(),
            WordPart::SglQuoted(x) => x.end(),
            WordPart::DblQuoted(x) => x.end(),
            WordPart::ParamExp(x) => x.end(),
            WordPart::CmdSubst(x) => x.end(),
            WordPart::ArithmExp(x) => x.end(),
            WordPart::ProcSubst(x) => x.end(),
            WordPart::ExtGlob(x) => x.end(),
        }
    }
}

/// Unquoted literal string
///
/// The end position is recorded explicitly because escaped newlines are
/// removed from the value but still occupy source bytes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Lit {
    /// Position of the first byte
    pub pos: Pos,
    /// Position just after the last byte
    pub end: Pos,
    /// Literal value, with escaped newlines removed
    pub value: String,
}

impl Lit {
    /// Creates a literal with unknown positions.
    #[must_use]
    pub fn from_value<S: Into<String>>(value: S) -> Lit {
        Lit {
            pos: Pos::NONE,
            end: Pos::NONE,
            value: value.into(),
        }
    }
}

impl Node for Lit {
    fn pos(&self) -> Pos {
        self.pos
    }
    fn end(&self) -> Pos {
        self.end
    }
}

/// Single-quoted string
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SglQuoted {
    /// Position of the opening quote, or of the `$` for `$'…'`
    pub left: Pos,
    /// Position of the closing quote
    pub right: Pos,
    /// Whether the string is of the `$'…'` form
    pub dollar: bool,
    /// Raw string value between the quotes, escapes unprocessed
    pub value: String,
}

impl Node for SglQuoted {
    fn pos(&self) -> Pos {
        self.left
    }
    fn end(&self) -> Pos {
        self.right.after(1)
    }
}

/// Double-quoted sequence of word parts
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DblQuoted {
    /// Position of the opening quote, or of the `$` for `$"…"`
    pub left: Pos,
    /// Position of the closing quote
    pub right: Pos,
    /// Whether the string is of the `$"…"` form
    pub dollar: bool,
    /// Parts between the quotes: literals, parameter expansions, command
    /// substitutions and arithmetic expansions
    pub parts: Vec<WordPart>,
}

impl Node for DblQuoted {
    fn pos(&self) -> Pos {
        self.left
    }
    fn end(&self) -> Pos {
        self.right.after(1)
    }
}

/// Command substitution
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CmdSubst {
    /// Position of the `$` of `$(…)`, or of the opening backquote
    pub left: Pos,
    /// Position of the closing `)` or backquote
    pub right: Pos,
    /// Whether the substitution is backquote-style
    pub backquotes: bool,
    /// Substituted statements
    pub stmts: Vec<Stmt>,
}

impl Node for CmdSubst {
    fn pos(&self) -> Pos {
        self.left
    }
    fn end(&self) -> Pos {
        self.right.after(1)
    }
}

/// Arithmetic expansion
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArithmExp {
    /// Position of the `$`
    pub left: Pos,
    /// Position of the closing `))` or `]`
    pub right: Pos,
    /// Whether the expansion is of the deprecated `$[…]` form
    pub bracket: bool,
    /// The expression, if the expansion is not empty
    pub expr: Option<Box<ArithmExpr>>,
}

impl Node for ArithmExp {
    fn pos(&self) -> Pos {
        self.left
    }
    fn end(&self) -> Pos {
        self.right.after(if self.bracket { 1 } else { 2 })
    }
}

/// Process substitution, `<(…)` or `>(…)`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProcSubst {
    /// Position of the operator
    pub op_pos: Pos,
    /// Direction of the substitution
    pub op: ProcOp,
    /// Position of the closing `)`
    pub rparen: Pos,
    /// Substituted statements
    pub stmts: Vec<Stmt>,
}

impl Node for ProcSubst {
    fn pos(&self) -> Pos {
        self.op_pos
    }
    fn end(&self) -> Pos {
        self.rparen.after(1)
    }
}

/// Extended glob pattern, e.g. `@(foo|bar)`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtGlob {
    /// Position of the operator
    pub op_pos: Pos,
    /// Which of the five extended glob forms
    pub op: GlobOp,
    /// Raw pattern between the parentheses
    pub pattern: Lit,
}

impl Node for ExtGlob {
    fn pos(&self) -> Pos {
        self.op_pos
    }
    fn end(&self) -> Pos {
        self.pattern.end().after(1)
    }
}

/// Parameter expansion
///
/// At most one of `index`, and exactly one of `slice`, `repl` and `exp`
/// can be present together with the base parameter; `short` and `length`
/// exclude all of them except `index`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParamExp {
    /// Position of the `$`
    pub dollar: Pos,
    /// Position of the closing `}`; [`Pos::NONE`] for the short form
    pub rbrace: Pos,
    /// Whether the expansion is the brace-less `$NAME` form
    pub short: bool,
    /// Whether the expansion is `${#name}`
    pub length: bool,
    /// Name of the expanded parameter
    pub param: Lit,
    /// Index expression of `${a[i]}`, a Bash extension
    pub index: Option<Box<ArithmExpr>>,
    /// `${a:off}` / `${a:off:len}` slice, a Bash extension
    pub slice: Option<Slice>,
    /// `${a/x/y}` search and replace, a Bash extension
    pub repl: Option<Replace>,
    /// `${a-b}` and related operator expansions
    pub exp: Option<Expansion>,
}

impl Node for ParamExp {
    fn pos(&self) -> Pos {
        self.dollar
    }
    fn end(&self) -> Pos {
        if self.short {
            self.param.end()
        } else {
            self.rbrace.after(1)
        }
    }
}

/// `${a:off:len}` slice modifier
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Slice {
    /// Offset expression
    pub offset: Box<ArithmExpr>,
    /// Length expression, if a second `:` is present
    pub length: Option<Box<ArithmExpr>>,
}

/// `${a/x/y}` search-and-replace modifier
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Replace {
    /// Whether the expansion replaces all occurrences (`${a//x/y}`)
    pub all: bool,
    /// Pattern to replace; may be empty
    pub orig: Word,
    /// Replacement; `None` when the second `/` is omitted
    pub with: Option<Word>,
}

/// `${a-b}` operator expansion modifier
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Expansion {
    /// The operator
    pub op: ParExpOp,
    /// The operand word; may be empty
    pub word: Word,
}

/// Redirection
///
/// For heredoc operators the `word` is the delimiter and the body is
/// filled into `hdoc` once it has been read, which happens at the next
/// newline token after the operator. The cell is shared so that the body
/// can be attached after the redirection has become part of its statement.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Redir {
    /// Position of the operator
    pub op_pos: Pos,
    /// The operator
    pub op: RedirOp,
    /// Source file descriptor, e.g. the `2` of `2>`
    pub n: Option<Lit>,
    /// Target word, or the delimiter of a heredoc
    pub word: Word,
    /// Body of a `<<` or `<<-` heredoc
    pub hdoc: Rc<OnceCell<Word>>,
}

impl Node for Redir {
    fn pos(&self) -> Pos {
        match &self.n {
            Some(n) => n.pos(),
            None => self.op_pos,
        }
    }
    fn end(&self) -> Pos {
        match self.hdoc.get() {
            Some(body) if body.end().is_valid() => body.end(),
            _ => self.word.end(),
        }
    }
}

/// Command, the contents of a statement
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Plain command name and arguments
    Call(CallExpr),
    /// `{ … }` group
    Block(Block),
    /// `( … )` subshell
    Subshell(Subshell),
    /// `if` conditional
    If(IfClause),
    /// `while` or `until` loop
    While(WhileClause),
    /// `for` loop, word-iterating or C-style
    For(ForClause),
    /// `case` pattern matching
    Case(CaseClause),
    /// `[[ … ]]` test clause
    Test(TestClause),
    /// `(( … ))` arithmetic command
    Arithm(ArithmCmd),
    /// Two statements joined by `&&`, `||`, `|` or `|&`
    Binary(Box<BinaryCmd>),
    /// Function definition
    FuncDecl(Box<FuncDecl>),
    /// `declare`-family builtin with its options and assignments
    Decl(DeclClause),
    /// `eval` builtin
    Eval(EvalClause),
    /// `coproc` command
    Coproc(CoprocClause),
    /// `let` builtin
    Let(LetClause),
}

impl Node for Command {
    fn pos(&self) -> Pos {
        match self {
            Command::Call(x) => x.pos(),
            Command::Block(x) => x.pos(),
            Command::Subshell(x) => x.pos(),
            Command::If(x) => x.pos(),
            Command::While(x) => x.pos(),
            Command::For(x) => x.pos(),
            Command::Case(x) => x.pos(),
            Command::Test(x) => x.pos(),
            Command::Arithm(x) => x.pos(),
            Command::Binary(x) => x.pos(),
            Command::FuncDecl(x) => x.pos(),
            Command::Decl(x) => x.pos(),
            Command::Eval(x) => x.pos(),
            Command::Coproc(x) => x.pos(),
            Command::Let(x) => x.pos(),
        }
    }
    fn end(&self) -> Pos {
        match self {
            Command::Call(x) => x.end(),
            Command::Block(x) => x.end(),
            Command::Subshell(x) => x.end(),
            Command::If(x) => x.end(),
            Command::While(x) => x.end(),
            Command::For(x) => x.end(),
            Command::Case(x) => x.end(),
            Command::Test(x) => x.end(),
            Command::Arithm(x) => x.end(),
            Command::Binary(x) => x.end(),
            Command::FuncDecl(x) => x.end(),
            Command::Decl(x) => x.end(),
            Command::Eval(x) => x.end(),
            Command::Coproc(x) => x.end(),
            Command::Let(x) => x.end(),
        }
    }
}

/// Command name and arguments
///
/// The argument list is never empty; a statement with assignments or
/// redirections only has no `CallExpr` at all.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CallExpr {
    /// Name and arguments, in source order
    pub args: Vec<Word>,
}

impl Node for CallExpr {
    fn pos(&self) -> Pos {
        first_pos(&self.args)
    }
    fn end(&self) -> Pos {
        last_end(&self.args)
    }
}

/// `{ … }` group
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Block {
    /// Position of the `{`
    pub lbrace: Pos,
    /// Position of the `}`
    pub rbrace: Pos,
    /// Grouped statements
    pub stmts: Vec<Stmt>,
}

impl Node for Block {
    fn pos(&self) -> Pos {
        self.lbrace
    }
    fn end(&self) -> Pos {
        self.rbrace.after(1)
    }
}

/// `( … )` subshell
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Subshell {
    /// Position of the `(`
    pub lparen: Pos,
    /// Position of the `)`
    pub rparen: Pos,
    /// Statements run in the subshell
    pub stmts: Vec<Stmt>,
}

impl Node for Subshell {
    fn pos(&self) -> Pos {
        self.lparen
    }
    fn end(&self) -> Pos {
        self.rparen.after(1)
    }
}

/// `if` conditional construct
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IfClause {
    /// Position of the `if`
    pub if_pos: Pos,
    /// Position of the `then`
    pub then_pos: Pos,
    /// Position of the `else`, if present
    pub else_pos: Pos,
    /// Position of the `fi`
    pub fi_pos: Pos,
    /// Condition statements
    pub cond: Vec<Stmt>,
    /// Statements of the `then` branch
    pub then_stmts: Vec<Stmt>,
    /// `elif` branches
    pub elifs: Vec<Elif>,
    /// Statements of the `else` branch, if present
    pub else_stmts: Vec<Stmt>,
}

impl Node for IfClause {
    fn pos(&self) -> Pos {
        self.if_pos
    }
    fn end(&self) -> Pos {
        self.fi_pos.after(2)
    }
}

/// `elif` branch of an [`IfClause`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Elif {
    /// Position of the `elif`
    pub elif_pos: Pos,
    /// Position of the `then`
    pub then_pos: Pos,
    /// Condition statements
    pub cond: Vec<Stmt>,
    /// Statements of the branch body
    pub then_stmts: Vec<Stmt>,
}

/// `while` or `until` loop
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WhileClause {
    /// Position of the `while` or `until`
    pub while_pos: Pos,
    /// Position of the `do`
    pub do_pos: Pos,
    /// Position of the `done`
    pub done_pos: Pos,
    /// Whether the loop is an `until` loop
    pub until: bool,
    /// Condition statements
    pub cond: Vec<Stmt>,
    /// Loop body
    pub do_stmts: Vec<Stmt>,
}

impl Node for WhileClause {
    fn pos(&self) -> Pos {
        self.while_pos
    }
    fn end(&self) -> Pos {
        self.done_pos.after(4)
    }
}

/// `for` loop
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ForClause {
    /// Position of the `for`
    pub for_pos: Pos,
    /// Position of the `do`
    pub do_pos: Pos,
    /// Position of the `done`
    pub done_pos: Pos,
    /// Iteration specification
    pub r#loop: Loop,
    /// Loop body
    pub do_stmts: Vec<Stmt>,
}

impl Node for ForClause {
    fn pos(&self) -> Pos {
        self.for_pos
    }
    fn end(&self) -> Pos {
        self.done_pos.after(4)
    }
}

/// Iteration specification of a [`ForClause`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Loop {
    /// `for name [in words…]`
    WordIter(WordIter),
    /// `for ((init; cond; post))`, a Bash extension
    CStyle(CStyleLoop),
}

/// Word-iterating loop head
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WordIter {
    /// Loop variable name
    pub name: Lit,
    /// Position of the `in`; [`Pos::NONE`] when iterating the positional
    /// parameters
    pub in_pos: Pos,
    /// Words to iterate over
    pub items: Vec<Word>,
}

/// C-style loop head
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CStyleLoop {
    /// Position of the `((`
    pub lparen: Pos,
    /// Position of the `))`
    pub rparen: Pos,
    /// Initializer, if present
    pub init: Option<Box<ArithmExpr>>,
    /// Condition, if present
    pub cond: Option<Box<ArithmExpr>>,
    /// Post-iteration expression, if present
    pub post: Option<Box<ArithmExpr>>,
}

/// `case` pattern matching construct
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaseClause {
    /// Position of the `case`
    pub case_pos: Pos,
    /// Position of the `esac`
    pub esac_pos: Pos,
    /// Word being matched
    pub word: Word,
    /// Pattern lists
    pub items: Vec<CaseItem>,
}

impl Node for CaseClause {
    fn pos(&self) -> Pos {
        self.case_pos
    }
    fn end(&self) -> Pos {
        self.esac_pos.after(4)
    }
}

/// Pattern list of a [`CaseClause`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CaseItem {
    /// Terminating operator
    ///
    /// A final pattern list may omit the terminator before `esac`, in which
    /// case the parser synthesizes [`CaseOp::DblSemicolon`] with `op_pos`
    /// set to the position of the `esac`.
    pub op: CaseOp,
    /// Position of the terminating operator
    pub op_pos: Pos,
    /// Patterns, at least one
    pub patterns: Vec<Word>,
    /// Statements executed when a pattern matches
    pub stmts: Vec<Stmt>,
}

/// `[[ … ]]` test clause, a Bash extension
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestClause {
    /// Position of the `[[`
    pub left: Pos,
    /// Position of the `]]`
    pub right: Pos,
    /// The test expression
    pub x: TestExpr,
}

impl Node for TestClause {
    fn pos(&self) -> Pos {
        self.left
    }
    fn end(&self) -> Pos {
        self.right.after(2)
    }
}

/// `(( … ))` arithmetic command, a Bash extension
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArithmCmd {
    /// Position of the `((`
    pub left: Pos,
    /// Position of the `))`
    pub right: Pos,
    /// The expression, if present
    pub expr: Option<Box<ArithmExpr>>,
}

impl Node for ArithmCmd {
    fn pos(&self) -> Pos {
        self.left
    }
    fn end(&self) -> Pos {
        self.right.after(2)
    }
}

/// Two statements joined by a binary operator
///
/// Pipelines associate to the right: `a | b | c` parses as
/// `a | (b | c)`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BinaryCmd {
    /// Position of the operator
    pub op_pos: Pos,
    /// The operator
    pub op: BinCmdOp,
    /// Left operand
    pub x: Stmt,
    /// Right operand
    pub y: Stmt,
}

impl Node for BinaryCmd {
    fn pos(&self) -> Pos {
        self.x.pos()
    }
    fn end(&self) -> Pos {
        self.y.end()
    }
}

/// Function definition
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FuncDecl {
    /// Position of the first byte of the definition
    pub position: Pos,
    /// Whether the definition starts with the `function` reserved word, a
    /// Bash extension
    pub rsrv_word: bool,
    /// Whether the definition carries `()` after the name
    pub parens: bool,
    /// Function name
    pub name: Lit,
    /// Function body
    pub body: Stmt,
}

impl Node for FuncDecl {
    fn pos(&self) -> Pos {
        self.position
    }
    fn end(&self) -> Pos {
        self.body.end()
    }
}

/// `declare`-family command, a Bash extension
///
/// The variant is one of `declare`, `local`, `export`, `readonly`,
/// `typeset` and `nameref`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DeclClause {
    /// The builtin name
    pub variant: Lit,
    /// Option words, e.g. `-r`
    pub opts: Vec<Word>,
    /// Declared assignments; names without `=` are naked assignments
    pub assigns: Vec<Assign>,
}

impl Node for DeclClause {
    fn pos(&self) -> Pos {
        self.variant.pos()
    }
    fn end(&self) -> Pos {
        last_end(&self.assigns)
            .max(last_end(&self.opts))
            .max(self.variant.end())
    }
}

/// `eval` command
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EvalClause {
    /// Position of the `eval`
    pub eval_pos: Pos,
    /// Evaluated statement, if any
    pub stmt: Option<Box<Stmt>>,
}

impl Node for EvalClause {
    fn pos(&self) -> Pos {
        self.eval_pos
    }
    fn end(&self) -> Pos {
        match &self.stmt {
            Some(stmt) => stmt.end(),
            None => self.eval_pos.after(4),
        }
    }
}

/// `coproc` command, a Bash extension
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CoprocClause {
    /// Position of the `coproc`
    pub coproc_pos: Pos,
    /// Coprocess name, if given
    pub name: Option<Lit>,
    /// The coprocess command
    pub stmt: Box<Stmt>,
}

impl Node for CoprocClause {
    fn pos(&self) -> Pos {
        self.coproc_pos
    }
    fn end(&self) -> Pos {
        self.stmt.end()
    }
}

/// `let` command, a Bash extension
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LetClause {
    /// Position of the `let`
    pub let_pos: Pos,
    /// Argument expressions, at least one
    pub exprs: Vec<ArithmExpr>,
}

impl Node for LetClause {
    fn pos(&self) -> Pos {
        self.let_pos
    }
    fn end(&self) -> Pos {
        last_end(&self.exprs)
    }
}

/// Arithmetic expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ArithmExpr {
    /// Operand word: a number, a name or an expansion
    Word(Word),
    /// Binary operation; the ternary `a ? b : c` is encoded as
    /// `Quest(a, Colon(b, c))`
    Binary(Box<BinaryArithm>),
    /// Unary operation, prefix or postfix
    Unary(Box<UnaryArithm>),
    /// Parenthesized expression
    Paren(Box<ParenArithm>),
}

impl Node for ArithmExpr {
    fn pos(&self) -> Pos {
        match self {
            ArithmExpr::Word(x) => x.pos(),
            ArithmExpr::Binary(x) => x.x.pos(),
            ArithmExpr::Unary(x) => {
                if x.post {
                    x.x.pos()
                } else {
                    x.op_pos
                }
            }
            ArithmExpr::Paren(x) => x.lparen,
        }
    }
    fn end(&self) -> Pos {
        match self {
            ArithmExpr::Word(x) => x.end(),
            ArithmExpr::Binary(x) => x.y.end(),
            ArithmExpr::Unary(x) => {
                if x.post {
                    x.op_pos.after(2)
                } else {
                    x.x.end()
                }
            }
            ArithmExpr::Paren(x) => x.rparen.after(1),
        }
    }
}

/// Binary arithmetic operation
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BinaryArithm {
    /// Position of the operator
    pub op_pos: Pos,
    /// The operator
    pub op: BinAritOp,
    /// Left operand
    pub x: ArithmExpr,
    /// Right operand
    pub y: ArithmExpr,
}

/// Unary arithmetic operation
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnaryArithm {
    /// Position of the operator
    pub op_pos: Pos,
    /// The operator
    pub op: UnAritOp,
    /// Whether the operator is postfix, as in `x++`
    pub post: bool,
    /// Operand
    pub x: ArithmExpr,
}

/// Parenthesized arithmetic expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParenArithm {
    /// Position of the `(`
    pub lparen: Pos,
    /// Position of the `)`
    pub rparen: Pos,
    /// Inner expression
    pub x: ArithmExpr,
}

/// Test expression inside `[[ … ]]`
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TestExpr {
    /// Plain word operand
    Word(Word),
    /// Binary operation, including `&&` and `||`
    Binary(Box<BinaryTest>),
    /// Unary operation, e.g. `-e file` or `! x`
    Unary(Box<UnaryTest>),
    /// Parenthesized expression
    Paren(Box<ParenTest>),
}

impl Node for TestExpr {
    fn pos(&self) -> Pos {
        match self {
            TestExpr::Word(x) => x.pos(),
            TestExpr::Binary(x) => x.x.pos(),
            TestExpr::Unary(x) => x.op_pos,
            TestExpr::Paren(x) => x.lparen,
        }
    }
    fn end(&self) -> Pos {
        match self {
            TestExpr::Word(x) => x.end(),
            TestExpr::Binary(x) => x.y.end(),
            TestExpr::Unary(x) => x.x.end(),
            TestExpr::Paren(x) => x.rparen.after(1),
        }
    }
}

/// Binary test operation
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BinaryTest {
    /// Position of the operator
    pub op_pos: Pos,
    /// The operator
    pub op: BinTestOp,
    /// Left operand
    pub x: TestExpr,
    /// Right operand
    pub y: TestExpr,
}

/// Unary test operation
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnaryTest {
    /// Position of the operator
    pub op_pos: Pos,
    /// The operator
    pub op: UnTestOp,
    /// Operand
    pub x: TestExpr,
}

/// Parenthesized test expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParenTest {
    /// Position of the `(`
    pub lparen: Pos,
    /// Position of the `)`
    pub rparen: Pos,
    /// Inner expression
    pub x: TestExpr,
}

/// Redirection operators
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RedirOp {
    /// `<`
    In,
    /// `>`
    Out,
    /// `>>`
    Append,
    /// `<<`
    Hdoc,
    /// `<<-`
    DashHdoc,
    /// `<<<`
    WordHdoc,
    /// `<>`
    RdrInOut,
    /// `<&`
    DplIn,
    /// `>&`
    DplOut,
    /// `>|`
    ClbOut,
    /// `&>`
    RdrAll,
    /// `&>>`
    AppAll,
}

impl RedirOp {
    /// Literal spelling of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        use RedirOp::*;
        match self {
            In => "<",
            Out => ">",
            Append => ">>",
            Hdoc => "<<",
            DashHdoc => "<<-",
            WordHdoc => "<<<",
            RdrInOut => "<>",
            DplIn => "<&",
            DplOut => ">&",
            ClbOut => ">|",
            RdrAll => "&>",
            AppAll => "&>>",
        }
    }

    /// Whether the operator introduces a heredoc body.
    #[must_use]
    pub const fn is_hdoc(self) -> bool {
        matches!(self, RedirOp::Hdoc | RedirOp::DashHdoc)
    }
}

/// Binary command operators
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinCmdOp {
    /// `&&`
    AndStmt,
    /// `||`
    OrStmt,
    /// `|`
    Pipe,
    /// `|&`, a Bash extension
    PipeAll,
}

impl BinCmdOp {
    /// Literal spelling of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            BinCmdOp::AndStmt => "&&",
            BinCmdOp::OrStmt => "||",
            BinCmdOp::Pipe => "|",
            BinCmdOp::PipeAll => "|&",
        }
    }
}

/// Case item terminators
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CaseOp {
    /// `;;`
    #[default]
    DblSemicolon,
    /// `;&`, a Bash extension
    SemiFall,
    /// `;;&`, a Bash extension
    DblSemiFall,
}

impl CaseOp {
    /// Literal spelling of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CaseOp::DblSemicolon => ";;",
            CaseOp::SemiFall => ";&",
            CaseOp::DblSemiFall => ";;&",
        }
    }
}

/// Extended glob operators
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GlobOp {
    /// `@(`
    GlobOne,
    /// `?(`
    GlobZeroOrOne,
    /// `*(`
    GlobZeroOrMore,
    /// `+(`
    GlobOneOrMore,
    /// `!(`
    GlobExcept,
}

impl GlobOp {
    /// Literal spelling of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GlobOp::GlobOne => "@(",
            GlobOp::GlobZeroOrOne => "?(",
            GlobOp::GlobZeroOrMore => "*(",
            GlobOp::GlobOneOrMore => "+(",
            GlobOp::GlobExcept => "!(",
        }
    }
}

/// Process substitution operators
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProcOp {
    /// `<(`
    CmdIn,
    /// `>(`
    CmdOut,
}

impl ProcOp {
    /// Literal spelling of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ProcOp::CmdIn => "<(",
            ProcOp::CmdOut => ">(",
        }
    }
}

/// Unary arithmetic operators
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnAritOp {
    /// `++`
    Inc,
    /// `--`
    Dec,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `!`
    Not,
    /// `~`
    BitNegation,
}

impl UnAritOp {
    /// Literal spelling of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        use UnAritOp::*;
        match self {
            Inc => "++",
            Dec => "--",
            Plus => "+",
            Minus => "-",
            Not => "!",
            BitNegation => "~",
        }
    }
}

/// Binary arithmetic operators, including assignments and the two halves
/// of the ternary conditional
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinAritOp {
    /// `,`
    Comma,
    /// `=`
    Assgn,
    /// `+=`
    AddAssgn,
    /// `-=`
    SubAssgn,
    /// `*=`
    MulAssgn,
    /// `/=`
    QuoAssgn,
    /// `%=`
    RemAssgn,
    /// `&=`
    AndAssgn,
    /// `|=`
    OrAssgn,
    /// `^=`
    XorAssgn,
    /// `<<=`
    ShlAssgn,
    /// `>>=`
    ShrAssgn,
    /// `?`
    Quest,
    /// `:`
    Colon,
    /// `&&`
    AndArit,
    /// `||`
    OrArit,
    /// `&`
    And,
    /// `|`
    Or,
    /// `^`
    Xor,
    /// `==`
    Eql,
    /// `!=`
    Neq,
    /// `<`
    Lss,
    /// `>`
    Gtr,
    /// `<=`
    Leq,
    /// `>=`
    Geq,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Quo,
    /// `%`
    Rem,
    /// `**`
    Pow,
}

impl BinAritOp {
    /// Literal spelling of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        use BinAritOp::*;
        match self {
            Comma => ",",
            Assgn => "=",
            AddAssgn => "+=",
            SubAssgn => "-=",
            MulAssgn => "*=",
            QuoAssgn => "/=",
            RemAssgn => "%=",
            AndAssgn => "&=",
            OrAssgn => "|=",
            XorAssgn => "^=",
            ShlAssgn => "<<=",
            ShrAssgn => ">>=",
            Quest => "?",
            Colon => ":",
            AndArit => "&&",
            OrArit => "||",
            And => "&",
            Or => "|",
            Xor => "^",
            Eql => "==",
            Neq => "!=",
            Lss => "<",
            Gtr => ">",
            Leq => "<=",
            Geq => ">=",
            Shl => "<<",
            Shr => ">>",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Quo => "/",
            Rem => "%",
            Pow => "**",
        }
    }

    /// Whether the operator assigns to its left operand.
    #[must_use]
    pub const fn is_assign(self) -> bool {
        use BinAritOp::*;
        matches!(
            self,
            Assgn
                | AddAssgn
                | SubAssgn
                | MulAssgn
                | QuoAssgn
                | RemAssgn
                | AndAssgn
                | OrAssgn
                | XorAssgn
                | ShlAssgn
                | ShrAssgn
        )
    }
}

/// Unary test operators
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnTestOp {
    /// `-e`
    Exists,
    /// `-f`
    RegFile,
    /// `-d`
    Directory,
    /// `-c`
    CharSpecial,
    /// `-b`
    BlockSpecial,
    /// `-p`
    NamedPipe,
    /// `-S`
    Socket,
    /// `-L`
    Symlink,
    /// `-h`, an alternate spelling of `-L`
    SymlinkH,
    /// `-k`
    Sticky,
    /// `-g`
    GidSet,
    /// `-u`
    UidSet,
    /// `-G`
    GroupOwned,
    /// `-O`
    UserOwned,
    /// `-N`
    Modified,
    /// `-r`
    Readable,
    /// `-w`
    Writable,
    /// `-x`
    Executable,
    /// `-s`
    NonEmptyFile,
    /// `-t`
    TermFd,
    /// `-z`
    EmptyStr,
    /// `-n`
    NonEmptyStr,
    /// `-o`
    OptSet,
    /// `-v`
    VarSet,
    /// `-R`
    NameRef,
    /// `!`
    NotTest,
}

impl UnTestOp {
    /// Literal spelling of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        use UnTestOp::*;
        match self {
            Exists => "-e",
            RegFile => "-f",
            Directory => "-d",
            CharSpecial => "-c",
            BlockSpecial => "-b",
            NamedPipe => "-p",
            Socket => "-S",
            Symlink => "-L",
            SymlinkH => "-h",
            Sticky => "-k",
            GidSet => "-g",
            UidSet => "-u",
            GroupOwned => "-G",
            UserOwned => "-O",
            Modified => "-N",
            Readable => "-r",
            Writable => "-w",
            Executable => "-x",
            NonEmptyFile => "-s",
            TermFd => "-t",
            EmptyStr => "-z",
            NonEmptyStr => "-n",
            OptSet => "-o",
            VarSet => "-v",
            NameRef => "-R",
            NotTest => "!",
        }
    }

    /// Looks up the operator for a literal word.
    #[must_use]
    pub fn from_word(word: &str) -> Option<UnTestOp> {
        use UnTestOp::*;
        Some(match word {
            "-e" => Exists,
            "-f" => RegFile,
            "-d" => Directory,
            "-c" => CharSpecial,
            "-b" => BlockSpecial,
            "-p" => NamedPipe,
            "-S" => Socket,
            "-L" => Symlink,
            "-h" => SymlinkH,
            "-k" => Sticky,
            "-g" => GidSet,
            "-u" => UidSet,
            "-G" => GroupOwned,
            "-O" => UserOwned,
            "-N" => Modified,
            "-r" => Readable,
            "-w" => Writable,
            "-x" => Executable,
            "-s" => NonEmptyFile,
            "-t" => TermFd,
            "-z" => EmptyStr,
            "-n" => NonEmptyStr,
            "-o" => OptSet,
            "-v" => VarSet,
            "-R" => NameRef,
            "!" => NotTest,
            _ => return None,
        })
    }
}

/// Binary test operators
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinTestOp {
    /// `=~`
    ReMatch,
    /// `-nt`
    Newer,
    /// `-ot`
    Older,
    /// `-ef`
    SameFile,
    /// `-eq`
    Eql,
    /// `-ne`
    Neq,
    /// `-le`
    Leq,
    /// `-ge`
    Geq,
    /// `-lt`
    Lss,
    /// `-gt`
    Gtr,
    /// `&&`
    AndTest,
    /// `||`
    OrTest,
    /// `=`
    MatchShort,
    /// `==`
    Match,
    /// `!=`
    NoMatch,
    /// `<`
    Before,
    /// `>`
    After,
}

impl BinTestOp {
    /// Literal spelling of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        use BinTestOp::*;
        match self {
            ReMatch => "=~",
            Newer => "-nt",
            Older => "-ot",
            SameFile => "-ef",
            Eql => "-eq",
            Neq => "-ne",
            Leq => "-le",
            Geq => "-ge",
            Lss => "-lt",
            Gtr => "-gt",
            AndTest => "&&",
            OrTest => "||",
            MatchShort => "=",
            Match => "==",
            NoMatch => "!=",
            Before => "<",
            After => ">",
        }
    }

    /// Looks up the operator for a literal word.
    #[must_use]
    pub fn from_word(word: &str) -> Option<BinTestOp> {
        use BinTestOp::*;
        Some(match word {
            "=~" => ReMatch,
            "-nt" => Newer,
            "-ot" => Older,
            "-ef" => SameFile,
            "-eq" => Eql,
            "-ne" => Neq,
            "-le" => Leq,
            "-ge" => Geq,
            "-lt" => Lss,
            "-gt" => Gtr,
            "=" => MatchShort,
            "==" => Match,
            "!=" => NoMatch,
            "<" => Before,
            ">" => After,
            _ => return None,
        })
    }
}

/// Parameter expansion operators
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParExpOp {
    /// `+`
    AlternateUnset,
    /// `:+`
    AlternateUnsetOrNull,
    /// `-`
    DefaultUnset,
    /// `:-`
    DefaultUnsetOrNull,
    /// `?`
    ErrorUnset,
    /// `:?`
    ErrorUnsetOrNull,
    /// `=`
    AssignUnset,
    /// `:=`
    AssignUnsetOrNull,
    /// `%`
    RemSmallSuffix,
    /// `%%`
    RemLargeSuffix,
    /// `#`
    RemSmallPrefix,
    /// `##`
    RemLargePrefix,
    /// `^`
    UpperFirst,
    /// `^^`
    UpperAll,
    /// `,`
    LowerFirst,
    /// `,,`
    LowerAll,
    /// `@`
    OtherParamOps,
}

impl ParExpOp {
    /// Literal spelling of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        use ParExpOp::*;
        match self {
            AlternateUnset => "+",
            AlternateUnsetOrNull => ":+",
            DefaultUnset => "-",
            DefaultUnsetOrNull => ":-",
            ErrorUnset => "?",
            ErrorUnsetOrNull => ":?",
            AssignUnset => "=",
            AssignUnsetOrNull => ":=",
            RemSmallSuffix => "%",
            RemLargeSuffix => "%%",
            RemSmallPrefix => "#",
            RemLargePrefix => "##",
            UpperFirst => "^",
            UpperAll => "^^",
            LowerFirst => ",",
            LowerAll => ",,",
            OtherParamOps => "@",
        }
    }

    /// Whether the operator is one of the Bash-only case transformations.
    #[must_use]
    pub const fn is_case_op(self) -> bool {
        use ParExpOp::*;
        matches!(self, UpperFirst | UpperAll | LowerFirst | LowerAll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(pos: u64, value: &str) -> Lit {
        Lit {
            pos: Pos::new(pos),
            end: Pos::new(pos + value.len() as u64),
            value: value.to_string(),
        }
    }

    fn lit_word(pos: u64, value: &str) -> Word {
        Word {
            parts: vec![WordPart::Lit(lit(pos, value))],
        }
    }

    #[test]
    fn comment_end() {
        let comment = Comment {
            hash: Pos::new(5),
            text: " two".to_string(),
        };
        assert_eq!(comment.pos(), Pos::new(5));
        assert_eq!(comment.end(), Pos::new(10));
    }

    #[test]
    fn word_lit() {
        let word = lit_word(1, "foo");
        assert_eq!(word.lit(), Some("foo"));
        assert_eq!(word.pos(), Pos::new(1));
        assert_eq!(word.end(), Pos::new(4));

        let word = Word {
            parts: vec![
                WordPart::Lit(lit(1, "foo")),
                WordPart::SglQuoted(SglQuoted {
                    left: Pos::new(4),
                    right: Pos::new(8),
                    dollar: false,
                    value: "bar".to_string(),
                }),
            ],
        };
        assert_eq!(word.lit(), None);
        assert_eq!(word.end(), Pos::new(9));
    }

    #[test]
    fn word_unquoted() {
        let word = Word {
            parts: vec![
                WordPart::Lit(lit(1, "a")),
                WordPart::SglQuoted(SglQuoted {
                    left: Pos::new(2),
                    right: Pos::new(4),
                    dollar: false,
                    value: "b".to_string(),
                }),
            ],
        };
        assert_eq!(word.unquoted(), ("ab".to_string(), false));

        let word = lit_word(1, "EOF");
        assert_eq!(word.unquoted(), ("EOF".to_string(), true));

        let word = lit_word(1, "\\EOF");
        assert_eq!(word.unquoted(), ("EOF".to_string(), false));
    }

    #[test]
    fn stmt_end_prefers_semicolon() {
        let mut stmt = Stmt {
            pos: Pos::new(1),
            cmd: Some(Command::Call(CallExpr {
                args: vec![lit_word(1, "foo")],
            })),
            ..Stmt::default()
        };
        assert_eq!(stmt.end(), Pos::new(4));
        stmt.semicolon = Pos::new(4);
        assert_eq!(stmt.end(), Pos::new(5));
    }

    #[test]
    fn redir_end_with_heredoc_body() {
        let redir = Redir {
            op_pos: Pos::new(5),
            op: RedirOp::Hdoc,
            n: None,
            word: lit_word(7, "EOF"),
            hdoc: Rc::new(OnceCell::new()),
        };
        assert_eq!(redir.pos(), Pos::new(5));
        assert_eq!(redir.end(), Pos::new(10));

        redir.hdoc.set(lit_word(11, "body\n")).unwrap();
        assert_eq!(redir.end(), Pos::new(16));
    }

    #[test]
    fn param_exp_end_short_and_braced() {
        let exp = ParamExp {
            dollar: Pos::new(1),
            rbrace: Pos::NONE,
            short: true,
            length: false,
            param: lit(2, "x"),
            index: None,
            slice: None,
            repl: None,
            exp: None,
        };
        assert_eq!(exp.end(), Pos::new(3));

        let exp = ParamExp {
            dollar: Pos::new(1),
            rbrace: Pos::new(4),
            short: false,
            ..exp
        };
        assert_eq!(exp.end(), Pos::new(5));
    }

    #[test]
    fn binary_cmd_spans_operands() {
        let cmd = BinaryCmd {
            op_pos: Pos::new(5),
            op: BinCmdOp::AndStmt,
            x: Stmt {
                pos: Pos::new(1),
                cmd: Some(Command::Call(CallExpr {
                    args: vec![lit_word(1, "foo")],
                })),
                ..Stmt::default()
            },
            y: Stmt {
                pos: Pos::new(8),
                cmd: Some(Command::Call(CallExpr {
                    args: vec![lit_word(8, "bar")],
                })),
                ..Stmt::default()
            },
        };
        assert_eq!(cmd.pos(), Pos::new(1));
        assert_eq!(cmd.end(), Pos::new(11));
    }

    #[test]
    fn unary_arithm_positions() {
        let prefix = ArithmExpr::Unary(Box::new(UnaryArithm {
            op_pos: Pos::new(1),
            op: UnAritOp::Inc,
            post: false,
            x: ArithmExpr::Word(lit_word(3, "x")),
        }));
        assert_eq!(prefix.pos(), Pos::new(1));
        assert_eq!(prefix.end(), Pos::new(4));

        let postfix = ArithmExpr::Unary(Box::new(UnaryArithm {
            op_pos: Pos::new(2),
            op: UnAritOp::Dec,
            post: true,
            x: ArithmExpr::Word(lit_word(1, "x")),
        }));
        assert_eq!(postfix.pos(), Pos::new(1));
        assert_eq!(postfix.end(), Pos::new(4));
    }

    #[test]
    fn operator_spellings() {
        assert_eq!(RedirOp::DashHdoc.as_str(), "<<-");
        assert_eq!(RedirOp::AppAll.as_str(), "&>>");
        assert!(RedirOp::Hdoc.is_hdoc());
        assert!(!RedirOp::WordHdoc.is_hdoc());
        assert_eq!(CaseOp::DblSemiFall.as_str(), ";;&");
        assert_eq!(BinAritOp::ShlAssgn.as_str(), "<<=");
        assert!(BinAritOp::ShlAssgn.is_assign());
        assert!(!BinAritOp::Shl.is_assign());
        assert_eq!(UnTestOp::from_word("-ef"), None);
        assert_eq!(BinTestOp::from_word("-ef"), Some(BinTestOp::SameFile));
        assert_eq!(ParExpOp::LowerAll.as_str(), ",,");
        assert!(ParExpOp::UpperFirst.is_case_op());
        assert!(!ParExpOp::OtherParamOps.is_case_op());
    }
}
