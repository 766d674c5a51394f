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

//! Definition of errors that happen in the parser

use crate::source::Pos;
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Types of syntax errors
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{}", self.message())]
#[non_exhaustive]
pub enum SyntaxError {
    /// The source contains a byte sequence that is not valid UTF-8.
    InvalidUtf8,
    /// A quoted string is missing its closing quote.
    UnclosedQuote {
        /// The quoting character that is not closed
        quote: char,
    },
    /// A token was reached while an earlier opening token is unclosed.
    Unmatched {
        /// The token that was reached, e.g. `EOF` or `;`
        end: Cow<'static, str>,
        /// The opening token
        open: &'static str,
        /// The missing closing token
        close: &'static str,
    },
    /// A separator token appeared with no statement before it.
    FollowStmt {
        /// The offending token
        tok: &'static str,
    },
    /// A reserved word appeared outside the construct it belongs to.
    UsedOnlyIn {
        /// The reserved word
        kw: &'static str,
        /// Where the word may be used, e.g. `to end an if`
        place: &'static str,
    },
    /// A construct prefix is missing what must come after it.
    MustFollowKw {
        /// What was parsed, e.g. `if <cond>`
        left: Cow<'static, str>,
        /// What must follow, e.g. `"then"` or `a statement list`
        right: Cow<'static, str>,
    },
    /// An operator is missing its right operand.
    MustFollowOp {
        /// The operator
        op: Cow<'static, str>,
        /// What must follow, e.g. `a statement` or `an expression`
        what: &'static str,
    },
    /// A multi-word construct is missing its closing word.
    StmtMustEnd {
        /// The construct keyword, e.g. `if`
        kw: &'static str,
        /// The closing word, e.g. `fi`
        end: &'static str,
    },
    /// A token that is neither a word nor a redirect appeared in a command.
    CmdContainsWords,
    /// Two statements are not separated.
    MissingSeparator,
    /// A function name is not a valid word.
    InvalidFuncName {
        /// The offending source text, if it is printable
        raw: Option<String>,
    },
    /// A token is not an arithmetic operator.
    NotArithmOp {
        /// The offending token text
        val: String,
    },
    /// A token is not a test operator.
    NotTestOp {
        /// The offending token text
        val: String,
    },
    /// A token is not a parameter expansion operator.
    NotParamOp {
        /// The offending token text
        val: String,
    },
    /// A `${…}` expansion contains something other than a parameter name.
    ParamExpLiteral,
    /// A `$` is not followed by anything expandable.
    DollarLiteral,
    /// A redirection operand starts on a later line than its operator.
    RedirSameLine,
    /// A heredoc delimiter word contains an expansion.
    HdocWordNoExpansion,
    /// A heredoc body is missing its delimiter line.
    UnclosedHdoc {
        /// The delimiter that was not found
        delim: String,
    },
    /// A Bash construct was used under the POSIX language variant.
    BashFeature {
        /// Description of the construct, e.g. `arrays`
        feat: Cow<'static, str>,
        /// Whether the description is grammatically plural
        plural: bool,
    },
    /// Case patterns are joined by something other than `|`.
    CasePatternSep,
    /// The left side of an arithmetic assignment is not a name.
    AssignAfterName,
    /// A ternary `?` has no matching `:`.
    TernaryMissingColon,
    /// A ternary `:` has no preceding `?`.
    TernaryMissingQuest,
    /// The input nests deeper than the parser's recursion limit.
    NestingTooDeep,
    /// A standalone parse found more or less than one node.
    NotOneNode {
        /// What was expected, e.g. `word`
        what: &'static str,
    },
}

impl SyntaxError {
    /// Returns the error message describing the error.
    #[must_use]
    pub fn message(&self) -> Cow<'static, str> {
        use SyntaxError::*;
        match self {
            InvalidUtf8 => "invalid UTF-8 encoding".into(),
            UnclosedQuote { quote } => {
                format!("reached EOF without closing quote {quote}").into()
            }
            Unmatched { end, open, close } => {
                format!("reached {end} without matching {open} with {close}").into()
            }
            FollowStmt { tok } => {
                format!("{tok} can only immediately follow a statement").into()
            }
            UsedOnlyIn { kw, place } => format!("{kw:?} can only be used {place}").into(),
            MustFollowKw { left, right } => {
                format!("{left:?} must be followed by {right}").into()
            }
            MustFollowOp { op, what } => format!("{op} must be followed by {what}").into(),
            StmtMustEnd { kw, end } => {
                format!("{kw} statement must end with {end:?}").into()
            }
            CmdContainsWords => "a command can only contain words and redirects".into(),
            MissingSeparator => "statements must be separated by &, ; or a newline".into(),
            InvalidFuncName { raw: None } => "invalid func name".into(),
            InvalidFuncName { raw: Some(raw) } => {
                format!("invalid func name: {raw:?}").into()
            }
            NotArithmOp { val } => format!("not a valid arithmetic operator: {val}").into(),
            NotTestOp { val } => format!("not a valid test operator: {val}").into(),
            NotParamOp { val } => {
                format!("not a valid parameter expansion operator: {val}").into()
            }
            ParamExpLiteral => "parameter expansion requires a literal".into(),
            DollarLiteral => "$ must be escaped or followed by a literal".into(),
            RedirSameLine => "redirect word must be on the same line".into(),
            HdocWordNoExpansion => "expansions not allowed in heredoc words".into(),
            UnclosedHdoc { delim } => format!("unclosed here-document '{delim}'").into(),
            BashFeature { feat, plural } => {
                let verb = if *plural { "are" } else { "is" };
                format!("{feat} {verb} a bash feature").into()
            }
            CasePatternSep => "case patterns must be separated with |".into(),
            AssignAfterName => "= must follow a name".into(),
            TernaryMissingColon => "ternary operator missing : after ?".into(),
            TernaryMissingQuest => "ternary operator missing ? before :".into(),
            NestingTooDeep => "nesting level exceeds limit".into(),
            NotOneNode { what } => format!("expected a single {what}").into(),
        }
    }
}

/// Types of errors that may happen in parsing
#[derive(Clone, Debug, Error)]
pub enum ErrorCause {
    /// Error in the underlying byte source, surfaced verbatim
    #[error("{0}")]
    Io(#[from] Rc<std::io::Error>),
    /// Syntax error
    #[error("{0}")]
    Syntax(#[from] SyntaxError),
}

impl PartialEq for ErrorCause {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ErrorCause::Syntax(e1), ErrorCause::Syntax(e2)) => e1 == e2,
            _ => false,
        }
    }
}

impl From<std::io::Error> for ErrorCause {
    fn from(e: std::io::Error) -> ErrorCause {
        ErrorCause::from(Rc::new(e))
    }
}

/// Explanation of a failure in parsing
///
/// The error renders as `name:line:col: text`, with the name and its
/// trailing colon omitted when the source has no name:
///
/// ```
/// # use sh_syntax::parser::Config;
/// let e = Config::new().parse_str("x.sh", "echo 'oops").unwrap_err();
/// assert_eq!(e.to_string(), "x.sh:1:6: reached EOF without closing quote '");
/// assert_eq!((e.line, e.col), (1, 6));
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
pub struct Error {
    /// Name of the source, possibly empty
    pub name: String,
    /// Position of the offending byte
    pub pos: Pos,
    /// 1-based line of the offending byte
    pub line: u64,
    /// 1-based column of the offending byte
    pub col: u64,
    /// What went wrong
    pub cause: ErrorCause,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.name.is_empty() {
            write!(f, "{}:", self.name)?;
        }
        write!(f, "{}:{}: {}", self.line, self.col, self.cause)
    }
}

/// Entire result of parsing
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_messages() {
        assert_eq!(
            SyntaxError::UnclosedQuote { quote: '"' }.message(),
            "reached EOF without closing quote \""
        );
        assert_eq!(
            SyntaxError::Unmatched {
                end: "EOF".into(),
                open: "(",
                close: ")",
            }
            .message(),
            "reached EOF without matching ( with )"
        );
        assert_eq!(
            SyntaxError::UsedOnlyIn {
                kw: "fi",
                place: "to end an if",
            }
            .message(),
            "\"fi\" can only be used to end an if"
        );
        assert_eq!(
            SyntaxError::MustFollowKw {
                left: "if <cond>".into(),
                right: "\"then\"".into(),
            }
            .message(),
            "\"if <cond>\" must be followed by \"then\""
        );
        assert_eq!(
            SyntaxError::StmtMustEnd { kw: "if", end: "fi" }.message(),
            "if statement must end with \"fi\""
        );
        assert_eq!(
            SyntaxError::InvalidFuncName {
                raw: Some("a$b".to_string()),
            }
            .message(),
            "invalid func name: \"a$b\""
        );
        assert_eq!(
            SyntaxError::BashFeature {
                feat: "arrays".into(),
                plural: true,
            }
            .message(),
            "arrays are a bash feature"
        );
        assert_eq!(
            SyntaxError::BashFeature {
                feat: "slicing".into(),
                plural: false,
            }
            .message(),
            "slicing is a bash feature"
        );
        assert_eq!(
            SyntaxError::NotArithmOp {
                val: "??".to_string(),
            }
            .message(),
            "not a valid arithmetic operator: ??"
        );
    }

    #[test]
    fn display_with_and_without_name() {
        let error = Error {
            name: "script.sh".to_string(),
            pos: Pos::new(3),
            line: 1,
            col: 3,
            cause: SyntaxError::MissingSeparator.into(),
        };
        assert_eq!(
            error.to_string(),
            "script.sh:1:3: statements must be separated by &, ; or a newline"
        );

        let error = Error {
            name: String::new(),
            ..error
        };
        assert_eq!(
            error.to_string(),
            "1:3: statements must be separated by &, ; or a newline"
        );
    }

    #[test]
    fn io_errors_are_never_equal() {
        let io = |msg: &str| ErrorCause::from(std::io::Error::other(msg.to_string()));
        assert_ne!(io("x"), io("x"));
        assert_eq!(
            ErrorCause::Syntax(SyntaxError::CasePatternSep),
            ErrorCause::Syntax(SyntaxError::CasePatternSep),
        );
    }
}
