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

//! Part of the lexer that parses operators.

use super::core::Lexer;
use crate::parser::error::Result;
use crate::syntax::{BinCmdOp, CaseOp, RedirOp};
use std::fmt;

/// Operator token identifier
///
/// These are the control and redirection operators that delimit words at
/// the statement level. Expansion openers such as `${` are not tokens;
/// they are recognized inside words.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operator {
    /// `&`
    And,
    /// `&&`
    AndAnd,
    /// `&>`
    AndGreat,
    /// `&>>`
    AndDblGreat,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `;`
    Semicolon,
    /// `;;`
    DblSemicolon,
    /// `;&`
    SemiAnd,
    /// `;;&`
    DblSemiAnd,
    /// `<`
    Less,
    /// `<&`
    LessAnd,
    /// `<(`
    LessParen,
    /// `<<`
    DblLess,
    /// `<<-`
    DashDblLess,
    /// `<<<`
    TripleLess,
    /// `<>`
    LessGreat,
    /// `>`
    Great,
    /// `>&`
    GreatAnd,
    /// `>(`
    GreatParen,
    /// `>>`
    DblGreat,
    /// `>|`
    GreatOr,
    /// `|`
    Or,
    /// `|&`
    OrAnd,
    /// `||`
    OrOr,
}

impl Operator {
    /// Literal spelling of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        use Operator::*;
        match self {
            And => "&",
            AndAnd => "&&",
            AndGreat => "&>",
            AndDblGreat => "&>>",
            OpenParen => "(",
            CloseParen => ")",
            Semicolon => ";",
            DblSemicolon => ";;",
            SemiAnd => ";&",
            DblSemiAnd => ";;&",
            Less => "<",
            LessAnd => "<&",
            LessParen => "<(",
            DblLess => "<<",
            DashDblLess => "<<-",
            TripleLess => "<<<",
            LessGreat => "<>",
            Great => ">",
            GreatAnd => ">&",
            GreatParen => ">(",
            DblGreat => ">>",
            GreatOr => ">|",
            Or => "|",
            OrAnd => "|&",
            OrOr => "||",
        }
    }

    /// Converts the token to a redirection operator, if it is one.
    #[must_use]
    pub fn redir_op(self) -> Option<RedirOp> {
        use Operator::*;
        Some(match self {
            Less => RedirOp::In,
            Great => RedirOp::Out,
            DblGreat => RedirOp::Append,
            DblLess => RedirOp::Hdoc,
            DashDblLess => RedirOp::DashHdoc,
            TripleLess => RedirOp::WordHdoc,
            LessGreat => RedirOp::RdrInOut,
            LessAnd => RedirOp::DplIn,
            GreatAnd => RedirOp::DplOut,
            GreatOr => RedirOp::ClbOut,
            AndGreat => RedirOp::RdrAll,
            AndDblGreat => RedirOp::AppAll,
            _ => return None,
        })
    }

    /// Converts the token to a binary command operator, if it is one.
    #[must_use]
    pub fn bin_cmd_op(self) -> Option<BinCmdOp> {
        Some(match self {
            Operator::AndAnd => BinCmdOp::AndStmt,
            Operator::OrOr => BinCmdOp::OrStmt,
            Operator::Or => BinCmdOp::Pipe,
            Operator::OrAnd => BinCmdOp::PipeAll,
            _ => return None,
        })
    }

    /// Converts the token to a case item terminator, if it is one.
    #[must_use]
    pub fn case_op(self) -> Option<CaseOp> {
        Some(match self {
            Operator::DblSemicolon => CaseOp::DblSemicolon,
            Operator::SemiAnd => CaseOp::SemiFall,
            Operator::DblSemiAnd => CaseOp::DblSemiFall,
            _ => return None,
        })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true if the character can start an operator token.
#[must_use]
pub fn is_operator_start(c: char) -> bool {
    matches!(c, '&' | '(' | ')' | ';' | '<' | '>' | '|')
}

/// Trie data structure that defines the set of operator tokens.
///
/// A node is a sorted array of [`Edge`]s.
#[derive(Clone, Copy, Debug)]
struct Trie(&'static [Edge]);

/// Edge of a [`Trie`]
#[derive(Clone, Copy, Debug)]
struct Edge {
    /// Character value of this edge
    key: char,
    /// Operator delimited after taking this edge if nothing longer matches
    value: Option<Operator>,
    /// Whether the edge exists only outside the POSIX variant
    bash_only: bool,
    /// Sub-trie of longer operators sharing this prefix
    next: Trie,
}

impl Trie {
    fn edge(self, key: char) -> Option<&'static Edge> {
        self.0
            .binary_search_by_key(&key, |edge| edge.key)
            .ok()
            .map(|i| &self.0[i])
    }
}

const NONE: Trie = Trie(&[]);

/// Trie containing all the operators.
const OPERATORS: Trie = Trie(&[
    Edge {
        key: '&',
        value: Some(Operator::And),
        bash_only: false,
        next: AND,
    },
    Edge {
        key: '(',
        value: Some(Operator::OpenParen),
        bash_only: false,
        next: NONE,
    },
    Edge {
        key: ')',
        value: Some(Operator::CloseParen),
        bash_only: false,
        next: NONE,
    },
    Edge {
        key: ';',
        value: Some(Operator::Semicolon),
        bash_only: false,
        next: SEMICOLON,
    },
    Edge {
        key: '<',
        value: Some(Operator::Less),
        bash_only: false,
        next: LESS,
    },
    Edge {
        key: '>',
        value: Some(Operator::Great),
        bash_only: false,
        next: GREAT,
    },
    Edge {
        key: '|',
        value: Some(Operator::Or),
        bash_only: false,
        next: OR,
    },
]);

/// Operators that continue `&`.
///
/// `&>` redirects are Bash syntax; under POSIX `foo &>bar` keeps meaning
/// `foo &` followed by `>bar`, so the edge is variant-gated.
const AND: Trie = Trie(&[
    Edge {
        key: '&',
        value: Some(Operator::AndAnd),
        bash_only: false,
        next: NONE,
    },
    Edge {
        key: '>',
        value: Some(Operator::AndGreat),
        bash_only: true,
        next: AND_GREAT,
    },
]);

const AND_GREAT: Trie = Trie(&[Edge {
    key: '>',
    value: Some(Operator::AndDblGreat),
    bash_only: true,
    next: NONE,
}]);

/// Operators that continue `;`.
///
/// `;&` and `;;&` are lexed in every variant so that the parser can report
/// them as Bash features under POSIX.
const SEMICOLON: Trie = Trie(&[
    Edge {
        key: '&',
        value: Some(Operator::SemiAnd),
        bash_only: false,
        next: NONE,
    },
    Edge {
        key: ';',
        value: Some(Operator::DblSemicolon),
        bash_only: false,
        next: DBL_SEMICOLON,
    },
]);

const DBL_SEMICOLON: Trie = Trie(&[Edge {
    key: '&',
    value: Some(Operator::DblSemiAnd),
    bash_only: false,
    next: NONE,
}]);

/// Operators that continue `<`.
const LESS: Trie = Trie(&[
    Edge {
        key: '&',
        value: Some(Operator::LessAnd),
        bash_only: false,
        next: NONE,
    },
    Edge {
        key: '(',
        value: Some(Operator::LessParen),
        bash_only: false,
        next: NONE,
    },
    Edge {
        key: '<',
        value: Some(Operator::DblLess),
        bash_only: false,
        next: DBL_LESS,
    },
    Edge {
        key: '>',
        value: Some(Operator::LessGreat),
        bash_only: false,
        next: NONE,
    },
]);

const DBL_LESS: Trie = Trie(&[
    Edge {
        key: '-',
        value: Some(Operator::DashDblLess),
        bash_only: false,
        next: NONE,
    },
    Edge {
        key: '<',
        value: Some(Operator::TripleLess),
        bash_only: false,
        next: NONE,
    },
]);

/// Operators that continue `>`.
const GREAT: Trie = Trie(&[
    Edge {
        key: '&',
        value: Some(Operator::GreatAnd),
        bash_only: false,
        next: NONE,
    },
    Edge {
        key: '(',
        value: Some(Operator::GreatParen),
        bash_only: false,
        next: NONE,
    },
    Edge {
        key: '>',
        value: Some(Operator::DblGreat),
        bash_only: false,
        next: NONE,
    },
    Edge {
        key: '|',
        value: Some(Operator::GreatOr),
        bash_only: false,
        next: NONE,
    },
]);

/// Operators that continue `|`.
const OR: Trie = Trie(&[
    Edge {
        key: '&',
        value: Some(Operator::OrAnd),
        bash_only: false,
        next: NONE,
    },
    Edge {
        key: '|',
        value: Some(Operator::OrOr),
        bash_only: false,
        next: NONE,
    },
]);

/// Consumes the longest operator at the current position.
///
/// Returns `None` without consuming anything if no operator starts here.
/// `bash` enables the variant-gated edges.
pub(crate) fn lex_operator(lexer: &mut Lexer<'_>, bash: bool) -> Result<Option<Operator>> {
    let mut trie = OPERATORS;
    let mut result = None;
    loop {
        let Some(c) = lexer.peek()? else {
            return Ok(result);
        };
        let Some(edge) = trie.edge(c) else {
            return Ok(result);
        };
        if edge.bash_only && !bash {
            return Ok(result);
        }
        lexer.bump();
        debug_assert!(edge.value.is_some(), "every operator prefix is an operator");
        result = edge.value;
        trie = edge.next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Memory;

    fn lex_all(code: &str, bash: bool) -> Vec<Operator> {
        let mut lexer = Lexer::new(Box::new(Memory::new(code)), "");
        let mut ops = Vec::new();
        loop {
            match lex_operator(&mut lexer, bash).unwrap() {
                Some(op) => ops.push(op),
                None => {
                    if lexer.next_char().unwrap().is_none() {
                        return ops;
                    }
                }
            }
        }
    }

    #[test]
    fn longest_match_wins() {
        use Operator::*;
        assert_eq!(lex_all("<<-", true), [DashDblLess]);
        assert_eq!(lex_all("<<<", true), [TripleLess]);
        assert_eq!(lex_all(";;&", true), [DblSemiAnd]);
        assert_eq!(lex_all(";;x", true), [DblSemicolon]);
        assert_eq!(lex_all("a|&b", true), [OrAnd]);
        assert_eq!(lex_all("<>()", true), [LessGreat, OpenParen, CloseParen]);
    }

    #[test]
    fn and_great_is_gated_by_variant() {
        use Operator::*;
        assert_eq!(lex_all("&>>f", true), [AndDblGreat]);
        assert_eq!(lex_all("&>>f", false), [And, DblGreat]);
    }

    #[test]
    fn operator_after_line_continuation() {
        use Operator::*;
        assert_eq!(lex_all("<\\\n<", true), [DblLess]);
    }

    #[test]
    fn conversions() {
        assert_eq!(Operator::DashDblLess.redir_op(), Some(RedirOp::DashHdoc));
        assert_eq!(Operator::OrAnd.bin_cmd_op(), Some(BinCmdOp::PipeAll));
        assert_eq!(Operator::SemiAnd.case_op(), Some(CaseOp::SemiFall));
        assert_eq!(Operator::OpenParen.redir_op(), None);
        assert_eq!(Operator::Less.bin_cmd_op(), None);
    }

    #[test]
    fn display_matches_spelling() {
        assert_eq!(Operator::DblSemiAnd.to_string(), ";;&");
        assert_eq!(Operator::GreatOr.to_string(), ">|");
    }
}
