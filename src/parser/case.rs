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

//! Parsing of the case conditional construct

use super::core::{Parser, Stops, Tok};
use super::error::{Result, SyntaxError};
use super::lex::Operator;
use super::word::WordMode;
use crate::syntax::{CaseClause, CaseItem, CaseOp};

impl Parser<'_> {
    /// Parses a `case` clause; the keyword is current.
    pub(crate) fn case_clause(&mut self) -> Result<CaseClause> {
        let case_pos = self.take_keyword()?;
        if self.tok != Tok::Word {
            return Err(self.err(
                case_pos,
                SyntaxError::MustFollowKw {
                    left: "case".into(),
                    right: "a word".into(),
                },
            ));
        }
        let word = self.word(WordMode::Default)?;
        self.next_token()?;
        self.skip_newlines()?;
        if self.tok != Tok::Word || self.peek_lit()?.as_deref() != Some("in") {
            return Err(self.err(
                case_pos,
                SyntaxError::MustFollowKw {
                    left: format!("case {word}").into(),
                    right: "\"in\"".into(),
                },
            ));
        }
        self.take_keyword()?; // in

        let mut items = Vec::new();
        let esac_pos = loop {
            self.skip_newlines()?;
            if self.tok == Tok::Word && self.peek_lit()?.as_deref() == Some("esac") {
                break self.take_keyword()?;
            }
            match self.tok {
                Tok::Eof => {
                    return Err(self.err(
                        case_pos,
                        SyntaxError::StmtMustEnd {
                            kw: "case",
                            end: "esac",
                        },
                    ));
                }
                _ => items.push(self.case_item()?),
            }
        };
        Ok(CaseClause {
            case_pos,
            esac_pos,
            word,
            items,
        })
    }

    fn case_item(&mut self) -> Result<CaseItem> {
        if self.tok == Tok::Op(Operator::OpenParen) {
            self.next_token()?;
        }
        let mut patterns = Vec::new();
        loop {
            if self.tok != Tok::Word {
                return Err(self.err(
                    self.pos,
                    SyntaxError::MustFollowKw {
                        left: "case".into(),
                        right: "a pattern".into(),
                    },
                ));
            }
            patterns.push(self.word(WordMode::Default)?);
            self.next_token()?;
            match self.tok {
                Tok::Op(Operator::Or) => self.next_token()?,
                Tok::Op(Operator::CloseParen) => {
                    self.next_token()?;
                    break;
                }
                _ => {
                    return Err(self.err(self.pos, SyntaxError::CasePatternSep));
                }
            }
        }

        let stmts = self.stmt_list(Stops::CASE_ITEM)?;

        let (op, op_pos) = if let Tok::Op(op) = self.tok
            && let Some(case_op) = op.case_op()
        {
            let op_pos = self.pos;
            if case_op != CaseOp::DblSemicolon {
                self.bash_feature(op_pos, op.as_str(), false)?;
            }
            self.next_token()?;
            (case_op, op_pos)
        } else if self.tok == Tok::Word && self.peek_lit()?.as_deref() == Some("esac") {
            // A final pattern list may omit the terminator; the parser
            // synthesizes `;;` at the `esac`.
            (CaseOp::DblSemicolon, self.pos)
        } else if self.tok == Tok::Eof {
            return Err(self.err(
                self.pos,
                SyntaxError::StmtMustEnd {
                    kw: "case",
                    end: "esac",
                },
            ));
        } else {
            (CaseOp::DblSemicolon, self.pos)
        };
        Ok(CaseItem {
            op,
            op_pos,
            patterns,
            stmts,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{Config, Variant};
    use crate::source::Pos;
    use crate::syntax::{CaseOp, Command, Node};

    fn case_clause(code: &str) -> crate::syntax::CaseClause {
        let file = Config::new().parse_str("", code).unwrap();
        let Some(Command::Case(clause)) = &file.stmts[0].cmd else {
            panic!("expected case: {:?}", file.stmts[0].cmd);
        };
        clause.clone()
    }

    #[test]
    fn basic_items() {
        let clause = case_clause("case $x in\na) one;;\nb|c) two;;\nesac");
        assert_eq!(clause.items.len(), 2);
        assert_eq!(clause.items[0].patterns.len(), 1);
        assert_eq!(clause.items[0].op, CaseOp::DblSemicolon);
        assert_eq!(clause.items[1].patterns.len(), 2);
        assert_eq!(clause.case_pos, Pos::new(1));
        assert_eq!(clause.end(), Pos::new(36));
    }

    #[test]
    fn open_paren_patterns() {
        let clause = case_clause("case x in (a) one;; (b) two;; esac");
        assert_eq!(clause.items.len(), 2);
    }

    #[test]
    fn empty_case() {
        let clause = case_clause("case x in esac");
        assert!(clause.items.is_empty());
        assert_eq!(clause.esac_pos, Pos::new(11));
    }

    #[test]
    fn last_item_without_terminator() {
        let clause = case_clause("case x in\na) one;;\nb) two\nesac");
        assert_eq!(clause.items.len(), 2);
        let last = &clause.items[1];
        assert_eq!(last.op, CaseOp::DblSemicolon);
        // Synthesized at the esac.
        assert_eq!(last.op_pos, clause.esac_pos);
    }

    #[test]
    fn fallthrough_terminators() {
        let clause = case_clause("case x in\na) one;&\nb) two;;&\nc) three;;\nesac");
        assert_eq!(clause.items[0].op, CaseOp::SemiFall);
        assert_eq!(clause.items[1].op, CaseOp::DblSemiFall);
        assert_eq!(clause.items[2].op, CaseOp::DblSemicolon);
    }

    #[test]
    fn fallthrough_is_gated() {
        let e = Config::new()
            .variant(Variant::Posix)
            .parse_str("", "case x in a) b;& esac")
            .unwrap_err();
        assert_eq!(e.to_string(), "1:15: ;& is a bash feature");
    }

    #[test]
    fn empty_item_bodies() {
        let clause = case_clause("case x in a) ;; b) ;; esac");
        assert_eq!(clause.items.len(), 2);
        assert!(clause.items[0].stmts.is_empty());
    }

    #[test]
    fn patterns_need_bars() {
        let e = Config::new().parse_str("", "case i in 3&) foo;").unwrap_err();
        assert_eq!(e.to_string(), "1:12: case patterns must be separated with |");
    }

    #[test]
    fn missing_esac() {
        let e = Config::new().parse_str("", "case x in a) b;;").unwrap_err();
        assert_eq!(e.to_string(), "1:1: case statement must end with \"esac\"");
    }

    #[test]
    fn missing_in() {
        let e = Config::new().parse_str("", "case x\nfoo").unwrap_err();
        assert_eq!(e.to_string(), "1:1: \"case x\" must be followed by \"in\"");
    }
}
