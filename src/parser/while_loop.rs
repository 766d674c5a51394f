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

//! Parsing of while and until loops

use super::core::{Parser, Stops};
use super::error::{Result, SyntaxError};
use super::lex::Keyword;
use crate::syntax::WhileClause;

impl Parser<'_> {
    /// Parses a `while` or `until` clause; the keyword is current.
    pub(crate) fn while_clause(&mut self) -> Result<WhileClause> {
        let until = self.peek_keyword()? == Some(Keyword::Until);
        let kw = if until { "until" } else { "while" };
        let while_pos = self.take_keyword()?;
        let cond = self.clause_cond(while_pos, kw)?;
        let do_pos = self.take_keyword()?;
        let do_stmts = self.clause_body("do", do_pos, Stops::keywords(&[Keyword::Done]))?;
        if self.peek_keyword()? != Some(Keyword::Done) {
            return Err(self.err(
                while_pos,
                SyntaxError::StmtMustEnd { kw, end: "done" },
            ));
        }
        let done_pos = self.take_keyword()?;
        Ok(WhileClause {
            while_pos,
            do_pos,
            done_pos,
            until,
            cond,
            do_stmts,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::Config;
    use crate::source::Pos;
    use crate::syntax::{Command, Node};

    fn while_clause(code: &str) -> crate::syntax::WhileClause {
        let file = Config::new().parse_str("", code).unwrap();
        let Some(Command::While(clause)) = &file.stmts[0].cmd else {
            panic!("expected while: {:?}", file.stmts[0].cmd);
        };
        clause.clone()
    }

    #[test]
    fn while_loop() {
        let clause = while_clause("while a; do b; c; done");
        assert!(!clause.until);
        assert_eq!(clause.cond.len(), 1);
        assert_eq!(clause.do_stmts.len(), 2);
        assert_eq!(clause.while_pos, Pos::new(1));
        assert_eq!(clause.done_pos, Pos::new(19));
        assert_eq!(clause.end(), Pos::new(23));
    }

    #[test]
    fn until_loop() {
        let clause = while_clause("until a\ndo\n\tb\ndone");
        assert!(clause.until);
        assert_eq!(clause.do_stmts.len(), 1);
    }

    #[test]
    fn missing_do() {
        let e = Config::new().parse_str("", "while a;").unwrap_err();
        assert_eq!(e.to_string(), "1:1: \"while <cond>\" must be followed by \"do\"");
    }

    #[test]
    fn missing_done() {
        let e = Config::new().parse_str("", "until a; do b;").unwrap_err();
        assert_eq!(e.to_string(), "1:1: until statement must end with \"done\"");
    }

    #[test]
    fn empty_condition() {
        let e = Config::new().parse_str("", "while do b; done").unwrap_err();
        assert_eq!(e.to_string(), "1:1: \"while\" must be followed by a statement list");
    }
}
