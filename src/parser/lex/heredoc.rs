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

//! Here-document body collection
//!
//! A heredoc operator queues a [`PendingHeredoc`]; the queued bodies are
//! read in operator order when the next newline token is consumed. Each
//! body runs line by line until a line equals the delimiter, with tabs
//! stripped first for `<<-`. A quoted delimiter makes the body fully
//! literal; otherwise `$`, backquotes and backslash escapes are live.

use crate::parser::core::Parser;
use crate::parser::error::{Result, SyntaxError};
use crate::parser::word::WordMode;
use crate::source::Pos;
use crate::syntax::{Lit, Word, WordPart};
use std::cell::OnceCell;
use std::rc::Rc;

/// Heredoc operator whose body has not been read yet
#[derive(Debug)]
pub(crate) struct PendingHeredoc {
    /// Cell of the owning [`Redir`](crate::syntax::Redir) to fill
    pub cell: Rc<OnceCell<Word>>,
    /// Unquoted delimiter to look for
    pub delim: String,
    /// Whether any part of the delimiter was quoted, making the body
    /// literal
    pub quoted: bool,
    /// Whether the operator was `<<-`
    pub strip_tabs: bool,
    /// Position of the operator, for error reporting
    pub op_pos: Pos,
}

/// Literal accumulator carrying its positions
#[derive(Default)]
struct LitAcc {
    pos: Pos,
    end: Pos,
    value: String,
}

impl LitAcc {
    fn push(&mut self, p: &mut Parser<'_>, c: char) {
        if self.value.is_empty() {
            self.pos = p.lexer.pos();
        }
        p.lexer.bump();
        self.end = p.lexer.pos();
        self.value.push(c);
    }

    fn flush(&mut self, parts: &mut Vec<WordPart>) {
        if !self.value.is_empty() {
            parts.push(WordPart::Lit(Lit {
                pos: self.pos,
                end: self.end,
                value: std::mem::take(&mut self.value),
            }));
        }
    }
}

impl Parser<'_> {
    /// Reads the bodies of all queued heredocs, in source order.
    pub(crate) fn collect_pending_heredocs(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.pending_hdocs);
        for h in pending {
            let body = self.heredoc_body(&h)?;
            h.cell.set(body).expect("a heredoc body is read only once");
        }
        Ok(())
    }

    fn heredoc_body(&mut self, h: &PendingHeredoc) -> Result<Word> {
        let prev = self.lexer.set_line_continuation(false);
        let result = self.heredoc_body_lines(h);
        self.lexer.set_line_continuation(prev);
        result
    }

    fn heredoc_body_lines(&mut self, h: &PendingHeredoc) -> Result<Word> {
        let mut parts = Vec::new();
        let mut acc = LitAcc::default();
        loop {
            if self.lexer.peek()?.is_none() {
                return Err(self.err(
                    h.op_pos,
                    SyntaxError::UnclosedHdoc {
                        delim: h.delim.clone(),
                    },
                ));
            }
            let line = self.lexer.peek_rest_of_line()?;
            let check = if h.strip_tabs {
                line.trim_start_matches('\t')
            } else {
                line.as_str()
            };
            if check == h.delim {
                for _ in line.chars() {
                    self.lexer.peek()?;
                    self.lexer.bump();
                }
                self.lexer.skip_char('\n')?;
                break;
            }
            if h.strip_tabs {
                while self.lexer.skip_char('\t')? {}
            }
            if h.quoted {
                self.heredoc_literal_line(&mut acc)?;
            } else {
                self.heredoc_line(&mut parts, &mut acc)?;
            }
        }
        acc.flush(&mut parts);
        Ok(Word { parts })
    }

    /// Consumes one fully-literal body line, newline included.
    fn heredoc_literal_line(&mut self, acc: &mut LitAcc) -> Result<()> {
        while let Some(c) = self.lexer.peek()? {
            acc.push(self, c);
            if c == '\n' {
                break;
            }
        }
        Ok(())
    }

    /// Consumes one body line with expansions, newline included.
    ///
    /// A backslash-newline keeps the logical line going, so the following
    /// physical line is not checked against the delimiter, matching how
    /// shells treat continuations in heredoc bodies.
    fn heredoc_line(&mut self, parts: &mut Vec<WordPart>, acc: &mut LitAcc) -> Result<()> {
        loop {
            let Some(c) = self.lexer.peek()? else {
                return Ok(());
            };
            match c {
                '\n' => {
                    acc.push(self, '\n');
                    return Ok(());
                }
                '$' => {
                    acc.flush(parts);
                    parts.push(self.expand_in_body(|p| p.dollar(WordMode::HdocBody))?);
                }
                '`' => {
                    acc.flush(parts);
                    parts.push(self.expand_in_body(Parser::backquote_subst)?);
                }
                '\\' => {
                    acc.push(self, '\\');
                    if let Some(next) = self.lexer.peek()? {
                        acc.push(self, next);
                    }
                }
                _ => acc.push(self, c),
            }
        }
    }

    /// Runs an expansion parser with escaped newlines re-enabled.
    fn expand_in_body<F>(&mut self, f: F) -> Result<WordPart>
    where
        F: FnOnce(&mut Self) -> Result<WordPart>,
    {
        let prev = self.lexer.set_line_continuation(true);
        let result = f(self);
        self.lexer.set_line_continuation(prev);
        result
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::Config;
    use crate::syntax::{Command, Node, RedirOp, WordPart};
    use assert_matches::assert_matches;

    fn heredoc_body(code: &str) -> crate::syntax::Word {
        let file = Config::new().parse_str("", code).unwrap();
        let redir = &file.stmts[0].redirs[0];
        redir.hdoc.get().expect("heredoc body should be read").clone()
    }

    #[test]
    fn empty_body() {
        let body = heredoc_body("cat <<EOF\nEOF\n");
        assert!(body.parts.is_empty());
    }

    #[test]
    fn literal_lines() {
        let body = heredoc_body("cat <<EOF\nfoo\nbar\nEOF\n");
        assert_matches!(&body.parts[..], [WordPart::Lit(lit)] => {
            assert_eq!(lit.value, "foo\nbar\n");
            assert_eq!(lit.pos.offset(), 11);
            assert_eq!(lit.end.offset(), 19);
        });
    }

    #[test]
    fn delimiter_must_fill_the_line() {
        let body = heredoc_body("cat <<EOF\nnot EOF here\nEOF\n");
        assert_matches!(&body.parts[..], [WordPart::Lit(lit)] => {
            assert_eq!(lit.value, "not EOF here\n");
        });
    }

    #[test]
    fn expansions_in_body() {
        let body = heredoc_body("cat <<EOF\na $b $(c)\nEOF\n");
        assert_eq!(body.parts.len(), 5);
        assert_matches!(&body.parts[1], WordPart::ParamExp(p) => {
            assert_eq!(p.param.value, "b");
        });
        assert_matches!(&body.parts[3], WordPart::CmdSubst(_));
        assert_matches!(&body.parts[4], WordPart::Lit(lit) => {
            assert_eq!(lit.value, "\n");
        });
    }

    #[test]
    fn quoted_delimiter_suppresses_expansions() {
        let body = heredoc_body("cat <<'EOF'\na $b\nEOF\n");
        assert_matches!(&body.parts[..], [WordPart::Lit(lit)] => {
            assert_eq!(lit.value, "a $b\n");
        });
    }

    #[test]
    fn escapes_prevent_expansion() {
        let body = heredoc_body("cat <<EOF\na \\$b\nEOF\n");
        assert_matches!(&body.parts[..], [WordPart::Lit(lit)] => {
            assert_eq!(lit.value, "a \\$b\n");
        });
    }

    #[test]
    fn dash_heredoc_strips_tabs() {
        let file = Config::new()
            .parse_str("", "cat <<-EOF\n\t\tfoo\n\tEOF\n")
            .unwrap();
        let redir = &file.stmts[0].redirs[0];
        assert_eq!(redir.op, RedirOp::DashHdoc);
        let body = redir.hdoc.get().unwrap();
        assert_matches!(&body.parts[..], [WordPart::Lit(lit)] => {
            assert_eq!(lit.value, "foo\n");
        });
    }

    #[test]
    fn bodies_attach_in_source_order() {
        let file = Config::new()
            .parse_str("", "cat <<A <<B\none\nA\ntwo\nB\n")
            .unwrap();
        let redirs = &file.stmts[0].redirs;
        assert_eq!(redirs.len(), 2);
        let a = redirs[0].hdoc.get().unwrap();
        let b = redirs[1].hdoc.get().unwrap();
        assert_matches!(&a.parts[..], [WordPart::Lit(lit)] => assert_eq!(lit.value, "one\n"));
        assert_matches!(&b.parts[..], [WordPart::Lit(lit)] => assert_eq!(lit.value, "two\n"));
    }

    #[test]
    fn heredoc_inside_command_substitution() {
        let file = Config::new()
            .parse_str("", "echo $(cat <<EOF\ninner\nEOF\n) after")
            .unwrap();
        let Some(Command::Call(call)) = &file.stmts[0].cmd else {
            panic!();
        };
        assert_eq!(call.args.len(), 3);
        assert_matches!(&call.args[1].parts[..], [WordPart::CmdSubst(cs)] => {
            let body = cs.stmts[0].redirs[0].hdoc.get().unwrap();
            assert_matches!(&body.parts[..], [WordPart::Lit(lit)] => {
                assert_eq!(lit.value, "inner\n");
            });
        });
    }

    #[test]
    fn statement_continues_after_heredoc_word() {
        // The target word is on the operator line; the body starts at the
        // next newline.
        let file = Config::new().parse_str("", "foo <<EOF bar\nl1\nEOF\n").unwrap();
        let stmt = &file.stmts[0];
        let Some(Command::Call(call)) = &stmt.cmd else { panic!() };
        assert_eq!(call.args.len(), 2);
        assert_eq!(call.args[1].lit(), Some("bar"));
        let body = stmt.redirs[0].hdoc.get().unwrap();
        assert_eq!(body.pos().offset(), 15);
        assert_eq!(body.end().offset(), 18);
    }

    #[test]
    fn unclosed_heredoc() {
        let e = Config::new().parse_str("", "cat <<EOF\nbody\n").unwrap_err();
        assert_eq!(e.to_string(), "1:5: unclosed here-document 'EOF'");

        let e = Config::new().parse_str("", "cat <<EOF").unwrap_err();
        assert_eq!(e.to_string(), "1:5: unclosed here-document 'EOF'");
    }

    #[test]
    fn expansions_rejected_in_delimiters() {
        let e = Config::new().parse_str("", "cat <<$x\ny\n").unwrap_err();
        assert_eq!(e.to_string(), "1:7: expansions not allowed in heredoc words");
    }
}
