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

//! Traversal over syntax trees
//!
//! [`walk`] visits every node of a tree in source order. The visitor is
//! called with `Some(node)` before a node's children and with `None` after
//! the last child, signalling that the subtree is being left. Returning
//! `false` from the pre-visit skips the node's children (and the matching
//! leave call).
//!
//! ```
//! # use sh_syntax::syntax::{File, NodeRef, walk};
//! let file: File = "echo ${HOME}".parse().unwrap();
//! let mut words = 0;
//! walk(NodeRef::File(&file), &mut |node| {
//!     if let Some(NodeRef::Word(_)) = node {
//!         words += 1;
//!     }
//!     true
//! });
//! assert_eq!(words, 2);
//! ```

use super::*;

/// Borrowed reference to any syntax tree node
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'a> {
    File(&'a File),
    Comment(&'a Comment),
    Stmt(&'a Stmt),
    Assign(&'a Assign),
    Redir(&'a Redir),
    Word(&'a Word),
    WordPart(&'a WordPart),
    Lit(&'a Lit),
    Command(&'a Command),
    Elif(&'a Elif),
    CaseItem(&'a CaseItem),
    Loop(&'a Loop),
    ArithmExpr(&'a ArithmExpr),
    TestExpr(&'a TestExpr),
}

/// Walks the tree rooted at `node` in source order.
///
/// See the [module documentation](self) for the visiting protocol.
pub fn walk<'a, F>(node: NodeRef<'a>, visit: &mut F)
where
    F: FnMut(Option<NodeRef<'a>>) -> bool,
{
    if !visit(Some(node)) {
        return;
    }
    match node {
        NodeRef::File(file) => {
            walk_stmts(&file.stmts, visit);
            for comment in &file.comments {
                walk(NodeRef::Comment(comment), visit);
            }
        }
        NodeRef::Comment(_) | NodeRef::Lit(_) => {}
        NodeRef::Stmt(stmt) => {
            for assign in &stmt.assigns {
                walk(NodeRef::Assign(assign), visit);
            }
            if let Some(cmd) = &stmt.cmd {
                walk(NodeRef::Command(cmd), visit);
            }
            for redir in &stmt.redirs {
                walk(NodeRef::Redir(redir), visit);
            }
        }
        NodeRef::Assign(assign) => {
            walk(NodeRef::Lit(&assign.name), visit);
            if let Some(index) = &assign.index {
                walk(NodeRef::ArithmExpr(index), visit);
            }
            if let Some(value) = &assign.value {
                walk(NodeRef::Word(value), visit);
            }
            if let Some(array) = &assign.array {
                for elem in &array.elems {
                    walk(NodeRef::Word(elem), visit);
                }
            }
        }
        NodeRef::Redir(redir) => {
            if let Some(n) = &redir.n {
                walk(NodeRef::Lit(n), visit);
            }
            walk(NodeRef::Word(&redir.word), visit);
            if let Some(body) = redir.hdoc.get() {
                walk(NodeRef::Word(body), visit);
            }
        }
        NodeRef::Word(word) => {
            for part in &word.parts {
                walk(NodeRef::WordPart(part), visit);
            }
        }
        NodeRef::WordPart(part) => walk_word_part(part, visit),
        NodeRef::Command(cmd) => walk_command(cmd, visit),
        NodeRef::Elif(elif) => {
            walk_stmts(&elif.cond, visit);
            walk_stmts(&elif.then_stmts, visit);
        }
        NodeRef::CaseItem(item) => {
            for pattern in &item.patterns {
                walk(NodeRef::Word(pattern), visit);
            }
            walk_stmts(&item.stmts, visit);
        }
        NodeRef::Loop(head) => match head {
            Loop::WordIter(iter) => {
                walk(NodeRef::Lit(&iter.name), visit);
                for item in &iter.items {
                    walk(NodeRef::Word(item), visit);
                }
            }
            Loop::CStyle(c) => {
                for expr in [&c.init, &c.cond, &c.post].into_iter().flatten() {
                    walk(NodeRef::ArithmExpr(expr), visit);
                }
            }
        },
        NodeRef::ArithmExpr(expr) => match expr {
            ArithmExpr::Word(word) => walk(NodeRef::Word(word), visit),
            ArithmExpr::Binary(binary) => {
                walk(NodeRef::ArithmExpr(&binary.x), visit);
                walk(NodeRef::ArithmExpr(&binary.y), visit);
            }
            ArithmExpr::Unary(unary) => walk(NodeRef::ArithmExpr(&unary.x), visit),
            ArithmExpr::Paren(paren) => walk(NodeRef::ArithmExpr(&paren.x), visit),
        },
        NodeRef::TestExpr(expr) => match expr {
            TestExpr::Word(word) => walk(NodeRef::Word(word), visit),
            TestExpr::Binary(binary) => {
                walk(NodeRef::TestExpr(&binary.x), visit);
                walk(NodeRef::TestExpr(&binary.y), visit);
            }
            TestExpr::Unary(unary) => walk(NodeRef::TestExpr(&unary.x), visit),
            TestExpr::Paren(paren) => walk(NodeRef::TestExpr(&paren.x), visit),
        },
    }
    visit(None);
}

fn walk_stmts<'a, F>(stmts: &'a [Stmt], visit: &mut F)
where
    F: FnMut(Option<NodeRef<'a>>) -> bool,
{
    for stmt in stmts {
        walk(NodeRef::Stmt(stmt), visit);
    }
}

fn walk_word_part<'a, F>(part: &'a WordPart, visit: &mut F)
where
    F: FnMut(Option<NodeRef<'a>>) -> bool,
{
    match part {
        WordPart::Lit(_) | WordPart::SglQuoted(_) => {}
        WordPart::DblQuoted(dq) => {
            for part in &dq.parts {
                walk(NodeRef::WordPart(part), visit);
            }
        }
        WordPart::ParamExp(exp) => {
            walk(NodeRef::Lit(&exp.param), visit);
            if let Some(index) = &exp.index {
                walk(NodeRef::ArithmExpr(index), visit);
            }
            if let Some(slice) = &exp.slice {
                walk(NodeRef::ArithmExpr(&slice.offset), visit);
                if let Some(length) = &slice.length {
                    walk(NodeRef::ArithmExpr(length), visit);
                }
            }
            if let Some(repl) = &exp.repl {
                walk(NodeRef::Word(&repl.orig), visit);
                if let Some(with) = &repl.with {
                    walk(NodeRef::Word(with), visit);
                }
            }
            if let Some(exp) = &exp.exp {
                walk(NodeRef::Word(&exp.word), visit);
            }
        }
        WordPart::CmdSubst(subst) => walk_stmts(&subst.stmts, visit),
        WordPart::ArithmExp(exp) => {
            if let Some(expr) = &exp.expr {
                walk(NodeRef::ArithmExpr(expr), visit);
            }
        }
        WordPart::ProcSubst(subst) => walk_stmts(&subst.stmts, visit),
        WordPart::ExtGlob(glob) => walk(NodeRef::Lit(&glob.pattern), visit),
    }
}

fn walk_command<'a, F>(cmd: &'a Command, visit: &mut F)
where
    F: FnMut(Option<NodeRef<'a>>) -> bool,
{
    match cmd {
        Command::Call(call) => {
            for arg in &call.args {
                walk(NodeRef::Word(arg), visit);
            }
        }
        Command::Block(block) => walk_stmts(&block.stmts, visit),
        Command::Subshell(subshell) => walk_stmts(&subshell.stmts, visit),
        Command::If(clause) => {
            walk_stmts(&clause.cond, visit);
            walk_stmts(&clause.then_stmts, visit);
            for elif in &clause.elifs {
                walk(NodeRef::Elif(elif), visit);
            }
            walk_stmts(&clause.else_stmts, visit);
        }
        Command::While(clause) => {
            walk_stmts(&clause.cond, visit);
            walk_stmts(&clause.do_stmts, visit);
        }
        Command::For(clause) => {
            walk(NodeRef::Loop(&clause.r#loop), visit);
            walk_stmts(&clause.do_stmts, visit);
        }
        Command::Case(clause) => {
            walk(NodeRef::Word(&clause.word), visit);
            for item in &clause.items {
                walk(NodeRef::CaseItem(item), visit);
            }
        }
        Command::Test(clause) => walk(NodeRef::TestExpr(&clause.x), visit),
        Command::Arithm(cmd) => {
            if let Some(expr) = &cmd.expr {
                walk(NodeRef::ArithmExpr(expr), visit);
            }
        }
        Command::Binary(binary) => {
            walk(NodeRef::Stmt(&binary.x), visit);
            walk(NodeRef::Stmt(&binary.y), visit);
        }
        Command::FuncDecl(decl) => {
            walk(NodeRef::Lit(&decl.name), visit);
            walk(NodeRef::Stmt(&decl.body), visit);
        }
        Command::Decl(decl) => {
            walk(NodeRef::Lit(&decl.variant), visit);
            for opt in &decl.opts {
                walk(NodeRef::Word(opt), visit);
            }
            for assign in &decl.assigns {
                walk(NodeRef::Assign(assign), visit);
            }
        }
        Command::Eval(eval) => {
            if let Some(stmt) = &eval.stmt {
                walk(NodeRef::Stmt(stmt), visit);
            }
        }
        Command::Coproc(coproc) => {
            if let Some(name) = &coproc.name {
                walk(NodeRef::Lit(name), visit);
            }
            walk(NodeRef::Stmt(&coproc.stmt), visit);
        }
        Command::Let(clause) => {
            for expr in &clause.exprs {
                walk(NodeRef::ArithmExpr(expr), visit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Pos;
    use std::cell::OnceCell;
    use std::rc::Rc;

    fn lit_word(value: &str) -> Word {
        Word {
            parts: vec![WordPart::Lit(Lit::from_value(value))],
        }
    }

    fn call_stmt(args: &[&str]) -> Stmt {
        Stmt {
            cmd: Some(Command::Call(CallExpr {
                args: args.iter().map(|a| lit_word(a)).collect(),
            })),
            ..Stmt::default()
        }
    }

    #[test]
    fn walk_visits_in_source_order() {
        let file = File {
            stmts: vec![call_stmt(&["echo", "hi"])],
            ..File::default()
        };

        let mut events = Vec::new();
        walk(NodeRef::File(&file), &mut |node| {
            events.push(match node {
                Some(NodeRef::File(_)) => "file",
                Some(NodeRef::Stmt(_)) => "stmt",
                Some(NodeRef::Command(_)) => "command",
                Some(NodeRef::Word(_)) => "word",
                Some(NodeRef::WordPart(_)) => "part",
                Some(_) => "other",
                None => "leave",
            });
            true
        });
        assert_eq!(
            events,
            [
                "file", "stmt", "command", "word", "part", "leave", "leave", "word", "part",
                "leave", "leave", "leave", "leave", "leave",
            ]
        );
    }

    #[test]
    fn walk_skips_subtree_when_pre_visit_returns_false() {
        let file = File {
            stmts: vec![call_stmt(&["echo", "hi"])],
            ..File::default()
        };

        let mut words = 0;
        let mut leaves = 0;
        walk(NodeRef::File(&file), &mut |node| {
            match node {
                Some(NodeRef::Word(_)) => words += 1,
                Some(NodeRef::Stmt(_)) => return false,
                None => leaves += 1,
                _ => {}
            }
            true
        });
        assert_eq!(words, 0);
        // Only the file itself is left.
        assert_eq!(leaves, 1);
    }

    #[test]
    fn walk_heredoc_body_only_when_filled() {
        let redir = Redir {
            op_pos: Pos::new(5),
            op: RedirOp::Hdoc,
            n: None,
            word: lit_word("EOF"),
            hdoc: Rc::new(OnceCell::new()),
        };
        let stmt = Stmt {
            redirs: vec![redir],
            ..Stmt::default()
        };

        let count_words = |stmt: &Stmt| {
            let mut words = 0;
            walk(NodeRef::Stmt(stmt), &mut |node| {
                if let Some(NodeRef::Word(_)) = node {
                    words += 1;
                }
                true
            });
            words
        };
        assert_eq!(count_words(&stmt), 1);

        stmt.redirs[0].hdoc.set(lit_word("body\n")).unwrap();
        assert_eq!(count_words(&stmt), 2);
    }
}
