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

//! Syntax parser for the shell language.
//!
//! Parsing starts from a [`Config`], which selects the language
//! [`Variant`] and whether comments are kept, and is then given a byte
//! source:
//!
//! ```
//! # use sh_syntax::parser::{Config, Variant};
//! let file = Config::new()
//!     .variant(Variant::Posix)
//!     .keep_comments(true)
//!     .parse_str("hello.sh", "echo hello # greet\n")
//!     .unwrap();
//! assert_eq!(file.stmts.len(), 1);
//! assert_eq!(file.comments[0].text, " greet");
//! ```
//!
//! The parser is a single-pass recursive-descent consumer of the
//! [lexer](lex::Lexer); it stops at the first error and returns it as an
//! [`Error`] rendering as `name:line:col: message`.

mod core;
mod error;
mod from_str;

mod arith;
mod braced_param;
mod case;
mod command;
mod for_loop;
mod function;
mod grouping;
mod r#if;
mod redir;
mod simple_command;
mod test_clause;
mod while_loop;
mod word;

pub mod lex;

pub use self::core::Config;
pub use self::core::Parser;
pub use self::core::Variant;
pub use self::error::Error;
pub use self::error::ErrorCause;
pub use self::error::Result;
pub use self::error::SyntaxError;
