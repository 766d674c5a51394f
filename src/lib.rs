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

//! Shell language syntax, parser and printer.
//!
//! This crate parses POSIX shell and Bash source into an abstract syntax
//! tree and prints trees back as canonical shell source. The [`syntax`]
//! module defines the tree types, each carrying its byte
//! [positions](source::Pos) in the original source.
//!
//! Parsing starts from a [`parser::Config`], which selects the language
//! [variant](parser::Variant) and whether comments are kept:
//!
//! ```
//! # use sh_syntax::{parser, printer, syntax::NodeRef};
//! let file = parser::Config::new()
//!     .parse_str("ex.sh", "for f in *.c; do cc \"$f\"; done")
//!     .unwrap();
//! let out = printer::Config::new()
//!     .print_to_string(NodeRef::File(&file))
//!     .unwrap();
//! assert_eq!(out, "for f in *.c; do cc \"$f\"; done\n");
//! ```
//!
//! For quick one-offs, most tree types also implement
//! [`FromStr`](std::str::FromStr) and [`Display`](std::fmt::Display):
//!
//! ```
//! # use sh_syntax::syntax::File;
//! let file: File = "echo $((1+2))".parse().unwrap();
//! assert_eq!(file.to_string(), "echo $((1 + 2))\n");
//! ```
//!
//! The [`input`] module feeds the parser from arbitrary byte streams, and
//! [`syntax::walk`] traverses parsed trees in source order.

pub mod input;
pub mod parser;
pub mod printer;
pub mod source;
pub mod syntax;
