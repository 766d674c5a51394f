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

//! Lexical analyzer
//!
//! The [`Lexer`] is the character-level machine underneath the
//! [parser](super): it owns the byte source, validates UTF-8, tracks byte
//! positions and the line table, and strips escaped newlines when the
//! surrounding context calls for it. Token recognition is context
//! sensitive, so it is driven by the parser, which knows which lexer mode
//! is active.

mod core;

pub(crate) mod heredoc;
mod keyword;
mod op;

pub use self::core::Lexer;
pub use self::core::is_blank;
pub use self::keyword::Keyword;
pub use self::keyword::ParseKeywordError;
pub use self::op::Operator;
pub use self::op::is_operator_start;

pub(crate) use self::op::lex_operator;
