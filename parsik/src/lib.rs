//! A packrat parsing engine for Parsing Expression Grammars.
//!
//! A grammar is a [`RuleTable`] mapping rule names to [`Expression`]s. Parsing
//! evaluates the start rule against the input with ordered choice, greedy
//! repetition and zero-width predicates, memoizing every rule outcome per
//! position so each (rule, position) pair is evaluated at most once.
//!
//! ```
//! use parsik::{CharClass, Expression, ParseResult, RuleTable};
//!
//! let table = RuleTable::new()
//!     .rule("Number", Expression::one_or_more(Expression::class(CharClass::digit())))
//!     .unwrap();
//!
//! match parsik::parse(&table, "Number", "123").unwrap() {
//!     ParseResult::Complete(tree) => assert_eq!(tree.end, 3),
//!     other => panic!("{:?}", other),
//! }
//! ```
//!
//! Rules must not be left recursive; see [`RuleTable`].

mod check;
pub mod cursor;
pub mod engine;
mod error;
mod expr;
mod memo;
mod options;
mod outcome;
mod parser;
mod rules;
mod tree;
mod utils;

pub use check::{GrammarReport, UndefinedReference};
pub use cursor::{Cursor, Input};
pub use engine::{match_expression, Session};
pub use error::{GrammarError, ParseError};
pub use expr::{CharClass, Expression, Pattern};
pub use memo::MemoCache;
pub use options::{ParseOptions, DEFAULT_MAX_DEPTH};
pub use outcome::{Failure, MatchOutcome, ParseResult};
pub use parser::{parse, Parser};
pub use rules::{Definition, RuleTable};
pub use tree::{Label, Node};
