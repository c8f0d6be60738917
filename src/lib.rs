//! Converts regular expression trees into equivalent nondeterministic finite
//! automata whose transitions only ever consume real alphabet symbols: the
//! construction produces no epsilon edges, so no separate
//! epsilon-elimination pass exists or is needed.
//!
//! The crate exposes two value types and one operation: [`Regex`], the
//! six-variant expression tree; [`Nfa`], the automaton; and [`convert`],
//! the recursive bottom-up construction. Parsing textual expressions into
//! [`Regex`] values is out of scope and left to the caller.
//!
//! ```
//! use std::rc::Rc;
//! use regexp_nfa::{convert, Regex};
//!
//! // a*b
//! let regex = Regex::Concatenation(
//!     Rc::new(Regex::Iteration(Rc::new(Regex::Symbol('a')))),
//!     Rc::new(Regex::Symbol('b')),
//! );
//!
//! let nfa = convert(&regex);
//! assert!(nfa.accepts("aab".chars()));
//! assert!(!nfa.accepts("ba".chars()));
//! ```

mod convert;
mod nfa;
mod regex;

#[cfg(feature = "dot")]
mod dot;

pub use convert::convert;
pub use nfa::{Nfa, StateId};
pub use regex::Regex;
