//! The nondeterministic finite automaton value type produced by the
//! conversion.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};

/// Identifier of an automaton state. Ids are handed out by the conversion's
/// threaded counter and are unique within one converted automaton.
pub type StateId = usize;

/// A nondeterministic finite automaton without epsilon transitions: every
/// transition consumes exactly one symbol of the alphabet.
///
/// Equality is structural. Two automata that accept the same language but
/// number their states differently, or distribute their nondeterminism
/// differently, compare unequal; no canonicalization is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa<S> {
    /// All states of the automaton.
    pub states: BTreeSet<StateId>,
    /// The symbols used by `transitions`.
    pub alphabet: BTreeSet<S>,
    /// Maps `(source, symbol)` to the set of destination states.
    pub transitions: BTreeMap<(StateId, S), BTreeSet<StateId>>,
    /// The unique initial state.
    pub initial: StateId,
    /// The accepting states. Empty for an automaton whose language is empty.
    pub finals: BTreeSet<StateId>,
}

impl<S: Clone + Ord> Nfa<S> {
    /// Runs the automaton over `input` by subset simulation and reports
    /// whether some path from the initial state to a final state consumes
    /// exactly the input.
    pub fn accepts(&self, input: impl IntoIterator<Item = S>) -> bool {
        let mut current = BTreeSet::from([self.initial]);
        for symbol in input {
            let mut next = BTreeSet::new();
            for &state in &current {
                if let Some(dsts) = self.transitions.get(&(state, symbol.clone())) {
                    next.extend(dsts.iter().copied());
                }
            }
            if next.is_empty() {
                return false;
            }
            current = next;
        }
        current.iter().any(|state| self.finals.contains(state))
    }

    /// Checks the structural invariants: the initial state, all final states
    /// and every transition endpoint are members of `states`, and every
    /// transition symbol is a member of `alphabet`.
    pub fn is_well_formed(&self) -> bool {
        self.states.contains(&self.initial)
            && self.finals.is_subset(&self.states)
            && self.transitions.iter().all(|((src, sym), dsts)| {
                self.states.contains(src)
                    && self.alphabet.contains(sym)
                    && dsts.is_subset(&self.states)
            })
    }
}

/// Renders the automaton as an ALT-style transition table: a header line with
/// the alphabet, then one row per state. `>` marks the initial state, `<`
/// marks final states, and each cell lists the destinations for one symbol
/// (`|`-separated, `-` when there are none).
impl<S: Display + Clone + Ord> Display for Nfa<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "NFA")?;
        for symbol in &self.alphabet {
            write!(f, " {symbol}")?;
        }
        writeln!(f)?;

        for &state in &self.states {
            let initial = if state == self.initial { '>' } else { ' ' };
            let accepting = if self.finals.contains(&state) { '<' } else { ' ' };
            write!(f, "{initial}{accepting}{state}")?;

            for symbol in &self.alphabet {
                match self.transitions.get(&(state, symbol.clone())) {
                    Some(dsts) => {
                        write!(f, " ")?;
                        for (i, dst) in dsts.iter().enumerate() {
                            if i > 0 {
                                write!(f, "|")?;
                            }
                            write!(f, "{dst}")?;
                        }
                    }
                    None => write!(f, " -")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
