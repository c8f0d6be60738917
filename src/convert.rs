//! The recursive construction of an epsilon-free NFA from a regular
//! expression.
//!
//! The construction never introduces epsilon edges. Where the textbook
//! Thompson construction would join two fragments with a fresh state and
//! epsilon transitions, this one unifies state identities instead: an
//! existing initial state takes over the role of its counterpart by having
//! the counterpart's edges duplicated onto it. The output therefore needs no
//! epsilon-elimination pass and no distinguished epsilon pseudo-symbol.

use std::collections::{BTreeMap, BTreeSet};

use log::trace;

use crate::nfa::{Nfa, StateId};
use crate::regex::Regex;

/// The source of fresh state ids, threaded by exclusive reference through
/// the whole traversal so sibling fragments never collide.
#[derive(Debug, Default)]
struct StateCounter {
    next: StateId,
}

impl StateCounter {
    fn fresh(&mut self) -> StateId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Converts a regular expression into an equivalent NFA.
///
/// State ids start at 0 and increase in the order fragments allocate them,
/// left subtree before right subtree. The result has exactly one initial
/// state; its final-state set is empty only for [`Regex::Empty`] subtrees
/// whose language contains no strings.
pub fn convert<S: Clone + Ord>(regex: &Regex<S>) -> Nfa<S> {
    let mut counter = StateCounter::default();
    let nfa = convert_node(regex, &mut counter);
    trace!(
        "conversion finished: {} states, {} transition keys, {} final states",
        nfa.states.len(),
        nfa.transitions.len(),
        nfa.finals.len()
    );
    nfa
}

/// Builds the fragment for one node, post-order: child fragments are complete
/// before the parent composes them.
fn convert_node<S: Clone + Ord>(regex: &Regex<S>, counter: &mut StateCounter) -> Nfa<S> {
    match regex {
        Regex::Alternation(l, r) => {
            let left = convert_node(l, counter);
            let right = convert_node(r, counter);
            alternation(left, right)
        }
        Regex::Concatenation(l, r) => {
            let left = convert_node(l, counter);
            let right = convert_node(r, counter);
            concatenation(left, right)
        }
        Regex::Iteration(node) => {
            let body = convert_node(node, counter);
            iteration(body, counter)
        }
        Regex::Symbol(s) => {
            let p = counter.fresh();
            let q = counter.fresh();
            Nfa {
                states: BTreeSet::from([p, q]),
                alphabet: BTreeSet::from([s.clone()]),
                transitions: BTreeMap::from([((p, s.clone()), BTreeSet::from([q]))]),
                initial: p,
                finals: BTreeSet::from([q]),
            }
        }
        Regex::Epsilon => {
            // One state, both initial and accepting: only the empty string.
            let p = counter.fresh();
            Nfa {
                states: BTreeSet::from([p]),
                alphabet: BTreeSet::new(),
                transitions: BTreeMap::new(),
                initial: p,
                finals: BTreeSet::from([p]),
            }
        }
        Regex::Empty => {
            // One state, initial but never accepting: no strings at all.
            let p = counter.fresh();
            Nfa {
                states: BTreeSet::from([p]),
                alphabet: BTreeSet::new(),
                transitions: BTreeMap::new(),
                initial: p,
                finals: BTreeSet::new(),
            }
        }
    }
}

/// Unites two fragments by making the left initial state also play the role
/// of the right initial state.
///
/// Both duplication passes read the right fragment's transitions as they were
/// built, before either pass applies.
fn alternation<S: Clone + Ord>(left: Nfa<S>, right: Nfa<S>) -> Nfa<S> {
    let unified = left.initial;
    let right_initial = right.initial;
    let left_accepts_empty = left.finals.contains(&left.initial);
    let right_accepts_empty = right.finals.contains(&right_initial);

    // Edges touching the right initial state, recorded before the union.
    let mut incoming = Vec::new();
    let mut outgoing = Vec::new();
    for ((src, sym), dsts) in &right.transitions {
        if dsts.contains(&right_initial) {
            incoming.push((*src, sym.clone()));
        }
        if *src == right_initial {
            outgoing.push((sym.clone(), dsts.clone()));
        }
    }

    let mut a = left;
    a.states.extend(right.states);
    a.alphabet.extend(right.alphabet);
    a.finals.extend(right.finals);
    a.transitions.extend(right.transitions);

    // Whatever could enter the old right initial state can now enter the
    // unified initial state as well.
    for key in incoming {
        a.transitions.entry(key).or_default().insert(unified);
    }
    // The unified initial state offers the old right initial state's
    // outgoing edges on top of its own.
    for (sym, dsts) in outgoing {
        a.transitions.entry((unified, sym)).or_default().extend(dsts);
    }

    // A branch whose own initial state accepts the empty string makes the
    // unified initial state accepting.
    if left_accepts_empty || right_accepts_empty {
        a.finals.insert(unified);
    }

    trace!(
        "alternation fragment: {} states, initial {}",
        a.states.len(),
        a.initial
    );
    a
}

/// Chains two fragments: every final state of the left fragment inherits the
/// outgoing edges of the right fragment's initial state.
fn concatenation<S: Clone + Ord>(left: Nfa<S>, right: Nfa<S>) -> Nfa<S> {
    let right_initial = right.initial;
    let right_accepts_empty = right.finals.contains(&right_initial);

    // The edges leaving the right initial state, to be spliced below.
    let mut outgoing = Vec::new();
    for ((src, sym), dsts) in &right.transitions {
        if *src == right_initial {
            outgoing.push((sym.clone(), dsts.clone()));
        }
    }

    let left_finals = left.finals;
    let mut a = Nfa {
        states: left.states,
        alphabet: left.alphabet,
        transitions: left.transitions,
        initial: left.initial,
        finals: right.finals,
    };
    a.states.extend(right.states);
    a.alphabet.extend(right.alphabet);
    a.transitions.extend(right.transitions);

    for (sym, dsts) in outgoing {
        for &fin in &left_finals {
            a.transitions
                .entry((fin, sym.clone()))
                .or_default()
                .extend(dsts.iter().copied());
        }
    }

    // If the right operand accepts the empty string, stopping at the end of
    // the left operand is also accepting.
    if right_accepts_empty {
        a.finals.extend(left_finals);
    }

    trace!(
        "concatenation fragment: {} states, initial {}",
        a.states.len(),
        a.initial
    );
    a
}

/// Closes a fragment under repetition via one extra loop-back state.
///
/// The loop-back state is pure bookkeeping: edges that reach a final state of
/// the body also reach it, and it mirrors the initial state's outgoing edges,
/// so completing one pass through the body re-enters the body's start.
fn iteration<S: Clone + Ord>(body: Nfa<S>, counter: &mut StateCounter) -> Nfa<S> {
    let mut a = body;
    let loopback = counter.fresh();
    a.states.insert(loopback);

    // Pass 1: reaching a final state of the body also reaches the loop-back
    // state.
    let mut into_final = Vec::new();
    for ((src, sym), dsts) in &a.transitions {
        if !dsts.is_disjoint(&a.finals) {
            into_final.push((*src, sym.clone()));
        }
    }
    for key in into_final {
        if let Some(dsts) = a.transitions.get_mut(&key) {
            dsts.insert(loopback);
        }
    }

    // Pass 2: the loop-back state mirrors the initial state's outgoing edges
    // as recorded after pass 1, loop-back destinations included.
    let mut outgoing = Vec::new();
    for ((src, sym), dsts) in &a.transitions {
        if *src == a.initial {
            outgoing.push((sym.clone(), dsts.clone()));
        }
    }
    for (sym, dsts) in outgoing {
        a.transitions.entry((loopback, sym)).or_default().extend(dsts);
    }

    // Zero repetitions are always accepted.
    a.finals.insert(a.initial);

    trace!(
        "iteration fragment: {} states, initial {}, loop-back {}",
        a.states.len(),
        a.initial,
        loopback
    );
    a
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[ctor::ctor]
    fn init() {
        env_logger::init();
    }

    fn sym(c: char) -> Rc<Regex<char>> {
        Rc::new(Regex::Symbol(c))
    }

    /// The symbols appearing in the transition relation, for comparison
    /// against the declared alphabet.
    fn used_symbols(nfa: &Nfa<char>) -> BTreeSet<char> {
        nfa.transitions.keys().map(|(_, sym)| *sym).collect()
    }

    #[test]
    fn symbol_fragment() {
        let nfa = convert(&Regex::Symbol('a'));
        assert_eq!(
            nfa,
            Nfa {
                states: BTreeSet::from([0, 1]),
                alphabet: BTreeSet::from(['a']),
                transitions: BTreeMap::from([((0, 'a'), BTreeSet::from([1]))]),
                initial: 0,
                finals: BTreeSet::from([1]),
            }
        );
        assert!(nfa.accepts("a".chars()));
        assert!(!nfa.accepts("".chars()));
        assert!(!nfa.accepts("aa".chars()));
    }

    #[test]
    fn epsilon_fragment() {
        let nfa = convert(&Regex::<char>::Epsilon);
        assert_eq!(
            nfa,
            Nfa {
                states: BTreeSet::from([0]),
                alphabet: BTreeSet::new(),
                transitions: BTreeMap::new(),
                initial: 0,
                finals: BTreeSet::from([0]),
            }
        );
        assert!(nfa.accepts("".chars()));
        assert!(!nfa.accepts("a".chars()));
    }

    #[test]
    fn empty_fragment() {
        let nfa = convert(&Regex::<char>::Empty);
        assert_eq!(
            nfa,
            Nfa {
                states: BTreeSet::from([0]),
                alphabet: BTreeSet::new(),
                transitions: BTreeMap::new(),
                initial: 0,
                finals: BTreeSet::new(),
            }
        );
        assert!(!nfa.accepts("".chars()));
        assert!(!nfa.accepts("a".chars()));
    }

    #[test]
    fn iterated_alternation() {
        // (a+b)*
        let re = Regex::Iteration(Rc::new(Regex::Alternation(sym('a'), sym('b'))));
        let nfa = convert(&re);

        assert_eq!(
            nfa,
            Nfa {
                states: BTreeSet::from([0, 1, 2, 3, 4]),
                alphabet: BTreeSet::from(['a', 'b']),
                transitions: BTreeMap::from([
                    ((0, 'a'), BTreeSet::from([1, 4])),
                    ((0, 'b'), BTreeSet::from([3, 4])),
                    ((2, 'b'), BTreeSet::from([3, 4])),
                    ((4, 'a'), BTreeSet::from([1, 4])),
                    ((4, 'b'), BTreeSet::from([3, 4])),
                ]),
                initial: 0,
                finals: BTreeSet::from([0, 1, 3]),
            }
        );

        assert!(nfa.finals.contains(&nfa.initial));
        for word in ["", "a", "b", "ab", "ba", "aabba", "bbbbb"] {
            assert!(nfa.accepts(word.chars()), "should accept {word:?}");
        }
        assert!(!nfa.accepts("abc".chars()));
        assert!(nfa.is_well_formed());
    }

    #[test]
    fn concatenation_splices_onto_left_finals() {
        // a*b
        let re = Regex::Concatenation(Rc::new(Regex::Iteration(sym('a'))), sym('b'));
        let nfa = convert(&re);

        for word in ["b", "ab", "aab", "aaaaab"] {
            assert!(nfa.accepts(word.chars()), "should accept {word:?}");
        }
        for word in ["", "a", "ba", "abb"] {
            assert!(!nfa.accepts(word.chars()), "should reject {word:?}");
        }
        assert!(nfa.is_well_formed());
    }

    #[test]
    fn alternation_of_empty_and_epsilon() {
        let re = Regex::<char>::Alternation(Rc::new(Regex::Empty), Rc::new(Regex::Epsilon));
        let nfa = convert(&re);

        // The Epsilon branch's empty-accepting initial state promotes the
        // unified initial state to final.
        assert!(nfa.finals.contains(&nfa.initial));
        assert!(nfa.accepts("".chars()));
        assert!(!nfa.accepts("a".chars()));
        assert!(nfa.transitions.is_empty());
        assert!(nfa.alphabet.is_empty());
    }

    #[test]
    fn empty_language_has_no_final_states() {
        let re = Regex::Concatenation(sym('a'), Rc::new(Regex::Empty));
        let nfa = convert(&re);
        assert!(nfa.finals.is_empty());
        assert!(!nfa.accepts("".chars()));
        assert!(!nfa.accepts("a".chars()));
    }

    #[test]
    fn sibling_fragments_use_disjoint_ids() {
        // Two occurrences of the same shared subtree are converted
        // independently, each with fresh states.
        let shared = sym('a');
        let re = Regex::Alternation(shared.clone(), shared);
        let nfa = convert(&re);
        assert_eq!(nfa.states.len(), 4);

        let re = Regex::Concatenation(sym('a'), sym('a'));
        let nfa = convert(&re);
        assert_eq!(nfa.states.len(), 4);
    }

    #[test]
    fn alphabet_matches_used_symbols_exactly() {
        let trees = [
            Regex::Symbol('a'),
            Regex::Iteration(Rc::new(Regex::Alternation(sym('a'), sym('b')))),
            Regex::Concatenation(Rc::new(Regex::Iteration(sym('a'))), sym('b')),
            Regex::Alternation(Rc::new(Regex::Empty), Rc::new(Regex::Epsilon)),
            Regex::Concatenation(sym('c'), Rc::new(Regex::Empty)),
        ];
        for re in &trees {
            let nfa = convert(re);
            assert_eq!(used_symbols(&nfa), nfa.alphabet, "for {re}");
            assert_eq!(nfa.alphabet, re.alphabet(), "for {re}");
            assert!(nfa.is_well_formed(), "for {re}");
        }
    }

    #[test]
    fn iteration_initial_becomes_final() {
        let re = Regex::Iteration(sym('a'));
        let nfa = convert(&re);
        assert!(nfa.finals.contains(&nfa.initial));
        assert!(nfa.accepts("".chars()));
        assert!(nfa.accepts("aaa".chars()));
        assert!(!nfa.accepts("b".chars()));
    }
}
