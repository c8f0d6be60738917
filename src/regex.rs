use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

/// A regular expression over symbols of type `S`.
///
/// Subtrees are immutable and may be shared: the same [`Rc`]'d node can be
/// referenced from several parents. Sharing carries no aliasing semantics for
/// the conversion, which treats every occurrence of a subtree as an
/// independent expression to recurse into.
#[derive(Hash, Debug, Clone, PartialEq, Eq)]
pub enum Regex<S> {
    /// The union of both languages.
    Alternation(Rc<Regex<S>>, Rc<Regex<S>>),
    /// Every string of the left language followed by one of the right.
    Concatenation(Rc<Regex<S>>, Rc<Regex<S>>),
    /// Zero or more repetitions of the inner language.
    Iteration(Rc<Regex<S>>),
    /// The one-symbol string.
    Symbol(S),
    /// The language containing only the empty string.
    Epsilon,
    /// The empty language, containing no strings at all.
    Empty,
}

impl<S> Regex<S> {
    /// Whether the language contains the empty string.
    pub fn is_nullable(&self) -> bool {
        match self {
            Regex::Alternation(l, r) => l.is_nullable() || r.is_nullable(),
            Regex::Concatenation(l, r) => l.is_nullable() && r.is_nullable(),
            Regex::Iteration(_) => true,
            Regex::Symbol(_) => false,
            Regex::Epsilon => true,
            Regex::Empty => false,
        }
    }
}

impl<S: Clone + Ord> Regex<S> {
    /// All symbols that occur in the expression.
    pub fn alphabet(&self) -> BTreeSet<S> {
        let mut alphabet = BTreeSet::new();
        self.search_alphabet(&mut alphabet);
        alphabet
    }

    fn search_alphabet(&self, alphabet: &mut BTreeSet<S>) {
        match self {
            Regex::Alternation(l, r) | Regex::Concatenation(l, r) => {
                l.search_alphabet(alphabet);
                r.search_alphabet(alphabet);
            }
            Regex::Iteration(node) => node.search_alphabet(alphabet),
            Regex::Symbol(s) => {
                alphabet.insert(s.clone());
            }
            Regex::Epsilon | Regex::Empty => {}
        }
    }
}

/// Renders the expression in the ALT textual format: `(l+r)`, `(l r)`,
/// `(n)*`, `#E` for epsilon and `#0` for the empty language.
impl<S: Display> Display for Regex<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Regex::Alternation(l, r) => write!(f, "({l}+{r})"),
            Regex::Concatenation(l, r) => write!(f, "({l} {r})"),
            Regex::Iteration(node) => write!(f, "({node})*"),
            Regex::Symbol(s) => write!(f, "{s}"),
            Regex::Epsilon => write!(f, "#E"),
            Regex::Empty => write!(f, "#0"),
        }
    }
}
