use std::fmt::Display;
use std::io;
use std::io::Write;

use crate::Nfa;

impl<S: Display> Nfa<S> {
    /// Writes the automaton in Graphviz dot format. Final states get a double
    /// circle; an unlabeled arrow marks the initial state.
    pub fn output_dot(&self, w: &mut impl Write) -> io::Result<()> {
        writeln!(w, "digraph {{")?;
        writeln!(w, "node[shape=point, label=\"\"] start")?;

        for &state in &self.states {
            let shape = if self.finals.contains(&state) {
                "doublecircle"
            } else {
                "circle"
            };
            writeln!(w, "node[label=\"{state}\", shape={shape}] id{state}")?;
        }

        writeln!(w, "start -> id{}", self.initial)?;
        for ((src, sym), dsts) in &self.transitions {
            for dst in dsts {
                writeln!(w, "id{src} -> id{dst} [label=\"{sym}\"]")?;
            }
        }

        writeln!(w, "}}")?;

        Ok(())
    }
}
