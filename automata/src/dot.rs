use std::fmt::Display;

use itertools::Itertools;

use crate::{
    alphabet::Alphabet,
    automaton::{StateIndex, DFA},
    Show,
};

/// Attributes that can be attached to a node in the DOT representation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotStateAttribute {
    /// The label of a node
    Label(String),
    /// The shape of a node
    Shape(String),
}

impl Display for DotStateAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotStateAttribute::Label(s) => write!(f, "label=\"{}\"", escape(s)),
            DotStateAttribute::Shape(s) => write!(f, "shape=\"{}\"", escape(s)),
        }
    }
}

/// Attributes that can be attached to an edge in the DOT representation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DotTransitionAttribute {
    /// The label of an edge
    Label(String),
}

impl Display for DotTransitionAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotTransitionAttribute::Label(lbl) => write!(f, "label=\"{}\"", escape(lbl)),
        }
    }
}

/// Produces a textual description in the DOT language of graphviz, which can then be rendered
/// by external tools. No rendering happens in this crate.
pub trait Dottable {
    /// The name of the produced digraph.
    fn dot_name(&self) -> Option<String>;

    /// Statements that are placed at the beginning of the graph body.
    fn dot_header_statements(&self) -> Vec<String> {
        vec![]
    }

    /// Lines declaring the nodes of the graph.
    fn dot_nodes(&self) -> Vec<String>;

    /// Lines declaring the edges of the graph.
    fn dot_edges(&self) -> Vec<String>;

    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    fn dot_representation(&self) -> String {
        std::iter::once(format!(
            "digraph {} {{",
            self.dot_name().unwrap_or("A".to_string())
        ))
        .chain(self.dot_header_statements())
        .chain(self.dot_nodes())
        .chain(self.dot_edges())
        .chain(std::iter::once("}".to_string()))
        .join("\n")
    }
}

fn state_ident(q: StateIndex) -> String {
    format!("q{}", q.index())
}

impl<A: Alphabet> Dottable for DFA<A> {
    fn dot_name(&self) -> Option<String> {
        Some("DFA".into())
    }

    fn dot_header_statements(&self) -> Vec<String> {
        vec![
            "rankdir=LR".to_string(),
            "edge [arrowhead=\"vee\"]".to_string(),
            "init [label=\"\", shape=none, width=0]".to_string(),
            format!("init -> {}", state_ident(self.initial())),
        ]
    }

    fn dot_nodes(&self) -> Vec<String> {
        self.states()
            .map(|q| {
                let shape = if self.is_final(q) {
                    "doublecircle"
                } else {
                    "circle"
                };
                let label = match self.access_word(q) {
                    Some(word) => word.show(),
                    None => q.show(),
                };
                format!(
                    "{} [{}, {}]",
                    state_ident(q),
                    DotStateAttribute::Shape(shape.into()),
                    DotStateAttribute::Label(label)
                )
            })
            .collect()
    }

    fn dot_edges(&self) -> Vec<String> {
        self.grouped_edges()
            .into_iter()
            .map(|(source, target, symbols)| {
                format!(
                    "{} -> {} [{}]",
                    state_ident(source),
                    state_ident(target),
                    DotTransitionAttribute::Label(symbols.iter().map(|a| a.show()).join(", "))
                )
            })
            .collect()
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn dfa_dot_representation() {
        let dfa = DFA::builder()
            .with_transitions([(0, 'a', 1), (0, 'b', 1), (1, 'a', 0), (1, 'b', 1)])
            .with_accepting([1])
            .into_dfa(0)
            .unwrap();
        let dot = dfa.dot_representation();
        assert!(dot.starts_with("digraph DFA {"));
        assert!(dot.contains("init -> q0"));
        assert!(dot.contains("q1 [shape=\"doublecircle\", label=\"q1\"]"));
        assert!(dot.contains("q0 -> q1 [label=\"a, b\"]"));
        assert!(dot.contains("q1 -> q0 [label=\"a\"]"));
        assert!(dot.ends_with('}'));
    }
}
