//! Bracket-notation trees
//!
//! Renders a constituency graph as `(LABEL child child)` and parses such
//! strings back into an ordered tree using a pest grammar.

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;

use crate::error::CorpusError;
use crate::tree::{ConstituencyGraph, NodeId};

#[derive(Parser)]
#[grammar = "bracket.pest"]
struct BracketParser;

/// A parsed bracket tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BracketTree {
    Node {
        label: String,
        children: Vec<BracketTree>,
    },
    Leaf(String),
}

impl BracketTree {
    /// Parse a bracket-notation string
    pub fn parse(input: &str) -> Result<Self, CorpusError> {
        let mut pairs = BracketParser::parse(Rule::tree, input)?;
        let node = pairs
            .next()
            .and_then(|tree| tree.into_inner().next())
            .map(build_node);
        // The grammar guarantees exactly one node under `tree`
        Ok(node.unwrap_or(BracketTree::Leaf(String::new())))
    }

    /// Leaf tokens, left to right
    pub fn leaves(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        let mut stack = vec![self];
        while let Some(tree) = stack.pop() {
            match tree {
                BracketTree::Leaf(word) => leaves.push(word.as_str()),
                BracketTree::Node { children, .. } => stack.extend(children.iter().rev()),
            }
        }
        leaves
    }
}

fn build_node(pair: Pair<Rule>) -> BracketTree {
    let mut label = String::new();
    let mut children = Vec::new();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::label => label = token_text(inner),
            Rule::leaf => children.push(BracketTree::Leaf(token_text(inner))),
            Rule::node => children.push(build_node(inner)),
            _ => {}
        }
    }
    BracketTree::Node { label, children }
}

/// Text of a label or leaf, with quoting removed
fn token_text(pair: Pair<Rule>) -> String {
    let Some(token) = pair.into_inner().next() else {
        return String::new();
    };
    match token.as_rule() {
        Rule::quoted => {
            let inner = token.into_inner().next().map(|p| p.as_str()).unwrap_or("");
            unescape(inner)
        }
        _ => token.as_str().to_string(),
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn push_token(out: &mut String, token: &str) {
    let needs_quotes = token.is_empty()
        || token
            .chars()
            .any(|c| c == '(' || c == ')' || c == '"' || c.is_whitespace());
    if !needs_quotes {
        out.push_str(token);
        return;
    }
    out.push('"');
    for c in token.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

/// Render the subtree under `root` in bracket notation
pub fn render(graph: &ConstituencyGraph, root: NodeId) -> Result<String, CorpusError> {
    enum Step {
        Open(NodeId),
        Close,
    }

    let mut out = String::new();
    let mut seen = vec![false; graph.len()];
    let mut stack = vec![Step::Open(root)];

    while let Some(step) = stack.pop() {
        let id = match step {
            Step::Close => {
                out.push(')');
                continue;
            }
            Step::Open(id) => id,
        };
        let Some(node) = graph.get_node(id) else {
            return Err(CorpusError::UnknownNode {
                id: id.to_string(),
                referenced_by: "bracket renderer".to_string(),
            });
        };
        if std::mem::replace(&mut seen[id], true) {
            return Err(CorpusError::NotATree {
                id: node.xml_id.clone(),
            });
        }

        if !out.is_empty() && !out.ends_with('(') {
            out.push(' ');
        }
        if graph.is_terminal(id) && id != root {
            push_token(&mut out, &node.name);
        } else {
            out.push('(');
            push_token(&mut out, &node.name);
            stack.push(Step::Close);
            stack.extend(graph.children(id).iter().rev().map(|&c| Step::Open(c)));
        }
    }

    Ok(out)
}
