//! Constituency (c-structure) graph
//!
//! An arena of nodes addressed by [`NodeId`], with child and parent
//! indices built in one pass over the sentence. Terminals are words,
//! non-terminals are phrasal categories. Edges pointing into the
//! functional layer are left out so the two layers stay disjoint.

use crate::corpus::SentenceParse;
use crate::error::CorpusError;
use crate::ids::is_functional_id;
use rustc_hash::FxHashMap;

/// Index of a node in the arena
pub type NodeId = usize;

/// Word marker for terminals without lexical content
pub const PLACEHOLDER_WORD: &str = "--";

/// A node in the constituency graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    /// Corpus identifier, e.g. `s3392_501`
    pub xml_id: String,
    /// Category for non-terminals, word form for terminals
    pub name: String,
}

/// Constituency graph of one sentence
#[derive(Debug, Clone, Default)]
pub struct ConstituencyGraph {
    nodes: Vec<Node>,
    children: Vec<Vec<NodeId>>,
    parents: Vec<Vec<NodeId>>,
    by_xml_id: FxHashMap<String, NodeId>,
    by_name: FxHashMap<String, Vec<NodeId>>,
    /// First non-terminal in document order
    first_phrase: Option<NodeId>,
}

impl ConstituencyGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the c-structure graph of a sentence
    pub fn build(sentence: &SentenceParse) -> Result<Self, CorpusError> {
        let mut graph = Self::new();

        for t in &sentence.terminals {
            if let Some(word) = &t.word {
                if word != PLACEHOLDER_WORD {
                    graph.add_node(&t.id, word);
                }
            }
        }

        let mut pending = Vec::new();
        for nt in &sentence.nonterminals {
            let child_refs: Vec<&str> = nt
                .edges
                .iter()
                .map(|e| e.idref.as_str())
                .filter(|idref| !is_functional_id(idref))
                .collect();
            if child_refs.is_empty() {
                continue;
            }
            let cat = nt.cat.as_deref().ok_or(CorpusError::MissingAttribute {
                element: "nt",
                attribute: "cat",
            })?;
            let id = graph.add_node(&nt.id, cat);
            graph.first_phrase.get_or_insert(id);
            pending.push((id, child_refs));
        }

        for (parent, child_refs) in pending {
            for idref in child_refs {
                let Some(&child) = graph.by_xml_id.get(idref) else {
                    return Err(CorpusError::UnknownNode {
                        id: idref.to_string(),
                        referenced_by: graph.nodes[parent].xml_id.clone(),
                    });
                };
                graph.link(parent, child);
            }
        }

        Ok(graph)
    }

    /// Add a node; an id seen before returns the existing node
    pub fn add_node(&mut self, xml_id: &str, name: &str) -> NodeId {
        if let Some(&id) = self.by_xml_id.get(xml_id) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            xml_id: xml_id.to_string(),
            name: name.to_string(),
        });
        self.children.push(Vec::new());
        self.parents.push(Vec::new());
        self.by_xml_id.insert(xml_id.to_string(), id);
        self.by_name.entry(name.to_string()).or_default().push(id);
        id
    }

    /// Append `child` to `parent`'s ordered children
    pub fn link(&mut self, parent: NodeId, child: NodeId) {
        self.children[parent].push(child);
        if !self.parents[child].contains(&parent) {
            self.parents[child].push(parent);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Get a node by arena id
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get a node by corpus identifier
    pub fn lookup(&self, xml_id: &str) -> Option<NodeId> {
        self.by_xml_id.get(xml_id).copied()
    }

    /// All nodes with this category or word, in document order
    pub fn ids_by_name(&self, name: &str) -> &[NodeId] {
        self.by_name.get(name).map(|v| v.as_slice()).unwrap_or_default()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(id).map(|v| v.as_slice()).unwrap_or_default()
    }

    pub fn parents(&self, id: NodeId) -> &[NodeId] {
        self.parents.get(id).map(|v| v.as_slice()).unwrap_or_default()
    }

    pub fn is_terminal(&self, id: NodeId) -> bool {
        self.children(id).is_empty()
    }

    /// Root of the tree: the first node carrying the category of the
    /// first non-terminal
    pub fn root(&self) -> Option<NodeId> {
        let first = self.get_node(self.first_phrase?)?;
        self.ids_by_name(&first.name).first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Edge, NonTerminal, Terminal};

    fn t(id: &str, word: &str) -> Terminal {
        Terminal {
            id: id.to_string(),
            word: Some(word.to_string()),
            val: None,
        }
    }

    fn nt(id: &str, cat: Option<&str>, children: &[&str]) -> NonTerminal {
        NonTerminal {
            id: id.to_string(),
            cat: cat.map(str::to_string),
            edges: children
                .iter()
                .map(|c| Edge {
                    label: "--".to_string(),
                    idref: c.to_string(),
                })
                .collect(),
        }
    }

    /// ROOT -> S -> (NP -> Per) (VP -> sover), plus an f-structure link
    fn sentence() -> SentenceParse {
        SentenceParse {
            id: "s1".to_string(),
            graph_root: "s1_500".to_string(),
            terminals: vec![t("s1_1", "Per"), t("s1_2", "sover"), t("s1_3", "--")],
            nonterminals: vec![
                nt("s1_500", Some("ROOT"), &["s1_501", "s1_f_0"]),
                nt("s1_501", Some("S"), &["s1_502", "s1_503"]),
                nt("s1_502", Some("NP"), &["s1_1"]),
                nt("s1_503", Some("VP"), &["s1_2"]),
                nt("s1_f_0", None, &["s1_f_1"]),
            ],
        }
    }

    #[test]
    fn test_build_graph() {
        let graph = ConstituencyGraph::build(&sentence()).unwrap();

        // two words, four phrases; placeholder and f-structure nodes are left out
        assert_eq!(graph.len(), 6);
        assert!(graph.lookup("s1_3").is_none());
        assert!(graph.lookup("s1_f_0").is_none());

        let root = graph.root().unwrap();
        assert_eq!(graph.get_node(root).unwrap().name, "ROOT");
        assert_eq!(graph.children(root).len(), 1);

        let s = graph.lookup("s1_501").unwrap();
        let names: Vec<_> = graph
            .children(s)
            .iter()
            .map(|&c| graph.get_node(c).unwrap().name.as_str())
            .collect();
        assert_eq!(names, ["NP", "VP"]);
        assert_eq!(graph.parents(s), &[root]);

        let per = graph.lookup("s1_1").unwrap();
        assert!(graph.is_terminal(per));
        assert_eq!(graph.ids_by_name("Per"), &[per]);
    }

    #[test]
    fn test_unknown_child_is_fatal() {
        let mut s = sentence();
        s.nonterminals[2].edges[0].idref = "s1_99".to_string();
        let err = ConstituencyGraph::build(&s).unwrap_err();
        assert!(matches!(err, CorpusError::UnknownNode { ref id, .. } if id == "s1_99"));
    }

    #[test]
    fn test_placeholder_reference_is_fatal() {
        let mut s = sentence();
        s.nonterminals[3].edges[0].idref = "s1_3".to_string();
        assert!(ConstituencyGraph::build(&s).is_err());
    }

    #[test]
    fn test_missing_category_is_fatal() {
        let mut s = sentence();
        s.nonterminals[1].cat = None;
        assert!(matches!(
            ConstituencyGraph::build(&s),
            Err(CorpusError::MissingAttribute {
                element: "nt",
                attribute: "cat"
            })
        ));
    }

    #[test]
    fn test_root_prefers_first_of_category() {
        let mut s = sentence();
        s.nonterminals[0].cat = Some("S".to_string());
        let graph = ConstituencyGraph::build(&s).unwrap();
        assert_eq!(graph.root(), graph.lookup("s1_500"));
        assert_eq!(graph.ids_by_name("S").len(), 2);
    }
}
