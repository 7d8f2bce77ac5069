//! Functional (f-structure) layer
//!
//! A view over the f-structure nodes of a sentence with inverted indices
//! on edges, so lookups by target level or relation label do not rescan
//! every non-terminal. Index entries keep document order, which the
//! first-match rules of the path tracer depend on.

use crate::corpus::{SentenceParse, Terminal};
use crate::ids::is_functional_id;
use rustc_hash::FxHashMap;

/// Index of an edge in document order
pub type EdgeId = usize;

/// An f-structure edge: `owner --label--> target`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FEdge<'s> {
    /// Id of the owning non-terminal (functional level)
    pub owner: &'s str,
    pub label: &'s str,
    pub target: &'s str,
}

/// F-structure view of one sentence
#[derive(Debug, Clone)]
pub struct FStructure<'s> {
    terminals: Vec<&'s Terminal>,
    edges: Vec<FEdge<'s>>,
    /// Index by target idref
    by_target: FxHashMap<&'s str, Vec<EdgeId>>,
    /// Index by relation label
    by_label: FxHashMap<&'s str, Vec<EdgeId>>,
}

impl<'s> FStructure<'s> {
    /// Collect the functional nodes of a sentence
    pub fn new(sentence: &'s SentenceParse) -> Self {
        let terminals = sentence
            .terminals
            .iter()
            .filter(|t| t.val.is_some())
            .collect();

        let mut fs = Self {
            terminals,
            edges: Vec::new(),
            by_target: FxHashMap::default(),
            by_label: FxHashMap::default(),
        };

        for nt in &sentence.nonterminals {
            if !is_functional_id(&nt.id) {
                continue;
            }
            for edge in &nt.edges {
                fs.add_edge(FEdge {
                    owner: &nt.id,
                    label: &edge.label,
                    target: &edge.idref,
                });
            }
        }

        fs
    }

    fn add_edge(&mut self, edge: FEdge<'s>) {
        let id = self.edges.len();
        self.by_target.entry(edge.target).or_default().push(id);
        self.by_label.entry(edge.label).or_default().push(id);
        self.edges.push(edge);
    }

    /// Terminals carrying a value, in document order
    pub fn terminals(&self) -> &[&'s Terminal] {
        &self.terminals
    }

    /// All edges in document order
    pub fn edges(&self) -> &[FEdge<'s>] {
        &self.edges
    }

    /// Edges pointing at `target`, in document order
    pub fn edges_to<'a>(&'a self, target: &str) -> impl Iterator<Item = &'a FEdge<'s>> + 'a {
        self.lookup(&self.by_target, target)
    }

    /// Edges carrying `label`, in document order
    pub fn edges_with_label<'a>(&'a self, label: &str) -> impl Iterator<Item = &'a FEdge<'s>> + 'a {
        self.lookup(&self.by_label, label)
    }

    fn lookup<'a>(
        &'a self,
        index: &'a FxHashMap<&'s str, Vec<EdgeId>>,
        key: &str,
    ) -> impl Iterator<Item = &'a FEdge<'s>> + 'a {
        index
            .get(key)
            .map(|ids| ids.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&id| &self.edges[id])
    }
}
