//! Surface text of a sentence
//!
//! Linearizes the leaves of the constituency tree into a single line that
//! is safe to put in a comma-separated row.

use crate::bracket::{BracketTree, render};
use crate::error::CorpusError;
use crate::tree::{ConstituencyGraph, NodeId};

/// Characters dropped from the surface text
const STRIPPED: [char; 3] = ['–', ',', '—'];

/// Extract the sentence text under `root`
pub fn extract_text(graph: &ConstituencyGraph, root: NodeId) -> Result<String, CorpusError> {
    let bracket = render(graph, root)?;
    let tree = BracketTree::parse(&bracket)?;
    Ok(join_leaves(&tree.leaves()))
}

/// Join leaf tokens into normalized text
///
/// Pure punctuation tokens attach to the preceding word, guillemets hug
/// the words they enclose, dashes and commas are removed and the first
/// word is capitalized.
pub fn join_leaves(leaves: &[&str]) -> String {
    let mut text = String::new();
    for word in leaves {
        if !word.chars().all(|c| c.is_ascii_punctuation()) {
            text.push(' ');
        }
        text.push_str(word);
    }

    let text = text.replace(STRIPPED, "");
    let text = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("« ", "«")
        .replace(" »", "»");

    match text.split_once(' ') {
        Some((first, rest)) => format!("{} {}", capitalize(first), rest),
        None => capitalize(&text),
    }
}

/// Uppercase the first letter, skipping leading punctuation such as `«`
fn capitalize(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut done = false;
    for c in word.chars() {
        if !done && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            done = true;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_join_punctuation() {
        assert_eq!(join_leaves(&["mannen", "som", "sover", "."]), "Mannen som sover.");
        assert_eq!(join_leaves(&["hvem", "kom", "?", "!"]), "Hvem kom?!");
    }

    #[test]
    fn test_guillemets() {
        assert_eq!(join_leaves(&["han", "sa", "«", "hei", "»"]), "Han sa «hei»");
        assert_eq!(join_leaves(&["«", "hei", "»", "sa", "han"]), "«Hei» sa han");
    }

    #[test]
    fn test_strip_dashes_and_commas() {
        assert_eq!(
            join_leaves(&["Per", ",", "som", "–", "sover", "—", "ja"]),
            "Per som sover ja"
        );
        assert_eq!(join_leaves(&["1,5", "liter"]), "15 liter");
    }

    #[test]
    fn test_empty() {
        assert_eq!(join_leaves(&[]), "");
        assert_eq!(join_leaves(&[","]), "");
    }

    #[test]
    fn test_capitalize_keeps_rest() {
        assert_eq!(capitalize("nrk"), "Nrk");
        assert_eq!(capitalize("NRK"), "NRK");
        assert_eq!(capitalize("«øl»"), "«Øl»");
        assert_eq!(capitalize("123"), "123");
    }

    #[test]
    fn test_extract_text() {
        let mut g = ConstituencyGraph::new();
        let root = g.add_node("s1_500", "ROOT");
        let np = g.add_node("s1_501", "NP");
        let per = g.add_node("s1_1", "per");
        let sover = g.add_node("s1_2", "sover");
        let dot = g.add_node("s1_3", ".");
        g.link(root, np);
        g.link(np, per);
        g.link(root, sover);
        g.link(root, dot);
        assert_eq!(extract_text(&g, root).unwrap(), "Per sover.");
    }

    proptest! {
        #[test]
        fn prop_join_is_normalized(words in prop::collection::vec("[a-zæøå«»,.?-]{1,6}", 0..12)) {
            let leaves: Vec<&str> = words.iter().map(String::as_str).collect();
            let text = join_leaves(&leaves);
            prop_assert_eq!(&text, &join_leaves(&leaves));
            prop_assert!(!text.contains(','));
            prop_assert!(!text.contains("« "));
            prop_assert!(!text.contains(" »"));
            prop_assert!(!text.contains("  "));
            if let Some(c) = text.chars().find(|c| c.is_alphabetic()) {
                let first_word = text.split(' ').next().unwrap_or_default();
                if first_word.contains(c) {
                    prop_assert!(c.is_uppercase());
                }
            }
        }
    }
}
