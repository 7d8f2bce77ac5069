//! TIGER-XML corpus reading
//!
//! Splits an LFG treebank export into per-sentence parses. Each `<s>`
//! element holds one `<graph>` whose `<terminals>` and `<nonterminals>`
//! mix both annotation layers: c-structure nodes (terminals with a `word`,
//! non-terminals with a `cat`) and f-structure nodes (ids containing `_f_`,
//! terminals with a `val`).
//!
//! ```xml
//! <s id="s3392">
//!   <graph root="s3392_0">
//!     <terminals>
//!       <t id="s3392_1" word="som"/>
//!       <t id="s3392_0_f_7_PRED" val="pro"/>
//!     </terminals>
//!     <nonterminals>
//!       <nt id="s3392_0" cat="ROOT"><edge label="--" idref="s3392_500"/></nt>
//!       <nt id="s3392_0_f_3"><edge label="TOPIC-REL" idref="s3392_0_f_7"/></nt>
//!     </nonterminals>
//!   </graph>
//! </s>
//! ```

use crate::error::CorpusError;
use flate2::read::MultiGzDecoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A leaf node of either layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminal {
    pub id: String,
    /// Surface word (c-structure terminals)
    pub word: Option<String>,
    /// Attribute value (f-structure terminals)
    pub val: Option<String>,
}

/// A labelled edge from a non-terminal to another node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub label: String,
    pub idref: String,
}

/// An inner node of either layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonTerminal {
    pub id: String,
    /// Phrasal category (c-structure non-terminals)
    pub cat: Option<String>,
    pub edges: Vec<Edge>,
}

/// One sentence's dual-layer annotation, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceParse {
    pub id: String,
    pub graph_root: String,
    pub terminals: Vec<Terminal>,
    pub nonterminals: Vec<NonTerminal>,
}

/// Identifiers reported for every output row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceIds {
    /// Id as displayed on the corpus website
    pub web_id: String,
    pub sent_id: String,
    pub graph_id: String,
}

impl SentenceParse {
    pub fn ids(&self) -> SentenceIds {
        let first = self.graph_root.split('_').next().unwrap_or_default();
        let mut chars = first.chars();
        chars.next();
        SentenceIds {
            web_id: chars.as_str().to_string(),
            sent_id: self.id.clone(),
            graph_id: self.graph_root.clone(),
        }
    }
}

/// Corpus reader that iterates over sentences
pub struct CorpusReader<R: BufRead> {
    reader: Reader<R>,
    done: bool,
}

impl CorpusReader<Box<dyn BufRead>> {
    /// Create a reader from a file path; `.gz` files are decompressed on the fly
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let inner: Box<dyn BufRead> = if path.extension().is_some_and(|ext| ext == "gz") {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        Ok(Self::new(inner))
    }
}

impl CorpusReader<BufReader<std::io::Cursor<String>>> {
    /// Create a reader from a string
    pub fn from_string(text: &str) -> Self {
        let cursor = std::io::Cursor::new(text.to_string());
        Self::new(BufReader::new(cursor))
    }
}

impl<R: BufRead> CorpusReader<R> {
    pub fn new(inner: R) -> Self {
        let mut reader = Reader::from_reader(inner);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            done: false,
        }
    }

    /// Read events up to and including the next `</s>`
    fn read_sentence(&mut self) -> Result<Option<SentenceParse>, CorpusError> {
        let mut buf = Vec::new();
        let mut state: Option<SentenceBuilder> = None;

        loop {
            buf.clear();
            let event = self
                .reader
                .read_event_into(&mut buf)
                .map_err(|source| CorpusError::Xml {
                    position: self.reader.error_position() as u64,
                    source,
                })?;
            let position = self.reader.buffer_position() as u64;

            match event {
                Event::Start(e) => {
                    if let Some(sentence) = open_element(&mut state, &e, false, position)? {
                        return Ok(Some(sentence));
                    }
                }
                Event::Empty(e) => {
                    if let Some(sentence) = open_element(&mut state, &e, true, position)? {
                        return Ok(Some(sentence));
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"s" => {
                        if let Some(builder) = state.take() {
                            return builder.finish().map(Some);
                        }
                    }
                    b"nt" => {
                        if let Some(builder) = state.as_mut() {
                            builder.in_nt = false;
                        }
                    }
                    _ => {}
                },
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for CorpusReader<R> {
    type Item = Result<SentenceParse, CorpusError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_sentence() {
            Ok(Some(sentence)) => Some(Ok(sentence)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                // A malformed corpus cannot be resynchronised
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Sentence under construction
#[derive(Debug, Default)]
struct SentenceBuilder {
    id: String,
    graph_root: Option<String>,
    terminals: Vec<Terminal>,
    nonterminals: Vec<NonTerminal>,
    in_nt: bool,
}

impl SentenceBuilder {
    fn finish(self) -> Result<SentenceParse, CorpusError> {
        let graph_root = self.graph_root.ok_or(CorpusError::MissingAttribute {
            element: "graph",
            attribute: "root",
        })?;
        Ok(SentenceParse {
            id: self.id,
            graph_root,
            terminals: self.terminals,
            nonterminals: self.nonterminals,
        })
    }
}

/// Handle a start or empty element; returns a finished sentence for `<s/>`
fn open_element(
    state: &mut Option<SentenceBuilder>,
    e: &BytesStart,
    empty: bool,
    position: u64,
) -> Result<Option<SentenceParse>, CorpusError> {
    let name = e.local_name();
    let name = name.as_ref();

    if name == b"s" {
        let id = required(e, "s", "id", position)?;
        let builder = SentenceBuilder {
            id,
            ..Default::default()
        };
        if empty {
            return builder.finish().map(Some);
        }
        *state = Some(builder);
        return Ok(None);
    }

    let Some(builder) = state.as_mut() else {
        return match name {
            b"t" => Err(CorpusError::Misplaced { element: "t" }),
            b"nt" => Err(CorpusError::Misplaced { element: "nt" }),
            b"edge" => Err(CorpusError::Misplaced { element: "edge" }),
            _ => Ok(None),
        };
    };

    match name {
        b"graph" => {
            builder.graph_root = Some(required(e, "graph", "root", position)?);
        }
        b"t" => {
            builder.terminals.push(Terminal {
                id: required(e, "t", "id", position)?,
                word: optional(e, "word", position)?,
                val: optional(e, "val", position)?,
            });
        }
        b"nt" => {
            builder.nonterminals.push(NonTerminal {
                id: required(e, "nt", "id", position)?,
                cat: optional(e, "cat", position)?,
                edges: Vec::new(),
            });
            builder.in_nt = !empty;
        }
        b"edge" => {
            let edge = Edge {
                label: required(e, "edge", "label", position)?,
                idref: required(e, "edge", "idref", position)?,
            };
            match builder.nonterminals.last_mut() {
                Some(nt) if builder.in_nt => nt.edges.push(edge),
                _ => return Err(CorpusError::Misplaced { element: "edge" }),
            }
        }
        _ => {}
    }
    Ok(None)
}

fn optional(e: &BytesStart, attribute: &str, position: u64) -> Result<Option<String>, CorpusError> {
    let xml_error = |source: quick_xml::Error| CorpusError::Xml { position, source };
    let Some(attr) = e
        .try_get_attribute(attribute)
        .map_err(|err| xml_error(quick_xml::Error::from(err)))?
    else {
        return Ok(None);
    };
    let value = attr
        .unescape_value()
        .map_err(|err| xml_error(quick_xml::Error::from(err)))?;
    Ok(Some(value.into_owned()))
}

fn required(
    e: &BytesStart,
    element: &'static str,
    attribute: &'static str,
    position: u64,
) -> Result<String, CorpusError> {
    optional(e, attribute, position)?.ok_or(CorpusError::MissingAttribute { element, attribute })
}
