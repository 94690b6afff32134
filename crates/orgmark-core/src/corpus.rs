//! Multi-document conversion with cross-document `id:` links.

use crate::document::Document;
use crate::emit::{HtmlEmitOptions, emit_fragment, finish};
use crate::error::LoadError;
use crate::parser::ParseOptions;
use crate::resolver::IdMap;

/// One input text and the name used as its fallback identity.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Source {
    pub name: String,
    pub text: String,
}

impl Source {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// An ordered set of documents resolved against each other.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Corpus {
    documents: Vec<Document>,
    ids: IdMap,
}

impl Corpus {
    /// Parses every source in order, then resolves all documents against the
    /// merged identity map. The first parse failure aborts the whole corpus.
    pub fn parse(sources: &[Source], options: &ParseOptions) -> Result<Self, LoadError> {
        let mut documents = Vec::with_capacity(sources.len());
        for source in sources {
            let mut document =
                Document::parse(&source.text, options).map_err(|source_err| LoadError::Parse {
                    name: source.name.clone(),
                    source: source_err,
                })?;
            if document.identity().is_none() {
                document.set_identity(source.name.clone());
            }
            documents.push(document);
        }

        let mut ids = IdMap::new();
        for document in &documents {
            if let Some(identity) = document.identity() {
                ids.insert(identity.to_string(), document.targets().to_map());
            }
        }
        for document in &mut documents {
            document.resolve(Some(&ids));
        }
        Ok(Self { documents, ids })
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn ids(&self) -> &IdMap {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Renders every document in input order, joined by the separator.
    /// Wrapping applies once around the whole corpus; an empty corpus
    /// renders as an empty string.
    pub fn to_html(&self, options: &HtmlEmitOptions) -> String {
        if self.documents.is_empty() {
            return String::new();
        }
        let content = self
            .documents
            .iter()
            .map(|document| emit_fragment(document, &options.separator))
            .collect::<Vec<_>>()
            .join(&options.separator);
        finish(content, options)
    }
}
