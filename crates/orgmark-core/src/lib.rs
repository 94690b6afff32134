mod ast;
mod corpus;
mod document;
mod emit;
mod error;
mod inline;
mod parser;
mod resolver;
mod slug;
mod source;
mod syntax;
mod target;

pub use ast::{
    Inline, InlineSeq, InternalLink, LinkRef, ListKind, Node, NodeId, NodeKind, Style, Tree,
};
pub use corpus::{Corpus, Source};
pub use document::{Document, Keyword};
pub use emit::{HtmlEmitOptions, emit_html};
pub use error::{LoadError, ParseError, VerbatimKind};
pub use inline::tokenize;
pub use parser::{ParseOptions, parse};
pub use resolver::{IdMap, resolve};
pub use slug::slugify;
pub use source::{
    convert_directory, convert_file, convert_files, load_directory, load_file, load_files,
    load_path,
};
pub use syntax::{ID_MARKER, declared_identity};
pub use target::{Target, TargetRegistry};

/// Converts one document to an HTML fragment.
pub fn org_to_html(text: &str, heading_offset: u8, separator: &str) -> Result<String, ParseError> {
    let mut document = Document::parse(text, &ParseOptions { heading_offset })?;
    Ok(document.to_html(&HtmlEmitOptions {
        separator: separator.to_string(),
        ..HtmlEmitOptions::default()
    }))
}
