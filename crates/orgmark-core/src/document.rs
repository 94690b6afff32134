use crate::ast::Tree;
use crate::emit::{HtmlEmitOptions, emit_html};
use crate::error::ParseError;
use crate::parser::{ParseOptions, parse};
use crate::resolver::{IdMap, resolve};
use crate::target::TargetRegistry;

/// A `#+KEY: value` line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Keyword {
    pub key: String,
    pub value: String,
}

/// One parsed document: its tree, the targets registered while parsing,
/// its keywords and its identity within a corpus.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    tree: Tree,
    targets: TargetRegistry,
    keywords: Vec<Keyword>,
    identity: Option<String>,
    resolved: bool,
}

impl Document {
    pub fn parse(source: &str, options: &ParseOptions) -> Result<Self, ParseError> {
        parse(source, options)
    }

    pub(crate) fn from_parts(
        tree: Tree,
        targets: TargetRegistry,
        keywords: Vec<Keyword>,
        identity: Option<String>,
    ) -> Self {
        Self {
            tree,
            targets,
            keywords,
            identity,
            resolved: false,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Tree, &TargetRegistry) {
        (&mut self.tree, &self.targets)
    }

    pub fn targets(&self) -> &TargetRegistry {
        &self.targets
    }

    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    /// Value of the first keyword named `key`, compared case-insensitively.
    pub fn keyword(&self, key: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|keyword| keyword.key.eq_ignore_ascii_case(key))
            .map(|keyword| keyword.value.as_str())
    }

    /// The declared `#+ID:` or, inside a corpus, the source-name fallback.
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub(crate) fn set_identity(&mut self, identity: String) {
        self.identity = Some(identity);
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub(crate) fn mark_resolved(&mut self) {
        self.resolved = true;
    }

    pub fn outline(&self) -> String {
        self.tree.outline()
    }

    /// Resolves internal links. Safe to call more than once.
    pub fn resolve(&mut self, ids: Option<&IdMap>) {
        resolve(self, ids);
    }

    /// Renders the document, resolving same-document links first if no
    /// resolution has run yet.
    pub fn to_html(&mut self, options: &HtmlEmitOptions) -> String {
        if !self.resolved {
            self.resolve(None);
        }
        emit_html(self, options)
    }
}
