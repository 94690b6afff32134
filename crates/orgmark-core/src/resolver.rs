use std::collections::{BTreeMap, HashMap};

use crate::ast::{Inline, InlineSeq, InternalLink, LinkRef, NodeKind, Tree};
use crate::document::Document;
use crate::slug::slugify;
use crate::target::TargetRegistry;

/// Document identity -> that document's flattened target map.
pub type IdMap = BTreeMap<String, BTreeMap<String, String>>;

/// Resolves every internal link in `document`.
///
/// `[[#x]]` resolves to an explicit target named `x`, else to the slug of a
/// heading titled `x`; targets win when both exist. `[[id:x]]` resolves when
/// `x` is a key of `ids` or the document's own identity. Links already
/// resolved are left alone, so running this again changes nothing.
pub fn resolve(document: &mut Document, ids: Option<&IdMap>) {
    let own_identity = document.identity().map(str::to_string);
    let (tree, targets) = document.parts_mut();
    let headings = heading_anchors(tree);
    let resolver = Resolver {
        targets,
        headings: &headings,
        ids,
        own_identity: own_identity.as_deref(),
    };
    for id in tree.descendants(Tree::ROOT) {
        match tree.kind_mut(id) {
            NodeKind::Text(inlines) => resolver.inlines(inlines),
            NodeKind::ListItem { title, description } => {
                resolver.inlines(title);
                if let Some(description) = description {
                    resolver.inlines(description);
                }
            }
            _ => {}
        }
    }
    document.mark_resolved();
}

/// Heading title -> anchor. A later heading with the same title wins.
fn heading_anchors(tree: &Tree) -> HashMap<String, String> {
    tree.descendants(Tree::ROOT)
        .into_iter()
        .filter_map(|id| match tree.kind(id) {
            NodeKind::Heading { title, .. } => Some((title.clone(), slugify(title))),
            _ => None,
        })
        .collect()
}

struct Resolver<'a> {
    targets: &'a TargetRegistry,
    headings: &'a HashMap<String, String>,
    ids: Option<&'a IdMap>,
    own_identity: Option<&'a str>,
}

impl Resolver<'_> {
    fn inlines(&self, inlines: &mut InlineSeq) {
        for inline in inlines {
            match inline {
                Inline::InternalLink(link) => {
                    self.link(link);
                    self.inlines(&mut link.label);
                }
                Inline::Styled { content, .. } => self.inlines(content),
                Inline::Link { label, .. } => self.inlines(label),
                _ => {}
            }
        }
    }

    fn link(&self, link: &mut InternalLink) {
        if link.resolved {
            return;
        }
        let anchor = match &link.reference {
            LinkRef::Local(text) => self
                .targets
                .resolve(text)
                .or_else(|| self.headings.get(text).map(String::as_str)),
            LinkRef::Id(identity) => self
                .knows_identity(identity)
                .then_some(identity.as_str()),
        };
        if let Some(anchor) = anchor {
            link.anchor = anchor.to_string();
            link.resolved = true;
        }
    }

    fn knows_identity(&self, identity: &str) -> bool {
        self.own_identity == Some(identity)
            || self.ids.is_some_and(|ids| ids.contains_key(identity))
    }
}
