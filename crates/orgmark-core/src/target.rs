use std::collections::{BTreeMap, HashMap};

use crate::ast::NodeId;
use crate::slug::slugify;

/// One `<<name>>` marker, bound to the block that contained it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Target {
    pub id: String,
    pub text: String,
    pub container: NodeId,
}

/// Per-document target registry.
///
/// Ids are unique (`target-<ordinal>-<slug>`); text is not. Registering the
/// same text twice replaces the text lookup while the earlier target keeps
/// its own id in [`TargetRegistry::iter`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TargetRegistry {
    targets: Vec<Target>,
    by_text: HashMap<String, usize>,
    // Container -> index of the first target registered on it.
    anchors: HashMap<NodeId, usize>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn register(&mut self, text: &str, container: NodeId) -> &Target {
        let ordinal = self.targets.len() + 1;
        let index = self.targets.len();
        self.targets.push(Target {
            id: format!("target-{ordinal}-{}", slugify(text)),
            text: text.to_string(),
            container,
        });
        self.by_text.insert(text.to_string(), index);
        self.anchors.entry(container).or_insert(index);
        &self.targets[index]
    }

    /// The most recently registered target with exactly this text.
    pub fn lookup(&self, text: &str) -> Option<&Target> {
        self.by_text.get(text).map(|index| &self.targets[*index])
    }

    /// The id rendered on `container`, if any target was registered on it.
    pub fn anchor_of(&self, container: NodeId) -> Option<&str> {
        self.anchors
            .get(&container)
            .map(|index| self.targets[*index].id.as_str())
    }

    /// Anchor a link to `text` should point at.
    pub fn resolve(&self, text: &str) -> Option<&str> {
        let target = self.lookup(text)?;
        self.anchor_of(target.container)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Every registered target in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    /// Flattened text -> anchor map, as shared between documents.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.by_text
            .keys()
            .filter_map(|text| {
                self.resolve(text)
                    .map(|anchor| (text.clone(), anchor.to_string()))
            })
            .collect()
    }
}
