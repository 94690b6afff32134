//! Document tree.
//!
//! Block structure lives in an arena owned by [`Tree`]; nodes refer to each
//! other through [`NodeId`] indices, so the parser's cursor is a plain value
//! that moves up and down by following parent links. Inline content is owned
//! by the `Text` and `ListItem` nodes that carry it.

pub type InlineSeq = Vec<Inline>;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ListKind {
    Ordered,
    Unordered,
    Definition,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Root,
    Heading {
        level: u8,
        title: String,
    },
    Paragraph,
    List {
        kind: ListKind,
        depth: usize,
    },
    ListItem {
        title: InlineSeq,
        // Present only for items of a definition list.
        description: Option<InlineSeq>,
    },
    Table,
    TableRow,
    TableCell,
    Blockquote {
        cite: Option<String>,
    },
    CodeBlock {
        language: Option<String>,
    },
    Text(InlineSeq),
    /// A raw line inside a quote or code region.
    Verbatim(String),
}

impl NodeKind {
    /// Leaves never receive children and never become the parser cursor.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            NodeKind::ListItem { .. } | NodeKind::Text(_) | NodeKind::Verbatim(_)
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// Number of nodes below the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[Self::ROOT.index()].children.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub(crate) fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Adds a node as the last child of `parent` and returns its id.
    pub(crate) fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        debug_assert!(!self.kind(parent).is_leaf(), "leaf nodes have no children");
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// All node ids in document order, starting at `from`.
    pub fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    pub fn first_heading(&self) -> Option<NodeId> {
        self.descendants(Self::ROOT)
            .into_iter()
            .find(|id| matches!(self.kind(*id), NodeKind::Heading { .. }))
    }

    /// Compact structural description, e.g. `Org(Heading1(Paragraph(Text)))`.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.outline_node(Self::ROOT, &mut out);
        out
    }

    fn outline_node(&self, id: NodeId, out: &mut String) {
        let kind = self.kind(id);
        match kind {
            NodeKind::Root => out.push_str("Org"),
            NodeKind::Heading { level, .. } => {
                out.push_str("Heading");
                out.push_str(&level.to_string());
            }
            NodeKind::Paragraph => out.push_str("Paragraph"),
            NodeKind::List { kind, .. } => out.push_str(match kind {
                ListKind::Ordered => "OrderedList",
                ListKind::Unordered => "UnOrderedList",
                ListKind::Definition => "DefinitionList",
            }),
            NodeKind::ListItem {
                description: Some(_),
                ..
            } => {
                out.push_str(
                    "DefinitionListItem(DefinitionListItemTitle DefinitionListItemDescription)",
                );
                return;
            }
            NodeKind::ListItem { .. } => out.push_str("ListItem"),
            NodeKind::Table => out.push_str("Table"),
            NodeKind::TableRow => out.push_str("TableRow"),
            NodeKind::TableCell => out.push_str("TableCell"),
            NodeKind::Blockquote { .. } => out.push_str("Blockquote"),
            NodeKind::CodeBlock { .. } => out.push_str("CodeBlock"),
            NodeKind::Text(_) | NodeKind::Verbatim(_) => out.push_str("Text"),
        }
        if kind.is_leaf() {
            return;
        }
        out.push('(');
        for (idx, child) in self.children(id).iter().enumerate() {
            if idx > 0 {
                out.push(' ');
            }
            self.outline_node(*child, out);
        }
        out.push(')');
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Style {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Monospace,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LinkRef {
    /// `[[#name]]`: an explicit target or a heading title in the same document.
    Local(String),
    /// `[[id:doc-id]]`: another document's identity.
    Id(String),
}

impl LinkRef {
    pub fn text(&self) -> &str {
        match self {
            LinkRef::Local(text) | LinkRef::Id(text) => text,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InternalLink {
    pub reference: LinkRef,
    /// Fragment the link points at once resolved.
    pub anchor: String,
    pub label: InlineSeq,
    pub resolved: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Inline {
    Text(String),
    Styled { style: Style, content: InlineSeq },
    /// Inline code; never tokenized further.
    Code(String),
    Link { href: String, label: InlineSeq },
    Image { src: String, alt: Option<String> },
    InternalLink(InternalLink),
    /// An inline `<<name>>` marker.
    Target(String),
}
