use std::collections::{HashMap, HashSet};

use ammonia::Builder;

use crate::ast::{Inline, ListKind, NodeId, NodeKind, Style, Tree};
use crate::document::Document;
use crate::target::TargetRegistry;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HtmlEmitOptions {
    /// Inserted between rendered siblings; empty gives single-line output.
    pub separator: String,
    /// Surround the output with `<html><body>` and `</body></html>`.
    pub wrap: bool,
    /// Pass the output through an allow-list of the tags this emitter writes.
    pub sanitize: bool,
}

impl HtmlEmitOptions {
    pub fn newline() -> Self {
        Self {
            separator: "\n".to_string(),
            ..Self::default()
        }
    }
}

/// Emits a single document. Links are rendered as they currently stand, so
/// callers normally go through [`Document::to_html`].
pub fn emit_html(document: &Document, options: &HtmlEmitOptions) -> String {
    finish(emit_fragment(document, &options.separator), options)
}

pub(crate) fn emit_fragment(document: &Document, separator: &str) -> String {
    let tree = document.tree();
    let identity = document
        .identity()
        .and_then(|identity| tree.first_heading().map(|heading| (heading, identity)));
    let emitter = Emitter {
        tree,
        targets: document.targets(),
        identity,
    };
    emitter.children(Tree::ROOT, separator, separator, Trim::End)
}

/// Applies sanitizing and wrapping to an already emitted fragment.
pub(crate) fn finish(html: String, options: &HtmlEmitOptions) -> String {
    let html = if options.sanitize {
        sanitize(&html)
    } else {
        html
    };
    if options.wrap {
        format!("<html><body>{html}</body></html>")
    } else {
        html
    }
}

fn sanitize(html: &str) -> String {
    let tags: HashSet<&'static str> = [
        "a",
        "blockquote",
        "code",
        "dd",
        "dl",
        "dt",
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "img",
        "li",
        "ol",
        "p",
        "pre",
        "span",
        "table",
        "tbody",
        "td",
        "tr",
        "ul",
    ]
    .iter()
    .copied()
    .collect();

    let mut generic_attributes: HashSet<&'static str> = HashSet::new();
    generic_attributes.insert("id");

    let mut tag_attributes = HashMap::new();
    tag_attributes.insert("a", ["href"].iter().copied().collect());
    tag_attributes.insert("img", ["alt", "src"].iter().copied().collect());
    tag_attributes.insert("blockquote", ["cite"].iter().copied().collect());
    tag_attributes.insert("code", ["class"].iter().copied().collect());
    tag_attributes.insert("span", ["style"].iter().copied().collect());

    Builder::new()
        .tags(tags)
        .generic_attributes(generic_attributes)
        .tag_attributes(tag_attributes)
        .link_rel(None)
        .clean(html)
        .to_string()
}

/// How literal text is trimmed. Cell contents are trimmed on both sides.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Trim {
    End,
    Both,
}

impl Trim {
    fn apply(self, text: &str) -> &str {
        match self {
            Trim::End => text.trim_end(),
            Trim::Both => text.trim(),
        }
    }
}

struct Emitter<'a> {
    tree: &'a Tree,
    targets: &'a TargetRegistry,
    // First heading and the identity it carries as its id.
    identity: Option<(NodeId, &'a str)>,
}

impl Emitter<'_> {
    /// Renders the children of `id`, each with `separator` available to its
    /// own subtree, joined by `joiner`.
    fn children(&self, id: NodeId, joiner: &str, separator: &str, trim: Trim) -> String {
        self.tree
            .children(id)
            .iter()
            .map(|child| self.node(*child, separator, trim))
            .collect::<Vec<_>>()
            .join(joiner)
    }

    fn node(&self, id: NodeId, separator: &str, trim: Trim) -> String {
        match self.tree.kind(id) {
            NodeKind::Root => self.children(id, separator, separator, trim),
            NodeKind::Heading { level, title } => {
                let id_attr = match self.identity {
                    Some((heading, identity)) if heading == id => attr("id", identity),
                    _ => String::new(),
                };
                format!(
                    "<h{level}{id_attr}>{title}</h{level}>{}",
                    self.children(id, "", separator, Trim::End)
                )
            }
            NodeKind::Paragraph => self.container(id, "p", separator, trim),
            NodeKind::List { kind, .. } => {
                let tag = match kind {
                    ListKind::Ordered => "ol",
                    ListKind::Unordered => "ul",
                    ListKind::Definition => "dl",
                };
                // Nothing below a list uses the separator.
                format!(
                    "<{tag}{}>{}</{tag}>",
                    self.anchor(id),
                    self.children(id, "", "", trim)
                )
            }
            NodeKind::ListItem {
                title,
                description: None,
            } => format!(
                "<li{}>{}</li>",
                self.anchor(id),
                self.inlines(title, separator, trim)
            ),
            NodeKind::ListItem {
                title,
                description: Some(description),
            } => format!(
                "<dt{}>{}</dt><dd>{}</dd>",
                self.anchor(id),
                self.inlines(title, separator, trim),
                self.inlines(description, separator, trim)
            ),
            NodeKind::Table => self.container(id, "table", separator, trim),
            NodeKind::TableRow => self.container(id, "tr", separator, trim),
            NodeKind::TableCell => self.container(id, "td", separator, Trim::Both),
            NodeKind::Blockquote { cite } => {
                let cite = cite
                    .as_deref()
                    .map(|cite| attr("cite", cite))
                    .unwrap_or_default();
                format!(
                    "<blockquote{cite}>{}</blockquote>",
                    self.children(id, separator, separator, trim)
                )
            }
            NodeKind::CodeBlock { language } => {
                let class = language
                    .as_deref()
                    .map(|language| attr("class", language))
                    .unwrap_or_default();
                format!(
                    "<pre><code{class}>{}</code></pre>",
                    self.children(id, separator, separator, trim)
                )
            }
            NodeKind::Text(inlines) => self.inlines(inlines, separator, trim),
            NodeKind::Verbatim(line) => trim.apply(line).to_string(),
        }
    }

    fn container(&self, id: NodeId, tag: &str, separator: &str, trim: Trim) -> String {
        format!(
            "<{tag}{}>{}</{tag}>",
            self.anchor(id),
            self.children(id, separator, separator, trim)
        )
    }

    fn anchor(&self, id: NodeId) -> String {
        self.targets
            .anchor_of(id)
            .map(|anchor| attr("id", anchor))
            .unwrap_or_default()
    }

    fn inlines(&self, inlines: &[Inline], separator: &str, trim: Trim) -> String {
        let mut out = String::new();
        for inline in inlines {
            self.inline(inline, separator, trim, &mut out);
        }
        out
    }

    fn inline(&self, inline: &Inline, separator: &str, trim: Trim, out: &mut String) {
        match inline {
            Inline::Text(text) | Inline::Target(text) => out.push_str(trim.apply(text)),
            Inline::Styled { style, content } => {
                out.push_str("<span style=\"");
                out.push_str(style_css(*style));
                out.push_str("\">");
                out.push_str(&self.inlines(content, separator, Trim::End));
                out.push_str("</span>");
            }
            Inline::Code(code) => {
                out.push_str("<code>");
                out.push_str(&escape_angles(code.trim()));
                out.push_str("</code>");
            }
            Inline::Link { href, label } => {
                out.push_str(&format!("<a{}>", attr("href", href)));
                out.push_str(&self.inlines(label, separator, Trim::End));
                out.push_str("</a>");
            }
            Inline::Image { src, alt } => {
                out.push_str("<img");
                out.push_str(&attr("src", src));
                if let Some(alt) = alt {
                    out.push_str(&attr("alt", alt));
                }
                out.push('>');
                out.push_str(separator);
            }
            Inline::InternalLink(link) => {
                let label = self.inlines(&link.label, separator, Trim::End);
                if link.resolved {
                    out.push_str(&format!(
                        "<a href=\"#{}\">{label}</a>",
                        escape_attr(&link.anchor)
                    ));
                } else {
                    out.push_str(&label);
                }
            }
        }
    }
}

fn style_css(style: Style) -> &'static str {
    match style {
        Style::Bold => "font-weight: bold;",
        Style::Italic => "text-style: italic;",
        Style::Underline => "text-decoration: underlined;",
        Style::Strikethrough => "text-decoration: line-through;",
        Style::Monospace => "font-family: monospace;",
    }
}

fn attr(name: &str, value: &str) -> String {
    format!(" {name}=\"{}\"", escape_attr(value))
}

fn escape_angles(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    let mut out = String::new();
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
