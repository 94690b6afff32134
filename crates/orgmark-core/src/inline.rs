//! Inline tokenizer.
//!
//! Categories are tried in a fixed priority order against the whole text.
//! The first category with any match splits the text into the part before
//! the match, the construct itself and the part after; both remainders are
//! tokenized again from the top of the priority list, the part after in a loop. A category with higher
//! priority therefore wins even when a lower one matches further left.

use regex::{Captures, Regex};

use crate::ast::{Inline, InlineSeq, InternalLink, LinkRef, Style};
use crate::syntax::{
    BOLD, IMAGE, INLINE_CODE, INTERNAL_LINK, ITALIC, LINK, MONOSPACE, STRIKETHROUGH, TARGET,
    UNDERLINE,
};

#[derive(Clone, Copy, Debug)]
enum Category {
    Code,
    Target,
    Link,
    InternalLink,
    Image,
    Styled(Style),
}

const PRIORITY: [Category; 10] = [
    Category::Code,
    Category::Target,
    Category::Link,
    Category::InternalLink,
    Category::Image,
    Category::Styled(Style::Bold),
    Category::Styled(Style::Italic),
    Category::Styled(Style::Underline),
    Category::Styled(Style::Strikethrough),
    Category::Styled(Style::Monospace),
];

impl Category {
    fn pattern(self) -> &'static Regex {
        match self {
            Category::Code => &INLINE_CODE,
            Category::Target => &TARGET,
            Category::Link => &LINK,
            Category::InternalLink => &INTERNAL_LINK,
            Category::Image => &IMAGE,
            Category::Styled(Style::Bold) => &BOLD,
            Category::Styled(Style::Italic) => &ITALIC,
            Category::Styled(Style::Underline) => &UNDERLINE,
            Category::Styled(Style::Strikethrough) => &STRIKETHROUGH,
            Category::Styled(Style::Monospace) => &MONOSPACE,
        }
    }

    fn build(self, caps: &Captures<'_>) -> Inline {
        match self {
            Category::Code => Inline::Code(caps["text"].to_string()),
            Category::Target => Inline::Target(caps["name"].to_string()),
            Category::Link => {
                let href = caps["url"].to_string();
                let label = match caps.name("label") {
                    Some(label) => tokenize(label.as_str()),
                    None => vec![Inline::Text(href.clone())],
                };
                Inline::Link { href, label }
            }
            Category::InternalLink => {
                let text = caps["reference"].to_string();
                let label = match caps.name("label") {
                    Some(label) => tokenize(label.as_str()),
                    None => vec![Inline::Text(text.clone())],
                };
                let reference = if &caps["scheme"] == "#" {
                    LinkRef::Local(text.clone())
                } else {
                    LinkRef::Id(text.clone())
                };
                Inline::InternalLink(InternalLink {
                    reference,
                    anchor: text,
                    label,
                    resolved: false,
                })
            }
            Category::Image => Inline::Image {
                src: caps["src"].to_string(),
                alt: caps.name("alt").map(|alt| alt.as_str().to_string()),
            },
            Category::Styled(style) => Inline::Styled {
                style,
                content: tokenize(&caps["text"]),
            },
        }
    }
}

/// Splits one line (or table cell) into literal and marked-up tokens.
pub fn tokenize(text: &str) -> InlineSeq {
    let mut out = Vec::new();
    tokenize_into(text, &mut out);
    out
}

fn tokenize_into(mut text: &str, out: &mut InlineSeq) {
    // None of the patterns are anchored, so a category without a match in
    // the text has none in any suffix of it either.
    let mut exhausted = [false; PRIORITY.len()];
    'rest: while !text.is_empty() {
        for (slot, category) in PRIORITY.into_iter().enumerate() {
            if exhausted[slot] {
                continue;
            }
            let Some(caps) = category.pattern().captures(text) else {
                exhausted[slot] = true;
                continue;
            };
            let Some(whole) = caps.get(0) else {
                continue;
            };
            // Only lower categories can match in `before`, which bounds the
            // recursion by the length of the priority list.
            tokenize_into(&text[..whole.start()], out);
            out.push(category.build(&caps));
            text = &text[whole.end()..];
            continue 'rest;
        }
        out.push(Inline::Text(text.to_string()));
        return;
    }
}

/// Names of every `<<target>>` marker in `inlines`, in order.
pub(crate) fn target_names(inlines: &[Inline]) -> Vec<&str> {
    let mut out = Vec::new();
    collect_target_names(inlines, &mut out);
    out
}

fn collect_target_names<'a>(inlines: &'a [Inline], out: &mut Vec<&'a str>) {
    for inline in inlines {
        match inline {
            Inline::Target(name) => out.push(name),
            Inline::Styled { content, .. } => collect_target_names(content, out),
            Inline::Link { label, .. } => collect_target_names(label, out),
            Inline::InternalLink(link) => collect_target_names(&link.label, out),
            _ => {}
        }
    }
}
