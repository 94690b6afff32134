//! Line state machine.
//!
//! Input is consumed one line at a time. The parser keeps a cursor into the
//! tree (the node that receives the next content) and at most one open
//! verbatim region; every line is dispatched to the first construct that
//! recognizes it.

use regex::Captures;

use crate::ast::{InlineSeq, ListKind, NodeId, NodeKind, Tree};
use crate::document::{Document, Keyword};
use crate::error::{ParseError, VerbatimKind};
use crate::inline::{target_names, tokenize};
use crate::syntax::{
    BLANK, DEFINITION_ITEM, HEADING, KEYWORD, ORDERED_ITEM, QUOTE_BEGIN, QUOTE_END, SRC_BEGIN,
    SRC_END, TABLE_ROW, UNORDERED_ITEM, declared_identity,
};
use crate::target::TargetRegistry;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseOptions {
    /// Level of a single-star heading. `** x` renders one level below it.
    pub heading_offset: u8,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { heading_offset: 1 }
    }
}

/// Parses a whole document. The first structural error aborts the parse.
pub fn parse(source: &str, options: &ParseOptions) -> Result<Document, ParseError> {
    let mut tree = Tree::new();
    let mut targets = TargetRegistry::new();
    let mut keywords = Vec::new();
    let mut parser = Parser {
        tree: &mut tree,
        targets: &mut targets,
        keywords: &mut keywords,
        heading_offset: options.heading_offset,
        current: Tree::ROOT,
        open: None,
    };
    for (idx, line) in source.lines().enumerate() {
        parser.line(line, idx + 1)?;
    }
    parser.finish()?;
    let identity = declared_identity(source).map(str::to_string);
    Ok(Document::from_parts(tree, targets, keywords, identity))
}

#[derive(Clone, Copy, Debug)]
struct OpenBlock {
    kind: VerbatimKind,
    line: usize,
}

struct Parser<'a> {
    tree: &'a mut Tree,
    targets: &'a mut TargetRegistry,
    keywords: &'a mut Vec<Keyword>,
    heading_offset: u8,
    current: NodeId,
    // Quote and code regions exclude each other, so one slot is enough.
    open: Option<OpenBlock>,
}

impl Parser<'_> {
    fn line(&mut self, line: &str, number: usize) -> Result<(), ParseError> {
        if let Some(open) = self.open {
            if !is_end_marker(open.kind, line) {
                self.tree
                    .append(self.current, NodeKind::Verbatim(line.to_string()));
                return Ok(());
            }
        }

        if let Some(caps) = HEADING.captures(line) {
            self.heading(caps["level"].len(), caps["title"].trim_end());
            return Ok(());
        }
        if let Some(caps) = QUOTE_BEGIN.captures(line) {
            let cite = caps.name("cite").map(|cite| cite.as_str().trim().to_string());
            self.begin(VerbatimKind::Quote, NodeKind::Blockquote { cite }, number);
            return Ok(());
        }
        if QUOTE_END.is_match(line) {
            return self.end(VerbatimKind::Quote, number);
        }
        if let Some(caps) = SRC_BEGIN.captures(line) {
            let language = caps
                .name("language")
                .map(|language| language.as_str().to_string());
            self.begin(VerbatimKind::Code, NodeKind::CodeBlock { language }, number);
            return Ok(());
        }
        if SRC_END.is_match(line) {
            return self.end(VerbatimKind::Code, number);
        }
        if let Some(caps) = KEYWORD.captures(line) {
            if !is_block_marker(&caps["key"]) {
                self.keywords.push(Keyword {
                    key: caps["key"].to_string(),
                    value: caps["value"].to_string(),
                });
                return Ok(());
            }
        }
        // A `::` separator makes a bullet a definition, so definitions are
        // tried before plain bullets.
        if let Some(caps) = ORDERED_ITEM.captures(line) {
            self.list_item(ListKind::Ordered, &caps);
            return Ok(());
        }
        if let Some(caps) = DEFINITION_ITEM.captures(line) {
            self.list_item(ListKind::Definition, &caps);
            return Ok(());
        }
        if let Some(caps) = UNORDERED_ITEM.captures(line) {
            self.list_item(ListKind::Unordered, &caps);
            return Ok(());
        }
        if let Some(caps) = TABLE_ROW.captures(line) {
            return self.table_row(&caps["cells"], number);
        }
        if BLANK.is_match(line) {
            if matches!(self.tree.kind(self.current), NodeKind::Paragraph) {
                self.ascend();
            }
            return Ok(());
        }
        self.text(line);
        Ok(())
    }

    fn finish(self) -> Result<(), ParseError> {
        match self.open {
            Some(open) => Err(ParseError::Unterminated {
                line: open.line,
                block: open.kind,
            }),
            None => Ok(()),
        }
    }

    fn ascend(&mut self) {
        if let Some(parent) = self.tree.parent(self.current) {
            self.current = parent;
        }
    }

    fn heading(&mut self, stars: usize, title: &str) {
        let level = heading_level(stars, self.heading_offset);
        let mut cursor = self.current;
        loop {
            match self.tree.kind(cursor) {
                NodeKind::Root => break,
                NodeKind::Heading { level: open, .. } if *open < level => break,
                _ => {}
            }
            match self.tree.parent(cursor) {
                Some(parent) => cursor = parent,
                None => break,
            }
        }
        self.current = self.tree.append(
            cursor,
            NodeKind::Heading {
                level,
                title: title.to_string(),
            },
        );
    }

    fn begin(&mut self, kind: VerbatimKind, node: NodeKind, number: usize) {
        self.current = self.tree.append(self.current, node);
        self.open = Some(OpenBlock { kind, line: number });
    }

    fn end(&mut self, kind: VerbatimKind, number: usize) -> Result<(), ParseError> {
        if !matches!(self.open, Some(open) if open.kind == kind) {
            return Err(ParseError::UnopenedBlock {
                line: number,
                block: kind,
            });
        }
        let mut cursor = self.current;
        while !is_block_of(kind, self.tree.kind(cursor)) {
            cursor = self
                .tree
                .parent(cursor)
                .ok_or(ParseError::UnbalancedBlock {
                    line: number,
                    block: kind,
                })?;
        }
        self.current = self.tree.parent(cursor).unwrap_or(Tree::ROOT);
        self.open = None;
        Ok(())
    }

    fn list_item(&mut self, kind: ListKind, caps: &Captures<'_>) {
        while matches!(self.tree.kind(self.current), NodeKind::Paragraph) {
            self.ascend();
        }
        let depth = caps["depth"].len();

        let reopen = match self.tree.kind(self.current) {
            NodeKind::List {
                kind: open,
                depth: open_depth,
            } => *open != kind || depth > *open_depth,
            _ => true,
        };
        if reopen {
            self.open_list(kind, depth);
        }
        loop {
            match self.tree.kind(self.current) {
                NodeKind::List {
                    kind: open,
                    depth: open_depth,
                } if *open == kind && depth < *open_depth => self.ascend(),
                _ => break,
            }
        }
        // Closing nested levels can ascend past the outermost list onto a
        // non-list parent, or land on a list of another kind. Either way the
        // item gets a fresh list there instead of a bare `<li>`.
        if !matches!(self.tree.kind(self.current), NodeKind::List { kind: open, .. } if *open == kind)
        {
            self.open_list(kind, depth);
        }

        let title = tokenize(&caps["item"]);
        let description = caps
            .name("description")
            .map(|description| tokenize(description.as_str()));
        let mut names = owned_target_names(&title);
        if let Some(description) = &description {
            names.extend(owned_target_names(description));
        }
        let item = self
            .tree
            .append(self.current, NodeKind::ListItem { title, description });
        for name in names {
            self.targets.register(&name, item);
        }
    }

    fn open_list(&mut self, kind: ListKind, depth: usize) {
        self.current = self
            .tree
            .append(self.current, NodeKind::List { kind, depth });
    }

    fn table_row(&mut self, cells: &str, number: usize) -> Result<(), ParseError> {
        if !matches!(self.tree.kind(self.current), NodeKind::Table) {
            self.current = self.tree.append(self.current, NodeKind::Table);
        }
        let row = self.tree.append(self.current, NodeKind::TableRow);
        for text in cells.split('|').filter(|cell| !cell.is_empty()) {
            let cell = self.tree.append(row, NodeKind::TableCell);
            self.cell(cell, text, number)?;
        }
        Ok(())
    }

    /// Runs the line dispatch on a cell's text with its own cursor.
    fn cell(&mut self, cell: NodeId, text: &str, number: usize) -> Result<(), ParseError> {
        let mut nested = Parser {
            tree: &mut *self.tree,
            targets: &mut *self.targets,
            keywords: &mut *self.keywords,
            heading_offset: self.heading_offset,
            current: cell,
            open: None,
        };
        nested.line(text, number)?;
        nested.finish()
    }

    fn text(&mut self, line: &str) {
        let container = match self.tree.kind(self.current) {
            NodeKind::Root | NodeKind::Heading { .. } => {
                self.current = self.tree.append(self.current, NodeKind::Paragraph);
                self.current
            }
            _ => self.current,
        };
        let inlines = tokenize(line);
        for name in target_names(&inlines) {
            self.targets.register(name, container);
        }
        self.tree.append(container, NodeKind::Text(inlines));
    }
}

fn heading_level(stars: usize, offset: u8) -> u8 {
    let stars = u8::try_from(stars).unwrap_or(u8::MAX);
    stars.saturating_add(offset).saturating_sub(1).max(1)
}

fn is_end_marker(kind: VerbatimKind, line: &str) -> bool {
    match kind {
        VerbatimKind::Quote => QUOTE_END.is_match(line),
        VerbatimKind::Code => SRC_END.is_match(line),
    }
}

fn is_block_of(kind: VerbatimKind, node: &NodeKind) -> bool {
    match kind {
        VerbatimKind::Quote => matches!(node, NodeKind::Blockquote { .. }),
        VerbatimKind::Code => matches!(node, NodeKind::CodeBlock { .. }),
    }
}

fn is_block_marker(key: &str) -> bool {
    let key = key.to_ascii_uppercase();
    key.starts_with("BEGIN_") || key.starts_with("END_")
}

fn owned_target_names(inlines: &InlineSeq) -> Vec<String> {
    target_names(inlines)
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Inline;
    use pretty_assertions::assert_eq;

    fn outline(source: &str) -> String {
        parse(source, &ParseOptions::default())
            .expect("parse")
            .outline()
    }

    #[test]
    fn heading_contains_deeper_heading() {
        assert_eq!(
            outline("* Heading1\n** Heading2"),
            "Org(Heading1(Heading2()))"
        );
    }

    #[test]
    fn equal_levels_are_siblings() {
        assert_eq!(outline("* A\n* B"), "Org(Heading1() Heading1())");
    }

    #[test]
    fn skipped_level_nests_directly() {
        assert_eq!(outline("* A\n*** C\n** B"), "Org(Heading1(Heading3() Heading2()))");
    }

    #[test]
    fn heading_offset_shifts_levels() {
        let doc = parse("* A\n** B", &ParseOptions { heading_offset: 2 }).expect("parse");
        assert_eq!(doc.outline(), "Org(Heading2(Heading3()))");
    }

    #[test]
    fn paragraph_lines_share_one_paragraph() {
        assert_eq!(
            outline("* H\nfirst\nsecond\n\nthird"),
            "Org(Heading1(Paragraph(Text Text) Paragraph(Text)))"
        );
    }

    #[test]
    fn whitespace_only_line_closes_paragraph() {
        assert_eq!(outline("one\n   \ntwo"), "Org(Paragraph(Text) Paragraph(Text))");
    }

    #[test]
    fn list_depths_nest_and_close() {
        let source = " - a\n - b\n  - c\n   - d\n  - e\n - f";
        assert_eq!(
            outline(source),
            "Org(UnOrderedList(ListItem ListItem UnOrderedList(ListItem UnOrderedList(ListItem) ListItem) ListItem))"
        );
    }

    #[test]
    fn kind_change_opens_nested_list() {
        assert_eq!(
            outline("- a\n1. b\n2. c"),
            "Org(UnOrderedList(ListItem OrderedList(ListItem ListItem)))"
        );
    }

    #[test]
    fn closing_onto_other_kind_opens_new_list() {
        assert_eq!(
            outline("- a\n  1. b\n1. c"),
            "Org(UnOrderedList(ListItem OrderedList(ListItem) OrderedList(ListItem)))"
        );
    }

    #[test]
    fn list_closes_open_paragraph() {
        assert_eq!(
            outline("text\n- item"),
            "Org(Paragraph(Text) UnOrderedList(ListItem))"
        );
    }

    #[test]
    fn definition_wins_over_bullet() {
        assert_eq!(
            outline("- term :: meaning"),
            "Org(DefinitionList(DefinitionListItem(DefinitionListItemTitle DefinitionListItemDescription)))"
        );
    }

    #[test]
    fn table_rows_share_one_table() {
        assert_eq!(
            outline("|a|b|\n|c|d|"),
            "Org(Table(TableRow(TableCell(Text) TableCell(Text)) TableRow(TableCell(Text) TableCell(Text))))"
        );
    }

    #[test]
    fn quote_lines_are_verbatim() {
        let doc = parse(
            "#+BEGIN_QUOTE: http://example.com/source\n*not bold*\n#+END_QUOTE",
            &ParseOptions::default(),
        )
        .expect("parse");
        assert_eq!(doc.outline(), "Org(Blockquote(Text))");
        let quote = doc.tree().children(Tree::ROOT)[0];
        assert_eq!(
            doc.tree().kind(quote),
            &NodeKind::Blockquote {
                cite: Some("http://example.com/source".to_string())
            }
        );
        let line = doc.tree().children(quote)[0];
        assert_eq!(
            doc.tree().kind(line),
            &NodeKind::Verbatim("*not bold*".to_string())
        );
    }

    #[test]
    fn code_block_keeps_markers_of_other_blocks() {
        assert_eq!(
            outline("#+BEGIN_SRC python\n* not a heading\n#+END_QUOTE\n#+END_SRC\nafter"),
            "Org(CodeBlock(Text Text) Paragraph(Text))"
        );
    }

    #[test]
    fn unterminated_code_block_is_fatal() {
        let err = parse("#+BEGIN_SRC\ncode", &ParseOptions::default()).unwrap_err();
        assert_eq!(
            err,
            ParseError::Unterminated {
                line: 1,
                block: VerbatimKind::Code
            }
        );
    }

    #[test]
    fn end_without_begin_is_fatal() {
        let err = parse("text\n#+END_QUOTE", &ParseOptions::default()).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnopenedBlock {
                line: 2,
                block: VerbatimKind::Quote
            }
        );
    }

    #[test]
    fn keywords_produce_no_nodes() {
        let doc = parse("#+TITLE: Notes\n#+ID: abc-123\n* Heading", &ParseOptions::default())
            .expect("parse");
        assert_eq!(doc.outline(), "Org(Heading1())");
        assert_eq!(doc.keyword("title"), Some("Notes"));
        assert_eq!(doc.identity(), Some("abc-123"));
    }

    #[test]
    fn unspaced_identity_is_consumed_as_keyword() {
        let doc = parse("#+ID:abc\n* Top", &ParseOptions::default()).expect("parse");
        assert_eq!(doc.outline(), "Org(Heading1())");
        assert_eq!(doc.identity(), Some("abc"));
        assert_eq!(doc.keyword("id"), Some("abc"));
    }

    #[test]
    fn inline_target_registers_paragraph() {
        let doc = parse("intro <<spot>> here\nmore", &ParseOptions::default()).expect("parse");
        let paragraph = doc.tree().children(Tree::ROOT)[0];
        let target = doc.targets().lookup("spot").expect("target");
        assert_eq!(target.container, paragraph);
        assert_eq!(target.id, "target-1-spot");
    }

    #[test]
    fn target_in_list_item_registers_item() {
        let doc = parse("- first <<here>>", &ParseOptions::default()).expect("parse");
        let list = doc.tree().children(Tree::ROOT)[0];
        let item = doc.tree().children(list)[0];
        assert_eq!(doc.targets().lookup("here").map(|t| t.container), Some(item));
        let NodeKind::ListItem { title, .. } = doc.tree().kind(item) else {
            panic!("expected list item");
        };
        assert_eq!(title.last(), Some(&Inline::Target("here".to_string())));
    }

    #[test]
    fn target_in_cell_registers_cell() {
        let doc = parse("| a <<cell>> | b |", &ParseOptions::default()).expect("parse");
        let table = doc.tree().children(Tree::ROOT)[0];
        let row = doc.tree().children(table)[0];
        let cell = doc.tree().children(row)[0];
        assert_eq!(doc.targets().lookup("cell").map(|t| t.container), Some(cell));
    }
}
