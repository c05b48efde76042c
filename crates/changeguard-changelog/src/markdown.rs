//! Markdown block tree
//!
//! A thin adapter over `pulldown-cmark` that exposes only what changelog
//! parsing needs: the top-level blocks of a document, their kind and their
//! source positions. Lists keep their direct items as children.
//!
//! Headings and paragraphs end on their last content line. Lists and list
//! items stay open across the blank lines that follow them and end on the
//! line before the next content line, so consecutive blocks tile the text.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag};
use tracing::trace;

use crate::lines::{LineIndex, Position};

/// Kind of a block-level node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading { level: u8 },
    List { ordered: bool },
    Item,
    Paragraph,
    CodeBlock,
    BlockQuote,
    HtmlBlock,
    ThematicBreak,
    Other,
}

impl BlockKind {
    fn from_tag(tag: &Tag<'_>) -> Self {
        match tag {
            Tag::Heading { level, .. } => Self::Heading {
                level: heading_level(*level),
            },
            Tag::List(start) => Self::List {
                ordered: start.is_some(),
            },
            Tag::Item => Self::Item,
            Tag::Paragraph => Self::Paragraph,
            Tag::CodeBlock(_) => Self::CodeBlock,
            Tag::BlockQuote(_) => Self::BlockQuote,
            Tag::HtmlBlock => Self::HtmlBlock,
            _ => Self::Other,
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Inclusive start and end positions of a block's own content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePos {
    pub start: Position,
    pub end: Position,
}

/// A block-level node
#[derive(Debug, Clone)]
pub struct Block {
    pub kind: BlockKind,
    pub pos: SourcePos,
    pub children: Vec<Block>,
}

impl Block {
    fn new(kind: BlockKind, text: &str, index: &LineIndex, range: std::ops::Range<usize>) -> Self {
        Self {
            kind,
            pos: source_pos(text, index, range),
            children: Vec::new(),
        }
    }

    /// Heading level, if this is a heading
    pub fn heading_level(&self) -> Option<u8> {
        match self.kind {
            BlockKind::Heading { level } => Some(level),
            _ => None,
        }
    }

    /// Suffix used by error messages to point at this block
    pub fn location(&self) -> String {
        format!(
            " (line: {} column: {})",
            self.pos.start.line, self.pos.start.column
        )
    }
}

/// Map a byte range onto positions, dropping trailing whitespace so that a
/// block never reaches onto the line after its last character.
fn source_pos(text: &str, index: &LineIndex, range: std::ops::Range<usize>) -> SourcePos {
    let bytes = text.as_bytes();
    let mut end = range.end.min(bytes.len());
    while end > range.start + 1 && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    SourcePos {
        start: index.position(range.start),
        end: index.position(end.saturating_sub(1).max(range.start)),
    }
}

/// Parse `text` into its sequence of top-level blocks
pub fn parse_blocks(text: &str, index: &LineIndex) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;
    let mut depth = 0usize;

    for (event, range) in Parser::new_ext(text, Options::empty()).into_offset_iter() {
        match event {
            Event::Start(tag) => {
                if depth == 0 {
                    current = Some(Block::new(BlockKind::from_tag(&tag), text, index, range));
                } else if depth == 1 && matches!(tag, Tag::Item) {
                    if let Some(list) = current.as_mut() {
                        list.children
                            .push(Block::new(BlockKind::Item, text, index, range));
                    }
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some(block) = current.take() {
                        trace!(kind = ?block.kind, line = block.pos.start.line, "block");
                        blocks.push(block);
                    }
                }
            }
            Event::Rule if depth == 0 => {
                blocks.push(Block::new(BlockKind::ThematicBreak, text, index, range));
            }
            _ => {}
        }
    }

    for list in blocks
        .iter_mut()
        .filter(|block| matches!(block.kind, BlockKind::List { .. }))
    {
        close_list(list, text, index);
    }

    blocks
}

/// Extend a list and its items over trailing blank lines.
///
/// Each item ends on the line before the next item starts, and the last item
/// ends with the list.
fn close_list(list: &mut Block, text: &str, index: &LineIndex) {
    let mut last = list.pos.end.line;
    while last < index.line_count() && is_blank_line(text, index, last + 1) {
        last += 1;
    }
    if last > list.pos.end.line {
        list.pos.end = index.position(index.line_end(last));
    }

    let starts: Vec<usize> = list
        .children
        .iter()
        .skip(1)
        .map(|item| item.pos.start.line)
        .collect();
    let list_end = list.pos.end;
    for (i, item) in list.children.iter_mut().enumerate() {
        let end = match starts.get(i) {
            Some(&next) => index.position(index.line_end(next - 1)),
            None => list_end,
        };
        if end.line > item.pos.end.line {
            item.pos.end = end;
        }
    }
}

fn is_blank_line(text: &str, index: &LineIndex, line: usize) -> bool {
    let start = index.line_start(line).unwrap_or(text.len());
    let end = index.line_start(line + 1).unwrap_or(text.len());
    text[start..end].trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(text: &str) -> Vec<Block> {
        parse_blocks(text, &LineIndex::new(text))
    }

    #[test]
    fn test_headings_and_levels() {
        let parsed = blocks("# Changelog\n\n## Unreleased\n\n### Fixed\n");
        let levels: Vec<_> = parsed.iter().filter_map(Block::heading_level).collect();
        assert_eq!(levels, vec![1, 2, 3]);
    }

    #[test]
    fn test_heading_position() {
        let parsed = blocks("# Changelog\n\n## Unreleased\n");
        assert_eq!(parsed[1].pos.start, Position::new(3, 1));
        assert_eq!(parsed[1].pos.end, Position::new(3, 13));
    }

    #[test]
    fn test_bullet_list_items() {
        let parsed = blocks("- one\n- two\n- three\n");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].kind, BlockKind::List { ordered: false });
        assert_eq!(parsed[0].children.len(), 3);
        assert!(parsed[0].children.iter().all(|c| c.kind == BlockKind::Item));
        assert_eq!(parsed[0].pos.end.line, 3);
    }

    #[test]
    fn test_ordered_list() {
        let parsed = blocks("1. one\n2. two\n");
        assert_eq!(parsed[0].kind, BlockKind::List { ordered: true });
    }

    #[test]
    fn test_nested_list_items_are_not_children() {
        let parsed = blocks("- one\n  - nested\n- two\n");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].children.len(), 2);
    }

    #[test]
    fn test_paragraph_and_rule() {
        let parsed = blocks("Some text\n\n---\n");
        assert_eq!(parsed[0].kind, BlockKind::Paragraph);
        assert_eq!(parsed[1].kind, BlockKind::ThematicBreak);
    }

    #[test]
    fn test_html_block() {
        let parsed = blocks("<div>\nhi\n</div>\n\n# Next\n");
        assert_eq!(parsed[0].kind, BlockKind::HtmlBlock);
        assert_eq!(parsed[1].heading_level(), Some(1));
    }

    #[test]
    fn test_link_definitions_produce_no_blocks() {
        let parsed = blocks("[1.0.0]: https://example.com/1.0.0\n");
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_list_runs_up_to_next_block() {
        let parsed = blocks("- one\n\n\n# Next\n");
        assert_eq!(parsed[0].pos.end.line, 3);
        assert_eq!(parsed[0].children[0].pos.end.line, 3);
        assert_eq!(parsed[1].pos.start.line, 4);
    }

    #[test]
    fn test_paragraph_stops_at_last_content_line() {
        let parsed = blocks("Some text\n\n# Next\n");
        assert_eq!(parsed[0].pos.end, Position::new(1, 9));
    }

    #[test]
    fn test_loose_items_cover_blank_lines_between_them() {
        let parsed = blocks("- one\n\n- two\n\n- three\n");
        let ends: Vec<_> = parsed[0].children.iter().map(|c| c.pos.end.line).collect();
        assert_eq!(ends, vec![2, 4, 5]);
    }

    #[test]
    fn test_list_at_end_of_text_keeps_trailing_blank_lines() {
        let text = "- one\n\n\n";
        let parsed = blocks(text);
        let index = LineIndex::new(text);
        assert_eq!(index.offset(parsed[0].pos.end), text.len() - 1);
    }

    #[test]
    fn test_list_stops_before_link_definitions() {
        let parsed = blocks("- one\n\n[1.0.0]: https://example.com\n");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].pos.end.line, 2);
    }

    #[test]
    fn test_location_suffix() {
        let parsed = blocks("\n\n## Unreleased\n");
        assert_eq!(parsed[0].location(), " (line: 3 column: 1)");
    }
}
