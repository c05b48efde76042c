//! Bullet list items

use std::sync::LazyLock;

use regex::Regex;

use super::Source;
use crate::markdown::{Block, BlockKind};
use crate::types::Item;
use crate::validation::{combine, ParseErrors, Validated};

/// Issue reference at the very end of an item, e.g. `- Fixed a bug #TINY-6611`
static ISSUE_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+#(?P<issue>[A-Z]{2,10}-\d+)\s*$").expect("Invalid regex")
});

pub(crate) fn parse_item(source: &Source<'_>, node: &Block) -> Validated<Item> {
    if node.kind != BlockKind::Item {
        return Err(ParseErrors::one(format!(
            "Expected a list item{}",
            node.location()
        )));
    }

    let offset = source.block_range(node);
    let issue = ISSUE_REF
        .captures(source.extract_text(node))
        .and_then(|caps| caps.name("issue"))
        .map(|m| m.as_str().to_string());

    Ok(Item { offset, issue })
}

pub(crate) fn parse_list(source: &Source<'_>, list: &Block) -> Validated<Vec<Item>> {
    combine(list.children.iter().map(|item| parse_item(source, item)))
}
