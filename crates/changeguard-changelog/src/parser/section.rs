//! Release sections (`### Added`, `### Fixed`, ...)

use std::collections::HashSet;

use tracing::trace;

use super::item::parse_list;
use super::Source;
use crate::headings::{HeadingId, HeadingTree};
use crate::markdown::BlockKind;
use crate::types::{Fragment, Offset, Section, SectionName};
use crate::validation::{check, Validated};

/// Parse the headings directly under a release into its sections.
///
/// Sections must be level 3, named after one of [`SectionName::ALL`], listed
/// in canonical order without repeats, and each hold exactly one bullet list.
pub(crate) fn parse_fragment(
    source: &Source<'_>,
    tree: &HeadingTree,
    headings: &[HeadingId],
) -> Validated<Fragment> {
    let mut fragment = Fragment::default();
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    // Index into SectionName::ALL; only ever moves forward.
    let mut cursor = 0;

    for heading in tree.resolve(headings) {
        let header = &heading.header;
        let location = header.location();

        if heading.level() != 3 {
            errors.push(format!("Expected heading to be level 3{location}"));
        }

        let text = source.extract_text(header);
        let name = SectionName::ALL
            .iter()
            .copied()
            .find(|name| text.strip_prefix("### ") == Some(name.as_str()));

        let mut accepted = None;
        match name {
            None => errors.push(format!(
                "Expected heading to match one of: {}{location}",
                expected_headings(cursor)
            )),
            Some(name) if seen.contains(&name) => {
                errors.push(format!("Heading \"### {name}\" is a repeat{location}"));
            }
            Some(name) if name.index() < cursor => {
                errors.push(format!(
                    "Expected heading \"### {name}\" to be listed earlier as headings must be in the order {}{location}",
                    canonical_order()
                ));
                seen.insert(name);
                accepted = Some(name);
            }
            Some(name) => {
                cursor = name.index();
                seen.insert(name);
                accepted = Some(name);
            }
        }

        if let Some(&first) = heading.subheadings.first() {
            errors.push(format!(
                "Unexpected subheadings{}",
                tree.get(first).header.location()
            ));
        }

        let list = match heading.preamble.as_slice() {
            [] => {
                errors.push(format!(
                    "Expected a bullet list under the section header but found nothing{location}"
                ));
                continue;
            }
            [_, second, ..] => {
                errors.push(format!(
                    "Expected a bullet list but found more than one node{}",
                    second.location()
                ));
                continue;
            }
            [block] => match block.kind {
                BlockKind::List { ordered: false } => block,
                BlockKind::List { ordered: true } => {
                    errors.push(format!(
                        "Expected a bullet list but found an ordered list{}",
                        block.location()
                    ));
                    continue;
                }
                _ => {
                    errors.push(format!(
                        "Expected a bullet list but found a non-list node{}",
                        block.location()
                    ));
                    continue;
                }
            },
        };

        let items = match parse_list(source, list) {
            Ok(items) => items,
            Err(e) => {
                errors.extend(e);
                continue;
            }
        };

        if let Some(name) = accepted {
            let header = source.block_range(header);
            let list = source.block_range(list);
            trace!(section = %name, items = items.len(), "parsed section");
            fragment.order.push(name);
            fragment.sections.insert(
                name,
                Section {
                    name,
                    offset: Offset::new(header.start, list.end),
                    header,
                    list,
                    items,
                },
            );
        }
    }

    check(errors, fragment)
}

fn expected_headings(from: usize) -> String {
    SectionName::ALL[from..]
        .iter()
        .map(|name| format!("\"### {name}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn canonical_order() -> String {
    SectionName::ALL
        .iter()
        .map(SectionName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
