//! Changelog parsing
//!
//! Parsing happens in two passes. The document is first reduced to a tree of
//! headings, then the tree is walked top-down: the single `# Changelog`
//! heading, its `##` releases, their `###` sections and the bullet items in
//! each section. Every level collects all of its grammar violations before
//! reporting, so one run shows every problem in the file.

mod item;
mod release;
mod section;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use crate::headings::{Heading, HeadingTree};
use crate::lines::{LineIndex, Position};
use crate::markdown::{parse_blocks, Block};
use crate::types::{Changelog, Offset};
use crate::validation::{merge, ParseErrors, Validated};

static CHANGELOG_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)change[ -]?log").expect("Invalid regex"));

/// Source text plus its line index
pub(crate) struct Source<'a> {
    pub text: &'a str,
    pub lines: LineIndex,
}

impl<'a> Source<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            lines: LineIndex::new(text),
        }
    }

    /// Range covering just the block's own content
    pub fn column_range(&self, block: &Block) -> Offset {
        Offset::new(
            self.lines.offset(block.pos.start),
            self.lines.offset(block.pos.end),
        )
    }

    /// Range covering every line the block touches, terminators included
    pub fn block_range(&self, block: &Block) -> Offset {
        Offset::new(
            self.lines.offset(Position::new(block.pos.start.line, 1)),
            self.lines.line_end(block.pos.end.line),
        )
    }

    /// The block's own content
    pub fn extract_text(&self, block: &Block) -> &'a str {
        self.column_range(block).slice(self.text)
    }
}

/// Parse and validate a changelog.
///
/// On failure every problem found is returned, each message ending with the
/// line and column of the offending node where one is known.
#[instrument(skip(text), fields(len = text.len()))]
pub fn parse_changelog(text: &str) -> Validated<Changelog> {
    let source = Source::new(text);
    let tree = HeadingTree::build(parse_blocks(text, &source.lines));
    debug!(headings = tree.len(), lines = source.lines.line_count(), "built heading tree");

    let result = parse_top(&source, &tree);
    match &result {
        Ok(changelog) => debug!(releases = changelog.releases.len(), "parsed changelog"),
        Err(errors) => debug!(errors = errors.len(), "changelog is invalid"),
    }
    result
}

fn parse_top(source: &Source<'_>, tree: &HeadingTree) -> Validated<Changelog> {
    let mut errors = Vec::new();

    if let Some(block) = tree.preamble.first() {
        errors.push(format!("Unexpected content without heading{}", block.location()));
    }

    let Some(&top_id) = tree.top.first() else {
        errors.push("No top level heading".to_string());
        return Err(ParseErrors(errors));
    };

    if let Some(&extra) = tree.top.get(1) {
        errors.push(format!(
            "Unexpected additional top level headings{}",
            tree.get(extra).header.location()
        ));
    }

    let top = tree.get(top_id);
    if top.level() != 1 {
        errors.push(format!(
            "First top-level heading is not a h1{}",
            top.header.location()
        ));
    }
    if !CHANGELOG_TITLE.is_match(source.extract_text(&top.header)) {
        errors.push(format!(
            "First top-level heading does not contain \"Changelog\"{}",
            top.header.location()
        ));
    }

    let releases = merge(errors, release::parse_releases(source, tree, &top.subheadings))?;

    let end_of_preamble = match releases.first() {
        Some(first) => first.offset.start.saturating_sub(1),
        None => preamble_end(source, top),
    };
    let start_of_links = match releases.last() {
        Some(last) => last.offset.end + 1,
        None => end_of_preamble + 1,
    };

    Ok(Changelog {
        source: source.text.to_string(),
        preamble: Offset::new(0, end_of_preamble),
        releases,
        links: Offset::new(start_of_links, source.text.len()),
    })
}

/// End of the title heading's own content when there are no releases
fn preamble_end(source: &Source<'_>, top: &Heading) -> usize {
    match top.preamble.last() {
        Some(block) => source.block_range(block).end,
        None => source.block_range(&top.header).end,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SectionName;
    use chrono::NaiveDate;
    use semver::Version;

    const STANDARD: &str = "# Changelog
All notable changes to this project will be documented in this file.

The format is based on [Keep a Changelog](https://keepachangelog.com/en/1.0.0/).

## Unreleased

### Fixed
- Fixed the toolbar overflowing when the editor was resized #TINY-6611

## 5.6.2 - 2020-12-08

### Fixed
- Fixed a UI rendering regression when the document body is using `display: flex` #TINY-6783

## 5.6.0 - 2020-11-18

### Added
- Added a new option to the image dialog #TINY-6528
- Added support for right-to-left text #TINY-6487

### Changed
- Changed the default placeholder text #TINY-6248

### Security
- Fixed a possible XSS vector in the link plugin #TINY-6518
";

    fn offset_of(text: &str, needle: &str) -> usize {
        text.find(needle).unwrap()
    }

    #[test]
    fn test_empty_changelog() {
        let errors = parse_changelog("").unwrap_err();
        assert_eq!(errors.messages(), ["No top level heading"]);
    }

    #[test]
    fn test_content_without_any_heading() {
        let errors = parse_changelog("Just text\n").unwrap_err();
        assert_eq!(
            errors.messages(),
            [
                "Unexpected content without heading (line: 1 column: 1)",
                "No top level heading"
            ]
        );
    }

    #[test]
    fn test_standard_changelog() {
        let changelog = parse_changelog(STANDARD).unwrap();
        assert_eq!(changelog.source, STANDARD);
        assert_eq!(changelog.releases.len(), 3);

        let unreleased_start = offset_of(STANDARD, "## Unreleased");
        assert_eq!(changelog.preamble, Offset::new(0, unreleased_start - 1));
        assert_eq!(
            changelog.links,
            Offset::new(STANDARD.len(), STANDARD.len())
        );
        assert_eq!(changelog.text(changelog.links), "");

        let unreleased = &changelog.releases[0];
        assert!(unreleased.meta.is_none());
        assert_eq!(unreleased.header.slice(STANDARD), "## Unreleased\n");
        assert_eq!(unreleased.section_names(), [SectionName::Fixed]);
        let fixed = unreleased.section(SectionName::Fixed).unwrap();
        assert_eq!(fixed.items.len(), 1);
        assert_eq!(fixed.items[0].issue_ref(), Some("TINY-6611"));
        assert_eq!(fixed.offset.start, offset_of(STANDARD, "### Fixed"));
        assert_eq!(
            unreleased.offset.end + 1,
            offset_of(STANDARD, "## 5.6.2")
        );

        let release = &changelog.releases[1];
        let meta = release.meta.as_ref().unwrap();
        assert_eq!(meta.version, Version::new(5, 6, 2));
        assert_eq!(meta.date, NaiveDate::from_ymd_opt(2020, 12, 8).unwrap());
        assert_eq!(release.offset.start, offset_of(STANDARD, "## 5.6.2"));

        let last = &changelog.releases[2];
        assert_eq!(
            last.section_names(),
            [SectionName::Added, SectionName::Changed, SectionName::Security]
        );
        assert_eq!(last.item_count(), 4);
        assert_eq!(last.offset.end, STANDARD.len() - 1);
    }

    #[test]
    fn test_section_headers_start_with_their_name() {
        let changelog = parse_changelog(STANDARD).unwrap();
        for release in &changelog.releases {
            for section in release.sections() {
                let header = changelog.text(section.header);
                assert!(header.starts_with(&format!("### {}", section.name)));
            }
        }
    }

    #[test]
    fn test_releases_tile_the_document() {
        let changelog = parse_changelog(STANDARD).unwrap();
        for pair in changelog.releases.windows(2) {
            assert_eq!(pair[0].offset.end + 1, pair[1].offset.start);
        }
        assert_eq!(
            changelog.preamble.end + 1,
            changelog.releases[0].offset.start
        );
        assert_eq!(
            changelog.links.start,
            changelog.releases.last().unwrap().offset.end + 1
        );
    }

    #[test]
    fn test_spans_within_a_release() {
        let changelog = parse_changelog(STANDARD).unwrap();
        let release = &changelog.releases[2];
        let header_start = offset_of(STANDARD, "## 5.6.0");
        let added_start = offset_of(STANDARD, "### Added");
        let changed_start = offset_of(STANDARD, "### Changed");
        let security_start = offset_of(STANDARD, "### Security");

        assert_eq!(release.header, Offset::new(header_start, added_start - 2));
        assert_eq!(release.offset, Offset::new(header_start, STANDARD.len() - 1));

        let added = release.section(SectionName::Added).unwrap();
        let changed = release.section(SectionName::Changed).unwrap();
        let security = release.section(SectionName::Security).unwrap();
        assert_eq!(added.offset, Offset::new(added_start, changed_start - 1));
        assert_eq!(added.header.end + 1, added.list.start);
        assert_eq!(changed.offset, Offset::new(changed_start, security_start - 1));
        assert_eq!(security.offset.end, STANDARD.len() - 1);

        let second_item = offset_of(STANDARD, "- Added support");
        assert_eq!(
            added.items[0].offset,
            Offset::new(offset_of(STANDARD, "- Added a new option"), second_item - 1)
        );
        assert_eq!(added.items[1].offset, Offset::new(second_item, changed_start - 1));
        assert_eq!(added.items[1].offset.end, added.list.end);
        assert_eq!(added.items[1].issue_ref(), Some("TINY-6487"));
    }

    #[test]
    fn test_crlf_offsets_match_lf_structure() {
        let crlf = STANDARD.replace('\n', "\r\n");
        let changelog = parse_changelog(&crlf).unwrap();
        assert_eq!(changelog.releases.len(), 3);
        let release = &changelog.releases[1];
        assert_eq!(release.header.slice(&crlf), "## 5.6.2 - 2020-12-08\r\n");
        let fixed = release.section(SectionName::Fixed).unwrap();
        assert_eq!(changelog.text(fixed.header), "### Fixed\r\n");
        assert_eq!(changelog.releases[2].offset.end, crlf.len() - 1);
    }

    #[test]
    fn test_trailing_links() {
        let text = "# Changelog\n\n## 1.0.0 - 2021-01-01\n\n### Added\n- First release\n\n[1.0.0]: https://example.com/releases/1.0.0\n";
        let changelog = parse_changelog(text).unwrap();
        let release = &changelog.releases[0];
        assert_eq!(changelog.links.start, release.offset.end + 1);
        assert_eq!(
            changelog.text(changelog.links),
            "[1.0.0]: https://example.com/releases/1.0.0\n"
        );
        assert_eq!(changelog.text(release.offset).matches('\n').count(), 5);
    }

    #[test]
    fn test_no_releases() {
        let text = "# Changelog\n\nNothing yet.\n";
        let changelog = parse_changelog(text).unwrap();
        assert!(changelog.releases.is_empty());
        assert_eq!(changelog.preamble, Offset::new(0, text.len() - 1));
        assert_eq!(changelog.links, Offset::new(text.len(), text.len()));
    }

    #[test]
    fn test_title_only() {
        let text = "# Change-log\n";
        let changelog = parse_changelog(text).unwrap();
        assert_eq!(changelog.preamble, Offset::new(0, text.len() - 1));
    }

    #[test]
    fn test_unreleased_later_is_an_error() {
        let text = "# Changelog\n\n## 1.0.0 - 2021-01-01\n\n### Added\n- a\n\n## Unreleased\n\n### Fixed\n- b\n";
        let errors = parse_changelog(text).unwrap_err();
        assert_eq!(
            errors.messages(),
            ["Unexpected \"Unreleased\" header (line: 8 column: 1)"]
        );
    }

    #[test]
    fn test_sections_out_of_order_fail_the_release() {
        let text = "# Changelog\n\n## 1.0.0 - 2021-01-01\n\n### Fixed\n- a\n\n### Added\n- b\n";
        let errors = parse_changelog(text).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.messages()[0].starts_with("Expected heading \"### Added\" to be listed earlier"));
    }

    #[test]
    fn test_title_problems() {
        let text = "## Releases\n\n# Another\n";
        let errors = parse_changelog(text).unwrap_err();
        assert_eq!(
            errors.messages(),
            [
                "Unexpected additional top level headings (line: 3 column: 1)",
                "First top-level heading is not a h1 (line: 1 column: 1)",
                "First top-level heading does not contain \"Changelog\" (line: 1 column: 1)",
            ]
        );
    }

    #[test]
    fn test_title_and_release_errors_are_reported_together() {
        let text = "# Release notes\n\n## 1.0\n";
        let errors = parse_changelog(text).unwrap_err();
        assert_eq!(
            errors.messages(),
            [
                "First top-level heading does not contain \"Changelog\" (line: 1 column: 1)",
                "Expected header text to be \"Unreleased\" or \"<version> - <date>\" (line: 3 column: 1)",
            ]
        );
    }

    #[test]
    fn test_errors_from_every_release_accumulate() {
        let text = "# Changelog\n\n## Unreleased\n\n### Fixed\n1. a\n\n## 1.0.0 - 2021-01-01\n\n### Bugs\n- b\n";
        let errors = parse_changelog(text).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.messages()[0].contains("ordered list"));
        assert!(errors.messages()[1].starts_with("Expected heading to match one of"));
    }

    #[test]
    fn test_source_is_preserved() {
        let text = "# CHANGELOG\r\n\r\n## [Unreleased]\r\n";
        let changelog = parse_changelog(text).unwrap();
        assert_eq!(changelog.source, text);
        assert!(changelog.unreleased().is_some());
        assert!(changelog.latest_release().is_none());
    }
}
