//! Release headings (`## Unreleased`, `## 1.2.3 - 2024-01-31`)

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};
use semver::Version;
use tracing::trace;

use super::section::parse_fragment;
use super::Source;
use crate::headings::{Heading, HeadingId, HeadingTree};
use crate::types::{Offset, Release, ReleaseMeta};
use crate::validation::{combine, merge, Validated};

static UNRELEASED_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^## (?P<lbkt>\[?)Unreleased(?P<rbkt>\]?)$").expect("Invalid regex")
});

static RELEASE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^## (?P<lbkt>\[?)(?P<version>\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)(?P<rbkt>\]?) - (?P<date>\d{4}-\d{2}-\d{2})$",
    )
    .expect("Invalid regex")
});

/// Match `pattern` only if its brackets are balanced: both present or neither
fn match_balanced<'t>(pattern: &Regex, text: &'t str) -> Option<Captures<'t>> {
    let caps = pattern.captures(text)?;
    let len = |name: &str| caps.name(name).map_or(0, |m| m.as_str().len());
    (len("lbkt") == len("rbkt")).then_some(caps)
}

pub(crate) fn parse_releases(
    source: &Source<'_>,
    tree: &HeadingTree,
    releases: &[HeadingId],
) -> Validated<Vec<Release>> {
    combine(
        tree.resolve(releases)
            .enumerate()
            .map(|(i, release)| parse_release(source, tree, release, i == 0)),
    )
}

/// Parse one release heading. Only the first release may be "Unreleased".
pub(crate) fn parse_release(
    source: &Source<'_>,
    tree: &HeadingTree,
    release: &Heading,
    first: bool,
) -> Validated<Release> {
    let mut errors = Vec::new();
    let mut meta = None;
    let location = release.header.location();
    let text = source.extract_text(&release.header);
    let header = source.block_range(&release.header);

    if match_balanced(&UNRELEASED_HEADER, text).is_some() {
        if !first {
            errors.push(format!("Unexpected \"Unreleased\" header{location}"));
        }
    } else if let Some(caps) = match_balanced(&RELEASE_HEADER, text) {
        let version = &caps["version"];
        let date = &caps["date"];
        let parsed_version = Version::parse(version).map_err(|e| {
            format!("Bad version in header \"{version}\": {e}{location}")
        });
        let parsed_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| format!("Bad date in header \"{date}\"{location}"));
        match (parsed_version, parsed_date) {
            (Ok(version), Ok(date)) => meta = Some(ReleaseMeta { version, date }),
            (version, date) => errors.extend(version.err().into_iter().chain(date.err())),
        }
    } else if first {
        errors.push(format!(
            "Expected header text to be \"Unreleased\" or \"<version> - <date>\"{location}"
        ));
    } else {
        errors.push(format!(
            "Expected header text to be \"<version> - <date>\"{location}"
        ));
    }

    if let Some(block) = release.preamble.first() {
        errors.push(format!(
            "Unexpected content under release header{}",
            block.location()
        ));
    }

    let fragment = merge(errors, parse_fragment(source, tree, &release.subheadings))?;
    let end = fragment.last().map_or(header.end, |section| section.offset.end);
    trace!(
        version = ?meta.as_ref().map(|m| &m.version),
        sections = fragment.order.len(),
        "parsed release"
    );

    Ok(Release {
        offset: Offset::new(header.start, end),
        header,
        meta,
        fragment,
    })
}
