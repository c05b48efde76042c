//! Changelog types

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use semver::Version;
use serde::Serialize;

/// An inclusive byte range into the changelog source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Offset {
    pub start: usize,
    pub end: usize,
}

impl Offset {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of bytes covered
    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The covered text, clamped to the end of `source`
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        let end = (self.end + 1).min(source.len());
        let start = self.start.min(end);
        &source[start..end]
    }
}

/// The fixed set of section headings, in the order they must appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SectionName {
    Added,
    Improved,
    Changed,
    Deprecated,
    Removed,
    Fixed,
    Security,
}

impl SectionName {
    /// Every section name in canonical order
    pub const ALL: [SectionName; 7] = [
        Self::Added,
        Self::Improved,
        Self::Changed,
        Self::Deprecated,
        Self::Removed,
        Self::Fixed,
        Self::Security,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "Added",
            Self::Improved => "Improved",
            Self::Changed => "Changed",
            Self::Deprecated => "Deprecated",
            Self::Removed => "Removed",
            Self::Fixed => "Fixed",
            Self::Security => "Security",
        }
    }

    /// Position in the canonical order
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SectionName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or(())
    }
}

/// One bullet list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    #[serde(flatten)]
    pub offset: Offset,
    /// Issue tracker reference at the end of the entry, e.g. `TINY-6611`
    pub issue: Option<String>,
}

impl Item {
    pub fn issue_ref(&self) -> Option<&str> {
        self.issue.as_deref()
    }

    /// The entry's whole source lines
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.offset.slice(source)
    }
}

/// A `### <name>` heading together with its bullet list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: SectionName,
    #[serde(flatten)]
    pub offset: Offset,
    pub header: Offset,
    pub list: Offset,
    pub items: Vec<Item>,
}

/// Version and date of a published release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseMeta {
    pub version: Version,
    pub date: NaiveDate,
}

/// The sections found under one release heading
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    /// Section names in the order they were encountered
    pub order: Vec<SectionName>,
    pub sections: BTreeMap<SectionName, Section>,
}

impl Fragment {
    /// The section listed last, if any
    pub fn last(&self) -> Option<&Section> {
        self.order.last().and_then(|name| self.sections.get(name))
    }
}

/// A `## <version> - <date>` or `## Unreleased` heading and its sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release {
    #[serde(flatten)]
    pub offset: Offset,
    pub header: Offset,
    /// Absent only for the leading "Unreleased" release
    pub meta: Option<ReleaseMeta>,
    #[serde(rename = "sections", serialize_with = "serialize_sections")]
    pub fragment: Fragment,
}

fn serialize_sections<S: serde::Serializer>(
    fragment: &Fragment,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeSeq;

    let mut seq = serializer.serialize_seq(Some(fragment.order.len()))?;
    for section in fragment.order.iter().filter_map(|n| fragment.sections.get(n)) {
        seq.serialize_element(section)?;
    }
    seq.end()
}

impl Release {
    pub fn is_unreleased(&self) -> bool {
        self.meta.is_none()
    }

    pub fn version(&self) -> Option<&Version> {
        self.meta.as_ref().map(|m| &m.version)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.meta.as_ref().map(|m| m.date)
    }

    /// Names of the sections present, in document order
    pub fn section_names(&self) -> &[SectionName] {
        &self.fragment.order
    }

    pub fn section(&self, name: SectionName) -> Option<&Section> {
        self.fragment.sections.get(&name)
    }

    /// Sections in document order
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.fragment
            .order
            .iter()
            .filter_map(|name| self.fragment.sections.get(name))
    }

    /// Total number of items across all sections
    pub fn item_count(&self) -> usize {
        self.sections().map(|s| s.items.len()).sum()
    }
}

/// A parsed changelog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Changelog {
    /// The input text, unchanged
    #[serde(skip)]
    pub source: String,
    /// Everything from the start of the file up to the first release
    pub preamble: Offset,
    pub releases: Vec<Release>,
    /// Trailing link definitions after the last release; empty when `start == end`
    pub links: Offset,
}

impl Changelog {
    /// The leading "Unreleased" release, if there is one
    pub fn unreleased(&self) -> Option<&Release> {
        self.releases.first().filter(|r| r.is_unreleased())
    }

    /// The most recent release that has a version
    pub fn latest_release(&self) -> Option<&Release> {
        self.releases.iter().find(|r| !r.is_unreleased())
    }

    pub fn find_release(&self, version: &Version) -> Option<&Release> {
        self.releases.iter().find(|r| r.version() == Some(version))
    }

    /// Source text covered by `offset`
    pub fn text(&self, offset: Offset) -> &str {
        offset.slice(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_name_order() {
        assert!(SectionName::Added < SectionName::Improved);
        assert!(SectionName::Fixed < SectionName::Security);
        assert_eq!(SectionName::Security.index(), 6);
        assert_eq!(SectionName::ALL[2], SectionName::Changed);
    }

    #[test]
    fn test_section_name_from_str() {
        assert_eq!("Removed".parse::<SectionName>(), Ok(SectionName::Removed));
        assert!("removed".parse::<SectionName>().is_err());
        assert!("Bug Fixes".parse::<SectionName>().is_err());
    }

    #[test]
    fn test_offset_slice() {
        let source = "abcdef";
        assert_eq!(Offset::new(1, 3).slice(source), "bcd");
        assert_eq!(Offset::new(6, 6).slice(source), "");
        assert_eq!(Offset::new(4, 6).slice(source), "ef");
    }

    #[test]
    fn test_offset_len() {
        assert_eq!(Offset::new(2, 4).len(), 3);
        assert!(Offset::new(3, 2).is_empty());
        assert!(!Offset::new(3, 3).is_empty());
    }
}
