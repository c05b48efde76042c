//! Project policies applied on top of a well-formed changelog

use changeguard_core::config::{ChangelogConfig, IssueRefPolicy};
use serde::Serialize;
use tracing::debug;

use crate::lines::LineIndex;
use crate::types::Changelog;

/// Problems found by [`check_policy`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PolicyReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl PolicyReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Check a parsed changelog against the configured policies
pub fn check_policy(changelog: &Changelog, config: &ChangelogConfig) -> PolicyReport {
    let mut report = PolicyReport::default();
    let lines = LineIndex::new(&changelog.source);
    let location = |offset: usize| {
        let pos = lines.position(offset);
        format!(" (line: {} column: {})", pos.line, pos.column)
    };

    if config.require_unreleased && changelog.unreleased().is_none() {
        let at = changelog
            .releases
            .first()
            .map_or(String::new(), |r| location(r.offset.start));
        report
            .errors
            .push(format!("Expected the first release to be \"Unreleased\"{at}"));
    }

    if config.issue_refs != IssueRefPolicy::Ignore {
        let missing = changelog
            .releases
            .iter()
            .flat_map(|release| release.sections())
            .flat_map(|section| section.items.iter())
            .filter(|item| item.issue.is_none())
            .map(|item| format!("Entry has no issue reference{}", location(item.offset.start)));

        match config.issue_refs {
            IssueRefPolicy::Require => report.errors.extend(missing),
            _ => report.warnings.extend(missing),
        }
    }

    debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "checked changelog policy"
    );
    report
}
