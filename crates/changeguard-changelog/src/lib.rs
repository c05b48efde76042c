//! Changeguard Changelog - Keep a Changelog parsing and validation
//!
//! This crate parses a changelog into an offset-annotated tree of releases,
//! sections and items, reporting every grammar violation it finds.

pub mod file;
pub mod headings;
pub mod lines;
pub mod markdown;
pub mod parser;
pub mod policy;
pub mod types;
pub mod validation;

pub use file::load_changelog;
pub use parser::parse_changelog;
pub use policy::{check_policy, PolicyReport};
pub use types::{Changelog, Item, Offset, Release, ReleaseMeta, Section, SectionName};
pub use validation::{combine, ParseErrors, Validated};
