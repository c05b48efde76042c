//! Heading tree
//!
//! Reduces the flat block sequence of a document into a hierarchy of
//! headings. Each heading owns the non-heading blocks that directly follow
//! it (its preamble) and every deeper heading up to the next heading of the
//! same or a shallower level.

use crate::markdown::Block;

/// Index of a heading in a [`HeadingTree`]
pub type HeadingId = usize;

/// A heading and what it owns
#[derive(Debug, Clone)]
pub struct Heading {
    pub header: Block,
    pub preamble: Vec<Block>,
    pub subheadings: Vec<HeadingId>,
}

impl Heading {
    pub fn level(&self) -> u8 {
        self.header.heading_level().unwrap_or(0)
    }
}

/// Arena of headings plus the content and headings found at document level
#[derive(Debug, Clone, Default)]
pub struct HeadingTree {
    headings: Vec<Heading>,
    /// Blocks before the first heading
    pub preamble: Vec<Block>,
    /// Headings with no parent
    pub top: Vec<HeadingId>,
}

impl HeadingTree {
    /// Build the tree in one forward pass with a stack of open headings
    pub fn build(blocks: Vec<Block>) -> Self {
        let mut tree = Self::default();
        let mut stack: Vec<HeadingId> = Vec::new();

        for block in blocks {
            match block.heading_level() {
                Some(level) => {
                    while stack
                        .last()
                        .is_some_and(|&open| tree.headings[open].level() >= level)
                    {
                        stack.pop();
                    }

                    let id = tree.headings.len();
                    tree.headings.push(Heading {
                        header: block,
                        preamble: Vec::new(),
                        subheadings: Vec::new(),
                    });
                    match stack.last() {
                        Some(&parent) => tree.headings[parent].subheadings.push(id),
                        None => tree.top.push(id),
                    }
                    stack.push(id);
                }
                None => match stack.last() {
                    Some(&open) => tree.headings[open].preamble.push(block),
                    None => tree.preamble.push(block),
                },
            }
        }

        tree
    }

    pub fn get(&self, id: HeadingId) -> &Heading {
        &self.headings[id]
    }

    /// Resolve a list of ids into headings
    pub fn resolve<'a>(&'a self, ids: &'a [HeadingId]) -> impl Iterator<Item = &'a Heading> + 'a {
        ids.iter().map(move |&id| &self.headings[id])
    }

    pub fn len(&self) -> usize {
        self.headings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }
}
