//! Command classification and snapshot deltas
//!
//! Classifies raw per-command call counters into semantic buckets and
//! computes per-category deltas between two parsed command-statistics
//! snapshots. The taxonomy itself is immutable data injected at
//! construction; rate normalization and negative-delta handling are
//! caller policy, not taxonomy behavior.

pub mod categories;

pub use categories::{CommandCategory, DEFAULT_CATEGORIES};

use crate::parser::InfoTree;

/// Immutable category table with delta computation
#[derive(Debug, Clone)]
pub struct CommandTaxonomy {
    categories: Vec<CommandCategory>,
}

impl Default for CommandTaxonomy {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.to_vec(),
        }
    }
}

impl CommandTaxonomy {
    /// Build a taxonomy from an explicit category table
    pub fn new(categories: Vec<CommandCategory>) -> Self {
        Self { categories }
    }

    /// Categories in output-column order
    pub fn categories(&self) -> &[CommandCategory] {
        &self.categories
    }

    /// Total call delta for one category between two snapshots.
    ///
    /// A command absent from either snapshot contributes zero: commands
    /// never invoked during the window simply do not appear in the
    /// report, and that must not fail the category.
    pub fn delta(&self, category: &CommandCategory, a: &InfoTree, b: &InfoTree) -> i64 {
        let mut total = 0;
        for cmd in category.commands {
            let key = format!("cmdstat_{}", cmd);
            if let (Some(before), Some(after)) = (a.command_calls(&key), b.command_calls(&key)) {
                total += after - before;
            }
        }
        total
    }

    /// Deltas for every category, in category order
    pub fn all_deltas(&self, a: &InfoTree, b: &InfoTree) -> Vec<i64> {
        self.categories
            .iter()
            .map(|cat| self.delta(cat, a, b))
            .collect()
    }
}
