use std::collections::BTreeSet;
use std::fmt;

use super::ActivityRecord;

/// Label of the "all categories" choice
pub const ALL_CATEGORIES: &str = "Tutti";

/// Category selection made by the user for one run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Interpret a user supplied choice. The sentinel or an empty string
    /// selects every category.
    pub fn from_choice(choice: &str) -> Self {
        if choice.is_empty() || choice == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(choice.to_string())
        }
    }

    pub fn matches(&self, record: &ActivityRecord) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => record.category == *category,
        }
    }

    /// Records matching the selection, in input order
    pub fn apply(&self, records: &[ActivityRecord]) -> Vec<ActivityRecord> {
        records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }

    /// The choice as shown in the category select
    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(category) => category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Selectable choices: the sentinel, then every distinct category sorted.
pub fn category_options(records: &[ActivityRecord]) -> Vec<String> {
    let distinct: BTreeSet<&str> = records.iter().map(|r| r.category.as_str()).collect();

    std::iter::once(ALL_CATEGORIES)
        .chain(distinct)
        .map(str::to_string)
        .collect()
}
