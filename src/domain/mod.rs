pub mod activity;
pub mod filter;

pub use activity::{ActivityRecord, ContactField, UNCATEGORIZED, UNNAMED, category_from_tags};
pub use filter::{ALL_CATEGORIES, CategoryFilter, category_options};
