//! One pass from locality to filtered records.

use anyhow::{Context, Result};

use crate::api::ElementSource;
use crate::domain::{ActivityRecord, CategoryFilter, category_options};
use crate::osm::parse_activities;

/// Outcome of one run, ready for presentation
#[derive(Debug, Clone)]
pub struct Report {
    pub locality: String,
    /// Sentinel first, then the distinct categories of the unfiltered set
    pub categories: Vec<String>,
    pub selection: CategoryFilter,
    pub total: usize,
    pub records: Vec<ActivityRecord>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Each category option with the number of records it selects
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        self.categories
            .iter()
            .map(|category| {
                let filter = CategoryFilter::from_choice(category);
                let count = self.records.iter().filter(|r| filter.matches(r)).count();
                (category.clone(), count)
            })
            .collect()
    }
}

/// Fetch, map and filter the activities of `locality`
pub fn run<S: ElementSource + ?Sized>(
    source: &S,
    locality: &str,
    selection: CategoryFilter,
) -> Result<Report> {
    let response = source
        .fetch(locality)
        .with_context(|| format!("Failed to fetch activities for {locality}"))?;

    let all = parse_activities(&response);
    let categories = category_options(&all);
    let records = selection.apply(&all);

    tracing::debug!(
        locality,
        selection = %selection,
        total = all.len(),
        filtered = records.len(),
        "pipeline finished"
    );

    Ok(Report {
        locality: locality.to_string(),
        categories,
        selection,
        total: all.len(),
        records,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::{FetchError, OverpassResponse, parse_response};
    use std::cell::RefCell;

    /// Serves a canned Overpass body and remembers the requested localities
    pub(crate) struct StaticSource {
        pub body: String,
        pub requested: RefCell<Vec<String>>,
    }

    impl StaticSource {
        pub(crate) fn new(body: &str) -> Self {
            Self {
                body: body.to_string(),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl ElementSource for StaticSource {
        fn fetch(&self, locality: &str) -> Result<OverpassResponse, FetchError> {
            self.requested.borrow_mut().push(locality.to_string());
            parse_response(&self.body)
        }
    }

    pub(crate) const RAGUSA_BODY: &str = r#"{
        "elements": [
            {"type": "node", "id": 1, "lat": 1.0, "lon": 1.0,
             "tags": {"name": "Bar Roma", "amenity": "cafe", "contact:phone": "+39 0932 111111"}},
            {"type": "node", "id": 2, "lat": 3.0, "lon": 3.0,
             "tags": {"name": "Conad", "shop": "supermarket"}},
            {"type": "node", "id": 3,
             "tags": {"name": "Caffè Sicilia", "amenity": "cafe"}},
            {"type": "node", "id": 4, "lat": 5.0, "lon": 5.0,
             "tags": {"shop": "bakery"}}
        ]
    }"#;

    #[test]
    fn test_run_all() {
        let source = StaticSource::new(RAGUSA_BODY);
        let report = run(&source, "Ragusa", CategoryFilter::All).unwrap();

        assert_eq!(source.requested.borrow().as_slice(), ["Ragusa"]);
        assert_eq!(report.total, 3);
        assert_eq!(report.records.len(), 3);
        assert_eq!(report.categories, vec!["Tutti", "cafe", "supermarket"]);
    }

    #[test]
    fn test_run_filtered_keeps_all_options() {
        let source = StaticSource::new(RAGUSA_BODY);
        let report = run(
            &source,
            "Ragusa",
            CategoryFilter::Only("cafe".to_string()),
        )
        .unwrap();

        assert_eq!(report.total, 3);
        let names: Vec<&str> = report.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Bar Roma", "Caffè Sicilia"]);
        assert_eq!(report.categories, vec!["Tutti", "cafe", "supermarket"]);
    }

    #[test]
    fn test_category_counts() {
        let source = StaticSource::new(RAGUSA_BODY);
        let report = run(&source, "Ragusa", CategoryFilter::All).unwrap();

        assert_eq!(
            report.category_counts(),
            vec![
                ("Tutti".to_string(), 3),
                ("cafe".to_string(), 2),
                ("supermarket".to_string(), 1),
            ]
        );
        assert_eq!(source.requested.borrow().len(), 1);
    }

    #[test]
    fn test_run_propagates_fetch_error() {
        let source = StaticSource::new("not json");
        let err = run(&source, "Ragusa", CategoryFilter::All).unwrap_err();
        assert!(err.to_string().contains("Ragusa"));
    }

    #[test]
    fn test_run_empty_locality() {
        let source = StaticSource::new(r#"{"elements": []}"#);
        let report = run(&source, "Nowhere", CategoryFilter::All).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.categories, vec!["Tutti"]);
    }
}
