use crate::api::OverpassResponse;
use crate::domain::ActivityRecord;

/// Parse an Overpass response into activity records
///
/// # Algorithm
/// For each element, in response order:
///    - Skip it when it has no tags or no `name` tag
///    - Resolve category and contact fields from the tags
///    - Copy lat/lon as-is, missing values stay missing
///
/// Duplicates are kept.
pub fn parse_activities(response: &OverpassResponse) -> Vec<ActivityRecord> {
    let records: Vec<ActivityRecord> = response
        .elements
        .iter()
        .filter_map(|element| {
            let tags = element.tags.as_ref()?;
            ActivityRecord::from_tags(tags, element.lat, element.lon)
        })
        .collect();

    tracing::debug!(
        elements = response.elements.len(),
        records = records.len(),
        dropped = response.elements.len() - records.len(),
        "mapped Overpass elements"
    );

    records
}
