use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Category given to elements with neither a shop nor an amenity tag
pub const UNCATEGORIZED: &str = "Altro";

/// Name used when the `name` tag exists but is empty
pub const UNNAMED: &str = "N/D";

/// Contact details resolved from OSM tags.
///
/// Each field prefers the `contact:` namespaced tag over the bare one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Phone,
    Email,
    Website,
}

impl ContactField {
    /// Tag keys in lookup order
    pub fn keys(self) -> [&'static str; 2] {
        match self {
            ContactField::Phone => ["contact:phone", "phone"],
            ContactField::Email => ["contact:email", "email"],
            ContactField::Website => ["contact:website", "website"],
        }
    }

    /// First present tag value, or an empty string
    pub fn resolve(self, tags: &HashMap<String, String>) -> String {
        self.keys()
            .iter()
            .find_map(|key| tags.get(*key))
            .cloned()
            .unwrap_or_default()
    }
}

/// Derive the category of an element: shop, then amenity, then `Altro`
pub fn category_from_tags(tags: &HashMap<String, String>) -> String {
    ["shop", "amenity"]
        .iter()
        .filter_map(|key| tags.get(*key))
        .find(|value| !value.is_empty())
        .cloned()
        .unwrap_or_else(|| UNCATEGORIZED.to_string())
}

/// A shop or amenity flattened out of its OSM tags
///
/// Serialized field names match the CSV export header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipo")]
    pub category: String,
    #[serde(rename = "telefono", default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "sito_web", default)]
    pub website: String,
    #[serde(rename = "lat")]
    pub latitude: Option<f64>,
    #[serde(rename = "lon")]
    pub longitude: Option<f64>,
}

impl ActivityRecord {
    /// Build a record from an element's tags and position.
    ///
    /// Returns `None` when there is no `name` tag.
    pub fn from_tags(
        tags: &HashMap<String, String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Option<Self> {
        let name = tags.get("name")?;
        let name = if name.is_empty() {
            UNNAMED.to_string()
        } else {
            name.clone()
        };

        Some(Self {
            name,
            category: category_from_tags(tags),
            phone: ContactField::Phone.resolve(tags),
            email: ContactField::Email.resolve(tags),
            website: ContactField::Website.resolve(tags),
            latitude,
            longitude,
        })
    }

    /// (lat, lon) when both coordinates are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}
