use geo::{Centroid, MultiPoint, Point};
use maud::html;
use serde::Serialize;

use crate::domain::ActivityRecord;

/// Maximum popup width in pixels
pub const POPUP_MAX_WIDTH: u32 = 300;

/// A map pin with its popup markup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lon: f64,
    pub popup: String,
}

/// Everything the browser needs to draw the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: (f64, f64),
    pub zoom: u8,
    pub markers: Vec<Marker>,
}

impl MapView {
    /// Build the map for a filtered record set.
    ///
    /// Records missing either coordinate get no marker and do not count
    /// towards the center. Returns `None` when nothing can be placed.
    pub fn from_records(records: &[ActivityRecord], zoom: u8) -> Option<Self> {
        let markers: Vec<Marker> = records
            .iter()
            .filter_map(|record| {
                let (lat, lon) = record.coordinates()?;
                Some(Marker {
                    lat,
                    lon,
                    popup: popup_html(record),
                })
            })
            .collect();

        let center = mean_center(&markers)?;

        Some(Self {
            center,
            zoom,
            markers,
        })
    }

    /// JSON for embedding inside a `<script>` element
    pub fn to_script_json(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(json.replace("</", "<\\/"))
    }
}

/// Arithmetic mean of the marker positions as (lat, lon)
fn mean_center(markers: &[Marker]) -> Option<(f64, f64)> {
    // geo points are (x = lon, y = lat)
    let points: MultiPoint<f64> = markers
        .iter()
        .map(|m| Point::new(m.lon, m.lat))
        .collect::<Vec<_>>()
        .into();

    points.centroid().map(|c| (c.y(), c.x()))
}

/// Popup content: name and category, then only the contact lines that are set
pub fn popup_html(record: &ActivityRecord) -> String {
    html! {
        b { (record.name) }
        br;
        (record.category)
        @if !record.phone.is_empty() {
            br;
            "📞 " (record.phone)
        }
        @if !record.email.is_empty() {
            br;
            "📧 " (record.email)
        }
        @if is_web_link(&record.website) {
            br;
            a href=(record.website) target="_blank" { "🌐 Sito Web" }
        } @else if !record.website.is_empty() {
            br;
            "🌐 " (record.website)
        }
    }
    .into_string()
}

/// Only http(s) websites become clickable, anything else is shown as text
fn is_web_link(website: &str) -> bool {
    url::Url::parse(website)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
