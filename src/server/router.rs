use astra::Request;
use std::collections::HashMap;

use super::response::{ResultResp, ServerError, csv_response, html_response};
use crate::api::ElementSource;
use crate::domain::CategoryFilter;
use crate::export::{export_file_name, to_csv_string};
use crate::pipeline;
use crate::render::{PageOptions, report_page};

/// Per-server settings shared by every request
#[derive(Debug, Clone)]
pub struct Settings {
    pub default_locality: String,
    pub zoom: u8,
}

pub fn handle(req: &Request, source: &dyn ElementSource, settings: &Settings) -> ResultResp {
    let method = req.method().as_str();
    let path = req.uri().path();

    match (method, path) {
        ("GET", "/") => {
            let (locality, selection) = search_params(req, settings);
            let report = pipeline::run(source, &locality, selection)?;

            let options = PageOptions {
                zoom: settings.zoom,
                download_href: export_href(&report.locality, &report.selection),
                interactive: true,
            };
            html_response(report_page(&report, &options))
        }
        ("GET", "/export.csv") => {
            let (locality, selection) = search_params(req, settings);
            let report = pipeline::run(source, &locality, selection)?;

            let csv = to_csv_string(&report.records)?;
            csv_response(csv, &export_file_name(&report.locality))
        }
        _ => Err(ServerError::NotFound),
    }
}

/// Locality and category from the query string, with defaults
fn search_params(req: &Request, settings: &Settings) -> (String, CategoryFilter) {
    let params = parse_query(req);

    let locality = params
        .get("locality")
        .cloned()
        .unwrap_or_else(|| settings.default_locality.clone());
    let selection = params
        .get("category")
        .map(|c| CategoryFilter::from_choice(c))
        .unwrap_or_default();

    (locality, selection)
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}

fn export_href(locality: &str, selection: &CategoryFilter) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("locality", locality)
        .append_pair("category", selection.label())
        .finish();
    format!("/export.csv?{query}")
}
