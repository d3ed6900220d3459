use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::domain::ActivityRecord;
use crate::map::{MapView, POPUP_MAX_WIDTH};
use crate::pipeline::Report;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

pub const EMPTY_NOTICE: &str = "Nessuna attività trovata con questo filtro.";
pub const NO_COORDINATES_NOTICE: &str = "Nessuna delle attività trovate ha coordinate da mostrare sulla mappa.";

/// How a report page is rendered
#[derive(Debug, Clone)]
pub struct PageOptions {
    pub zoom: u8,
    /// Target of the "download CSV" button
    pub download_href: String,
    /// Show the locality/category form that reloads the page
    pub interactive: bool,
}

pub fn layout(title: &str, head: Markup, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="it" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style {
                    "body { font-family: sans-serif; margin: 1.5rem; }"
                    "table { border-collapse: collapse; width: 100%; margin: 1rem 0; }"
                    "th, td { border: 1px solid #ddd; padding: 0.3rem 0.5rem; text-align: left; }"
                    "th { background: #f4f4f4; }"
                    "#map { width: 900px; max-width: 100%; height: 600px; }"
                    ".notice { background: #fff4d6; border: 1px solid #f0c36d; padding: 0.75rem; }"
                }
                (head)
            }
            body { (content) }
        }
    }
}

/// The whole result page: form, count, table, download button and map
pub fn report_page(report: &Report, options: &PageOptions) -> Markup {
    let map = MapView::from_records(&report.records, options.zoom);
    let title = format!("Attività Commerciali a {}", report.locality);

    let head = html! {
        @if map.is_some() {
            link rel="stylesheet" href=(LEAFLET_CSS);
            script src=(LEAFLET_JS) {}
        }
    };

    let content = html! {
        h1 { "📍 Mappa delle Attività Commerciali - " (report.locality) }

        @if options.interactive {
            (search_form(report))
        }

        p { strong { (report.records.len()) " attività trovate." } }

        (records_table(&report.records))

        a class="button" href=(options.download_href) download { "📁 Scarica CSV" }

        @if report.is_empty() {
            p class="notice" { (EMPTY_NOTICE) }
        } @else {
            @match &map {
                Some(view) => { (map_section(view)) }
                None => { p class="notice" { (NO_COORDINATES_NOTICE) } }
            }
        }
    };

    layout(&title, head, content)
}

fn search_form(report: &Report) -> Markup {
    html! {
        form method="get" action="/" {
            label {
                "Inserisci il nome della città "
                input type="text" name="locality" value=(report.locality);
            }
            " "
            label {
                "Filtra per tipo di attività "
                select name="category" onchange="this.form.submit()" {
                    @for category in &report.categories {
                        option value=(category) selected[category == report.selection.label()] {
                            (category)
                        }
                    }
                }
            }
            " "
            button type="submit" { "Cerca" }
        }
    }
}

pub fn records_table(records: &[ActivityRecord]) -> Markup {
    html! {
        table {
            thead {
                tr {
                    th { "nome" }
                    th { "tipo" }
                    th { "telefono" }
                    th { "email" }
                    th { "sito_web" }
                    th { "lat" }
                    th { "lon" }
                }
            }
            tbody {
                @for record in records {
                    tr {
                        td { (record.name) }
                        td { (record.category) }
                        td { (record.phone) }
                        td { (record.email) }
                        td { (record.website) }
                        td { @if let Some(lat) = record.latitude { (lat) } }
                        td { @if let Some(lon) = record.longitude { (lon) } }
                    }
                }
            }
        }
    }
}

fn map_section(view: &MapView) -> Markup {
    // MapView only holds numbers and strings
    let json = view.to_script_json().unwrap_or_else(|_| "null".to_string());
    let script = format!(
        "const view = {json};\n\
         if (view) {{\n\
           const map = L.map('map').setView(view.center, view.zoom);\n\
           L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{\n\
             attribution: '&copy; OpenStreetMap contributors'\n\
           }}).addTo(map);\n\
           for (const m of view.markers) {{\n\
             L.marker([m.lat, m.lon]).addTo(map).bindPopup(m.popup, {{ maxWidth: {POPUP_MAX_WIDTH} }});\n\
           }}\n\
         }}"
    );

    html! {
        div id="map" {}
        script { (PreEscaped(script)) }
    }
}

/// Generic failure page. Details stay in the logs.
pub fn error_page(status: u16, message: &str) -> Markup {
    let title = format!("Errore {status}");
    layout(
        &title,
        html! {},
        html! {
            h1 { (title) }
            p { (message) }
            p { a href="/" { "Torna alla ricerca" } }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryFilter;

    fn record(name: &str, category: &str, coords: Option<(f64, f64)>) -> ActivityRecord {
        ActivityRecord {
            name: name.to_string(),
            category: category.to_string(),
            phone: String::new(),
            email: String::new(),
            website: String::new(),
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
        }
    }

    fn report(records: Vec<ActivityRecord>, selection: CategoryFilter) -> Report {
        Report {
            locality: "Ragusa".to_string(),
            categories: vec!["Tutti".to_string(), "cafe".to_string(), "pub".to_string()],
            selection,
            total: records.len(),
            records,
        }
    }

    fn options(interactive: bool) -> PageOptions {
        PageOptions {
            zoom: 13,
            download_href: "attività_ragusa.csv".to_string(),
            interactive,
        }
    }

    #[test]
    fn test_report_page_with_map() {
        let r = report(
            vec![
                record("Bar Roma", "cafe", Some((1.0, 1.0))),
                record("Old Pub", "pub", None),
            ],
            CategoryFilter::All,
        );
        let page = report_page(&r, &options(false)).into_string();

        assert!(page.contains("2 attività trovate."));
        assert!(page.contains("<td>Bar Roma</td>"));
        assert!(page.contains(r#"<div id="map"></div>"#));
        assert!(page.contains(LEAFLET_JS));
        assert!(page.contains(r#"href="attività_ragusa.csv""#));
        assert!(!page.contains(EMPTY_NOTICE));
        assert!(!page.contains("<form"));
    }

    #[test]
    fn test_report_page_empty_shows_notice() {
        let r = report(vec![], CategoryFilter::Only("pub".to_string()));
        let page = report_page(&r, &options(true)).into_string();

        assert!(page.contains("0 attività trovate."));
        assert!(page.contains(EMPTY_NOTICE));
        assert!(!page.contains(r#"id="map""#));
        assert!(!page.contains(LEAFLET_JS));
    }

    #[test]
    fn test_report_page_without_coordinates() {
        let r = report(vec![record("Old Pub", "pub", None)], CategoryFilter::All);
        let page = report_page(&r, &options(false)).into_string();

        assert!(page.contains(NO_COORDINATES_NOTICE));
        assert!(!page.contains(r#"id="map""#));
    }

    #[test]
    fn test_form_marks_selected_category() {
        let r = report(
            vec![record("Old Pub", "pub", Some((2.0, 2.0)))],
            CategoryFilter::Only("pub".to_string()),
        );
        let page = report_page(&r, &options(true)).into_string();

        assert!(page.contains(r#"<option value="pub" selected>pub</option>"#));
        assert!(page.contains(r#"<option value="Tutti">Tutti</option>"#));
        assert!(page.contains(r#"name="locality" value="Ragusa""#));
    }

    #[test]
    fn test_table_escapes_values() {
        let table = records_table(&[record("<b>Pub</b>", "pub", None)]).into_string();
        assert!(table.contains("&lt;b&gt;Pub&lt;/b&gt;"));
    }

    #[test]
    fn test_error_page() {
        let page = error_page(500, "Si è verificato un errore.").into_string();
        assert!(page.contains("Errore 500"));
        assert!(page.contains("Si è verificato un errore."));
    }
}
