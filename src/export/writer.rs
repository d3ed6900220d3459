use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

use crate::domain::ActivityRecord;

/// File name prefix of every export
pub const EXPORT_PREFIX: &str = "attività";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error")]
    Csv(#[from] csv::Error),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("export is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// `attività_<locality lower-cased>` followed by `extension`
pub fn export_stem(locality: &str) -> String {
    format!("{}_{}", EXPORT_PREFIX, locality.to_lowercase())
}

/// Download name of the CSV export for `locality`
pub fn export_file_name(locality: &str) -> String {
    format!("{}.csv", export_stem(locality))
}

/// Like [`export_stem`] but safe as a single file name inside an output
/// directory: path separators and control characters become `_`.
pub fn export_file_stem(locality: &str) -> String {
    export_stem(locality)
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Write records as CSV with a header row
///
/// Columns: nome, tipo, telefono, email, sito_web, lat, lon.
/// Missing coordinates become empty fields.
pub fn write_records<W: Write>(records: &[ActivityRecord], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(true).from_writer(writer);

    if records.is_empty() {
        // serde only emits the header alongside the first row
        csv_writer.write_record(["nome", "tipo", "telefono", "email", "sito_web", "lat", "lon"])?;
    }
    for record in records {
        csv_writer.serialize(record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Render records as an in-memory CSV document
pub fn to_csv_string(records: &[ActivityRecord]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_records(records, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Write the CSV export to `path`
pub fn write_csv_file(path: &Path, records: &[ActivityRecord]) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_records(records, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Parse a CSV export back into records
pub fn read_records<R: Read>(reader: R) -> Result<Vec<ActivityRecord>, ExportError> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let records = csv_reader
        .deserialize()
        .collect::<Result<Vec<ActivityRecord>, csv::Error>>()?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sample() -> Vec<ActivityRecord> {
        vec![
            ActivityRecord {
                name: "Bar Roma".to_string(),
                category: "cafe".to_string(),
                phone: "+39 0932 111111".to_string(),
                email: String::new(),
                website: "https://barroma.it".to_string(),
                latitude: Some(36.925),
                longitude: Some(14.73),
            },
            ActivityRecord {
                name: "Libreria \"Il Punto\", centro".to_string(),
                category: "books".to_string(),
                phone: String::new(),
                email: "info@ilpunto.it".to_string(),
                website: String::new(),
                latitude: Some(36.93),
                longitude: Some(14.74),
            },
            ActivityRecord {
                name: "Chiosco".to_string(),
                category: "Altro".to_string(),
                phone: String::new(),
                email: String::new(),
                website: String::new(),
                latitude: None,
                longitude: None,
            },
        ]
    }

    #[test]
    fn test_header_and_rows() {
        let csv = to_csv_string(&sample()).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("nome,tipo,telefono,email,sito_web,lat,lon")
        );
        assert_eq!(
            lines.next(),
            Some("Bar Roma,cafe,+39 0932 111111,,https://barroma.it,36.925,14.73")
        );
        assert_eq!(
            lines.next(),
            Some(r#""Libreria ""Il Punto"", centro",books,,info@ilpunto.it,,36.93,14.74"#)
        );
        assert_eq!(lines.next(), Some("Chiosco,Altro,,,,,"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_read_back_matches() {
        let records = sample();
        let csv = to_csv_string(&records).unwrap();

        let parsed = read_records(csv.as_bytes()).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_empty_export_has_header() {
        let csv = to_csv_string(&[]).unwrap();
        assert_eq!(csv, "nome,tipo,telefono,email,sito_web,lat,lon\n");
        assert!(read_records(csv.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("Ragusa"), "attività_ragusa.csv");
        assert_eq!(export_file_name("San Vito"), "attività_san vito.csv");
    }

    #[test]
    fn test_export_file_stem_strips_separators() {
        assert_eq!(export_file_stem("Biel/Bienne"), "attività_biel_bienne");
        assert_eq!(export_file_stem("../x"), "attività_.._x");
        assert_eq!(export_file_stem("a\\b:c"), "attività_a_b_c");
        assert_eq!(export_file_stem("Ragusa"), export_stem("Ragusa"));
    }

    #[test]
    fn test_error_chain_names_source_once() {
        let err = ExportError::from(std::io::Error::other("disk full"));
        assert_eq!(format!("{:#}", anyhow::Error::new(err)), "I/O error: disk full");
    }

    #[test]
    fn test_write_csv_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(export_file_name("Ragusa"));

        write_csv_file(&path, &sample()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 4);
        assert_eq!(read_records(contents.as_bytes()).unwrap(), sample());
    }
}
