pub mod writer;

pub use writer::{
    EXPORT_PREFIX, ExportError, export_file_name, export_file_stem, export_stem, read_records,
    to_csv_string, write_csv_file, write_records,
};
