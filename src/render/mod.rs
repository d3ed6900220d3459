pub mod page;

pub use page::{
    EMPTY_NOTICE, NO_COORDINATES_NOTICE, PageOptions, error_page, layout, records_table,
    report_page,
};
