pub mod csv;
pub mod pdf;

pub use csv::{to_csv, write_csv, CSV_FILE_NAME};
pub use pdf::{layout_document, render_pdf, write_pdf, DocumentLayout, PDF_FILE_NAME};
