use thiserror::Error;

mod export;
mod pdf;
mod text;

pub use export::{export_json, report_file_name, ExportKind};
pub use pdf::{level_color, render_pdf};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report would exceed {max_pages} pages")]
    TooLong { max_pages: usize },
    #[error("failed to serialize export: {0}")]
    Json(#[from] serde_json::Error),
}
