/// Errors raised while rendering reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Template rendering failed: {0}")]
    Template(String),

    #[error("Template file unreadable: {0}")]
    TemplateFile(#[from] std::io::Error),
}
