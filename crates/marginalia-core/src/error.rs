#[derive(Debug, thiserror::Error)]
pub enum MarginaliaError {
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    #[error("encrypted PDFs are unsupported")]
    Encrypted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
