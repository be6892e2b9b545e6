#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Fatal for the run: missing folder or a placeholder path that was
    /// never updated. No files are touched.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Nothing to do: the folder holds no PDF files. Informational, not a
    /// failure of logic.
    #[error("{0}")]
    EmptyInput(String),
}
