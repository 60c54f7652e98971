use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("no header row found in '{file_name}' after scanning {rows_scanned} rows")]
    MissingHeader {
        file_name: String,
        rows_scanned: usize,
    },
}
