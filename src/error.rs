use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CaldbError {
    #[error("catalog request timed out: {0}")]
    CatalogTimeout(String),

    #[error("catalog request failed: {0}")]
    CatalogHttp(String),

    #[error("catalog returned status {status}: {message}")]
    CatalogStatus { status: u16, message: String },

    #[error("failed to decode catalog page: {0}")]
    CatalogDecode(String),

    #[error("malformed archive link (expected .../<mission>/<telescope>/<file>): {0}")]
    MalformedLink(String),

    #[error("download failed: {0}")]
    DownloadHttp(String),

    #[error("download of {url} returned status {status}")]
    DownloadStatus { status: u16, url: String },

    #[error("not a gzip archive: {0}")]
    InvalidArchive(String),

    #[error("archive extraction failed: {0}")]
    Extract(String),

    #[error("indexer invocation failed: {0}")]
    Indexer(String),

    #[error("required tool not found: {0}")]
    MissingTool(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl CaldbError {
    /// True for failures of the catalog page fetch itself. These degrade the
    /// run to "nothing to do" instead of aborting it.
    pub fn is_catalog_fetch(&self) -> bool {
        matches!(
            self,
            CaldbError::CatalogTimeout(_)
                | CaldbError::CatalogHttp(_)
                | CaldbError::CatalogStatus { .. }
                | CaldbError::CatalogDecode(_)
        )
    }
}
