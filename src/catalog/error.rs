use thiserror::Error;

/// Reasons the place catalog can be unavailable
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog file not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Catalog contains no usable places")]
    Empty,

    #[error("Catalog already initialized")]
    AlreadyInitialized,
}

pub type Result<T> = std::result::Result<T, CatalogError>;
