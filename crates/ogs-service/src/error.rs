use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("graph schema validation error: {0}")]
    Validation(String),

    #[error("graph schema extension not found: {0}")]
    NotFound(String),

    #[error("cannot modify a built-in graph schema extension: {0}")]
    BuiltinExtension(String),

    #[error("store error: {0}")]
    Store(#[from] ogs_store::StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
