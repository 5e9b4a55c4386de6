//! Error types for catalog/config parsing and asset loading.
//!
//! Asset errors never escape the loader: they are logged and replaced by a
//! procedural fallback body. Catalog and config errors surface at startup.

use thiserror::Error;

/// Why a body model could not be produced from its asset.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssetError {
    /// The descriptor carries no model reference.
    #[error("body has no model reference")]
    MissingModel,
    /// The request never produced a response (offline, CORS, aborted).
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("HTTP status {0}")]
    Http(u16),
    /// The payload was not a readable binary glTF container.
    #[error("decode error: {0}")]
    Decode(String),
    /// The container parsed but held no renderable triangles.
    #[error("model contains no meshes")]
    EmptyScene,
}

/// Body catalog validation and parse failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog contains no bodies")]
    Empty,
    #[error("duplicate body id `{0}`")]
    DuplicateId(String),
    #[error("body `{id}`: {field} must be finite and positive")]
    InvalidParameter { id: String, field: &'static str },
}

/// Engine configuration parse failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown quality profile `{0}`")]
    UnknownQuality(String),
}
