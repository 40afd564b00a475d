//! The module contains the errors the engine can return.
//!
//! Every variant is recoverable: the caller reports it and keeps the previous
//! state. The most common ones are:
//!
//! - [`InvalidAmount`] returned when a form carries a non-positive or
//!   non-numeric amount.
//! - [`KeyNotFound`] returned when an expense id is not in the store.
//! - [`NothingToExport`] and [`RendererUnavailable`] returned by the document
//!   exporter before any byte is produced.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`NothingToExport`]: EngineError::NothingToExport
//!  [`RendererUnavailable`]: EngineError::RendererUnavailable
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    InvalidAmount(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Nothing to export for current filters.")]
    NothingToExport,
    #[error(
        "PDF renderer is not available. Rebuild with the `pdf` feature to enable document export."
    )]
    RendererUnavailable,
    #[error("Render error: {0}")]
    Render(String),
    #[error(transparent)]
    Storage(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::NothingToExport, Self::NothingToExport) => true,
            (Self::RendererUnavailable, Self::RendererUnavailable) => true,
            (Self::Render(a), Self::Render(b)) => a == b,
            (Self::Storage(a), Self::Storage(b)) => a.kind() == b.kind(),
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            (Self::Csv(a), Self::Csv(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
