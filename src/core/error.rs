//! Error types for the tree generator

use thiserror::Error;

/// Main error type for the generator
#[derive(Debug, Error)]
pub enum Error {
    /// A palette must carry exactly 256 RGBA entries.
    #[error("palette must have exactly {expected} colors, found {found}")]
    PaletteFormat { expected: usize, found: usize },

    #[error("palette image error: {0}")]
    PaletteImage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
