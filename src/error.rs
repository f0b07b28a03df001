use thiserror::Error;

/// Errors raised by card operations. The operation is aborted and the card
/// keeps its previous state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    /// Fewer non-empty words than cells to fill
    #[error("Not enough words! Need {required}, found {available}")]
    InsufficientWords { required: usize, available: usize },

    #[error("Grid size {size} is out of range ({min}-{max})")]
    InvalidGridSize { size: i64, min: u8, max: u8 },

    #[error("Cell ({row}, {col}) is outside the {size}x{size} grid")]
    CellOutOfBounds { row: usize, col: usize, size: usize },

    /// Row `row` has `len` cells in a grid of `rows` rows
    #[error("Grid is not square: row {row} has {len} cells, expected {rows}")]
    NotSquare { rows: usize, row: usize, len: usize },

    #[error("Declared grid size {declared} does not match {actual} rows")]
    SizeMismatch { declared: usize, actual: usize },

    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("Invalid export layout: {0}")]
    InvalidLayout(String),

    /// The SVG document could not be parsed or rasterized
    #[error("Failed to render card image: {0}")]
    Render(String),
}
