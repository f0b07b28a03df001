//! Conversion between the card grid and its comma-separated word list.
//!
//! Cell text containing the delimiter cannot survive a round trip: the comma
//! splits it into separate words when the list is read back.

use crate::{card::Grid, error::CardError};

pub const DELIMITER: char = ',';
pub const JOINER: &str = ", ";

/// Result of filling a grid from a word list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillOutcome {
    /// Words written into cells
    pub placed: usize,
    /// Surplus words that did not fit
    pub discarded: usize,
}

/// Split on the delimiter, trim each token and drop empty ones
pub fn parse_word_list(input: &str) -> Vec<String> {
    input
        .split(DELIMITER)
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join the non-empty cells of a grid in row-major order
pub fn grid_to_list(grid: &Grid) -> String {
    grid.non_empty_words().collect::<Vec<_>>().join(JOINER)
}

/// Fill every cell of `grid` from `input` in row-major order.
///
/// Needs at least one word per cell; otherwise the grid is left untouched.
pub fn fill_from_list(grid: &mut Grid, input: &str) -> Result<FillOutcome, CardError> {
    let words = parse_word_list(input);
    let required = grid.cell_count();

    if words.len() < required {
        return Err(CardError::InsufficientWords {
            required,
            available: words.len(),
        });
    }

    let discarded = words.len() - required;
    *grid = Grid::from_row_major(grid.size(), words);

    Ok(FillOutcome {
        placed: required,
        discarded,
    })
}
