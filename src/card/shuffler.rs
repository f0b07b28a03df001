use rand::{seq::SliceRandom, Rng};

use crate::{card::Grid, error::CardError};

pub struct Shuffler;

impl Shuffler {
    /// Redistribute the non-empty cells of `grid` across a fresh grid of the
    /// same size, in a uniformly random order.
    ///
    /// Every cell must be populated; blank cells count as missing words.
    pub fn shuffle<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Result<Grid, CardError> {
        let mut words: Vec<String> = grid.non_empty_words().map(str::to_string).collect();
        let required = grid.cell_count();

        if words.len() < required {
            return Err(CardError::InsufficientWords {
                required,
                available: words.len(),
            });
        }

        // Fisher-Yates
        words.shuffle(rng);

        Ok(Grid::from_row_major(grid.size(), words))
    }
}
