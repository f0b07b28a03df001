use crate::{card::GridSize, error::CardError};

/// Square table of cell texts, stored row by row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: GridSize,
    rows: Vec<Vec<String>>,
}

impl Grid {
    /// Create an empty grid of the given size
    pub fn new(size: GridSize) -> Self {
        let n = size.get();
        Self {
            size,
            rows: vec![vec![String::new(); n]; n],
        }
    }

    /// Build a grid from nested rows, rejecting ragged or out-of-range input
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self, CardError> {
        let size = GridSize::from_len(rows.len())?;

        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != rows.len())
        {
            return Err(CardError::NotSquare {
                rows: rows.len(),
                row,
                len: cells.len(),
            });
        }

        Ok(Self { size, rows })
    }

    /// Fill a fresh grid in row-major order. Missing values become empty cells
    /// and surplus values are dropped.
    pub fn from_row_major<I>(size: GridSize, values: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut values = values.into_iter();
        let mut grid = Self::new(size);
        for cell in grid.rows.iter_mut().flatten() {
            *cell = values.next().unwrap_or_default();
        }
        grid
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.size.cell_count()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Replace the content of one cell. Content is stored verbatim.
    pub fn set_cell(
        &mut self,
        row: usize,
        col: usize,
        value: impl Into<String>,
    ) -> Result<(), CardError> {
        let size = self.size.get();
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|cells| cells.get_mut(col))
            .ok_or(CardError::CellOutOfBounds { row, col, size })?;
        *cell = value.into();
        Ok(())
    }

    /// Discard every cell and start over with an empty grid of `size`
    pub fn resize(&mut self, size: GridSize) {
        *self = Self::new(size);
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }

    /// Cells whose trimmed text is non-empty, in row-major order
    pub fn non_empty_words(&self) -> impl Iterator<Item = &str> {
        self.cells().filter(|cell| !cell.trim().is_empty())
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GridSize::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::size::{MAX_GRID_SIZE, MIN_GRID_SIZE};

    fn size(n: u8) -> GridSize {
        GridSize::new(n).unwrap()
    }

    #[test]
    fn test_new_grid_is_square_and_empty() {
        for n in MIN_GRID_SIZE..=MAX_GRID_SIZE {
            let grid = Grid::new(size(n));
            assert_eq!(grid.rows().len(), n as usize);
            assert!(grid.rows().iter().all(|row| row.len() == n as usize));
            assert!(grid.cells().all(str::is_empty), "{}x{} grid should start empty", n, n);
        }
    }

    #[test]
    fn test_default_grid_is_five_by_five() {
        let grid = Grid::default();
        assert_eq!(grid.size().get(), 5);
        assert_eq!(grid.cell_count(), 25);
    }

    #[test]
    fn test_set_cell_replaces_content() {
        let mut grid = Grid::new(size(3));
        grid.set_cell(1, 2, "free space").unwrap();
        assert_eq!(grid.cell(1, 2), Some("free space"));
        grid.set_cell(1, 2, "  padded ").unwrap();
        assert_eq!(grid.cell(1, 2), Some("  padded "), "content is stored verbatim");
    }

    #[test]
    fn test_set_cell_out_of_bounds_leaves_grid() {
        let mut grid = Grid::new(size(3));
        let before = grid.clone();
        assert_eq!(
            grid.set_cell(3, 0, "x"),
            Err(CardError::CellOutOfBounds { row: 3, col: 0, size: 3 })
        );
        assert!(grid.set_cell(0, 3, "x").is_err());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_resize_discards_content() {
        let mut grid = Grid::new(size(5));
        grid.set_cell(0, 0, "kept?").unwrap();
        grid.set_cell(4, 4, "corner").unwrap();

        grid.resize(size(3));
        assert!(grid.cells().all(str::is_empty));

        // Growing back does not bring old content back
        grid.resize(size(5));
        assert_eq!(grid.cell(4, 4), Some(""));
        assert_eq!(grid.cell(0, 0), Some(""));
    }

    #[test]
    fn test_resize_to_same_size_clears() {
        let mut grid = Grid::new(size(4));
        grid.set_cell(2, 2, "word").unwrap();
        grid.resize(size(4));
        assert_eq!(grid, Grid::new(size(4)));
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let rows = vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["d".to_string(), "e".to_string()],
            vec!["f".to_string(), "g".to_string(), "h".to_string()],
        ];
        assert_eq!(
            Grid::from_rows(rows),
            Err(CardError::NotSquare { rows: 3, row: 1, len: 2 })
        );
    }

    #[test]
    fn test_from_rows_rejects_out_of_range_size() {
        let rows = vec![vec![String::new(); 2]; 2];
        assert!(matches!(
            Grid::from_rows(rows),
            Err(CardError::InvalidGridSize { size: 2, .. })
        ));
    }

    #[test]
    fn test_non_empty_words_skips_blank_cells() {
        let mut grid = Grid::new(size(3));
        grid.set_cell(0, 1, "b").unwrap();
        grid.set_cell(1, 0, "   ").unwrap();
        grid.set_cell(2, 2, " i ").unwrap();
        let words: Vec<&str> = grid.non_empty_words().collect();
        assert_eq!(words, vec!["b", " i "]);
    }

    #[test]
    fn test_from_row_major_pads_with_empty() {
        let grid = Grid::from_row_major(size(3), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(grid.cell(0, 0), Some("a"));
        assert_eq!(grid.cell(0, 1), Some("b"));
        assert_eq!(grid.cells().filter(|c| c.is_empty()).count(), 7);
    }
}
