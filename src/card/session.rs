use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    card::{word_list, FillOutcome, Grid, GridSize, Rgb, Shuffler},
    error::{CardError, ExportError},
    export::{CardExporter, ExportArtifact},
};

/// Renderable state of a card: the grid plus its background color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub size: GridSize,
    pub rows: Vec<Vec<String>>,
    pub color: Rgb,
}

impl CardView {
    /// Check that `rows` is a square grid matching `size`
    pub fn validate(&self) -> Result<(), CardError> {
        let grid = Grid::from_rows(self.rows.clone())?;
        if grid.size() != self.size {
            return Err(CardError::SizeMismatch {
                declared: self.size.get(),
                actual: grid.size().get(),
            });
        }
        Ok(())
    }
}

/// State of one bingo card editor
#[derive(Debug, Clone)]
pub struct CardSession {
    grid: Grid,
    color: Rgb,
    word_list: String,
    list_visible: bool,
}

impl CardSession {
    pub fn new(size: GridSize, color: Rgb) -> Self {
        Self {
            grid: Grid::new(size),
            color,
            word_list: String::new(),
            list_visible: false,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn word_list(&self) -> &str {
        &self.word_list
    }

    pub fn list_visible(&self) -> bool {
        self.list_visible
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: String) -> Result<(), CardError> {
        self.grid.set_cell(row, col, value)
    }

    /// Clear the card and change its size
    pub fn resize(&mut self, size: i64) -> Result<GridSize, CardError> {
        let size = GridSize::from_request(size)?;
        self.grid.resize(size);
        Ok(size)
    }

    /// Replace the word-list text without touching the grid
    pub fn set_word_list(&mut self, text: String) {
        self.word_list = text;
    }

    pub fn fill_from_list(&mut self) -> Result<FillOutcome, CardError> {
        word_list::fill_from_list(&mut self.grid, &self.word_list)
    }

    /// Rebuild the word-list text from the grid and return it
    pub fn update_list_from_grid(&mut self) -> &str {
        self.word_list = word_list::grid_to_list(&self.grid);
        &self.word_list
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), CardError> {
        self.grid = Shuffler::shuffle(&self.grid, rng)?;
        Ok(())
    }

    pub fn set_color(&mut self, color: &str) -> Result<Rgb, CardError> {
        self.color = color.parse()?;
        Ok(self.color)
    }

    pub fn toggle_list_visibility(&mut self) -> bool {
        self.list_visible = !self.list_visible;
        self.list_visible
    }

    pub fn view(&self) -> CardView {
        CardView {
            size: self.grid.size(),
            rows: self.grid.rows().to_vec(),
            color: self.color,
        }
    }

    pub fn export(&self, exporter: &dyn CardExporter) -> Result<ExportArtifact, ExportError> {
        exporter.export(&self.view())
    }
}

impl Default for CardSession {
    fn default() -> Self {
        Self::new(GridSize::default(), Rgb::default())
    }
}
