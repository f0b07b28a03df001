// Bingo card model: grid store, word-list sync and shuffling

pub mod color;
pub mod grid;
pub mod session;
pub mod shuffler;
pub mod size;
pub mod word_list;

pub use color::Rgb;
pub use grid::Grid;
pub use session::{CardSession, CardView};
pub use shuffler::Shuffler;
pub use size::GridSize;
pub use word_list::FillOutcome;
