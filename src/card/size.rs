use serde::{Deserialize, Serialize};

use crate::error::CardError;

pub const MIN_GRID_SIZE: u8 = 3;
pub const MAX_GRID_SIZE: u8 = 7;
pub const DEFAULT_GRID_SIZE: u8 = 5;

/// Side length of a square card, always within [3, 7]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct GridSize(u8);

impl GridSize {
    pub fn new(size: u8) -> Result<Self, CardError> {
        if (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
            Ok(Self(size))
        } else {
            Err(Self::out_of_range(size as i64))
        }
    }

    /// Validate a size sent by a client, which may be negative or far too large
    pub fn from_request(size: i64) -> Result<Self, CardError> {
        u8::try_from(size)
            .map_err(|_| Self::out_of_range(size))
            .and_then(Self::new)
    }

    /// Validate a length coming from an untrusted row count
    pub fn from_len(len: usize) -> Result<Self, CardError> {
        Self::from_request(i64::try_from(len).unwrap_or(i64::MAX))
    }

    fn out_of_range(size: i64) -> CardError {
        CardError::InvalidGridSize {
            size,
            min: MIN_GRID_SIZE,
            max: MAX_GRID_SIZE,
        }
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// Number of cells on the card (N²)
    pub fn cell_count(self) -> usize {
        self.get() * self.get()
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self(DEFAULT_GRID_SIZE)
    }
}

impl TryFrom<u8> for GridSize {
    type Error = CardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GridSize> for u8 {
    fn from(size: GridSize) -> Self {
        size.0
    }
}
