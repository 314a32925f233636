//! Reading puzzles from text.
//!
//! The format is a whitespace separated list of integers: the tile count `n`
//! (which must be `k * k - 1`), the linear index the blank should end on
//! (`-1` for the last cell), then the `k * k` cells of the board in row-major
//! order with `0` for the blank.

use std::str::FromStr;

use crate::puzzle::Puzzle;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error("tile count {0} is not of the form k*k - 1")]
    NotSquare(usize),
    #[error("blank target {target} is outside a board of {cells} cells")]
    TargetOutOfRange { target: i64, cells: usize },
    #[error("tile {tile} exceeds the largest tile {max}")]
    TileOutOfRange { tile: u32, max: u32 },
    #[error("tile {0} appears more than once")]
    DuplicateTile(u32),
    #[error("unexpected trailing input `{0}`")]
    Trailing(String),
}

/// A validated puzzle description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleInput {
    pub size: usize,
    pub target: usize,
    pub tiles: Vec<u32>,
}

impl PuzzleInput {
    pub fn into_puzzle(self) -> Puzzle {
        Puzzle::from_tiles(&self.tiles, self.size, self.target)
    }
}

/// Side length of a board holding `tiles` numbered tiles.
pub fn board_size(tiles: usize) -> Result<usize, InputError> {
    let cells = tiles.checked_add(1).ok_or(InputError::NotSquare(tiles))?;
    let square = |n: usize| n.checked_mul(n);
    let mut size = (cells as f64).sqrt() as usize;
    while square(size).map_or(false, |sq| sq < cells) {
        size += 1;
    }
    while square(size).map_or(true, |sq| sq > cells) {
        size -= 1;
    }
    if square(size) == Some(cells) {
        Ok(size)
    } else {
        Err(InputError::NotSquare(tiles))
    }
}

/// Maps a raw blank target to a cell index; `-1` stands for the last cell.
pub fn resolve_target(raw: i64, cells: usize) -> Result<usize, InputError> {
    let out_of_range = InputError::TargetOutOfRange { target: raw, cells };
    if raw == -1 {
        return Ok(cells - 1);
    }
    match usize::try_from(raw) {
        Ok(target) if target < cells => Ok(target),
        _ => Err(out_of_range),
    }
}

fn next_number<'a, T: FromStr>(
    tokens: &mut impl Iterator<Item = &'a str>,
    what: &'static str,
) -> Result<T, InputError> {
    let token = tokens.next().ok_or(InputError::Missing(what))?;
    token
        .parse()
        .map_err(|_| InputError::InvalidNumber(token.to_owned()))
}

impl FromStr for PuzzleInput {
    type Err = InputError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut tokens = text.split_whitespace();

        let count: usize = next_number(&mut tokens, "tile count")?;
        let max = u32::try_from(count).map_err(|_| InputError::NotSquare(count))?;
        let size = board_size(count)?;
        let cells = size * size;
        let target = resolve_target(next_number(&mut tokens, "blank target")?, cells)?;

        // every cell must be present before per-cell buffers are allocated
        let cell_tokens: Vec<&str> = tokens.collect();
        if cell_tokens.len() < cells {
            return Err(InputError::Missing("board cell"));
        }
        if let Some(extra) = cell_tokens.get(cells) {
            return Err(InputError::Trailing((*extra).to_owned()));
        }

        let mut seen = vec![false; cells];
        let mut tiles = Vec::with_capacity(cells);
        let mut cell_tokens = cell_tokens.into_iter();
        for _ in 0..cells {
            let tile: u32 = next_number(&mut cell_tokens, "board cell")?;
            if tile > max {
                return Err(InputError::TileOutOfRange { tile, max });
            }
            if std::mem::replace(&mut seen[tile as usize], true) {
                return Err(InputError::DuplicateTile(tile));
            }
            tiles.push(tile);
        }

        Ok(Self {
            size,
            target,
            tiles,
        })
    }
}
