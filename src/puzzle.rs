use rand::{seq::SliceRandom, Rng};
use std::fmt;

/// Direction the blank travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Order in which the solver tries moves at every node. When several
    /// shortest solutions exist, the first one in this order is returned.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// (row, col) step of the blank.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    /// Printed name: the direction the neighbouring tile slides into the
    /// blank, which is opposite to the blank's own travel.
    pub fn name(&self) -> &'static str {
        match self {
            Move::Up => "down",
            Move::Down => "up",
            Move::Left => "right",
            Move::Right => "left",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn from_index(index: usize, size: usize) -> Self {
        Self {
            row: index / size,
            col: index % size,
        }
    }

    pub fn index(&self, size: usize) -> usize {
        self.row * size + self.col
    }

    pub fn distance(&self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// Goal cell of every tile, indexed by `tile - 1`. Tiles fill the board in
/// row-major order, skipping the cell reserved for the blank.
fn goal_positions(size: usize, target: usize) -> Vec<Position> {
    (0..size * size)
        .filter(|&index| index != target)
        .map(|index| Position::from_index(index, size))
        .collect()
}

fn count_inversions(flattened: &[u32]) -> usize {
    flattened
        .iter()
        .enumerate()
        .filter(|&(_, &val)| val != 0)
        .map(|(i, &val)| {
            flattened[i + 1..]
                .iter()
                .filter(|&&next| next != 0 && next < val)
                .count()
        })
        .sum()
}

/// Whether the row-major board `flattened` of a `size`×`size` puzzle can reach
/// the goal arrangement whose blank sits at linear index `target`.
pub fn is_solvable(flattened: &[u32], size: usize, target: usize) -> bool {
    let inversions = count_inversions(flattened);

    if size % 2 == 1 {
        inversions % 2 == 0
    } else {
        let blank_row = flattened.iter().position(|&val| val == 0).unwrap_or(0) / size;
        (inversions + blank_row) % 2 == (target / size) % 2
    }
}

/// A sliding-tile board together with everything the solver needs to search it
/// in place: the blank position, the goal table and the running Manhattan sum.
///
/// The board is assumed to be a permutation of `0..size * size`.
#[derive(Clone, Debug)]
pub struct Puzzle {
    size: usize,
    board: Vec<Vec<u32>>,
    blank: Position,
    target: usize,
    goals: Vec<Position>,
    manhattan: usize,
}

impl Puzzle {
    /// Solved board with the blank in the last cell.
    pub fn new(size: usize) -> Self {
        Self::solved(size, size * size - 1)
    }

    /// Solved board with the blank at linear index `target`.
    pub fn solved(size: usize, target: usize) -> Self {
        let mut tiles = vec![0; size * size];
        for (tile, pos) in goal_positions(size, target).iter().enumerate() {
            tiles[pos.index(size)] = tile as u32 + 1;
        }
        Self::from_tiles(&tiles, size, target)
    }

    pub fn from_tiles(tiles: &[u32], size: usize, target: usize) -> Self {
        let board = tiles.chunks(size).map(<[u32]>::to_vec).collect();
        Self::from_rows(board, target)
    }

    pub fn from_rows(board: Vec<Vec<u32>>, target: usize) -> Self {
        let size = board.len();
        let mut puzzle = Self {
            size,
            board,
            blank: Position::default(),
            target,
            goals: goal_positions(size, target),
            manhattan: 0,
        };
        puzzle.blank = puzzle.find_blank();
        puzzle.manhattan = puzzle.manhattan_distance();
        puzzle
    }

    fn find_blank(&self) -> Position {
        for (row, cells) in self.board.iter().enumerate() {
            if let Some(col) = cells.iter().position(|&val| val == 0) {
                return Position { row, col };
            }
        }
        debug_assert!(false, "board has no blank");
        Position::default()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn blank(&self) -> Position {
        self.blank
    }

    pub fn board(&self) -> &[Vec<u32>] {
        &self.board
    }

    pub fn tile_at(&self, pos: Position) -> u32 {
        self.board[pos.row][pos.col]
    }

    /// Goal cell of a non-blank tile.
    pub fn goal_of(&self, tile: u32) -> Position {
        self.goals[tile as usize - 1]
    }

    pub fn tiles(&self) -> Vec<u32> {
        self.board.iter().flat_map(|row| row.iter().copied()).collect()
    }

    fn tile_distance(&self, tile: u32, pos: Position) -> usize {
        pos.distance(self.goal_of(tile))
    }

    /// Manhattan sum maintained across moves.
    pub fn heuristic(&self) -> usize {
        self.manhattan
    }

    /// Manhattan sum recomputed from the board.
    pub fn manhattan_distance(&self) -> usize {
        let mut distance = 0;
        for (row, cells) in self.board.iter().enumerate() {
            for (col, &tile) in cells.iter().enumerate() {
                if tile != 0 {
                    distance += self.tile_distance(tile, Position { row, col });
                }
            }
        }
        distance
    }

    pub fn is_solved(&self) -> bool {
        self.manhattan == 0
    }

    pub fn is_solvable(&self) -> bool {
        is_solvable(&self.tiles(), self.size, self.target)
    }

    /// Slides the blank one cell. Returns false and leaves the board untouched
    /// when the blank is already on that edge.
    pub fn apply_move(&mut self, movement: Move) -> bool {
        let (dr, dc) = movement.as_offset();
        let row = self.blank.row.checked_add_signed(dr).filter(|&r| r < self.size);
        let col = self.blank.col.checked_add_signed(dc).filter(|&c| c < self.size);
        let (Some(row), Some(col)) = (row, col) else {
            return false;
        };
        let next = Position { row, col };

        let tile = self.tile_at(next);
        self.manhattan -= self.tile_distance(tile, next);
        self.manhattan += self.tile_distance(tile, self.blank);

        self.board[self.blank.row][self.blank.col] = tile;
        self.board[next.row][next.col] = 0;
        self.blank = next;
        true
    }

    /// Reverts a move previously applied with [`Puzzle::apply_move`].
    pub fn undo_move(&mut self, movement: Move) {
        let undone = self.apply_move(movement.opposite());
        debug_assert!(undone, "undo of {movement} left the board");
    }

    /// Applies `moves` in order, stopping at the first one that is illegal.
    pub fn apply_moves(&mut self, moves: &[Move]) -> bool {
        moves.iter().all(|&movement| self.apply_move(movement))
    }

    /// Replaces the board with a uniformly random solvable arrangement.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut flattened = self.tiles();

        loop {
            flattened.shuffle(rng);
            if is_solvable(&flattened, self.size, self.target) {
                break;
            }
        }

        *self = Self::from_tiles(&flattened, self.size, self.target);
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.size * self.size - 1).to_string().len();
        for row in &self.board {
            for &val in row {
                if val == 0 {
                    write!(f, "{:>width$} ", "")?;
                } else {
                    write!(f, "{:>width$} ", val)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn opposite_is_an_involution() {
        for mv in Move::ALL {
            assert_ne!(mv, mv.opposite());
            assert_eq!(mv, mv.opposite().opposite());
        }
    }

    #[test]
    fn goals_skip_the_blank_cell() {
        let puzzle = Puzzle::solved(3, 4);
        assert_eq!(puzzle.tiles(), vec![1, 2, 3, 4, 0, 5, 6, 7, 8]);
        assert_eq!(puzzle.goal_of(4), Position { row: 1, col: 0 });
        assert_eq!(puzzle.goal_of(5), Position { row: 1, col: 2 });
        assert_eq!(puzzle.blank(), Position { row: 1, col: 1 });
        assert!(puzzle.is_solved());

        let front = Puzzle::solved(2, 0);
        assert_eq!(front.tiles(), vec![0, 1, 2, 3]);
        assert_eq!(front.goal_of(1), Position { row: 0, col: 1 });
    }

    #[test]
    fn blocked_move_leaves_board_untouched() {
        let mut puzzle = Puzzle::new(3);
        let before = puzzle.tiles();
        assert!(!puzzle.apply_move(Move::Down));
        assert!(!puzzle.apply_move(Move::Right));
        assert_eq!(puzzle.tiles(), before);
        assert_eq!(puzzle.heuristic(), 0);
        assert_eq!(puzzle.blank(), Position { row: 2, col: 2 });
    }

    #[test]
    fn move_and_undo_restore_state() {
        let mut puzzle = Puzzle::new(3);
        assert!(puzzle.apply_move(Move::Up));
        assert_eq!(puzzle.tiles(), vec![1, 2, 3, 4, 5, 0, 7, 8, 6]);
        assert_eq!(puzzle.heuristic(), 1);
        assert_eq!(puzzle.blank(), Position { row: 1, col: 2 });

        puzzle.undo_move(Move::Up);
        assert_eq!(puzzle.tiles(), Puzzle::new(3).tiles());
        assert!(puzzle.is_solved());
    }

    #[test]
    fn incremental_heuristic_matches_recomputation() {
        let mut rng = StdRng::seed_from_u64(7);
        for size in 2..=5 {
            let mut puzzle = Puzzle::solved(size, rng.gen_range(0..size * size));
            puzzle.shuffle(&mut rng);
            for _ in 0..500 {
                let mv = Move::ALL[rng.gen_range(0..4)];
                puzzle.apply_move(mv);
                assert_eq!(puzzle.heuristic(), puzzle.manhattan_distance());
                assert_eq!(puzzle.tile_at(puzzle.blank()), 0);
            }
        }
    }

    #[test]
    fn odd_size_solvability_follows_inversions() {
        assert!(is_solvable(&[1, 2, 3, 4, 5, 6, 0, 7, 8], 3, 8));
        assert!(!is_solvable(&[2, 1, 3, 4, 5, 6, 7, 8, 0], 3, 8));
        assert!(!Puzzle::from_tiles(&[1, 2, 3, 4, 5, 6, 8, 7, 0], 3, 8).is_solvable());
    }

    #[test]
    fn even_size_solvability_depends_on_blank_rows() {
        // single slide of the blank between rows keeps the board solvable
        let mut puzzle = Puzzle::solved(4, 15);
        assert!(puzzle.is_solvable());
        puzzle.apply_move(Move::Up);
        assert!(puzzle.is_solvable());

        let goal_first_row = Puzzle::solved(4, 2);
        assert!(goal_first_row.is_solvable());
        // same arrangement checked against a goal with the blank one row lower
        assert!(!is_solvable(&goal_first_row.tiles(), 4, 6));
    }

    #[test]
    fn shuffle_produces_solvable_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut puzzle = Puzzle::solved(4, 5);
        puzzle.shuffle(&mut rng);
        assert!(puzzle.is_solvable());
        assert_eq!(puzzle.target(), 5);
        let mut tiles = puzzle.tiles();
        tiles.sort_unstable();
        assert_eq!(tiles, (0..16).collect::<Vec<u32>>());
    }

    #[test]
    fn display_leaves_blank_empty() {
        let puzzle = Puzzle::from_tiles(&[1, 2, 3, 4, 5, 6, 0, 7, 8], 3, 8);
        assert_eq!(puzzle.to_string(), "1 2 3 \n4 5 6 \n  7 8 \n");
        assert_eq!(Move::Left.to_string(), "right");
        assert_eq!(Move::Up.to_string(), "down");
    }
}
