use tracing::{debug, info};

use crate::puzzle::{Move, Puzzle};

/// Shortest move sequence found by IDA*, with a few search statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub moves: Vec<Move>,
    /// Number of depth-first passes, one per bound.
    pub iterations: usize,
    /// Number of nodes visited over all passes.
    pub nodes: u64,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Text printed for a solve attempt: `No solution`, or the move count followed
/// by one move name per line.
pub fn report(solution: Option<&Solution>) -> String {
    let Some(solution) = solution else {
        return "No solution\n".to_owned();
    };
    let mut out = format!("{}\n", solution.len());
    for movement in &solution.moves {
        out.push_str(movement.name());
        out.push('\n');
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Found,
    /// Smallest f that exceeded the bound below this node.
    Deeper(usize),
}

/// One bounded depth-first pass. The puzzle is mutated in place and every
/// move is undone on the way back, so a failed pass leaves it as it started.
struct Search<'a> {
    state: &'a mut Puzzle,
    path: Vec<Move>,
    nodes: u64,
}

impl Search<'_> {
    fn find(&mut self, g: usize, bound: usize) -> Step {
        self.nodes += 1;
        let f = g + self.state.heuristic();
        if self.state.is_solved() {
            return Step::Found;
        }
        if f > bound {
            return Step::Deeper(f);
        }

        let mut min = usize::MAX;
        for dir in Move::ALL {
            if self.path.last() == Some(&dir.opposite()) {
                continue;
            }
            if !self.state.apply_move(dir) {
                continue;
            }

            self.path.push(dir);
            match self.find(g + 1, bound) {
                Step::Found => return Step::Found,
                Step::Deeper(t) => min = min.min(t),
            }
            self.path.pop();
            self.state.undo_move(dir);
        }

        Step::Deeper(min)
    }
}

impl Puzzle {
    /// Finds a shortest sequence of blank moves reaching the goal.
    ///
    /// The board must be solvable: on an unsolvable board the bound grows
    /// forever and this never returns. Use [`Puzzle::try_solve`] unless
    /// [`Puzzle::is_solvable`] has already been checked.
    pub fn solve(&self) -> Solution {
        let mut state = self.clone();
        let mut search = Search {
            state: &mut state,
            path: Vec::new(),
            nodes: 0,
        };
        let mut bound = self.heuristic();
        let mut iterations = 0;

        loop {
            iterations += 1;
            let visited = search.nodes;
            match search.find(0, bound) {
                Step::Found => {
                    info!(
                        moves = search.path.len(),
                        iterations,
                        nodes = search.nodes,
                        "solution found"
                    );
                    return Solution {
                        moves: search.path,
                        iterations,
                        nodes: search.nodes,
                    };
                }
                Step::Deeper(next) => {
                    debug!(
                        iteration = iterations,
                        bound,
                        next_bound = next,
                        nodes = search.nodes - visited,
                        "bound exceeded"
                    );
                    bound = next;
                }
            }
        }
    }

    /// Checks solvability first; `None` means no move sequence reaches the goal.
    pub fn try_solve(&self) -> Option<Solution> {
        if !self.is_solvable() {
            debug!(size = self.size(), target = self.target(), "board is not solvable");
            return None;
        }
        Some(self.solve())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Move::*;

    #[test]
    fn two_moves_from_goal() {
        let puzzle = Puzzle::from_tiles(&[1, 2, 3, 4, 5, 6, 0, 7, 8], 3, 8);
        let solution = puzzle.try_solve().unwrap();
        assert_eq!(solution.moves, vec![Right, Right]);

        let mut replay = puzzle.clone();
        assert!(replay.apply_moves(&solution.moves));
        assert_eq!(replay.tiles(), vec![1, 2, 3, 4, 5, 6, 7, 8, 0]);
    }

    #[test]
    fn report_names_the_sliding_tiles() {
        let solution = Puzzle::from_tiles(&[1, 2, 3, 4, 5, 6, 0, 7, 8], 3, 8).try_solve();
        assert_eq!(report(solution.as_ref()), "2\nleft\nleft\n");

        let solution = Puzzle::from_tiles(&[1, 3, 2, 0], 2, 0).try_solve();
        assert_eq!(report(solution.as_ref()), "2\ndown\nright\n");
    }

    #[test]
    fn report_for_unsolvable_board() {
        let solution = Puzzle::from_tiles(&[2, 1, 3, 4, 5, 6, 7, 8, 0], 3, 8).try_solve();
        assert_eq!(report(solution.as_ref()), "No solution\n");
        assert_eq!(report(Some(&Puzzle::new(3).solve())), "0\n");
    }

    #[test]
    fn solved_board_needs_no_moves() {
        let solution = Puzzle::solved(4, 9).solve();
        assert!(solution.is_empty());
        assert_eq!(solution.iterations, 1);
        assert_eq!(solution.nodes, 1);
    }

    #[test]
    fn single_cell_board() {
        let solution = Puzzle::from_tiles(&[0], 1, 0).try_solve().unwrap();
        assert!(solution.is_empty());
    }

    #[test]
    fn unsolvable_board_is_rejected() {
        let puzzle = Puzzle::from_tiles(&[2, 1, 3, 4, 5, 6, 7, 8, 0], 3, 8);
        assert_eq!(puzzle.try_solve(), None);
    }

    #[test]
    fn solve_does_not_mutate_the_puzzle() {
        let puzzle = Puzzle::from_tiles(&[4, 1, 3, 7, 2, 6, 0, 5, 8], 3, 8);
        let before = puzzle.tiles();
        let solution = puzzle.solve();
        assert_eq!(puzzle.tiles(), before);
        assert_eq!(solution.len(), 6);
    }

    #[test]
    fn blank_goal_in_first_cell() {
        // 1 3    _ 1
        // 2 _ -> 2 3
        let puzzle = Puzzle::from_tiles(&[1, 3, 2, 0], 2, 0);
        let solution = puzzle.try_solve().unwrap();
        assert_eq!(solution.moves, vec![Up, Left]);
        let mut replay = puzzle.clone();
        assert!(replay.apply_moves(&solution.moves));
        assert!(replay.is_solved());
        assert_eq!(replay.blank().index(2), 0);
        assert_eq!(replay.tiles(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn consecutive_moves_never_reverse() {
        let puzzle = Puzzle::from_tiles(&[8, 6, 7, 2, 5, 4, 3, 0, 1], 3, 8);
        let solution = puzzle.try_solve().unwrap();
        assert_eq!(solution.len(), 31);
        for pair in solution.moves.windows(2) {
            assert_ne!(pair[1], pair[0].opposite());
        }
    }
}
