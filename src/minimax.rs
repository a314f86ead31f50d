use std::time::{Duration, Instant};

use log::debug;

use crate::board::{Board, Player, TerminalStatus};

// Sentinel bounds for alpha-beta. Every reachable score lies in [-19, 19]
// (base +-10 adjusted by a depth of at most 9), so integer sentinels are
// plenty wide.
const INFINITY: i32 = 1000;
const WIN_SCORE: i32 = 10;

/// Exhaustive minimax search with alpha-beta pruning for one fixed side.
/// Explores by mutating the board in place and undoing each speculative
/// mark, so the board handed to `select_move` comes back untouched.
pub struct Minimax {
    side: Player,
}

/// Outcome of one `select_move` call. `cell` is `None` only when the board
/// had no empty cell; the counters are diagnostics and never influence the
/// chosen move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub cell: Option<(usize, usize)>,
    pub nodes_visited: usize,
    pub elapsed: Duration,
}

impl Minimax {
    pub fn new(side: Player) -> Self {
        Self { side }
    }

    pub fn side(&self) -> Player {
        self.side
    }

    /// Finds the game-theoretically optimal cell for this engine's side.
    /// Ties between equally scored cells go to the first one in row-major
    /// order; the comparison is strictly-greater on purpose.
    pub fn select_move(&self, board: &mut Board) -> SearchResult {
        let start = Instant::now();
        let mut nodes = 0;
        let mut best_value = -INFINITY;
        let mut best_cell = None;

        for (row, col) in board.empty_cells() {
            nodes += 1;
            board.place(row, col, self.side).unwrap();
            // Fresh bounds for every root candidate rather than bounds shared
            // across root siblings. Weaker pruning, same move; only the node
            // count differs.
            let value = self.evaluate(board, 0, false, -INFINITY, INFINITY, &mut nodes);
            board.clear(row, col);

            if value > best_value {
                best_value = value;
                best_cell = Some((row, col));
            }
        }

        let elapsed = start.elapsed();
        debug!(
            "{:?} search: best {:?} value {} ({} nodes in {:?})",
            self.side, best_cell, best_value, nodes, elapsed
        );
        SearchResult {
            cell: best_cell,
            nodes_visited: nodes,
            elapsed,
        }
    }

    // Depth-first evaluation of the position for `self.side`. Each frame
    // places exactly one mark per child and clears it again before moving
    // on, including when a cutoff stops the sibling loop.
    fn evaluate(
        &self,
        board: &mut Board,
        depth: i32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
        nodes: &mut usize,
    ) -> i32 {
        *nodes += 1;

        match board.terminal_status() {
            // Subtracting the depth prefers the fastest win; adding it
            // prefers the slowest loss.
            TerminalStatus::Won(side) if side == self.side => return WIN_SCORE - depth,
            TerminalStatus::Won(_) => return -WIN_SCORE + depth,
            TerminalStatus::Draw => return 0,
            TerminalStatus::InProgress => {}
        }

        if maximizing {
            let mut best = -INFINITY;
            for (row, col) in board.empty_cells() {
                board.place(row, col, self.side).unwrap();
                let value = self.evaluate(board, depth + 1, false, alpha, beta, nodes);
                board.clear(row, col);

                best = best.max(value);
                alpha = alpha.max(value);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = INFINITY;
            for (row, col) in board.empty_cells() {
                board.place(row, col, self.side.opponent()).unwrap();
                let value = self.evaluate(board, depth + 1, true, alpha, beta, nodes);
                board.clear(row, col);

                best = best.min(value);
                beta = beta.min(value);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{board_from, Cell};

    #[test]
    fn test_opening_move_is_first_optimal_cell() {
        let engine = Minimax::new(Player::X);
        let mut board = Board::new();
        let result = engine.select_move(&mut board);
        // Every opening is a draw under perfect play, so the row-major
        // tie-break keeps the first cell examined.
        assert_eq!(result.cell, Some((0, 0)));
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_takes_immediate_win() {
        let engine = Minimax::new(Player::X);
        let mut board = board_from([
            ['X', 'X', '.'],
            ['O', 'O', '.'],
            ['.', '.', '.'],
        ]);
        let result = engine.select_move(&mut board);
        assert_eq!(result.cell, Some((0, 2)));
        // The winning line at the first candidate collapses the rest of the
        // tree; a full 5-cell search would be in the thousands.
        assert!(result.nodes_visited < 200, "nodes: {}", result.nodes_visited);
    }

    #[test]
    fn test_blocks_immediate_loss() {
        let engine = Minimax::new(Player::O);
        let mut board = board_from([
            ['X', 'X', '.'],
            ['.', 'O', '.'],
            ['.', '.', '.'],
        ]);
        let result = engine.select_move(&mut board);
        assert_eq!(result.cell, Some((0, 2)));
    }

    #[test]
    fn test_prefers_faster_win() {
        // X to move holds a fork through (0, 0) and (0, 2), worth a win in
        // three plies, but (1, 2) completes the middle row right now. The
        // depth adjustment must pick the immediate win even though both
        // fork cells enumerate earlier in row-major order.
        let engine = Minimax::new(Player::X);
        let mut board = board_from([
            ['.', 'O', '.'],
            ['X', 'X', '.'],
            ['.', 'O', '.'],
        ]);
        let result = engine.select_move(&mut board);
        assert_eq!(result.cell, Some((1, 2)));
    }

    #[test]
    fn test_single_empty_cell() {
        let engine = Minimax::new(Player::X);
        let mut board = board_from([
            ['X', 'O', 'X'],
            ['X', 'O', 'O'],
            ['O', 'X', '.'],
        ]);
        let result = engine.select_move(&mut board);
        assert_eq!(result.cell, Some((2, 2)));
    }

    #[test]
    fn test_full_board_has_no_move() {
        let engine = Minimax::new(Player::X);
        let mut board = board_from([
            ['X', 'O', 'X'],
            ['X', 'O', 'O'],
            ['O', 'X', 'X'],
        ]);
        let result = engine.select_move(&mut board);
        assert_eq!(result.cell, None);
    }

    #[test]
    fn test_deterministic_and_restores_board() {
        let engine = Minimax::new(Player::O);
        let mut board = board_from([
            ['X', '.', '.'],
            ['.', 'O', '.'],
            ['.', '.', 'X'],
        ]);
        let snapshot = board.clone();
        let first = engine.select_move(&mut board);
        assert_eq!(board, snapshot);
        for _ in 0..5 {
            assert_eq!(engine.select_move(&mut board).cell, first.cell);
        }
    }

    #[test]
    fn test_move_is_always_legal() {
        let engine = Minimax::new(Player::O);
        let mut board = board_from([
            ['X', '.', 'O'],
            ['.', 'X', '.'],
            ['.', '.', '.'],
        ]);
        let (row, col) = engine.select_move(&mut board).cell.unwrap();
        assert!(row <= 2 && col <= 2);
        assert_eq!(board.cell(row, col), Cell::Empty);
    }

    // Plays the engine against every opponent line from `board`, branching
    // on all of the opponent's legal replies. Panics if any line ends in an
    // opponent win.
    fn assert_never_loses(engine: &Minimax, board: &mut Board, engine_to_move: bool) {
        match board.terminal_status() {
            TerminalStatus::Won(side) => {
                assert_ne!(side, engine.side().opponent(), "engine lost:\n{}", board);
                return;
            }
            TerminalStatus::Draw => return,
            TerminalStatus::InProgress => {}
        }

        if engine_to_move {
            let (row, col) = engine.select_move(board).cell.unwrap();
            board.place(row, col, engine.side()).unwrap();
            assert_never_loses(engine, board, false);
            board.clear(row, col);
        } else {
            for (row, col) in board.empty_cells() {
                board.place(row, col, engine.side().opponent()).unwrap();
                assert_never_loses(engine, board, true);
                board.clear(row, col);
            }
        }
    }

    #[test]
    fn test_unbeatable_moving_first() {
        let engine = Minimax::new(Player::X);
        assert_never_loses(&engine, &mut Board::new(), true);
    }

    #[test]
    fn test_unbeatable_moving_second() {
        let engine = Minimax::new(Player::O);
        assert_never_loses(&engine, &mut Board::new(), false);
    }

    #[test]
    fn test_two_optimal_engines_draw() {
        let x = Minimax::new(Player::X);
        let o = Minimax::new(Player::O);
        let mut board = Board::new();
        let mut current = Player::X;
        while board.terminal_status() == TerminalStatus::InProgress {
            let engine = if current == Player::X { &x } else { &o };
            let (row, col) = engine.select_move(&mut board).cell.unwrap();
            board.place(row, col, current).unwrap();
            current = current.opponent();
        }
        assert_eq!(board.terminal_status(), TerminalStatus::Draw);
    }
}
