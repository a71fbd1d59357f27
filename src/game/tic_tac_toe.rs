//! Tic-tac-toe as a [`GameOracle`].
//!
//! Cells are numbered 0..9 row by row. Player One plays `X` and always moves first.

use crate::game::oracle::{outcome_scores, GameOracle, Player, Scores};
use crate::{MctsError, Result};
use serde::{Deserialize, Serialize};

/// Rows, columns and diagonals
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    pub cells: [Option<Player>; 9],
}

impl Board {
    pub fn empty() -> Self {
        Board { cells: [None; 9] }
    }

    /// Parses nine characters (`X`, `O`, or `.`/`-`/`_` for empty), ignoring whitespace and `/`.
    ///
    /// ```
    /// use uct_bot::game::tic_tac_toe::Board;
    /// let board = Board::parse("XO./.X./..O").unwrap();
    /// assert_eq!(board.filled(), 4);
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut cells = [None; 9];
        let mut count = 0;
        for ch in text.chars().filter(|c| !c.is_whitespace() && *c != '/') {
            if count == 9 {
                return Err(MctsError::Config(format!(
                    "board '{}' has more than 9 cells",
                    text
                )));
            }
            cells[count] = match ch {
                'X' | 'x' => Some(Player::One),
                'O' | 'o' => Some(Player::Two),
                '.' | '-' | '_' => None,
                other => {
                    return Err(MctsError::Config(format!(
                        "unexpected character '{}' in board '{}'",
                        other, text
                    )))
                }
            };
            count += 1;
        }
        if count != 9 {
            return Err(MctsError::Config(format!(
                "board '{}' has {} cells, expected 9",
                text, count
            )));
        }

        let board = Board { cells };
        let x = board.count(Player::One);
        let o = board.count(Player::Two);
        if x != o && x != o + 1 {
            return Err(MctsError::Config(format!(
                "board '{}' is unreachable: {} X against {} O",
                text, x, o
            )));
        }
        Ok(board)
    }

    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    fn count(&self, player: Player) -> usize {
        self.cells.iter().filter(|c| **c == Some(player)).count()
    }

    /// X moves whenever both sides have played the same number of stones.
    pub fn to_move(&self) -> Player {
        if self.count(Player::One) == self.count(Player::Two) {
            Player::One
        } else {
            Player::Two
        }
    }

    pub fn winner(&self) -> Option<Player> {
        WINNING_LINES.iter().find_map(|line| {
            let first = self.cells[line[0]]?;
            if line.iter().all(|&idx| self.cells[idx] == Some(first)) {
                Some(first)
            } else {
                None
            }
        })
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (row, chunk) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in chunk {
                let symbol = match cell {
                    Some(Player::One) => 'X',
                    Some(Player::Two) => 'O',
                    None => '.',
                };
                write!(f, "{}", symbol)?;
            }
        }
        Ok(())
    }
}

/// Stateless rules object; all game data lives in [`Board`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToe;

impl TicTacToe {
    pub fn new() -> Self {
        TicTacToe
    }

    pub fn initial_state(&self) -> Board {
        Board::empty()
    }
}

impl GameOracle for TicTacToe {
    type State = Board;
    type Action = usize;

    fn legal_actions(&self, state: &Board) -> Vec<usize> {
        if state.winner().is_some() {
            return Vec::new();
        }
        state
            .cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| if cell.is_none() { Some(i) } else { None })
            .collect()
    }

    fn next_state(&self, state: &Board, action: &usize) -> Board {
        let mut next = state.clone();
        next.cells[*action] = Some(state.to_move());
        next
    }

    fn is_ended(&self, state: &Board) -> bool {
        state.winner().is_some() || state.is_full()
    }

    fn points_values(&self, state: &Board) -> Scores {
        outcome_scores(state.winner())
    }

    fn current_player(&self, state: &Board) -> Player {
        state.to_move()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_empty_board_has_nine_moves() {
        let game = TicTacToe::new();
        let board = game.initial_state();
        assert_eq!(game.legal_actions(&board), (0..9).collect::<Vec<_>>());
        assert_eq!(game.current_player(&board), Player::One);
        assert!(!game.is_ended(&board));
    }

    #[test]
    fn test_next_state_alternates_players_without_mutating_input() {
        let game = TicTacToe::new();
        let board = game.initial_state();
        let after = game.next_state(&board, &4);

        assert_eq!(board, Board::empty());
        assert_eq!(after.cells[4], Some(Player::One));
        assert_eq!(game.current_player(&after), Player::Two);

        let after_two = game.next_state(&after, &0);
        assert_eq!(after_two.cells[0], Some(Player::Two));
        assert_eq!(game.current_player(&after_two), Player::One);
    }

    #[test]
    fn test_win_detection_and_scores() {
        let game = TicTacToe::new();
        let board = Board::parse("XXX/OO./...").unwrap();
        assert!(game.is_ended(&board));
        assert!(game.legal_actions(&board).is_empty());

        let scores = game.points_values(&board);
        assert_eq!(scores[&Player::One], 1.0);
        assert_eq!(scores[&Player::Two], -1.0);
    }

    #[test]
    fn test_draw_scores() {
        let game = TicTacToe::new();
        let board = Board::parse("XOX/XOO/OXX").unwrap();
        assert!(game.is_ended(&board));
        assert_eq!(board.winner(), None);

        let scores = game.points_values(&board);
        assert_eq!(scores[&Player::One], 0.0);
        assert_eq!(scores[&Player::Two], 0.0);
    }

    #[test]
    fn test_parse_rejects_bad_boards() {
        assert_matches!(Board::parse("XX"), Err(MctsError::Config(_)));
        assert_matches!(Board::parse("XXXXXXXXXX"), Err(MctsError::Config(_)));
        assert_matches!(Board::parse("XQ......."), Err(MctsError::Config(_)));
        assert_matches!(Board::parse("OO......."), Err(MctsError::Config(_)));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let board = Board::parse("X.O/.X./..O").unwrap();
        let rendered = board.to_string();
        assert_eq!(rendered, "X.O\n.X.\n..O");
        assert_eq!(Board::parse(&rendered).unwrap(), board);
    }
}
