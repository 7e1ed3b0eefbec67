#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The Sudoku puzzle surface.
//!
//! Maps digit grids onto the constraint engine and back: board construction
//! and validation, the solve entry points, line-per-puzzle file parsing, and
//! grid rendering. The input contract is a row-major digit sequence with 0 for
//! unknown cells; the output is the completed sequence, or the input unchanged
//! when the puzzle has no completion.

use crate::csp::constraints::ConstraintSet;
use crate::csp::search::Backtracker;
use crate::csp::solver::{DefaultConfig, Solver, SolverConfig};
use crate::csp::state::{InvalidPuzzleError, PuzzleState};
use itertools::Itertools;
use rustc_hash::FxHashSet;
use std::fmt;
use std::io::{self, BufRead};
use std::path::Path;

/// A row-major grid of digits; 0 marks an unknown cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board(Vec<u8>);

impl Board {
    #[must_use]
    pub const fn new(digits: Vec<u8>) -> Self {
        Self(digits)
    }

    #[must_use]
    pub fn digits(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Board {
    fn from(digits: Vec<u8>) -> Self {
        Self::new(digits)
    }
}

impl From<Board> for Vec<u8> {
    fn from(board: Board) -> Self {
        board.0
    }
}

impl From<[[u8; 4]; 4]> for Board {
    fn from(rows: [[u8; 4]; 4]) -> Self {
        Self(rows.iter().flatten().copied().collect())
    }
}

impl From<[[u8; 9]; 9]> for Board {
    fn from(rows: [[u8; 9]; 9]) -> Self {
        Self(rows.iter().flatten().copied().collect())
    }
}

impl From<[[u8; 16]; 16]> for Board {
    fn from(rows: [[u8; 16]; 16]) -> Self {
        Self(rows.iter().flatten().copied().collect())
    }
}

impl From<[[u8; 25]; 25]> for Board {
    fn from(rows: [[u8; 25]; 25]) -> Self {
        Self(rows.iter().flatten().copied().collect())
    }
}

pub const EXAMPLE_FOUR: [[u8; 4]; 4] = [
    [1, 0, 3, 0],
    [0, 4, 0, 2],
    [0, 1, 0, 3],
    [4, 0, 2, 0],
];

pub const EXAMPLE_NINE: [[u8; 9]; 9] = [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    [0, 9, 8, 0, 0, 0, 0, 6, 0],
    [8, 0, 0, 0, 6, 0, 0, 0, 3],
    [4, 0, 0, 8, 0, 3, 0, 0, 1],
    [7, 0, 0, 0, 2, 0, 0, 0, 6],
    [0, 6, 0, 0, 0, 0, 2, 8, 0],
    [0, 0, 0, 4, 1, 9, 0, 0, 5],
    [0, 0, 0, 0, 8, 0, 0, 7, 9],
];

/// Supported puzzle sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Size {
    Four = 4,
    Nine = 9,
    Sixteen = 16,
    TwentyFive = 25,
}

impl Size {
    #[must_use]
    pub const fn block_size(self) -> usize {
        match self {
            Self::Four => 2,
            Self::Nine => 3,
            Self::Sixteen => 4,
            Self::TwentyFive => 5,
        }
    }

    #[must_use]
    pub const fn cell_count(self) -> usize {
        (self as usize) * (self as usize)
    }

    /// The size whose grid holds exactly `cells` cells.
    #[must_use]
    pub const fn for_cell_count(cells: usize) -> Option<Self> {
        match cells {
            16 => Some(Self::Four),
            81 => Some(Self::Nine),
            256 => Some(Self::Sixteen),
            625 => Some(Self::TwentyFive),
            _ => None,
        }
    }
}

impl TryFrom<usize> for Size {
    type Error = ();

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(Self::Four),
            9 => Ok(Self::Nine),
            16 => Ok(Self::Sixteen),
            25 => Ok(Self::TwentyFive),
            _ => Err(()),
        }
    }
}

impl From<Size> for usize {
    fn from(size: Size) -> Self {
        size as Self
    }
}

/// One puzzle: a validated board plus its geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sudoku {
    pub board: Board,
    pub size: Size,
}

impl Sudoku {
    /// Builds a puzzle from a board, inferring the size from the cell count.
    ///
    /// # Errors
    ///
    /// [`InvalidPuzzleError`] if the cell count is not a supported grid size
    /// or a digit exceeds the side.
    pub fn new(board: Board) -> Result<Self, InvalidPuzzleError> {
        let Some(size) = Size::for_cell_count(board.digits().len()) else {
            return Err(InvalidPuzzleError::WrongLength {
                expected: Size::Nine.cell_count(),
                got: board.digits().len(),
            });
        };

        #[allow(clippy::cast_possible_truncation)]
        let side = usize::from(size) as u8;
        if let Some((index, &digit)) = board.digits().iter().find_position(|&&digit| digit > side) {
            return Err(InvalidPuzzleError::DigitOutOfRange { index, digit });
        }

        Ok(Self { board, size })
    }

    /// Parses one line of digit characters into a puzzle.
    ///
    /// # Errors
    ///
    /// [`InvalidPuzzleError`] on a non-digit character or an unsupported
    /// length.
    pub fn from_line(line: &str) -> Result<Self, InvalidPuzzleError> {
        let line = line.trim();
        let mut digits = Vec::with_capacity(line.len());
        for (index, found) in line.chars().enumerate() {
            let Some(digit) = found.to_digit(10) else {
                return Err(InvalidPuzzleError::NotADigit { index, found });
            };
            #[allow(clippy::cast_possible_truncation)]
            let digit = digit as u8;
            digits.push(digit);
        }
        Self::new(Board::new(digits))
    }

    /// Solves the puzzle with a caller-chosen configuration, or `None` when it
    /// has no completion.
    #[must_use]
    pub fn try_solve_with<Config: SolverConfig>(&self) -> Option<Self> {
        let state = PuzzleState::from_digits(self.size.block_size(), self.board.digits())
            .expect("board is validated on construction");
        let mut solver: Backtracker<Config> = Solver::new(state);
        solver.solve().map(|digits| Self {
            board: Board::new(digits),
            size: self.size,
        })
    }

    /// Solves the puzzle, or `None` when it has no completion.
    #[must_use]
    pub fn try_solve(&self) -> Option<Self> {
        self.try_solve_with::<DefaultConfig>()
    }

    /// Solves the puzzle, handing back the input unchanged when no completion
    /// exists.
    #[must_use]
    pub fn solve(&self) -> Self {
        self.try_solve().unwrap_or_else(|| self.clone())
    }

    /// True iff every row, column, and block contains each value exactly once.
    #[must_use]
    pub fn is_solved_grid(&self) -> bool {
        let constraints = ConstraintSet::new(self.size.block_size());
        let digits = self.board.digits();
        let mut seen = FxHashSet::default();
        constraints.groups().iter().all(|group| {
            seen.clear();
            group.cells().iter().all(|&cell| {
                let digit = digits[cell as usize];
                digit != 0 && seen.insert(digit)
            })
        })
    }
}

impl fmt::Display for Sudoku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = usize::from(self.size);
        for row in self.board.digits().chunks(side) {
            if side > 9 {
                writeln!(f, "{}", row.iter().map(|digit| format!("{digit:2}")).join(" "))?;
            } else {
                writeln!(f, "{}", row.iter().join(""))?;
            }
        }
        Ok(())
    }
}

/// Solves a row-major digit sequence, 0 for unknown cells.
///
/// Returns the completed sequence, or the input unchanged when no completion
/// exists.
///
/// # Errors
///
/// [`InvalidPuzzleError`] if the sequence is malformed; no solving is
/// attempted in that case.
pub fn solve(digits: &[u8]) -> Result<Vec<u8>, InvalidPuzzleError> {
    let sudoku = Sudoku::new(Board::new(digits.to_vec()))?;
    Ok(sudoku.solve().board.into())
}

/// Parses puzzles from a reader, one puzzle per line of digit characters.
///
/// Blank lines are skipped.
///
/// # Errors
///
/// Propagates read failures; a malformed line surfaces as
/// [`io::ErrorKind::InvalidData`].
pub fn parse_sudokus<R: BufRead>(reader: R) -> io::Result<Vec<Sudoku>> {
    let mut sudokus = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let sudoku = Sudoku::from_line(&line)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        sudokus.push(sudoku);
    }
    Ok(sudokus)
}

/// Parses a puzzle file, one puzzle per line.
///
/// # Errors
///
/// `io::Result::Err` if the file cannot be opened or read, or a line is
/// malformed.
pub fn parse_sudoku_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<Sudoku>> {
    let file = std::fs::File::open(path)?;
    parse_sudokus(io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CLASSIC: &str = "\
        530070000600195000098000060800060003400803001\
        700020006060000280000419005000080079";
    const CLASSIC_SOLVED: &str = "\
        534678912672195348198342567859761423426853791\
        713924856961537284287419635345286179";

    fn digits(text: &str) -> Vec<u8> {
        text.chars()
            .map(|c| u8::try_from(c.to_digit(10).unwrap()).unwrap())
            .collect()
    }

    #[test]
    fn test_from_line() {
        let sudoku = Sudoku::from_line(CLASSIC).unwrap();
        assert_eq!(sudoku.size, Size::Nine);
        assert_eq!(sudoku.board.digits(), digits(CLASSIC).as_slice());
    }

    #[test]
    fn test_from_line_rejects_bad_lengths() {
        let short = &CLASSIC[..80];
        assert_eq!(
            Sudoku::from_line(short),
            Err(InvalidPuzzleError::WrongLength {
                expected: 81,
                got: 80
            })
        );

        let long = format!("{CLASSIC}0");
        assert_eq!(
            Sudoku::from_line(&long),
            Err(InvalidPuzzleError::WrongLength {
                expected: 81,
                got: 82
            })
        );
    }

    #[test]
    fn test_from_line_rejects_non_digits() {
        let mut line = CLASSIC.to_string();
        line.replace_range(3..4, "x");
        assert_eq!(
            Sudoku::from_line(&line),
            Err(InvalidPuzzleError::NotADigit {
                index: 3,
                found: 'x'
            })
        );
    }

    #[test]
    fn test_new_rejects_out_of_range_digit() {
        let mut board = digits(CLASSIC);
        board[17] = 10;
        assert_eq!(
            Sudoku::new(Board::new(board)),
            Err(InvalidPuzzleError::DigitOutOfRange {
                index: 17,
                digit: 10
            })
        );
    }

    #[test]
    fn test_solve_classic() {
        let sudoku = Sudoku::from_line(CLASSIC).unwrap();
        let solved = sudoku.solve();
        assert_eq!(solved.board.digits(), digits(CLASSIC_SOLVED).as_slice());
        assert!(solved.is_solved_grid());
    }

    #[test]
    fn test_solution_keeps_givens() {
        let sudoku = Sudoku::from_line(CLASSIC).unwrap();
        let solved = sudoku.solve();
        for (&given, &digit) in sudoku.board.digits().iter().zip(solved.board.digits()) {
            assert!(given == 0 || given == digit);
        }
    }

    #[test]
    fn test_solve_is_deterministic() {
        let sudoku = Sudoku::from_line(&"0".repeat(81)).unwrap();
        let first = sudoku.solve();
        let second = sudoku.solve();
        assert_eq!(first, second);
        assert_eq!(&first.board.digits()[..9], &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert!(first.is_solved_grid());
    }

    #[test]
    fn test_solve_presolved_is_identity() {
        let sudoku = Sudoku::from_line(CLASSIC_SOLVED).unwrap();
        assert_eq!(sudoku.solve(), sudoku);
    }

    #[test]
    fn test_unsolvable_echoes_input() {
        let mut board = vec![0_u8; 81];
        board[0] = 5;
        board[1] = 5;
        let sudoku = Sudoku::new(Board::new(board.clone())).unwrap();

        assert_eq!(sudoku.try_solve(), None);
        assert_eq!(sudoku.solve().board.digits(), board.as_slice());
        assert_eq!(solve(&board), Ok(board));
    }

    #[test]
    fn test_solve_digits_contract() {
        assert_eq!(solve(&digits(CLASSIC)), Ok(digits(CLASSIC_SOLVED)));
        assert!(matches!(
            solve(&[0; 80]),
            Err(InvalidPuzzleError::WrongLength { .. })
        ));
    }

    #[test]
    fn test_example_four_solves() {
        let sudoku = Sudoku::new(Board::from(EXAMPLE_FOUR)).unwrap();
        let solved = sudoku.try_solve().unwrap();
        assert!(solved.is_solved_grid());
        for (&given, &digit) in sudoku.board.digits().iter().zip(solved.board.digits()) {
            assert!(given == 0 || given == digit);
        }
    }

    #[test]
    fn test_example_nine_matches_line_form() {
        let from_rows = Sudoku::new(Board::from(EXAMPLE_NINE)).unwrap();
        let from_line = Sudoku::from_line(CLASSIC).unwrap();
        assert_eq!(from_rows, from_line);
    }

    #[test]
    fn test_is_solved_grid_rejects_holes_and_duplicates() {
        let open = Sudoku::from_line(CLASSIC).unwrap();
        assert!(!open.is_solved_grid());

        let mut board = digits(CLASSIC_SOLVED);
        board[0] = board[1];
        let broken = Sudoku::new(Board::new(board)).unwrap();
        assert!(!broken.is_solved_grid());
    }

    #[test]
    fn test_parse_sudokus() {
        let input = format!("{CLASSIC}\n\n{CLASSIC_SOLVED}\n");
        let sudokus = parse_sudokus(Cursor::new(input)).unwrap();
        assert_eq!(sudokus.len(), 2);
        assert_eq!(sudokus[0].board.digits(), digits(CLASSIC).as_slice());
        assert_eq!(sudokus[1].board.digits(), digits(CLASSIC_SOLVED).as_slice());
    }

    #[test]
    fn test_parse_sudokus_rejects_malformed_lines() {
        let input = format!("{CLASSIC}\nnot a puzzle\n");
        let err = parse_sudokus(Cursor::new(input)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_display_renders_rows() {
        let sudoku = Sudoku::from_line(CLASSIC).unwrap();
        let rendered = sudoku.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "530070000");
        assert_eq!(lines[8], "000080079");
    }
}
