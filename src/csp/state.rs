#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The mutable domain store a single solve operates on.
//!
//! A `PuzzleState` owns one [`Domain`] per cell plus the puzzle geometry. It is
//! created from a row-major digit sequence, narrowed in place by propagation,
//! and read back out once every cell is fixed. Narrowing is undone with the
//! snapshot and re-insertion primitives; the state itself keeps no history.

use crate::csp::domain::{Domain, MAX_SIDE};
use std::error::Error;
use std::fmt;

/// Rejection of a malformed input sequence.
///
/// Raised before any search state exists and never recovered internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPuzzleError {
    /// The digit sequence does not have one digit per cell.
    WrongLength { expected: usize, got: usize },
    /// A digit exceeds the puzzle side.
    DigitOutOfRange { index: usize, digit: u8 },
    /// A character in a textual puzzle is not a decimal digit.
    NotADigit { index: usize, found: char },
}

impl fmt::Display for InvalidPuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength { expected, got } => {
                write!(f, "expected {expected} digits, got {got}")
            }
            Self::DigitOutOfRange { index, digit } => {
                write!(f, "digit {digit} at cell {index} is out of range")
            }
            Self::NotADigit { index, found } => {
                write!(f, "character {found:?} at position {index} is not a digit")
            }
        }
    }
}

impl Error for InvalidPuzzleError {}

/// A cell ran out of candidates: the current partial assignment is a dead end.
///
/// Internal control flow only; the search converts it into a backtrack and it
/// never crosses the public solve boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainExhausted {
    pub cell: usize,
}

impl fmt::Display for DomainExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no candidates left for cell {}", self.cell)
    }
}

impl Error for DomainExhausted {}

/// All cells' current domains at one point of the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleState {
    block: usize,
    side: usize,
    domains: Vec<Domain>,
}

impl PuzzleState {
    /// Builds the domain table from a row-major digit sequence.
    ///
    /// Digit 0 marks an unknown cell and becomes the full domain; any other
    /// digit becomes a singleton.
    ///
    /// # Errors
    ///
    /// [`InvalidPuzzleError`] if the sequence is not `side * side` digits long
    /// or a digit exceeds the side.
    ///
    /// # Panics
    ///
    /// If `block * block` exceeds [`MAX_SIDE`].
    pub fn from_digits(block: usize, digits: &[u8]) -> Result<Self, InvalidPuzzleError> {
        let side = block * block;
        assert!(side >= 1 && side <= MAX_SIDE, "unsupported block size");

        let expected = side * side;
        if digits.len() != expected {
            return Err(InvalidPuzzleError::WrongLength {
                expected,
                got: digits.len(),
            });
        }

        let mut domains = Vec::with_capacity(expected);
        for (index, &digit) in digits.iter().enumerate() {
            if digit as usize > side {
                return Err(InvalidPuzzleError::DigitOutOfRange { index, digit });
            }
            domains.push(if digit == 0 {
                Domain::full(side)
            } else {
                Domain::singleton(digit)
            });
        }

        Ok(Self {
            block,
            side,
            domains,
        })
    }

    #[must_use]
    pub const fn block(&self) -> usize {
        self.block
    }

    #[must_use]
    pub const fn side(&self) -> usize {
        self.side
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.domains.len()
    }

    #[must_use]
    pub fn domain(&self, cell: usize) -> Domain {
        self.domains[cell]
    }

    #[must_use]
    pub fn is_fixed(&self, cell: usize) -> bool {
        self.domains[cell].is_fixed()
    }

    /// Removes `value` from the cell's domain if present.
    ///
    /// Returns whether a removal occurred. A removal that would empty the
    /// domain leaves it untouched, so undoing a run of removals is a plain
    /// replay of the recorded ones.
    ///
    /// # Errors
    ///
    /// [`DomainExhausted`] if the cell would be left without candidates.
    pub fn remove(&mut self, cell: usize, value: u8) -> Result<bool, DomainExhausted> {
        let domain = &mut self.domains[cell];
        if !domain.contains(value) {
            return Ok(false);
        }
        if domain.is_fixed() {
            return Err(DomainExhausted { cell });
        }
        domain.remove(value);
        Ok(true)
    }

    /// Re-adds a previously removed candidate.
    pub fn insert(&mut self, cell: usize, value: u8) {
        self.domains[cell].insert(value);
    }

    /// Fixes the cell to `value`, returning the prior domain for [`Self::restore`].
    pub fn assign(&mut self, cell: usize, value: u8) -> Domain {
        std::mem::replace(&mut self.domains[cell], Domain::singleton(value))
    }

    /// Reverts a cell to a snapshot taken by [`Self::assign`].
    pub fn restore(&mut self, cell: usize, prior: Domain) {
        self.domains[cell] = prior;
    }

    /// The resolved digit sequence, row-major. `None` unless every cell is fixed.
    #[must_use]
    pub fn read_values(&self) -> Option<Vec<u8>> {
        self.domains.iter().map(|domain| domain.value()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_digits_mixed() {
        let state = PuzzleState::from_digits(2, &[1, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0])
            .unwrap();
        assert_eq!(state.side(), 4);
        assert_eq!(state.cell_count(), 16);
        assert!(state.is_fixed(0));
        assert_eq!(state.domain(0).value(), Some(1));
        assert_eq!(state.domain(1), Domain::full(4));
    }

    #[test]
    fn test_from_digits_wrong_length() {
        let err = PuzzleState::from_digits(3, &[0; 80]).unwrap_err();
        assert_eq!(
            err,
            InvalidPuzzleError::WrongLength {
                expected: 81,
                got: 80
            }
        );

        let err = PuzzleState::from_digits(3, &[0; 82]).unwrap_err();
        assert_eq!(
            err,
            InvalidPuzzleError::WrongLength {
                expected: 81,
                got: 82
            }
        );
    }

    #[test]
    fn test_from_digits_out_of_range() {
        let mut digits = [0_u8; 81];
        digits[17] = 10;
        let err = PuzzleState::from_digits(3, &digits).unwrap_err();
        assert_eq!(
            err,
            InvalidPuzzleError::DigitOutOfRange {
                index: 17,
                digit: 10
            }
        );
    }

    #[test]
    fn test_remove_reports_and_guards() {
        let mut state = PuzzleState::from_digits(3, &[0; 81]).unwrap();
        assert_eq!(state.remove(0, 5), Ok(true));
        assert_eq!(state.remove(0, 5), Ok(false));
        assert_eq!(state.domain(0).len(), 8);

        let mut state = PuzzleState::from_digits(3, &{
            let mut digits = [0_u8; 81];
            digits[0] = 5;
            digits
        })
        .unwrap();
        assert_eq!(state.remove(0, 5), Err(DomainExhausted { cell: 0 }));
        // the failed removal must not have touched the domain
        assert_eq!(state.domain(0).value(), Some(5));
    }

    #[test]
    fn test_assign_and_restore() {
        let mut state = PuzzleState::from_digits(3, &[0; 81]).unwrap();
        let prior = state.assign(40, 7);
        assert_eq!(prior, Domain::full(9));
        assert_eq!(state.domain(40).value(), Some(7));

        state.restore(40, prior);
        assert_eq!(state.domain(40), Domain::full(9));
    }

    #[test]
    fn test_read_values() {
        let digits: Vec<u8> = (0..16).map(|i| (i % 4) + 1).collect();
        let state = PuzzleState::from_digits(2, &digits).unwrap();
        assert_eq!(state.read_values(), Some(digits));

        let open = PuzzleState::from_digits(2, &[0; 16]).unwrap();
        assert_eq!(open.read_values(), None);
    }
}
