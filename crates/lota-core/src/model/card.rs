use crate::model::draw::NUMBER_COUNT;
use crate::model::sampler::pick_n;
use core::fmt;
use thiserror::Error;

pub const ROWS: usize = 3;
pub const COLUMNS: usize = 9;
pub const BLANKS_PER_ROW: usize = 4;
pub const NUMBERS_PER_ROW: usize = COLUMNS - BLANKS_PER_ROW;
/// Column `c` holds numbers from `c * DECADE` up to `(c + 1) * DECADE`.
pub const DECADE: u8 = 10;

const DECADE_OFFSETS: [u8; DECADE as usize] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
const COLUMN_INDICES: [usize; COLUMNS] = [0, 1, 2, 3, 4, 5, 6, 7, 8];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Number(u8),
    Blank,
}

impl Cell {
    pub const fn number(self) -> Option<u8> {
        match self {
            Cell::Number(number) => Some(number),
            Cell::Blank => None,
        }
    }

    pub const fn is_blank(self) -> bool {
        matches!(self, Cell::Blank)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    #[error("row {row} has {found} blanks, expected 4")]
    BlankCount { row: usize, found: usize },
    #[error("blank at row {row}, column {column} is not pre-marked")]
    UnmarkedBlank { row: usize, column: usize },
    #[error("number {number} does not belong in column {column}")]
    WrongColumn { number: u8, column: usize },
    #[error("number {0} appears more than once")]
    Duplicate(u8),
}

/// A 3x9 playing card. Blank cells are marked from the start so that a row
/// is complete once its five numbers have been drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    cells: [[Cell; COLUMNS]; ROWS],
    marked: [[bool; COLUMNS]; ROWS],
    row_marks: [u8; ROWS],
    numbers_marked: u8,
}

impl Card {
    /// Generates a random card.
    ///
    /// Every column draws three distinct numbers from its decade, one per row,
    /// then every row blanks out four of its columns.
    pub fn random<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cells = [[Cell::Blank; COLUMNS]; ROWS];

        for column in 0..COLUMNS {
            let offsets =
                pick_n(&DECADE_OFFSETS, ROWS, rng).expect("a decade holds at least three numbers");
            for (row, offset) in offsets.into_iter().enumerate() {
                cells[row][column] = Cell::Number(column as u8 * DECADE + offset);
            }
        }

        for row in cells.iter_mut() {
            let blanks =
                pick_n(&COLUMN_INDICES, BLANKS_PER_ROW, rng).expect("a row holds nine columns");
            for column in blanks {
                row[column] = Cell::Blank;
            }
        }

        let card = Self::with_blanks_marked(cells);
        if let Err(err) = card.validate() {
            panic!("generated card breaks its layout: {err}");
        }
        card
    }

    /// Builds a card from an explicit layout, `None` standing for a blank.
    pub fn from_rows(rows: [[Option<u8>; COLUMNS]; ROWS]) -> Result<Self, CardError> {
        let cells = rows.map(|row| row.map(|cell| cell.map_or(Cell::Blank, Cell::Number)));
        let card = Self::with_blanks_marked(cells);
        card.validate()?;
        Ok(card)
    }

    fn with_blanks_marked(cells: [[Cell; COLUMNS]; ROWS]) -> Self {
        let marked = cells.map(|row| row.map(Cell::is_blank));
        let row_marks = marked.map(|row| row.iter().filter(|&&m| m).count() as u8);
        Self {
            cells,
            marked,
            row_marks,
            numbers_marked: 0,
        }
    }

    pub fn validate(&self) -> Result<(), CardError> {
        let mut seen = [false; NUMBER_COUNT as usize];

        for (row, cells) in self.cells.iter().enumerate() {
            let blanks = cells.iter().filter(|cell| cell.is_blank()).count();
            if blanks != BLANKS_PER_ROW {
                return Err(CardError::BlankCount { row, found: blanks });
            }

            for (column, cell) in cells.iter().enumerate() {
                match cell.number() {
                    None if !self.marked[row][column] => {
                        return Err(CardError::UnmarkedBlank { row, column });
                    }
                    None => {}
                    Some(number) => {
                        if number >= NUMBER_COUNT || (number / DECADE) as usize != column {
                            return Err(CardError::WrongColumn { number, column });
                        }
                        if seen[number as usize] {
                            return Err(CardError::Duplicate(number));
                        }
                        seen[number as usize] = true;
                    }
                }
            }
        }

        Ok(())
    }

    /// Marks every cell holding `number`. Numbers not on the card are ignored.
    pub fn mark(&mut self, number: u8) {
        // A number can only sit in its own decade's column.
        let column = (number / DECADE) as usize;
        if column >= COLUMNS {
            return;
        }

        for row in 0..ROWS {
            if self.cells[row][column] == Cell::Number(number) && !self.marked[row][column] {
                self.marked[row][column] = true;
                self.row_marks[row] += 1;
                self.numbers_marked += 1;
            }
        }
    }

    pub fn has_pick(&self) -> bool {
        self.numbers_marked > 0
    }

    pub fn has_line(&self) -> bool {
        self.row_marks.iter().any(|&marks| marks as usize == COLUMNS)
    }

    pub fn has_lota(&self) -> bool {
        self.row_marks.iter().all(|&marks| marks as usize == COLUMNS)
    }

    pub fn cells(&self) -> &[[Cell; COLUMNS]; ROWS] {
        &self.cells
    }

    pub fn marked(&self) -> &[[bool; COLUMNS]; ROWS] {
        &self.marked
    }

    pub fn is_marked(&self, row: usize, column: usize) -> bool {
        self.marked[row][column]
    }

    pub fn numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.cells.iter().flatten().filter_map(|cell| cell.number())
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers().any(|n| n == number)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (cells, marked) in self.cells.iter().zip(self.marked.iter()) {
            let numbers = cells
                .iter()
                .map(|cell| match cell {
                    Cell::Number(number) => format!("{number:>3}"),
                    Cell::Blank => "   ".to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{numbers}")?;
            let marks: String = marked
                .iter()
                .map(|&m| if m { " ## " } else { " __ " })
                .collect();
            writeln!(f, "{marks}")?;
        }
        Ok(())
    }
}
