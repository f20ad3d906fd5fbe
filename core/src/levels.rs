//! Predefined level table.

use serde::{Deserialize, Serialize};

use crate::{CellCoord, CellKind, LevelError};

/// Number of predefined levels.
pub const LEVEL_COUNT: usize = 6;

const ROWS: usize = 3;
const COLUMNS: usize = 4;

const E: CellKind = CellKind::Empty;
const O: CellKind = CellKind::Obstacle;
const G: CellKind = CellKind::Goal;

static LEVELS: [LevelLayout; LEVEL_COUNT] = [
    LevelLayout::new([[E, O, E, E], [G, G, O, E], [O, E, G, E]]),
    LevelLayout::new([[E, E, E, E], [O, O, O, E], [G, G, G, E]]),
    LevelLayout::new([[E, E, O, E], [E, O, G, E], [E, G, G, O]]),
    LevelLayout::new([[E, E, E, G], [O, G, O, E], [O, E, G, E]]),
    LevelLayout::new([[E, G, O, G], [G, E, O, E], [E, E, E, E]]),
    LevelLayout::new([[E, G, E, E], [G, G, O, E], [O, E, E, E]]),
];

/// Index of a predefined level.
///
/// Construction validates the index, so every `LevelId` in circulation names
/// an existing layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct LevelId(usize);

impl LevelId {
    /// First level of the campaign.
    pub const FIRST: LevelId = LevelId(0);

    /// Validates `index` against the level table.
    pub fn new(index: usize) -> Result<Self, LevelError> {
        if index < LEVEL_COUNT {
            Ok(Self(index))
        } else {
            Err(LevelError::UnknownLevel {
                index,
                count: LEVEL_COUNT,
            })
        }
    }

    /// Retrieves the zero-based level index.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }

    /// Level that follows this one, wrapping to the first after the last.
    #[must_use]
    pub const fn next(self) -> Self {
        Self((self.0 + 1) % LEVEL_COUNT)
    }

    /// Static layout of the level.
    #[must_use]
    pub fn layout(self) -> &'static LevelLayout {
        &LEVELS[self.0]
    }

    /// Iterator over every predefined level in order.
    pub fn all() -> impl Iterator<Item = LevelId> {
        (0..LEVEL_COUNT).map(LevelId)
    }
}

impl TryFrom<usize> for LevelId {
    type Error = LevelError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<LevelId> for usize {
    fn from(level: LevelId) -> Self {
        level.0
    }
}

/// Immutable matrix of cell kinds describing one level.
#[derive(Debug, PartialEq, Eq)]
pub struct LevelLayout {
    cells: [[CellKind; COLUMNS]; ROWS],
}

impl LevelLayout {
    const fn new(cells: [[CellKind; COLUMNS]; ROWS]) -> Self {
        Self { cells }
    }

    /// Number of rows in the layout.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        ROWS as u32
    }

    /// Number of columns in the layout.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        COLUMNS as u32
    }

    /// Cell where the avatar enters the level.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        CellCoord::ORIGIN
    }

    /// Kind of the provided cell, or `None` outside the layout.
    #[must_use]
    pub fn kind_at(&self, cell: CellCoord) -> Option<CellKind> {
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        self.cells.get(row)?.get(column).copied()
    }

    /// Iterator over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, CellKind)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, kinds)| {
            kinds
                .iter()
                .enumerate()
                .map(move |(column, kind)| (CellCoord::new(row as u32, column as u32), *kind))
        })
    }

    /// Number of goal cells in the layout.
    #[must_use]
    pub fn goal_count(&self) -> u32 {
        self.cells()
            .filter(|(_, kind)| *kind == CellKind::Goal)
            .count() as u32
    }
}
