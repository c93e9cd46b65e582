use serde::{Deserialize, Serialize};

/// Player-visible state of a cell. A cell is never both flagged and revealed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Flagged,
    Revealed,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) mine: bool,
    pub(crate) adjacent: u8,
    pub(crate) state: CellState,
}

impl Cell {
    pub const fn is_mine(&self) -> bool {
        self.mine
    }

    pub const fn is_revealed(&self) -> bool {
        matches!(self.state, CellState::Revealed)
    }

    pub const fn is_flagged(&self) -> bool {
        matches!(self.state, CellState::Flagged)
    }

    pub const fn state(&self) -> CellState {
        self.state
    }

    /// Number of mines among the neighbours. Only meaningful for safe cells once mines are placed.
    pub const fn adjacent_mines(&self) -> u8 {
        self.adjacent
    }
}

/// Read-only projection of a cell handed to a [`Renderer`].
///
/// `mine` stays `false` until mines are exposed at the end of a lost game; exposed mines also
/// report `revealed`, whether or not they were flagged.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub revealed: bool,
    pub flagged: bool,
    pub mine: bool,
    pub triggered: bool,
    pub adjacent: u8,
}

impl CellView {
    pub const fn is_hidden(&self) -> bool {
        !self.revealed && !self.flagged
    }
}

/// Paints cells. Called by the owner of a board after each mutating call, never read back.
pub trait Renderer {
    fn paint(&mut self, pos: crate::Pos, cell: CellView);
}
