use alloc::vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// The grid and everything needed to play it: mines, adjacency counts, flags and reveals.
///
/// Mines are placed on the first reveal so that the first revealed cell is never a mine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: GameConfig,
    seed: u64,
    cells: Array2<Cell>,
    flagged_count: CellCount,
    revealed_count: CellCount,
    first_click_pending: bool,
    triggered_mine: Option<Pos>,
    mines_exposed: bool,
}

impl Board {
    /// Empty board, no mines until the first reveal.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            cells: Array2::default(config.size.to_nd_index()),
            flagged_count: 0,
            revealed_count: 0,
            first_click_pending: true,
            triggered_mine: None,
            mines_exposed: false,
        }
    }

    /// Board with mines already fixed by `layout`.
    pub fn from_layout(layout: &MineLayout) -> Self {
        let mut board = Self::new(layout.game_config(), 0);
        board.arm(layout);
        board
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn size(&self) -> Pos {
        self.config.size
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.config.safe_cells()
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    /// Mines minus flags placed. Goes negative when the player over-flags.
    pub fn mines_remaining(&self) -> i32 {
        i32::from(self.config.mines) - i32::from(self.flagged_count)
    }

    pub fn is_first_click_pending(&self) -> bool {
        self.first_click_pending
    }

    pub fn triggered_mine(&self) -> Option<Pos> {
        self.triggered_mine
    }

    pub fn is_lost(&self) -> bool {
        self.triggered_mine.is_some()
    }

    pub fn is_won(&self) -> bool {
        !self.first_click_pending
            && !self.is_lost()
            && self.revealed_count == self.config.safe_cells()
    }

    pub fn is_finished(&self) -> bool {
        self.is_won() || self.is_lost()
    }

    pub fn mines_exposed(&self) -> bool {
        self.mines_exposed
    }

    pub fn cell_at(&self, pos: Pos) -> Option<&Cell> {
        self.cells.get(pos.to_nd_index())
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let (rows, cols) = self.size();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }

    pub fn view_at(&self, pos: Pos) -> Option<CellView> {
        let cell = self.cell_at(pos)?;
        let exposed = self.mines_exposed && cell.mine;
        Some(CellView {
            revealed: cell.is_revealed() || exposed,
            flagged: cell.is_flagged(),
            mine: exposed,
            triggered: self.triggered_mine == Some(pos),
            adjacent: if cell.mine { 0 } else { cell.adjacent },
        })
    }

    /// Paints every cell, row by row.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        for pos in self.positions() {
            if let Some(view) = self.view_at(pos) {
                renderer.paint(pos, view);
            }
        }
    }

    /// Reveals `pos`, placing mines with this board's seed if this is the first reveal.
    pub fn reveal(&mut self, pos: Pos) -> RevealOutcome {
        let mut placer = RandomMinePlacer::new(self.seed);
        self.reveal_with(pos, &mut placer)
    }

    pub fn reveal_with<P: MinePlacer + ?Sized>(
        &mut self,
        pos: Pos,
        placer: &mut P,
    ) -> RevealOutcome {
        if self.is_finished() {
            return RevealOutcome::NoChange;
        }
        match self.cell_at(pos) {
            Some(cell) if cell.state == CellState::Hidden => {}
            _ => return RevealOutcome::NoChange,
        }

        if self.first_click_pending {
            self.place_mines(placer, pos);
        }

        if self.cells[pos.to_nd_index()].mine {
            log::debug!("Mine hit at {:?}", pos);
            self.triggered_mine = Some(pos);
            return RevealOutcome::HitMine;
        }

        self.flood_reveal(pos);

        if self.is_won() {
            RevealOutcome::Won
        } else {
            RevealOutcome::Continue
        }
    }

    /// Fixes the mines with `placer`, keeping `exclude` safe, and computes adjacency counts.
    /// Does nothing once mines have been placed.
    pub fn place_mines<P: MinePlacer + ?Sized>(&mut self, placer: &mut P, exclude: Pos) {
        if !self.first_click_pending {
            log::warn!("Mines already placed, ignoring placement request");
            return;
        }
        let mut layout = placer.place(self.config, exclude);
        if layout.size() != self.config.size || layout.contains_mine(exclude) {
            log::warn!(
                "Rejected layout of size {:?} for {:?} board with {:?} excluded, placing at random",
                layout.size(),
                self.config.size,
                exclude
            );
            layout = RandomMinePlacer::new(self.seed).place(self.config, exclude);
        }
        self.arm(&layout);
    }

    pub fn toggle_flag(&mut self, pos: Pos) -> FlagOutcome {
        if self.is_finished() {
            return FlagOutcome::NoChange;
        }
        let Some(cell) = self.cells.get_mut(pos.to_nd_index()) else {
            return FlagOutcome::NoChange;
        };

        match cell.state {
            CellState::Hidden => {
                cell.state = CellState::Flagged;
                self.flagged_count += 1;
                FlagOutcome::Changed
            }
            CellState::Flagged => {
                cell.state = CellState::Hidden;
                self.flagged_count -= 1;
                FlagOutcome::Changed
            }
            CellState::Revealed => FlagOutcome::NoChange,
        }
    }

    /// Marks every mine for rendering, flagged or not.
    pub fn expose_mines(&mut self) {
        self.mines_exposed = true;
    }

    fn arm(&mut self, layout: &MineLayout) {
        for pos in self.positions() {
            self.cells[pos.to_nd_index()].mine = layout.contains_mine(pos);
        }
        self.config.mines = layout.mine_count();
        self.calculate_adjacency(layout);
        self.first_click_pending = false;
    }

    fn calculate_adjacency(&mut self, layout: &MineLayout) {
        for pos in self.positions() {
            let cell = &mut self.cells[pos.to_nd_index()];
            cell.adjacent = if cell.mine {
                0
            } else {
                layout.adjacent_mine_count(pos)
            };
        }
    }

    /// Reveals `start` and spreads through zero-count cells. `revealed` gates re-entry, so each
    /// cell is handled at most once.
    fn flood_reveal(&mut self, start: Pos) {
        let mut pending = vec![start];

        while let Some(pos) = pending.pop() {
            let cell = &mut self.cells[pos.to_nd_index()];
            if cell.state != CellState::Hidden || cell.mine {
                continue;
            }
            cell.state = CellState::Revealed;
            let adjacent = cell.adjacent;
            self.revealed_count += 1;
            log::trace!("Revealed {:?} with {} adjacent mines", pos, adjacent);

            if adjacent == 0 {
                pending.extend(
                    self.cells
                        .neighbors(pos)
                        .filter(|&n| self.cells[n.to_nd_index()].state == CellState::Hidden),
                );
            }
        }
    }
}
