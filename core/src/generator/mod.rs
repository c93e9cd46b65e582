use crate::*;
pub use random::*;

mod random;

/// Decides where the mines go once the first revealed position is known.
///
/// Implementations must return a layout of `config.size` holding exactly `config.mines` mines,
/// none of them at `exclude`.
pub trait MinePlacer {
    fn place(&mut self, config: GameConfig, exclude: Pos) -> MineLayout;
}
