use ndarray::Array2;
use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Uniform placement by rejection sampling: roll a row and a column, re-roll on a duplicate or
/// on the excluded cell.
#[derive(Clone, Debug)]
pub struct RandomMinePlacer {
    rng: SmallRng,
}

impl RandomMinePlacer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl MinePlacer for RandomMinePlacer {
    fn place(&mut self, config: GameConfig, exclude: Pos) -> MineLayout {
        let (rows, cols) = config.size;
        let total_cells = config.total_cells();

        let mut mines = config.mines;
        let free_cells = if config.contains(exclude) {
            total_cells - 1
        } else {
            total_cells
        };
        if mines > free_cells {
            log::warn!(
                "Requested {} mines but only {} cells are free, placing {}",
                mines,
                free_cells,
                free_cells
            );
            mines = free_cells;
        }
        if u32::from(mines) * 2 > u32::from(total_cells) {
            log::warn!(
                "Dense minefield ({} of {} cells), placement may take a while",
                mines,
                total_cells
            );
        }

        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut placed: CellCount = 0;
        let mut attempts: u32 = 0;
        while placed < mines {
            let pos = (self.rng.random_range(0..rows), self.rng.random_range(0..cols));
            attempts = attempts.saturating_add(1);

            let cell = &mut mine_mask[pos.to_nd_index()];
            if pos == exclude || *cell {
                continue;
            }
            *cell = true;
            placed += 1;
        }

        log::debug!(
            "Placed {} mines on {}x{} avoiding {:?} after {} attempts",
            placed,
            rows,
            cols,
            exclude,
            attempts
        );
        MineLayout::from_mine_mask(mine_mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exact_count_and_skips_excluded_cell() {
        let config = GameConfig::new((10, 10), 15);
        let layout = RandomMinePlacer::new(7).place(config, (5, 5));

        assert_eq!(layout.mine_count(), 15);
        assert_eq!(layout.iter_mines().count(), 15);
        assert!(!layout.contains_mine((5, 5)));
    }

    #[test]
    fn same_seed_gives_same_layout() {
        let config = GameConfig::new((16, 16), 40);
        let a = RandomMinePlacer::new(42).place(config, (0, 0));
        let b = RandomMinePlacer::new(42).place(config, (0, 0));

        assert_eq!(a, b);
    }

    #[test]
    fn fills_every_cell_but_the_excluded_one() {
        let config = GameConfig::new((3, 3), 8);
        let layout = RandomMinePlacer::new(1).place(config, (1, 1));

        assert_eq!(layout.mine_count(), 8);
        assert!(!layout.contains_mine((1, 1)));
    }

    #[test]
    fn caps_mines_when_config_overflows_free_cells() {
        let config = GameConfig::new_unchecked((2, 2), 9);
        let layout = RandomMinePlacer::new(3).place(config, (0, 1));

        assert_eq!(layout.mine_count(), 3);
        assert!(!layout.contains_mine((0, 1)));
    }
}
