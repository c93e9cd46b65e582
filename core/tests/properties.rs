//! Property-based tests for board generation and play.
#![cfg(not(target_arch = "wasm32"))]

use neonsweep_core::*;
use proptest::prelude::*;

/// Strategy: a board config with at least one safe cell, plus an in-bounds first click.
fn board_strategy() -> impl Strategy<Value = (GameConfig, Pos, u64)> {
    (1..=16u8, 1..=16u8)
        .prop_flat_map(|(rows, cols)| {
            let cells = mult(rows, cols);
            (
                Just((rows, cols)),
                0..cells,
                0..rows,
                0..cols,
                any::<u64>(),
            )
        })
        .prop_map(|(size, mines, row, col, seed)| {
            (GameConfig::new(size, mines), (row, col), seed)
        })
}

fn is_mine(board: &Board, pos: Pos) -> bool {
    board.cell_at(pos).is_some_and(|cell| cell.is_mine())
}

fn neighbor_mines(board: &Board, pos: Pos) -> u8 {
    Neighbors::new(pos, board.size())
        .filter(|&n| is_mine(board, n))
        .count() as u8
}

proptest! {
    // 1. Placement yields exactly the requested mines and keeps the first click safe
    #[test]
    fn placement_count_and_exclusion((config, first, seed) in board_strategy()) {
        let mut board = Board::new(config, seed);
        let outcome = board.reveal(first);

        prop_assert_ne!(outcome, RevealOutcome::HitMine);
        prop_assert!(!is_mine(&board, first));
        let mines = board.positions().filter(|&pos| is_mine(&board, pos)).count();
        prop_assert_eq!(mines, usize::from(config.mines));
    }

    // 2. Adjacency counts match the neighbourhood
    #[test]
    fn adjacency_matches_neighbors((config, first, seed) in board_strategy()) {
        let mut board = Board::new(config, seed);
        board.reveal(first);

        for pos in board.positions().filter(|&pos| !is_mine(&board, pos)) {
            let cell = board.cell_at(pos).unwrap();
            prop_assert_eq!(cell.adjacent_mines(), neighbor_mines(&board, pos), "at {:?}", pos);
        }
    }

    // 3. Flood fill never reveals a mine and leaves no hidden neighbour around a revealed zero
    #[test]
    fn flood_fill_closes_zero_regions((config, first, seed) in board_strategy()) {
        let mut board = Board::new(config, seed);
        board.reveal(first);

        for pos in board.positions() {
            let cell = board.cell_at(pos).unwrap();
            if !cell.is_revealed() {
                continue;
            }
            prop_assert!(!cell.is_mine());
            if cell.adjacent_mines() == 0 {
                for n in Neighbors::new(pos, board.size()) {
                    prop_assert!(board.cell_at(n).unwrap().is_revealed(), "{:?} next to {:?}", n, pos);
                }
            }
        }
    }

    // 4. Mines remaining always equals mines minus a full recount of flags
    #[test]
    fn mines_remaining_matches_recount(
        (config, first, seed) in board_strategy(),
        flags in prop::collection::vec((0..16u8, 0..16u8), 0..40),
    ) {
        let mut board = Board::new(config, seed);
        board.reveal(first);

        for pos in flags {
            board.toggle_flag(pos);
            let flagged = board
                .positions()
                .filter(|&p| board.cell_at(p).unwrap().is_flagged())
                .count() as i32;
            prop_assert_eq!(board.mines_remaining(), i32::from(board.mine_count()) - flagged);
        }
    }

    // 5. The game is won exactly when the last safe cell is revealed
    #[test]
    fn win_iff_all_safe_cells_revealed((config, first, seed) in board_strategy()) {
        let mut board = Board::new(config, seed);
        let mut outcome = board.reveal(first);

        let safe: Vec<Pos> = board.positions().filter(|&pos| !is_mine(&board, pos)).collect();
        for pos in safe {
            let all_revealed = board
                .positions()
                .all(|p| is_mine(&board, p) || board.cell_at(p).unwrap().is_revealed());
            prop_assert_eq!(board.is_won(), all_revealed);
            if !board.is_won() {
                let step = board.reveal(pos);
                if step.has_update() {
                    outcome = step;
                }
            }
        }

        prop_assert_eq!(outcome, RevealOutcome::Won);
        prop_assert!(board.is_won());
        prop_assert_eq!(board.revealed_count(), board.safe_cell_count());
    }

    // 6. Toggling a flag twice is a no-op
    #[test]
    fn double_flag_toggle_is_identity((config, first, seed) in board_strategy()) {
        let mut board = Board::new(config, seed);
        board.reveal(first);
        let (rows, cols) = board.size();
        let target = (rows - 1, cols - 1);
        let before = board.clone();

        board.toggle_flag(target);
        board.toggle_flag(target);

        prop_assert_eq!(board, before);
    }
}
