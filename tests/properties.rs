//! Property-based tests for board invariants.

use proptest::prelude::*;

use tui_match3::core::{
    all_matches, compact_columns, Board, BoardConfig, CascadeResolver, MatchSet,
    PowerChainExpander,
};
use tui_match3::types::{Pos, Power, Tile};

/// Strategy: a valid board configuration.
fn config_strategy() -> impl Strategy<Value = BoardConfig> {
    (1u16..=12, 1u16..=12, 3u8..=8, 0.0f32..=0.3, any::<u32>()).prop_map(
        |(w, h, types, chance, seed)| {
            BoardConfig::new(w, h, types)
                .with_power_chance(chance)
                .with_seed(seed)
        },
    )
}

/// Strategy: a raw grid where `None` is a destroyed cell.
fn grid_strategy() -> impl Strategy<Value = (u16, u16, Vec<Option<(u8, u8)>>)> {
    (1u16..=8, 1u16..=8).prop_flat_map(|(w, h)| {
        let cell = prop::option::weighted(0.7, (0u8..4, 0u8..3));
        (
            Just(w),
            Just(h),
            prop::collection::vec(cell, (w as usize) * (h as usize)),
        )
    })
}

fn power_of(n: u8) -> Power {
    match n {
        1 => Power::RowClear,
        2 => Power::ColumnClear,
        _ => Power::None,
    }
}

fn build(w: u16, h: u16, cells: &[Option<(u8, u8)>]) -> Board {
    let mut board = Board::new(w, h);
    for y in 0..h as i16 {
        for x in 0..w as i16 {
            let i = y as usize * w as usize + x as usize;
            if let Some((id, p)) = cells[i] {
                board.set(Pos::new(x, y), Tile::new(id, power_of(p)));
            }
        }
    }
    board
}

/// Adjacent pairs of a board, right then up neighbour per cell.
fn adjacent_pairs(board: &Board) -> Vec<(Pos, Pos)> {
    board
        .positions()
        .flat_map(|p| [(p, p.offset(1, 0)), (p, p.offset(0, 1))])
        .filter(|&(_, q)| board.contains(q))
        .collect()
}

fn column(board: &Board, x: i16) -> Vec<Tile> {
    (0..board.height() as i16)
        .map(|y| board.get(Pos::new(x, y)))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    // 1. Generation never produces a 3-run
    #[test]
    fn generated_board_is_settled(config in config_strategy()) {
        let r = CascadeResolver::new(&config, ()).unwrap();
        prop_assert!(all_matches(r.board()).is_empty());
        prop_assert_eq!(r.board().destroyed_count(), 0);
    }

    // 2. Same seed, same board
    #[test]
    fn generation_is_deterministic(config in config_strategy()) {
        let a = CascadeResolver::new(&config, ()).unwrap();
        let b = CascadeResolver::new(&config, ()).unwrap();
        prop_assert_eq!(a.board(), b.board());
    }

    // 3. Swapping the same pair twice is the identity
    #[test]
    fn double_swap_round_trips((w, h, cells) in grid_strategy(), pick in any::<prop::sample::Index>()) {
        let board = build(w, h, &cells);
        let pairs = adjacent_pairs(&board);
        prop_assume!(!pairs.is_empty());
        let (a, b) = pairs[pick.index(pairs.len())];

        let mut swapped = board.clone();
        swapped.swap(a, b);
        swapped.swap(a, b);
        prop_assert_eq!(swapped, board);
    }

    // 4. A swap with no match leaves the board unchanged after settling;
    //    one with a match settles into a match-free board
    #[test]
    fn swap_outcome_is_revert_or_settle(config in config_strategy(), pick in any::<prop::sample::Index>()) {
        let mut r = CascadeResolver::new(&config, ()).unwrap();
        let pairs = adjacent_pairs(r.board());
        prop_assume!(!pairs.is_empty());
        let (a, b) = pairs[pick.index(pairs.len())];

        let before = r.board().clone();
        let mut probe = before.clone();
        probe.swap(a, b);
        let matched = !all_matches(&probe).is_empty();

        prop_assert!(r.swap_and_settle(a, b));
        prop_assert!(r.is_idle());
        let board = r.board();
        prop_assert!(board.positions().all(|p| board.get(p).type_id < config.tile_types));
        if matched {
            prop_assert!(all_matches(r.board()).is_empty());
            prop_assert_eq!(r.board().destroyed_count(), 0);
        } else {
            prop_assert_eq!(r.board(), &before);
        }
    }

    // 5. Compaction leaves live tiles at the bottom in their original order
    #[test]
    fn compaction_preserves_column_order((w, h, cells) in grid_strategy()) {
        let mut board = build(w, h, &cells);
        let before = board.clone();
        let moves = compact_columns(&mut board);

        for x in 0..w as i16 {
            let live_before: Vec<Tile> = column(&before, x).into_iter().filter(|t| t.is_live()).collect();
            let after = column(&board, x);
            let split = after.iter().position(|t| !t.is_live()).unwrap_or(after.len());
            prop_assert!(after[split..].iter().all(|t| !t.is_live()));
            prop_assert_eq!(&after[..split], &live_before[..]);
        }
        for m in &moves {
            prop_assert_eq!(m.from.x, m.to.x);
            prop_assert!(m.to.y < m.from.y);
        }
    }

    // 6. Power expansion terminates and detonates each power tile at most once
    #[test]
    fn power_expansion_is_bounded((w, h, cells) in grid_strategy()) {
        let board = build(w, h, &cells);
        let powers: Vec<Pos> = board
            .positions()
            .filter(|&p| board.is_live(p) && board.get(p).power.is_some())
            .collect();

        let mut out = MatchSet::new();
        let mut expander = PowerChainExpander::new(&board);
        for &p in &powers {
            expander.expand(p, &mut out);
        }
        prop_assert!(expander.detonations() <= powers.len());
        prop_assert!(out.iter().all(|p| board.is_live(p)));

        let found = all_matches(&board);
        prop_assert!(found.iter().all(|p| board.is_live(p)));
    }
}
