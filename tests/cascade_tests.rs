//! Resolver sequences end to end

use tui_match3::core::{
    all_matches, Board, BoardConfig, CascadeEvent, CascadeResolver, EventLog, ScoreConfig,
    ScoreKeeper, TileGenerator,
};
use tui_match3::types::{Phase, Pos, Stage};

const A: u8 = 0;
const B: u8 = 1;
const C: u8 = 2;

fn scenario_board() -> Board {
    Board::from_rows(&[
        [A, B, A, B],
        [B, A, B, A],
        [A, B, C, B],
        [B, A, B, A],
    ])
}

fn scenario_resolver() -> CascadeResolver<EventLog> {
    CascadeResolver::from_parts(
        scenario_board(),
        TileGenerator::new(3, 0.0, 2024),
        EventLog::new(),
    )
}

#[test]
fn scenario_swap_clears_row_of_three() {
    let mut r = scenario_resolver();
    assert!(all_matches(r.board()).is_empty());

    assert!(r.request_swap(Pos::new(2, 2), Pos::new(2, 1)));
    assert!(r.step());
    assert_eq!(r.phase(), Phase::Resolving(Stage::Matching));
    let expected: Vec<Pos> = vec![Pos::new(1, 2), Pos::new(2, 2), Pos::new(3, 2)];
    assert_eq!(r.pending_matches().to_vec(), expected);

    r.settle();
    let events = r.sink().events();
    let cleared: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            CascadeEvent::MatchCleared { tiles, combo } => Some((tiles.clone(), *combo)),
            _ => None,
        })
        .collect();
    assert_eq!(cleared[0], (expected, 1));

    // Row y=3 dropped into y=2 for the cleared columns.
    assert_eq!(r.board().get(Pos::new(1, 2)).type_id, A);
    assert_eq!(r.board().get(Pos::new(2, 2)).type_id, B);
    assert_eq!(r.board().get(Pos::new(3, 2)).type_id, A);
    assert_eq!(r.board().get(Pos::new(0, 2)).type_id, A);

    let refilled: Vec<Pos> = events
        .iter()
        .find_map(|e| match e {
            CascadeEvent::TilesRefilled(fills) => Some(fills.iter().map(|f| f.pos).collect()),
            _ => None,
        })
        .unwrap();
    assert_eq!(refilled, vec![Pos::new(1, 3), Pos::new(2, 3), Pos::new(3, 3)]);
}

#[test]
fn single_pass_reports_combo_one_exactly_once() {
    let mut r = scenario_resolver();
    assert!(r.swap_and_settle(Pos::new(2, 2), Pos::new(2, 1)));
    assert_eq!(r.sink().combos(), vec![1]);
    assert_eq!(
        r.sink().events().last(),
        Some(&CascadeEvent::ResolutionSettled { combo: 1 })
    );
    assert_eq!(r.combo(), 0);
}

#[test]
fn drop_event_lists_moved_tiles() {
    let mut r = scenario_resolver();
    r.swap_and_settle(Pos::new(2, 2), Pos::new(2, 1));
    let drops = r
        .sink()
        .events()
        .iter()
        .find_map(|e| match e {
            CascadeEvent::TilesDropped(moves) => Some(moves.clone()),
            _ => None,
        })
        .unwrap();
    let pairs: Vec<(Pos, Pos)> = drops.iter().map(|m| (m.from, m.to)).collect();
    assert_eq!(
        pairs,
        vec![
            (Pos::new(1, 3), Pos::new(1, 2)),
            (Pos::new(2, 3), Pos::new(2, 2)),
            (Pos::new(3, 3), Pos::new(3, 2)),
        ]
    );
}

#[test]
fn unmatched_swap_is_reverted_byte_identical() {
    let mut r = scenario_resolver();
    let before = r.board().clone();
    assert!(r.request_swap(Pos::new(0, 0), Pos::new(0, 1)));
    r.settle();
    assert_eq!(r.phase(), Phase::Idle);
    assert_eq!(r.board(), &before);
    assert!(r.sink().combos().is_empty());
}

#[test]
fn swapping_twice_restores_board() {
    let mut board = scenario_board();
    let before = board.clone();
    board.swap(Pos::new(1, 1), Pos::new(2, 1));
    board.swap(Pos::new(1, 1), Pos::new(2, 1));
    assert_eq!(board, before);
}

#[test]
fn score_keeper_follows_cascade() {
    let mut r = CascadeResolver::from_parts(
        scenario_board(),
        TileGenerator::new(3, 0.0, 2024),
        ScoreKeeper::new(ScoreConfig::default()),
    );
    r.swap_and_settle(Pos::new(2, 2), Pos::new(2, 1));
    assert_eq!(r.sink().current(), 3 * 10);
    r.notify_game_over();
    assert_eq!(r.sink().high(), 30);
}

#[test]
fn generated_board_has_no_matches() {
    for seed in 1..50 {
        let config = BoardConfig::new(9, 7, 3).with_seed(seed).with_power_chance(0.2);
        let r = CascadeResolver::new(&config, ()).unwrap();
        assert!(all_matches(r.board()).is_empty(), "seed {}", seed);
        assert_eq!(r.board().destroyed_count(), 0);
    }
}

#[test]
fn game_over_requested_mid_cascade_is_deferred() {
    let mut r = scenario_resolver();
    r.request_swap(Pos::new(2, 2), Pos::new(2, 1));
    r.step();
    r.step();
    r.notify_game_over();
    assert!(r.phase().is_busy());
    r.settle();
    assert_eq!(r.phase(), Phase::GameOver);
    assert!(all_matches(r.board()).is_empty());
}

#[test]
fn drop_that_forms_a_new_run_counts_as_second_pass() {
    // Clearing row y=1 leaves C B B B at y=2 once the columns drop.
    let board = Board::from_rows(&[
        [C, B, C, A],
        [A, A, B, C],
        [B, C, A, B],
        [C, B, B, A],
    ]);
    let mut r =
        CascadeResolver::from_parts(board, TileGenerator::new(3, 0.0, 2024), EventLog::new());

    assert!(r.swap_and_settle(Pos::new(2, 1), Pos::new(2, 2)));
    assert_eq!(r.sink().combos(), vec![1, 2]);
    assert_eq!(
        r.sink().events().last(),
        Some(&CascadeEvent::ResolutionSettled { combo: 2 })
    );
    assert!(all_matches(r.board()).is_empty());
    assert!(r.board().positions().all(|p| r.board().get(p).type_id < 3));
}
