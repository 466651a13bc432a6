use game::board::{COLS, ROWS};
use game::game_core::{GameCore, RunState, TickInput};
use game::geometry::{Cell, Piece};

fn i_piece_at(col: i32, row: i32) -> Piece {
    Piece::new([
        Cell::new(col, row),
        Cell::new(col + 1, row),
        Cell::new(col + 2, row),
        Cell::new(col + 3, row),
    ])
}

fn boosted() -> TickInput {
    TickInput {
        boost: true,
        ..TickInput::default()
    }
}

fn hard_drop() -> TickInput {
    TickInput {
        hard_drop: true,
        ..TickInput::default()
    }
}

#[test]
fn i_piece_descends_the_empty_board_and_fuses_on_the_bottom_row() {
    let mut core = GameCore::new(42);
    core.start();

    // An I piece translated to the center column of the empty board.
    let spawn_col = COLS as i32 / 2 - 2;
    core.set_active_piece_for_test(i_piece_at(spawn_col, 0), [12, 34, 56]);

    let mut fused = false;
    for _ in 0..300 {
        let report = core.tick(boosted());
        if report.fused {
            fused = true;
            break;
        }
        // While falling, the piece must always sit on valid cells.
        let active = core.active_piece().expect("piece active until fusion");
        assert!(core.board().placement_valid(&active.piece));
    }
    assert!(fused, "the piece must fuse once it reaches the floor");

    // It fused exactly on the bottom row, nowhere else.
    let mut colored = Vec::new();
    for (row, cells) in core.board().rows().iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if cell.is_some() {
                colored.push((col, row, *cell));
            }
        }
    }
    assert_eq!(colored.len(), 4);
    for (col, row, cell) in colored {
        assert_eq!(row, ROWS - 1);
        assert!((spawn_col as usize..spawn_col as usize + 4).contains(&col));
        assert_eq!(cell, Some([12, 34, 56]));
    }
}

#[test]
fn centered_hard_drops_stack_up_to_a_game_over_and_the_run_restarts() {
    let mut core = GameCore::new(7);
    core.start();

    // Without horizontal input every piece lands in the center columns, so
    // no row ever completes and the stack must eventually reach the top.
    let mut game_over = false;
    for _ in 0..2000 {
        let report = core.tick(hard_drop());
        if report.game_over {
            game_over = true;
            break;
        }
        core.tick(TickInput::default());
    }
    assert!(game_over, "the center stack must end the run");
    assert_eq!(core.run_state(), RunState::Stopped);
    assert!(core.active_piece().is_none());

    // The next run begins by itself after the restart delay.
    let mut restarted = false;
    for _ in 0..300 {
        if core.tick(TickInput::default()).restarted {
            restarted = true;
            break;
        }
    }
    assert!(restarted);
    assert_eq!(core.run_state(), RunState::Playing);
    assert!(core.active_piece().is_some());
    assert_eq!(core.score(), 0);
    assert!(
        core.board().rows().iter().flatten().all(Option::is_none),
        "restart must clear the board"
    );
}

#[test]
fn core_state_survives_a_serde_roundtrip() {
    let mut core = GameCore::new(3);
    core.start();
    for _ in 0..50 {
        core.tick(boosted());
    }

    let json = serde_json::to_string(&core).expect("core serializes");
    let restored: GameCore = serde_json::from_str(&json).expect("core deserializes");
    assert_eq!(restored.snapshot(), core.snapshot());

    // The restored copy continues identically.
    let mut original = core;
    let mut replica = restored;
    for _ in 0..100 {
        let a = original.tick(boosted());
        let b = replica.tick(boosted());
        assert_eq!(a, b);
    }
    assert_eq!(original.snapshot(), replica.snapshot());
}
