//! Session-level scenarios driven through the public [`Game`] facade.
//!
//! The piece sequence depends on the seed, so these tests never assume a
//! particular kind: they read the snapshot and steer whatever is live. Taps
//! happen between ticks, which keeps gravity out of the steering math.

use std::cell::RefCell;
use std::rc::Rc;

use tetris_engine::commands::{GameCommand, MoveDir, ReplayLog};
use tetris_engine::config::{GameConfig, GameGoal};
use tetris_engine::core::TimeMode;
use tetris_engine::events::{EventKind, GameEvent};
use tetris_engine::game::Game;
use tetris_engine::types::{
    GamePhase, MoveType, PieceKind, Rotation, SpinKind, Turn, EMPTY_CELL, GARBAGE_CELL,
};

const TICK: u32 = 16;

fn game_with(config: GameConfig, seed: u32) -> Game {
    Game::new(config, seed).unwrap()
}

/// Gravity slow enough that pieces only move when told to.
fn hover_config() -> GameConfig {
    GameConfig {
        gravity_base: 100_000,
        ..GameConfig::default()
    }
}

fn run(game: &mut Game, ms: u32) {
    for _ in 0..ms / TICK {
        game.update(TICK);
    }
}

fn capture(game: &Game, kind: EventKind) -> Rc<RefCell<Vec<GameEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    game.events().subscribe(kind, move |_, event| {
        sink.borrow_mut().push(event.clone());
    });
    log
}

fn active_col(game: &Game) -> i32 {
    game.snapshot().active.expect("piece live").col
}

/// One press-release pair; the shift lands on the press itself.
fn tap(game: &mut Game, dir: MoveDir) {
    game.apply(GameCommand::MoveStart(dir));
    game.apply(GameCommand::MoveEnd(dir));
}

fn steer_to(game: &mut Game, target: i32) {
    for _ in 0..16 {
        let col = active_col(game);
        if col == target {
            return;
        }
        let dir = if col < target {
            MoveDir::Right
        } else {
            MoveDir::Left
        };
        tap(game, dir);
        if active_col(game) == col {
            return; // wall or stack in the way
        }
    }
}

/// Slams the live piece, runs the lock tick, then waits out the entry
/// delay so the next piece is live on return.
fn drop_and_settle(game: &mut Game) {
    game.apply(GameCommand::HardDrop);
    run(game, TICK);
    run(game, 512);
}

/// Column left open by the last garbage push.
fn bottom_hole(game: &Game) -> i32 {
    let board = game.snapshot().board;
    let bottom = board.rows() - 1;
    (0..board.cols())
        .find(|&col| board.get(bottom, col) == EMPTY_CELL)
        .map(|col| col as i32)
        .expect("garbage keeps one column open")
}

/// Parks the live piece against the wall on the far side of the hole.
fn park_away(game: &mut Game, hole: i32) {
    let target = if hole < 5 { 8 } else { 1 };
    steer_to(game, target);
    drop_and_settle(game);
}

/// Rotates an I upright and lines it up over the garbage hole, parking
/// every other piece out of the way first. A seven-piece bag surfaces an I
/// within the first seven spawns, and six parked pieces stack well below
/// the spawn rows, so the drive always completes.
fn line_up_i_over_hole(game: &mut Game) {
    let hole = bottom_hole(game);
    for _ in 0..7 {
        if game.snapshot().active.expect("piece live").kind == PieceKind::I {
            break;
        }
        park_away(game, hole);
    }
    let view = game.snapshot().active.expect("piece live");
    assert_eq!(view.kind, PieceKind::I, "a full bag always contains an I");

    game.apply(GameCommand::RotateStart(Turn::Clockwise));
    game.apply(GameCommand::RotateRelease);
    let view = game.snapshot().active.expect("piece live");
    assert_eq!(view.rotation, Rotation::East);
    // Upright, the I occupies the second column of its box.
    steer_to(game, hole - 1);
    assert_eq!(active_col(game), hole - 1, "steering must reach the hole");
}

// ================== Session flow ==================

#[test]
fn test_piece_lifecycle_spawn_lock_respawn() {
    let mut game = game_with(GameConfig::default(), 42);
    let spawns = capture(&game, EventKind::NewPiece);
    let locks = capture(&game, EventKind::PieceLocked);
    let drops = capture(&game, EventKind::HardDrop);

    run(&mut game, 496);
    assert_eq!(game.phase(), GamePhase::EntryDelay);
    assert!(game.snapshot().active.is_none());
    run(&mut game, TICK);
    assert_eq!(game.phase(), GamePhase::Playing);
    assert_eq!(spawns.borrow().len(), 1);

    let view = game.snapshot();
    let active = view.active.as_ref().expect("piece live");
    let ghost = view.ghost_row.expect("ghost follows the piece");
    assert!(ghost >= active.row);
    let next_kind = view.preview[0];

    game.apply(GameCommand::HardDrop);
    assert!(matches!(
        drops.borrow()[..],
        [GameEvent::HardDrop { distance }] if distance > 0
    ));
    run(&mut game, TICK);
    assert!(matches!(
        locks.borrow()[..],
        [GameEvent::PieceLocked { cleared: false }]
    ));
    assert_eq!(game.phase(), GamePhase::EntryDelay);

    let board = game.snapshot().board;
    let mut filled = 0;
    for row in 0..board.rows() {
        for col in 0..board.cols() {
            if board.get(row, col) != EMPTY_CELL {
                filled += 1;
            }
        }
    }
    assert_eq!(filled, 4, "the locked piece stamped four cells");

    run(&mut game, 512);
    assert_eq!(spawns.borrow().len(), 2);
    assert_eq!(
        game.snapshot().active.expect("piece live").kind,
        next_kind,
        "the preview head becomes the next piece"
    );
}

#[test]
fn test_hold_swaps_with_preview_head() {
    let mut game = game_with(hover_config(), 9);
    let holds = capture(&game, EventKind::PieceHeld);
    run(&mut game, 512);
    let before = game.snapshot();
    let first = before.active.as_ref().expect("piece live").kind;
    let upcoming = before.preview[0];

    game.apply(GameCommand::Hold);
    let after = game.snapshot();
    assert_eq!(after.hold, Some(first));
    assert_eq!(after.active.as_ref().expect("piece live").kind, upcoming);
    assert!(matches!(
        holds.borrow()[..],
        [GameEvent::PieceHeld { kind }] if kind == first
    ));

    // One hold per piece; the second request is ignored.
    game.apply(GameCommand::Hold);
    assert_eq!(holds.borrow().len(), 1);
    assert_eq!(game.snapshot().hold, Some(first));
}

// ================== Auto-shift ==================

#[test]
fn test_das_delay_then_steady_repeats() {
    let config = GameConfig {
        cols: 16,
        das_delay: 166,
        arr_delay: 33,
        ..hover_config()
    };
    let mut game = game_with(config, 42);
    run(&mut game, 512);
    let start = active_col(&game);

    game.apply(GameCommand::MoveStart(MoveDir::Right));
    assert_eq!(active_col(&game), start + 1, "the press itself shifts once");
    game.update(165);
    assert_eq!(active_col(&game), start + 1, "still inside the das window");
    game.update(1);
    assert_eq!(active_col(&game), start + 1, "the engage tick arms the repeat");
    game.update(33);
    assert_eq!(active_col(&game), start + 2);
    game.update(66);
    assert_eq!(active_col(&game), start + 4, "a long frame catches up");

    game.apply(GameCommand::MoveEnd(MoveDir::Right));
    game.update(200);
    assert_eq!(active_col(&game), start + 4, "released keys do not drift");
}

#[test]
fn test_zero_interval_auto_shift_slides_to_the_wall() {
    let config = GameConfig {
        das_delay: 128,
        arr_delay: 0,
        ..hover_config()
    };
    let mut game = game_with(config, 42);
    run(&mut game, 512);
    let start = active_col(&game);

    game.apply(GameCommand::MoveStart(MoveDir::Right));
    game.update(112);
    assert_eq!(active_col(&game), start + 1);
    game.update(16);
    assert_eq!(active_col(&game), start + 1, "engage tick only arms the repeat");
    game.update(16);
    let wall = active_col(&game);
    assert!(wall > start + 1, "zero interval slides the piece");
    game.apply(GameCommand::MoveEnd(MoveDir::Right));
    tap(&mut game, MoveDir::Right);
    assert_eq!(active_col(&game), wall, "already resting against the wall");
}

// ================== Lock delay ==================

#[test]
fn test_lock_delay_reset_budget() {
    let config = GameConfig {
        lock_delay: 300,
        max_lock_resets: 2,
        soft_drop_delay: 0,
        ..hover_config()
    };
    let mut game = game_with(config, 42);
    let locks = capture(&game, EventKind::PieceLocked);
    run(&mut game, 512);

    // Zero-interval soft drop sends the piece straight to the stack.
    game.apply(GameCommand::SoftDropStart);
    game.update(0);
    game.apply(GameCommand::SoftDropEnd);
    let resting = game.snapshot().active.as_ref().expect("piece live").row;
    assert_eq!(game.snapshot().ghost_row, Some(resting));

    game.update(299);
    assert!(locks.borrow().is_empty(), "lock delay has not expired yet");
    tap(&mut game, MoveDir::Left); // first reset
    game.update(299);
    assert!(locks.borrow().is_empty());
    tap(&mut game, MoveDir::Right); // second reset
    game.update(299);
    assert!(locks.borrow().is_empty());

    // The budget is spent: the piece still moves, but the clock keeps going.
    let before = active_col(&game);
    tap(&mut game, MoveDir::Left);
    assert_eq!(active_col(&game), before - 1);
    game.update(1);
    assert_eq!(locks.borrow().len(), 1);
    assert_eq!(game.phase(), GamePhase::EntryDelay);
    assert!(game.snapshot().active.is_none());
}

// ================== Line clears ==================

#[test]
fn test_tetris_through_a_garbage_hole() {
    let mut game = game_with(hover_config(), 7);
    let received = capture(&game, EventKind::GarbageReceived);
    let clears = capture(&game, EventKind::LineCleared);
    let scores = capture(&game, EventKind::ScoreUpdated);
    let sent = capture(&game, EventKind::GarbageSent);

    run(&mut game, 512);
    game.apply(GameCommand::Garbage {
        lines: 4,
        block_id: GARBAGE_CELL,
    });
    assert!(matches!(
        received.borrow()[..],
        [GameEvent::GarbageReceived { lines: 4 }]
    ));

    line_up_i_over_hole(&mut game);
    game.apply(GameCommand::HardDrop);
    run(&mut game, TICK);

    assert_eq!(clears.borrow().len(), 1);
    assert!(matches!(
        clears.borrow()[0],
        GameEvent::LineCleared {
            spin: SpinKind::None,
            lines: 4,
            ..
        }
    ));
    assert!(matches!(
        scores.borrow()[..],
        [GameEvent::ScoreUpdated {
            awarded: 800,
            move_type: MoveType::Tetris,
            ..
        }]
    ));
    assert!(matches!(
        sent.borrow()[..],
        [GameEvent::GarbageSent { lines: 3 }]
    ));
    assert_eq!(game.total_lines(), 4);
    assert_eq!(game.snapshot().lines_cleared, 4);
}

// ================== Goals ==================

#[test]
fn test_victory_by_line_goal() {
    let config = GameConfig {
        goal: GameGoal::Lines(4),
        ..hover_config()
    };
    let mut game = game_with(config, 11);
    let over = capture(&game, EventKind::GameOver);

    run(&mut game, 512);
    game.apply(GameCommand::Garbage {
        lines: 4,
        block_id: GARBAGE_CELL,
    });
    line_up_i_over_hole(&mut game);
    game.apply(GameCommand::HardDrop);
    run(&mut game, TICK);
    assert_eq!(game.snapshot().lines_cleared, 4);
    assert_eq!(game.phase(), GamePhase::EntryDelay);

    // The goal check runs on the first playing tick after the next spawn.
    run(&mut game, 512);
    run(&mut game, TICK);
    assert_eq!(game.phase(), GamePhase::Victory);
    assert!(game.is_over());
    assert!(matches!(
        over.borrow()[..],
        [GameEvent::GameOver {
            victory: true,
            goal: GameGoal::Lines(4)
        }]
    ));
}

#[test]
fn test_victory_by_time_goal_ends_the_session() {
    let config = GameConfig {
        goal: GameGoal::Time(1),
        ..GameConfig::default()
    };
    let mut game = game_with(config, 42);
    let over = capture(&game, EventKind::GameOver);

    run(&mut game, 512);
    assert_eq!(game.phase(), GamePhase::Playing);
    run(&mut game, 1008);
    assert_eq!(game.phase(), GamePhase::Victory);
    assert!(matches!(
        over.borrow()[..],
        [GameEvent::GameOver {
            victory: true,
            goal: GameGoal::Time(1)
        }]
    ));

    // Terminal phases absorb updates and commands alike.
    game.apply(GameCommand::HardDrop);
    game.update(TICK);
    assert_eq!(game.phase(), GamePhase::Victory);
}

// ================== Time control ==================

#[test]
fn test_freeze_defers_clears_until_time_resumes() {
    let mut game = game_with(hover_config(), 5);
    run(&mut game, 512);
    game.apply(GameCommand::Garbage {
        lines: 4,
        block_id: GARBAGE_CELL,
    });
    line_up_i_over_hole(&mut game);

    // Captures start here so the parked pieces above stay out of the logs.
    let locks = capture(&game, EventKind::PieceLocked);
    let frozen_clears = capture(&game, EventKind::FreezeLineClear);
    let clears = capture(&game, EventKind::LineCleared);

    game.apply(GameCommand::FreezeTime { ms: 2048 });
    assert_eq!(game.time_mode(), TimeMode::Frozen);
    game.apply(GameCommand::HardDrop);
    run(&mut game, TICK);

    // The lock lands while time stands still: the full rows stay put.
    assert!(matches!(
        locks.borrow()[..],
        [GameEvent::PieceLocked { cleared: true }]
    ));
    assert!(matches!(
        frozen_clears.borrow()[..],
        [GameEvent::FreezeLineClear {
            lines: 4,
            spin: SpinKind::None
        }]
    ));
    assert!(clears.borrow().is_empty());
    assert_eq!(game.snapshot().lines_cleared, 0);
    let board = game.snapshot().board;
    let bottom = board.rows() - 1;
    assert!(
        (0..board.cols()).all(|col| board.get(bottom, col) != EMPTY_CELL),
        "deferred rows remain on the board"
    );

    run(&mut game, 2016);
    assert_eq!(game.time_mode(), TimeMode::Frozen);
    assert!(clears.borrow().is_empty());

    run(&mut game, TICK);
    assert_eq!(game.time_mode(), TimeMode::Normal);
    assert!(matches!(
        clears.borrow()[..],
        [GameEvent::LineCleared {
            spin: SpinKind::None,
            lines: 4,
            ..
        }]
    ));
    assert_eq!(game.snapshot().lines_cleared, 4);
}

// ================== Replay ==================

#[test]
fn test_replay_reproduces_a_live_session() {
    let config = GameConfig::default();
    let log = Rc::new(RefCell::new(ReplayLog::new()));
    let mut live =
        Game::with_recorder(config.clone(), 2024, Box::new(Rc::clone(&log))).unwrap();

    run(&mut live, 512);
    live.apply(GameCommand::Garbage {
        lines: 2,
        block_id: GARBAGE_CELL,
    });
    live.apply(GameCommand::SlowTime { ms: 400 });
    live.apply(GameCommand::MoveStart(MoveDir::Right));
    live.apply(GameCommand::MoveEnd(MoveDir::Right));
    run(&mut live, 160);
    live.apply(GameCommand::RotateStart(Turn::Clockwise));
    live.apply(GameCommand::RotateRelease);
    live.apply(GameCommand::HardDrop);
    run(&mut live, 544);
    live.apply(GameCommand::Hold);
    run(&mut live, 288);

    let replayed = Game::replay(config, 2024, &log.borrow(), TICK, live.clock_ms()).unwrap();
    assert_eq!(replayed.clock_ms(), live.clock_ms());
    assert_eq!(replayed.snapshot(), live.snapshot());
    assert_eq!(replayed.total_points(), live.total_points());
    assert_eq!(replayed.total_lines(), live.total_lines());
}
