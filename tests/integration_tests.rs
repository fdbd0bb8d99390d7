//! Integration tests for the game lifecycle

use std::io::Write;

use tui_stacker::core::{
    ConfigError, GameConfig, GameError, GameState, JsonConfigFile, LocalLeaderboard, NullStage,
    ScoreService, ServiceError, Standings, Ticker,
};
use tui_stacker::term::{TermStage, Viewport};
use tui_stacker::types::{CutKind, Phase};

/// Wraps the local leaderboard, counting submissions and failing on demand.
struct FlakyScores {
    inner: LocalLeaderboard,
    online: bool,
    submissions: usize,
}

impl FlakyScores {
    fn new() -> Self {
        Self {
            inner: LocalLeaderboard::new("tester"),
            online: true,
            submissions: 0,
        }
    }
}

impl ScoreService for FlakyScores {
    fn standings(&mut self) -> Result<Standings, ServiceError> {
        self.inner.standings()
    }

    fn submit_score(&mut self, score: u32) -> Result<Standings, ServiceError> {
        if !self.online {
            return Err(ServiceError::Unavailable("connection refused".to_string()));
        }
        self.submissions += 1;
        self.inner.submit_score(score)
    }
}

fn config(distance: f64, accuracy: f64) -> GameConfig {
    let mut config = GameConfig::default();
    config.gameplay.distance = distance;
    config.gameplay.accuracy = accuracy;
    config
}

fn ready(config: GameConfig, scores: &mut FlakyScores) -> GameState {
    let mut game = GameState::new(7);
    let mut source = config;
    game.prepare(&mut source, scores).unwrap();
    game
}

fn active_offset(game: &GameState) -> f64 {
    let active = game.active_block().unwrap();
    let target = game.target_block().unwrap();
    let axis = active.cut_axis();
    active.position_on(axis) - target.position_on(axis)
}

/// Step the moving block in small increments until it is within `window` of the target.
fn sweep_until_within(game: &mut GameState, window: f64) {
    for _ in 0..10_000 {
        if active_offset(game).abs() < window {
            return;
        }
        game.update(0.25);
    }
    panic!("block never came within {} of the target", window);
}

#[test]
fn test_game_lifecycle() {
    let mut scores = FlakyScores::new();
    let mut game = GameState::new(12345);
    assert_eq!(game.phase(), Phase::Loading);

    let mut source = GameConfig::default();
    game.prepare(&mut source, &mut scores).unwrap();
    assert_eq!(game.phase(), Phase::Ready);
    assert!(game.instructions_visible());
    assert_eq!(game.best().unwrap().rank, 0);

    assert!(game.action(&mut scores).unwrap());
    assert_eq!(game.phase(), Phase::Playing);
    assert!(game.active_block().is_some());

    // Spawned 12 units out on a 10 wide stack: dropping now misses.
    game.action(&mut scores).unwrap();
    assert_eq!(game.phase(), Phase::Ended);
    assert_eq!(scores.submissions, 1);

    game.action(&mut scores).unwrap();
    assert_eq!(game.phase(), Phase::Resetting);
    game.tick(10_000.0, 1.0);
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.round(), 2);
}

#[test]
fn test_aligned_drop_scores_a_point() {
    let mut scores = FlakyScores::new();
    let mut game = ready(config(12.0, 0.2), &mut scores);
    game.action(&mut scores).unwrap();

    sweep_until_within(&mut game, 0.05);
    game.action(&mut scores).unwrap();

    assert_eq!(game.take_last_cut(), Some(CutKind::Perfect));
    assert_eq!(game.score(), 1);
    assert_eq!(game.stack()[1].position().x, 0.0);
    assert_eq!(game.stack()[1].scale().x, 10.0);
    assert_eq!(game.animating(), 0);
}

#[test]
fn test_partial_drop_shrinks_the_stack() {
    let mut scores = FlakyScores::new();
    let mut game = ready(config(12.0, 0.2), &mut scores);
    game.action(&mut scores).unwrap();

    sweep_until_within(&mut game, 7.0);
    let offset = active_offset(&game);
    game.action(&mut scores).unwrap();

    assert_eq!(game.take_last_cut(), Some(CutKind::Chopped));
    assert_eq!(game.score(), 1);
    let placed = &game.stack()[1];
    assert!((placed.scale().x - (10.0 - offset.abs())).abs() < 1e-9);
    assert_eq!(game.animating(), 1);

    // The next block copies the survivor's footprint.
    let next = game.active_block().unwrap();
    assert_eq!(next.scale(), placed.scale());
    assert_eq!(next.position().y, placed.position().y + placed.height());
}

#[test]
fn test_miss_submits_exactly_once() {
    let mut scores = FlakyScores::new();
    let mut game = ready(config(15.0, 0.2), &mut scores);
    game.action(&mut scores).unwrap();
    game.action(&mut scores).unwrap();

    assert_eq!(game.take_last_cut(), Some(CutKind::Missed));
    assert_eq!(game.phase(), Phase::Ended);
    assert_eq!(scores.submissions, 1);
    assert!(game.active_block().is_none());

    // Further frames and renders never submit again.
    for i in 0..10 {
        game.tick(i as f64 * 16.0, 1.0);
        game.render(&mut NullStage);
    }
    assert_eq!(scores.submissions, 1);
}

#[test]
fn test_reset_returns_every_block_to_the_pool() {
    let mut scores = FlakyScores::new();
    let mut game = ready(config(12.0, 100.0), &mut scores);
    game.action(&mut scores).unwrap();
    for _ in 0..5 {
        sweep_until_within(&mut game, 10.0);
        game.action(&mut scores).unwrap();
        assert_eq!(game.take_last_cut(), Some(CutKind::Perfect));
    }

    // The fresh block starts past the edge; dropping it misses.
    game.action(&mut scores).unwrap();
    assert_eq!(game.phase(), Phase::Ended);
    assert_eq!(game.stack_len(), 6);
    assert_eq!(game.score(), 5);
    assert_eq!(game.best().unwrap().score, 5);
    assert_eq!(game.pool().created(), 6);
    assert_eq!(game.pool().available(), 1);

    game.tick(2_000.0, 0.0);
    game.action(&mut scores).unwrap();
    assert_eq!(game.phase(), Phase::Resetting);
    assert_eq!(game.stack_len(), 1);
    assert_eq!(game.animating(), 5);

    // 2 * 200 + 7 * 20
    game.tick(2_539.0, 0.0);
    assert_eq!(game.phase(), Phase::Resetting);
    assert_eq!(game.display_score(), 0);
    assert_eq!(game.pool().available(), 6);

    game.tick(2_540.0, 0.0);
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.stack_len(), 2);
    assert_eq!(game.score(), 0);
    assert_eq!(game.animating(), 0);
    assert_eq!(game.pool().created(), 6);
    assert_eq!(game.pool().in_use(), 1);
}

#[test]
fn test_failed_submission_is_retried_on_next_action() {
    let mut scores = FlakyScores::new();
    let mut game = ready(config(15.0, 0.2), &mut scores);
    game.action(&mut scores).unwrap();

    scores.online = false;
    let err = game.action(&mut scores).unwrap_err();
    assert!(matches!(err, GameError::Service(ServiceError::Unavailable(_))));
    assert_eq!(game.phase(), Phase::Playing);
    assert_eq!(game.pending_submission(), Some(0));
    assert!(game.active_block().is_none());
    assert!(game.snapshot().pending_submission);

    // Nothing moves while the score is pending.
    game.tick(16.0, 1.0);
    assert_eq!(game.stack_len(), 1);

    scores.online = true;
    assert!(game.action(&mut scores).unwrap());
    assert_eq!(game.phase(), Phase::Ended);
    assert_eq!(game.pending_submission(), None);
    assert_eq!(scores.submissions, 1);
}

#[test]
fn test_missing_config_file_keeps_loading() {
    let mut scores = FlakyScores::new();
    let mut game = GameState::new(1);
    let mut source = JsonConfigFile("/nonexistent/stacker.json".into());

    let err = game.prepare(&mut source, &mut scores).unwrap_err();
    assert!(matches!(
        err,
        GameError::Service(ServiceError::Config(ConfigError::Io { .. }))
    ));
    assert_eq!(game.phase(), Phase::Loading);
    assert!(game.load_error().is_some());
    assert!(game.snapshot().load_failed);
    assert!(!game.action(&mut scores).unwrap());

    // A later attempt with a good source recovers.
    let mut source = GameConfig::default();
    game.prepare(&mut source, &mut scores).unwrap();
    assert_eq!(game.phase(), Phase::Ready);
    assert!(game.load_error().is_none());
}

#[test]
fn test_config_file_overrides_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "gameplay": {{ "distance": 15 }}, "block": {{ "base": {{ "color": "0x102030" }} }} }}"#
    )
    .unwrap();

    let mut scores = FlakyScores::new();
    let mut game = GameState::new(1);
    let mut source = JsonConfigFile(file.path().to_path_buf());
    game.prepare(&mut source, &mut scores).unwrap();

    let config = game.config().unwrap();
    assert_eq!(config.gameplay.distance, 15.0);
    assert_eq!(config.gameplay.accuracy, 0.2);
    assert_eq!(game.stack()[0].color(), 0x102030);
}

#[test]
fn test_ticker_drives_the_active_block() {
    let mut scores = FlakyScores::new();
    let mut game = ready(GameConfig::default(), &mut scores);
    game.action(&mut scores).unwrap();
    let start = active_offset(&game);

    let mut ticker = Ticker::default();
    ticker.start(0.0);
    let mut frames = 0;
    for i in 1..=30 {
        if let Some(frame) = ticker.advance(i as f64 * 1000.0 / 60.0) {
            game.tick(frame.time_ms, frame.delta);
            frames += 1;
        }
    }
    assert_eq!(frames, 30);
    assert!(active_offset(&game).abs() < start.abs());
}

#[test]
fn test_term_stage_tracks_scene_membership() {
    let mut scores = FlakyScores::new();
    let mut game = ready(config(5.0, 0.2), &mut scores);
    let mut stage = TermStage::new(Viewport::new(80, 24));

    game.render(&mut stage);
    assert_eq!(stage.member_count(), 1);

    game.action(&mut scores).unwrap();
    game.tick(100.0, 0.0);
    game.action(&mut scores).unwrap();
    assert_eq!(game.take_last_cut(), Some(CutKind::Chopped));
    game.render(&mut stage);
    // Base, placed survivor, new active block and the falling fragment.
    assert_eq!(stage.member_count(), 4);

    game.tick(1_100.0, 0.0);
    game.render(&mut stage);
    assert_eq!(stage.member_count(), 3);
    assert!(stage.camera_y(1_100.0) > stage.camera_y(0.0));
}

#[test]
fn test_standings_serialize_for_score_services() {
    let mut scores = FlakyScores::new();
    let standings = scores.submit_score(12).unwrap();
    let json = serde_json::to_value(&standings).unwrap();

    assert_eq!(json["allTime"]["rank"], 1);
    assert_eq!(json["allTime"]["score"], 12);
    assert_eq!(json["leaderboard"][0]["name"], "tester");

    let back: Standings = serde_json::from_value(json).unwrap();
    assert_eq!(back, standings);
}
