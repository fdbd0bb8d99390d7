use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::DVec3;
use tui_stacker::core::{
    Block, BlockId, Direction, GameConfig, GameSnapshot, GameState, LocalLeaderboard, NullStage,
};
use tui_stacker::term::{FrameBuffer, GameView, Viewport};

fn playing_game() -> (GameState, LocalLeaderboard) {
    let mut config = GameConfig::default();
    config.gameplay.distance = 5.0;
    config.gameplay.accuracy = 100.0;
    let mut scores = LocalLeaderboard::new("bench");
    let mut game = GameState::new(12345);
    game.prepare(&mut config, &mut scores).unwrap();
    game.action(&mut scores).unwrap();
    (game, scores)
}

fn bench_tick(c: &mut Criterion) {
    let (mut game, _) = playing_game();
    let mut now = 0.0;

    c.bench_function("game_tick_16ms", |b| {
        b.iter(|| {
            now += 16.0;
            game.tick(black_box(now), 1.0);
        })
    });
}

fn bench_cut(c: &mut Criterion) {
    let target = Block::with_scale(BlockId(0), DVec3::new(10.0, 2.0, 10.0));

    c.bench_function("cut_chop", |b| {
        b.iter(|| {
            let mut current = Block::with_scale(BlockId(1), DVec3::new(10.0, 2.0, 10.0));
            current.set_position(DVec3::new(black_box(3.7), 2.0, 0.0));
            current.set_direction(Direction::PosX);
            current.cut(&target, 0.2)
        })
    });
}

fn bench_drop_round(c: &mut Criterion) {
    c.bench_function("forty_drops_with_render", |b| {
        b.iter(|| {
            let (mut game, mut scores) = playing_game();
            for i in 0..40 {
                game.tick(i as f64 * 16.0, 1.0);
                let _ = game.action(&mut scores);
                game.render(&mut NullStage);
            }
            game.score()
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let (mut game, mut scores) = playing_game();
    for _ in 0..30 {
        let _ = game.action(&mut scores);
    }
    let mut snap = GameSnapshot::default();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| {
            game.snapshot_into(black_box(&mut snap));
        })
    });
}

fn bench_game_view(c: &mut Criterion) {
    let (mut game, mut scores) = playing_game();
    for _ in 0..30 {
        let _ = game.action(&mut scores);
    }
    let snap = game.snapshot();
    let view = GameView::default();
    let viewport = Viewport::new(120, 40);
    let mut fb = FrameBuffer::new(viewport.width, viewport.height);

    c.bench_function("game_view_render_into", |b| {
        b.iter(|| {
            view.render_into(black_box(&snap), 66.0, None, viewport, &mut fb);
        })
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_cut,
    bench_drop_round,
    bench_snapshot,
    bench_game_view
);
criterion_main!(benches);
