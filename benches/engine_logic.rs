use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blockfall::core::{Board, Engine, EngineConfig, GameSnapshot};
use blockfall::term::{FrameBuffer, GameView, Viewport};
use blockfall::types::{Command, Phase};

fn bench_update_frame(c: &mut Criterion) {
    let mut engine = Engine::new(EngineConfig::desktop(), 12345).unwrap();
    let mut now = 0u64;

    c.bench_function("engine_update_16ms", |b| {
        b.iter(|| {
            now += 16;
            if engine.phase() != Phase::Running {
                engine.reset();
            }
            engine.update(black_box(now));
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new(12, 20);
            for y in 16..20 {
                for x in 0..12 {
                    board.set(x, y, 1);
                }
            }
            black_box(board.clear_lines());
        })
    });
}

fn bench_soft_drop(c: &mut Criterion) {
    let mut engine = Engine::new(EngineConfig::compact(), 12345).unwrap();

    c.bench_function("soft_drop_and_lock", |b| {
        b.iter(|| {
            if !engine.handle_command(Command::SoftDrop) {
                engine.reset();
            }
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let engine = Engine::new(EngineConfig::desktop(), 12345).unwrap();
    let view = GameView::default();
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(80, 24);

    c.bench_function("snapshot_and_render", |b| {
        b.iter(|| {
            engine.snapshot_into(&mut snap);
            view.render_into(black_box(&snap), Viewport::new(80, 24), &mut fb);
        })
    });
}

criterion_group!(
    benches,
    bench_update_frame,
    bench_line_clear,
    bench_soft_drop,
    bench_render
);
criterion_main!(benches);
