use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use nback_core::{Letter, Placed, Shape, stimulus::{WHITE, YELLOW}};
use nback_render::{FontArc, SkiaRenderer};
use std::path::PathBuf;

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

fn harness(font: &FontArc) -> (SkiaRenderer, Vec<u8>) {
    let r = SkiaRenderer::new(WIDTH, HEIGHT, font.clone()).unwrap();
    let fb = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
    (r, fb)
}

/// A scaffolded training frame: history row, slot box, letter and both cues.
fn scaffold_frame() -> Vec<Placed> {
    let history = [Letter::G, Letter::H, Letter::G, Letter::P, Letter::W];
    let mut items: Vec<Placed> = history
        .iter()
        .enumerate()
        .map(|(i, l)| Shape::text(l.to_string(), 40.0, WHITE).at((-270.0 + i as f32 * 60.0, 200.0)))
        .collect();
    items.push(Shape::outline(50.0, 60.0, YELLOW).at((-270.0 + 4.0 * 60.0, 200.0)));
    items.push(Shape::text("W", 80.0, WHITE).at((0.0, 0.0)));
    items.push(Shape::text("D\nDiffer", 30.0, WHITE).at((-300.0, -250.0)));
    items.push(Shape::text("K\nMatch", 30.0, WHITE).at((300.0, -250.0)));
    items
}

pub fn bench_frames(c: &mut Criterion) {
    let Some(path) = std::env::var_os("NBACK_FONT").map(PathBuf::from) else {
        eprintln!("NBACK_FONT not set, skipping render benchmarks");
        return;
    };
    let font = SkiaRenderer::load_font(&path).unwrap();
    let items = scaffold_frame();

    let mut g = c.benchmark_group("render_frame");
    g.sample_size(40);

    g.bench_function("scaffold_cold", |b| {
        b.iter_batched(
            || harness(&font),
            |(mut r, mut fb)| {
                let stats = r.render_frame(&items, &mut fb).unwrap();
                black_box(stats);
            },
            BatchSize::SmallInput,
        )
    });

    let (mut warm, mut fb) = harness(&font);
    g.bench_function("scaffold_cached", |b| {
        b.iter(|| {
            let stats = warm.render_frame(&items, &mut fb).unwrap();
            black_box(stats);
        })
    });

    g.finish();
}

criterion_group!(benches, bench_frames);
criterion_main!(benches);
