use std::hint::black_box;
use std::time::Instant;

use tilescape_common::{GenConfig, WorldCoord};
use tilescape_kernel::{classify_tile, cover_for, decorations_at};

fn window(center: WorldCoord, radius: i32) -> impl Iterator<Item = WorldCoord> {
    (center.y - radius..=center.y + radius)
        .flat_map(move |y| (center.x - radius..=center.x + radius).map(move |x| WorldCoord::new(x, y)))
}

fn bench_classify(radius: i32, iterations: usize) {
    let config = GenConfig::default();
    let start = Instant::now();
    for _ in 0..iterations {
        for coord in window(WorldCoord::ORIGIN, radius) {
            black_box(classify_tile(black_box(coord), &config));
        }
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  classify (radius {radius}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_full_frame(radius: i32, iterations: usize) {
    let config = GenConfig::default();
    let start = Instant::now();
    for i in 0..iterations {
        let center = WorldCoord::new(i as i32, -(i as i32));
        let mut items = 0usize;
        for coord in window(center, radius) {
            let tile = classify_tile(coord, &config);
            black_box(cover_for(coord, tile, &config));
            items += decorations_at(coord, &config).count();
        }
        black_box(items);
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  full frame generation (radius {radius}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Terrain Generation Benchmarks ===\n");

    println!("Classification:");
    bench_classify(10, 200);
    bench_classify(30, 100);

    println!("\nFull frame (classify + cover + decorations):");
    bench_full_frame(30, 100);
    bench_full_frame(60, 20);
}
