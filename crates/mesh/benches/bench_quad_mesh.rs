use std::hint::black_box;
use std::time::Instant;

use glyphfield_mesh::QuadMeshBuilder;

fn bench_build_seeded(num_cells: u32, iterations: usize) {
    let builder = QuadMeshBuilder::new(num_cells, 4.0).expect("valid builder");

    let start = Instant::now();
    for i in 0..iterations {
        let _ = black_box(builder.build_seeded(black_box(i as u64)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  build_seeded ({num_cells} cells, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_build_thread_rng(num_cells: u32, iterations: usize) {
    let builder = QuadMeshBuilder::new(num_cells, 4.0).expect("valid builder");

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(builder.build());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  build ({num_cells} cells, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_interleave(num_cells: u32, iterations: usize) {
    let mesh = QuadMeshBuilder::new(num_cells, 4.0)
        .expect("valid builder")
        .build_seeded(1);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(black_box(&mesh).vertices());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  interleave ({num_cells} cells, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Quad Mesh Benchmarks ===\n");

    println!("Seeded build (ChaCha8):");
    bench_build_seeded(100, 1000);
    bench_build_seeded(1000, 100);
    bench_build_seeded(100_000, 10);

    println!("\nUnseeded build (thread rng):");
    bench_build_thread_rng(1000, 100);
    bench_build_thread_rng(100_000, 10);

    println!("\nInterleaved vertex view:");
    bench_interleave(1000, 100);
    bench_interleave(100_000, 10);

    println!("\n=== Done ===");
}
