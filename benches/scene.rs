//! Scene file benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tilescreen::core::{Rgba, Tile, TileGrid};
use tilescreen::scene;

fn sample_layers() -> Vec<TileGrid> {
    let mut floor = TileGrid::with_fill(120, 60, &Tile::with_char('.'));
    for y in 0..60 {
        floor.write_str(0, y, "#####", Rgba::rgb(120, 120, 120), Rgba::rgb(20, 20, 20));
    }
    let mut clear = Tile::new();
    clear.set_background(Rgba::TRANSPARENT);
    let overlay = TileGrid::with_fill(120, 60, &clear);
    vec![floor, overlay]
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene");
    let layers = sample_layers();
    let body = scene::encode(&layers).unwrap();
    let compressed = scene::compress(&body).unwrap();
    group.throughput(Throughput::Bytes(body.len() as u64));

    group.bench_function("parse", |b| b.iter(|| black_box(scene::parse(&body).unwrap())));

    group.bench_function("decompress_and_parse", |b| {
        b.iter(|| {
            let body = scene::decompress(&compressed).unwrap();
            black_box(scene::parse(&body).unwrap())
        })
    });

    group.bench_function("encode", |b| b.iter(|| black_box(scene::encode(&layers).unwrap())));

    group.finish();
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
