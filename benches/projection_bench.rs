use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::cell::RefCell;
use std::rc::Rc;

use composite_proj::stream::{SharedStream, Stream};
use composite_proj::{ConicConformalSpain, Geometry};

struct NullSink;

impl Stream for NullSink {}

/// Sweep covering both halves: peninsula box plus the Canary box.
fn sample_coords(n: usize) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64;
            if i % 2 == 0 {
                (-9.0 + t * 12.0, 36.0 + t * 7.5)
            } else {
                (-18.0 + t * 5.0, 27.5 + t * 1.5)
            }
        })
        .collect()
}

fn bench_forward_throughput(c: &mut Criterion) {
    let spain = ConicConformalSpain::new();
    let coords = sample_coords(1_000_000);

    c.bench_function("project_1M", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for &coord in &coords {
                if spain.project(black_box(coord)).is_some() {
                    hits += 1;
                }
            }
            black_box(hits)
        });
    });
}

fn bench_inverse_throughput(c: &mut Criterion) {
    let spain = ConicConformalSpain::new();
    let points: Vec<(f64, f64)> = sample_coords(1_000_000)
        .into_iter()
        .filter_map(|coord| spain.project(coord))
        .collect();

    c.bench_function("invert_1M", |b| {
        b.iter(|| {
            let mut acc = 0.0_f64;
            for &point in &points {
                if let Some((lon, lat)) = spain.invert(black_box(point)) {
                    acc += lon + lat;
                }
            }
            black_box(acc)
        });
    });
}

fn bench_stream_polygon(c: &mut Criterion) {
    let mut spain = ConicConformalSpain::new();
    // Dense ring around the peninsula, resampled and clipped per render.
    let ring: Vec<(f64, f64)> = (0..=720)
        .map(|i| {
            let angle = (i as f64 / 720.0) * std::f64::consts::TAU;
            (-4.0 + 6.0 * angle.cos(), 40.0 + 4.0 * angle.sin())
        })
        .collect();
    let polygon = Geometry::Polygon(vec![ring]);
    let sink: SharedStream = Rc::new(RefCell::new(NullSink));
    let stream = spain.stream(&sink);

    c.bench_function("stream_polygon_720pts", |b| {
        b.iter(|| {
            polygon.stream_to(&mut *stream.borrow_mut());
        });
    });
}

criterion_group!(
    benches,
    bench_forward_throughput,
    bench_inverse_throughput,
    bench_stream_polygon
);
criterion_main!(benches);
